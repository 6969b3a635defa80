// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const UPI_ID_KEY: &str = "UpiId";
pub const UPI_NAME_KEY: &str = "UpiName";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertySetting {
    pub id: Uuid,

    #[schema(ignore)]
    pub property_id: Uuid,

    #[schema(example = "UpiId")]
    pub key: String,

    #[schema(example = "sunrisepg@ybl")]
    pub value: String,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUpiPayload {
    #[validate(length(min = 3, message = "UPI id is required."))]
    #[schema(example = "sunrisepg@ybl")]
    pub upi_id: String,

    #[validate(length(min = 1, message = "UPI name is required."))]
    #[schema(example = "Sunrise PG")]
    pub upi_name: String,
}

/// UPI payee details of a property, extracted from its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiSettings {
    pub upi_id: String,
    pub upi_name: String,
}

impl UpiSettings {
    /// Both keys must be present and non-blank.
    pub fn from_settings(settings: &[PropertySetting]) -> Option<Self> {
        let lookup = |key: &str| {
            settings
                .iter()
                .find(|s| s.key == key)
                .map(|s| s.value.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Some(Self {
            upi_id: lookup(UPI_ID_KEY)?,
            upi_name: lookup(UPI_NAME_KEY)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(key: &str, value: &str) -> PropertySetting {
        PropertySetting {
            id: Uuid::new_v4(),
            property_id: Uuid::nil(),
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn reads_upi_settings_when_both_keys_are_set() {
        let settings = vec![setting(UPI_ID_KEY, "pg@ybl"), setting(UPI_NAME_KEY, " Ramesh Kumar ")];
        assert_eq!(
            UpiSettings::from_settings(&settings),
            Some(UpiSettings { upi_id: "pg@ybl".into(), upi_name: "Ramesh Kumar".into() })
        );
    }

    #[test]
    fn blank_or_missing_upi_settings_are_not_configured() {
        assert_eq!(UpiSettings::from_settings(&[setting(UPI_ID_KEY, "pg@ybl")]), None);
        assert_eq!(
            UpiSettings::from_settings(&[setting(UPI_ID_KEY, ""), setting(UPI_NAME_KEY, "Ramesh")]),
            None
        );
    }
}
