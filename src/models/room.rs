// src/models/room.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "room_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    #[serde(rename = "AC")]
    #[sqlx(rename = "AC")]
    Ac,
    #[serde(rename = "Non-AC")]
    NonAc,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,

    #[schema(ignore)]
    pub property_id: Uuid,

    #[schema(example = "A-101")]
    pub room_number: String,

    #[schema(example = 1)]
    pub floor_number: i32,

    /// Beds per room (1 = single, 2 = double sharing...)
    #[schema(example = 2)]
    pub sharing_type: i32,

    pub room_type: RoomType,
    pub total_beds: i32,
    pub available_beds: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRoomPayload {
    #[validate(length(min = 1, max = 20, message = "Room number is required."))]
    #[schema(example = "A-101")]
    pub room_number: String,

    #[validate(range(min = 0, max = 200, message = "Invalid floor number."))]
    pub floor_number: i32,

    #[validate(range(min = 1, max = 10, message = "Sharing type must be between 1 and 10."))]
    pub sharing_type: i32,

    pub room_type: RoomType,
}

// Query string of the room listings
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    /// Sharing type (beds per room)
    pub share: Option<i32>,
    pub floor: Option<i32>,
    pub room_type: Option<RoomType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_type_uses_display_labels() {
        assert_eq!(serde_json::to_value(RoomType::NonAc).unwrap(), "Non-AC");
        let parsed: RoomType = serde_json::from_value(serde_json::json!("AC")).unwrap();
        assert_eq!(parsed, RoomType::Ac);
    }

    #[test]
    fn sharing_type_must_be_at_least_one() {
        let payload = AddRoomPayload {
            room_number: "A-101".into(),
            floor_number: 1,
            sharing_type: 0,
            room_type: RoomType::Ac,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sharing_type"));
    }
}
