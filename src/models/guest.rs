// src/models/guest.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::validation::validate_not_negative;

// --- Enums (mapped to Postgres types) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rent_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentType {
    /// Monthly rent on a 30-day cycle
    #[default]
    Regular,
    /// Fixed-term stay billed per day
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notice_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeStatus {
    None,
    Pending,
    Approved,
}

// --- Rows ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Uuid,
    pub user_id: Uuid,

    #[schema(ignore)]
    pub property_id: Uuid,

    #[schema(example = "Ravi Kumar")]
    pub name: String,

    #[schema(example = "Software Engineer")]
    pub occupation: String,

    pub created_at: DateTime<Utc>,
}

// The billing lifecycle of one stay in one room
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestStay {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub room_id: Uuid,

    #[schema(example = "8000.00")]
    pub rent_amount: Decimal,
    #[schema(example = "10000.00")]
    pub advance_amount: Decimal,

    pub rent_type: RentType,
    pub per_day_rent: Option<Decimal>,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub joining_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    #[schema(value_type = String, format = Date, example = "2026-01-31")]
    pub rent_due_date: NaiveDate,

    pub payment_status: PaymentStatus,
    pub last_paid_date: Option<DateTime<Utc>>,

    pub notice_status: NoticeStatus,
    pub is_in_notice_period: bool,
    pub notice_start_date: Option<DateTime<Utc>>,

    pub checked_out_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Admin guest list: the guest, the login flag and the active stay (if any)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestListEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub occupation: String,
    pub mobile: String,
    pub is_active: bool,
    pub stay_id: Option<Uuid>,
    pub room_number: Option<String>,
    pub rent_amount: Option<Decimal>,
    pub rent_type: Option<RentType>,
    #[schema(value_type = Option<String>, format = Date)]
    pub rent_due_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub notice_status: Option<NoticeStatus>,
    pub is_in_notice_period: Option<bool>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_add_guest"))]
pub struct AddGuestPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    #[schema(example = "Ravi Kumar")]
    pub name: String,

    #[validate(length(min = 10, max = 15, message = "Mobile must have 10 to 15 digits."))]
    #[schema(example = "9876543210")]
    pub mobile: String,

    #[validate(length(min = 1, message = "Room number is required."))]
    #[schema(example = "A-101")]
    pub room_number: String,

    #[serde(default)]
    pub occupation: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub advance_amount: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub rent_amount: Decimal,

    /// Defaults to today
    #[schema(value_type = Option<String>, format = Date, example = "2026-01-01")]
    pub joining_date: Option<NaiveDate>,

    #[serde(default)]
    pub rent_type: RentType,

    pub per_day_rent: Option<Decimal>,

    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

fn validate_add_guest(payload: &AddGuestPayload) -> Result<(), ValidationError> {
    if let (Some(joining), Some(end)) = (payload.joining_date, payload.end_date) {
        if end < joining {
            let mut err = ValidationError::new("end_before_joining");
            err.message = Some("End date cannot be before the joining date.".into());
            return Err(err);
        }
    }
    if payload.per_day_rent.is_some_and(|r| r.is_sign_negative()) {
        let mut err = ValidationError::new("range");
        err.message = Some("Per day rent cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

// --- Views ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestUserSummary {
    pub id: Uuid,
    pub mobile: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestProfile {
    pub id: Uuid,
    pub name: String,
    pub room_number: String,
    pub advance_amount: Decimal,
    pub rent_amount: Decimal,
    #[schema(value_type = String, format = Date)]
    pub joining_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub rent_due_date: NaiveDate,

    pub is_in_notice_period: bool,
    pub notice_start_date: Option<DateTime<Utc>>,
    pub notice_status: NoticeStatus,

    /// Advance minus the maintenance deduction, never below zero
    pub refund_amount: Decimal,

    pub is_rent_due: bool,
    pub payment_status: PaymentStatus,
    pub last_paid_date: Option<DateTime<Utc>>,

    pub rent_type: RentType,
    pub per_day_rent: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    pub user: GuestUserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn payload() -> AddGuestPayload {
        AddGuestPayload {
            name: "Ravi".into(),
            mobile: "9876543210".into(),
            room_number: "A-101".into(),
            occupation: String::new(),
            advance_amount: Decimal::ZERO,
            rent_amount: Decimal::from_i32(8000).unwrap(),
            joining_date: NaiveDate::from_ymd_opt(2026, 1, 10),
            rent_type: RentType::Daily,
            per_day_rent: None,
            end_date: NaiveDate::from_ymd_opt(2026, 1, 15),
        }
    }

    #[test]
    fn accepts_a_well_formed_guest() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn rejects_end_date_before_joining() {
        let mut p = payload();
        p.end_date = NaiveDate::from_ymd_opt(2026, 1, 5);
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_negative_rent() {
        let mut p = payload();
        p.rent_amount = Decimal::from_i32(-1).unwrap();
        let errors = p.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rent_amount"));
    }

    #[test]
    fn rent_type_defaults_to_regular_when_omitted() {
        let p: AddGuestPayload = serde_json::from_value(serde_json::json!({
            "name": "Ravi",
            "mobile": "9876543210",
            "roomNumber": "A-101",
            "rentAmount": 8000
        }))
        .unwrap();
        assert_eq!(p.rent_type, RentType::Regular);
        assert_eq!(p.joining_date, None);
    }
}
