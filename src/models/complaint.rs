// src/models/complaint.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "complaint_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Registered,
    InProgress,
    Solved,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub guest_id: Uuid,

    #[schema(example = "Plumbing")]
    pub complaint_type: String,

    #[schema(example = "Bathroom tap is leaking")]
    pub description: String,

    pub status: ComplaintStatus,
    pub estimated_resolution_days: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub solved_date: Option<DateTime<Utc>>,
}

// Staff view: the complaint plus who raised it and where
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintView {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub room_number: Option<String>,
    pub complaint_type: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub estimated_resolution_days: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub solved_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RaiseComplaintPayload {
    #[validate(length(min = 1, max = 100, message = "Complaint type is required."))]
    #[serde(alias = "type")]
    pub complaint_type: String,

    #[validate(length(min = 1, max = 600, message = "Description must have 1 to 600 characters."))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintStatusPayload {
    pub status: ComplaintStatus,

    #[validate(range(min = 1, max = 365, message = "Estimated days must be between 1 and 365."))]
    pub estimated_resolution_days: Option<i32>,

    #[validate(length(max = 1000, message = "Notes are too long."))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
}
