// src/models/supervisor.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supervisor {
    pub id: Uuid,
    pub user_id: Uuid,

    #[schema(ignore)]
    pub property_id: Uuid,

    #[schema(example = "Suresh")]
    pub name: String,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub joining_date: NaiveDate,
}

// Supervisor with the login identity behind it
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[schema(value_type = String, format = Date)]
    pub joining_date: NaiveDate,
    pub mobile: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSupervisorPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    #[validate(length(min = 10, max = 15, message = "Mobile must have 10 to 15 digits."))]
    pub mobile: String,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub joining_date: NaiveDate,
}
