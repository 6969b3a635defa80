// src/models/property.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Property (the tenant boundary)
// ---
// One property per admin. Rooms, guests, supervisors and settings hang off it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    #[schema(example = "Sunrise PG")]
    pub name: String,
    #[schema(example = "Main Road, Hyderabad")]
    pub address: String,
    #[schema(example = "Aditya Koganti")]
    pub owner_name: String,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Row returned to the super admin's property list
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub owner_name: String,
    pub admin_id: Uuid,
    pub admin_username: String,
    pub admin_mobile: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPropertyPayload {
    #[validate(length(min = 1, message = "Property name is required."))]
    #[schema(example = "Sunrise PG")]
    pub property_name: String,

    #[validate(length(min = 1, message = "Address is required."))]
    pub address: String,

    #[validate(length(min = 1, message = "Owner name is required."))]
    pub owner_name: String,

    #[validate(length(min = 1, message = "Admin username is required."))]
    pub admin_username: String,

    #[validate(length(min = 10, max = 15, message = "Admin mobile must have 10 to 15 digits."))]
    pub admin_mobile: String,

    // UPI details are mandatory at provisioning time
    #[validate(length(min = 3, message = "UPI id is required."))]
    #[schema(example = "sunrisepg@ybl")]
    pub upi_id: String,

    #[validate(length(min = 1, message = "UPI name is required."))]
    #[schema(example = "Sunrise PG")]
    pub upi_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCreated {
    pub property_id: Uuid,
    pub admin_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStatus {
    pub is_active: bool,
}
