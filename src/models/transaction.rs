// src/models/transaction.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    #[default]
    Rent,
    Advance,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub stay_id: Uuid,

    #[schema(ignore)]
    pub property_id: Uuid,

    /// Bank reference (UTR) entered by the guest
    #[schema(example = "412345678901")]
    pub utr: String,

    #[schema(example = "8000.00")]
    pub amount: Decimal,

    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub payment_date: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

// Admin history row with the guest and room it belongs to
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub utr: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub payment_date: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub guest_name: String,
    pub room_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentPayload {
    #[validate(length(min = 6, max = 40, message = "Enter the UTR / transaction reference."))]
    #[schema(example = "412345678901")]
    pub utr: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "8000.00")]
    pub amount: Decimal,

    #[serde(default)]
    pub kind: TransactionKind,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpiLinkQuery {
    #[validate(custom(function = "validate_positive"))]
    #[param(value_type = f64)]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpiLink {
    #[schema(example = "upi://pay?pa=sunrisepg%40ybl&pn=Sunrise%20PG&am=8000.00&cu=INR")]
    pub link: String,
    pub upi_id: String,
    pub upi_name: String,
    pub amount: Decimal,
}

// Result of an admin decision on a transaction
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDecision {
    pub transaction: Transaction,
    #[schema(value_type = String, format = Date)]
    pub next_due_date: chrono::NaiveDate,
    pub payment_status: crate::models::guest::PaymentStatus,
}
