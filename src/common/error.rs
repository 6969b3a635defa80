// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Single error type for the whole API. Each business rule that can fail has
// its own variant so services and tests can match on it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    // --- Auth ---
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password not set. Complete the first login to choose one.")]
    PasswordNotSet,

    #[error("Password is already set for this account.")]
    PasswordAlreadySet,

    #[error("Account Disabled. Contact super admin.")]
    AccountDisabled,

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("You are not allowed to perform this action")]
    Unauthorized,

    #[error("Property not found for this admin")]
    PropertyNotFoundForAdmin,

    // --- Uniqueness ---
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Room number already exists")]
    RoomNumberAlreadyExists,

    #[error("A payment with this UTR was already submitted")]
    DuplicateUtr,

    // --- Rooms / stays ---
    #[error("Selected room is fully occupied.")]
    RoomFull,

    #[error("End date cannot be before the joining date.")]
    EndBeforeJoining,

    #[error("Stay record not found")]
    StayNotFound,

    #[error("Only guests in an approved notice period can be checked out.")]
    CheckoutRequiresApprovedNotice,

    // --- Notice period ---
    #[error("Notice request is already pending.")]
    NoticeAlreadyPending,

    #[error("Already in notice period.")]
    AlreadyInNoticePeriod,

    #[error(
        "Oops! You have only {days_left} days left until your next due date. At least 30 days are needed to raise a notice request."
    )]
    InsufficientNoticeWindow { days_left: i64 },

    #[error("No pending notice request found.")]
    NoPendingNotice,

    #[error("Guest is not in notice period.")]
    NotInNoticePeriod,

    // --- Complaints ---
    #[error("Solved complaints cannot be updated.")]
    ComplaintSolved,

    #[error("Only registered complaints can be cancelled.")]
    ComplaintNotCancellable,

    #[error("Estimated resolution days are required to start work on a complaint.")]
    EstimatedDaysRequired,

    #[error("A complaint cannot be moved back to Registered.")]
    InvalidComplaintTransition,

    // --- Payments ---
    #[error("Transaction has already been processed.")]
    TransactionAlreadyProcessed,

    #[error("UPI payments are not configured for this property.")]
    UpiNotConfigured,

    // --- Not found ---
    #[error("{0} not found")]
    NotFound(&'static str),

    // --- Infrastructure ---
    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::PasswordAlreadySet
            | AppError::UserAlreadyExists
            | AppError::RoomNumberAlreadyExists
            | AppError::DuplicateUtr
            | AppError::RoomFull
            | AppError::EndBeforeJoining
            | AppError::CheckoutRequiresApprovedNotice
            | AppError::NoticeAlreadyPending
            | AppError::AlreadyInNoticePeriod
            | AppError::InsufficientNoticeWindow { .. }
            | AppError::NoPendingNotice
            | AppError::NotInNoticePeriod
            | AppError::ComplaintSolved
            | AppError::ComplaintNotCancellable
            | AppError::EstimatedDaysRequired
            | AppError::InvalidComplaintTransition
            | AppError::TransactionAlreadyProcessed
            | AppError::UpiNotConfigured => StatusCode::BAD_REQUEST,

            AppError::InvalidCredentials
            | AppError::PasswordNotSet
            | AppError::AccountDisabled
            | AppError::InvalidToken
            | AppError::Unauthorized
            | AppError::PropertyNotFoundForAdmin => StatusCode::UNAUTHORIZED,

            AppError::StayNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "One or more fields are invalid.",
                "details": details,
            }));
            return (status, body).into_response();
        }

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Details stay in the log, never in the response
            tracing::error!("Internal server error: {:?}", self);
            "An unexpected error occurred.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Translates a unique-constraint violation into a business error; anything
/// else stays a database error.
pub(crate) fn map_unique_violation(e: sqlx::Error, on_unique: AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return on_unique;
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_failures_are_bad_requests() {
        assert_eq!(AppError::RoomFull.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ComplaintSolved.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InsufficientNoticeWindow { days_left: 3 }.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn access_failures_are_unauthorized() {
        assert_eq!(AppError::AccountDisabled.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn missing_entities_are_not_found() {
        assert_eq!(AppError::NotFound("Room").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound("Room").to_string(), "Room not found");
    }

    #[test]
    fn notice_window_message_reports_shortfall() {
        let err = AppError::InsufficientNoticeWindow { days_left: 22 };
        assert!(err.to_string().contains("only 22 days left"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
