// src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        CheckStatusQuery, LoginPayload, LoginResponse, MessageResponse, PasswordStatus, SetPasswordPayload, User,
    },
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token and session details", body = LoginResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Invalid credentials, password not set or account disabled")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/auth/check-status",
    tag = "Auth",
    params(CheckStatusQuery),
    responses(
        (status = 200, description = "Whether the account already has a password", body = PasswordStatus),
        (status = 404, description = "Unknown username or mobile")
    )
)]
pub async fn check_status(
    State(app_state): State<AppState>,
    Query(query): Query<CheckStatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state.auth_service.check_status(&query.username).await?;
    Ok((StatusCode::OK, Json(status)))
}

#[utoipa::path(
    post,
    path = "/api/auth/set-password",
    tag = "Auth",
    request_body = SetPasswordPayload,
    responses(
        (status = 200, description = "Password chosen on first login", body = MessageResponse),
        (status = 400, description = "Invalid payload or password already set"),
        (status = 404, description = "Unknown username or mobile")
    )
)]
pub async fn set_password(
    State(app_state): State<AppState>,
    Json(payload): Json<SetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .set_password(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Password updated successfully"))))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
