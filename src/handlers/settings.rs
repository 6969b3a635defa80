// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::AdminContext,
    models::settings::{PropertySetting, UpdateUpiPayload},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Key/value settings of the property", body = Vec<PropertySetting>)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    ctx: AdminContext,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.property_service.get_settings(ctx.property.id).await?;
    Ok((StatusCode::OK, Json(settings)))
}

// POST /api/settings/update-upi
#[utoipa::path(
    post,
    path = "/api/settings/update-upi",
    tag = "Settings",
    request_body = UpdateUpiPayload,
    responses(
        (status = 200, description = "Stored UPI settings", body = Vec<PropertySetting>),
        (status = 400, description = "Invalid payload")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_upi(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Json(payload): Json<UpdateUpiPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state.property_service.update_upi(ctx.property.id, &payload).await?;
    Ok((StatusCode::OK, Json(updated)))
}
