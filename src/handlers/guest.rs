// src/handlers/guest.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::GuestContext,
    models::{auth::MessageResponse, guest::GuestProfile},
};

#[utoipa::path(
    get,
    path = "/api/guest/profile",
    tag = "Guest",
    responses(
        (status = 200, description = "Stay, billing and notice details of the logged-in guest", body = GuestProfile),
        (status = 404, description = "No active stay")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    ctx: GuestContext,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state.guest_service.profile(&ctx.guest, &ctx.user).await?;
    Ok((StatusCode::OK, Json(profile)))
}

#[utoipa::path(
    post,
    path = "/api/guest/initiate-notice",
    tag = "Guest",
    responses(
        (status = 200, description = "Notice request waiting for approval", body = MessageResponse),
        (status = 400, description = "Request already open or fewer than 30 days to the due date")
    ),
    security(("api_jwt" = []))
)]
pub async fn initiate_notice(
    State(app_state): State<AppState>,
    ctx: GuestContext,
) -> Result<impl IntoResponse, AppError> {
    app_state.notice_service.request_notice(ctx.guest.id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Notice Request Initiated. Waiting for Approval.")),
    ))
}
