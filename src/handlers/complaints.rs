// src/handlers/complaints.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::{GuestContext, StaffContext},
    models::complaint::{
        Complaint, ComplaintFilter, ComplaintView, RaiseComplaintPayload, UpdateComplaintStatusPayload,
    },
};

// ---
// Staff (admin and supervisors)
// ---

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    params(ComplaintFilter),
    responses((status = 200, description = "Complaints of the property, newest first", body = Vec<ComplaintView>)),
    security(("api_jwt" = []))
)]
pub async fn list_complaints(
    State(app_state): State<AppState>,
    ctx: StaffContext,
    Query(filter): Query<ComplaintFilter>,
) -> Result<impl IntoResponse, AppError> {
    let complaints = app_state
        .complaint_service
        .list_for_property(ctx.property_id, filter.status)
        .await?;
    Ok((StatusCode::OK, Json(complaints)))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "The complaint", body = ComplaintView),
        (status = 404, description = "Not found in this property")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_complaint(
    State(app_state): State<AppState>,
    ctx: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let complaint = app_state.complaint_service.get(ctx.property_id, id).await?;
    Ok((StatusCode::OK, Json(complaint)))
}

#[utoipa::path(
    put,
    path = "/api/complaints/{id}/status",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "Complaint id")),
    request_body = UpdateComplaintStatusPayload,
    responses(
        (status = 200, description = "Updated complaint", body = Complaint),
        (status = 400, description = "Solved, missing estimate or backward move")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    ctx: StaffContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateComplaintStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state
        .complaint_service
        .update_status(ctx.property_id, id, &payload)
        .await?;

    tracing::debug!(complaint_id = %id, user_id = %ctx.user.id, "Complaint updated by staff");
    Ok((StatusCode::OK, Json(complaint)))
}

// ---
// Guests
// ---

#[utoipa::path(
    get,
    path = "/api/complaints/my",
    tag = "Complaints",
    responses((status = 200, description = "Own complaints, newest first", body = Vec<Complaint>)),
    security(("api_jwt" = []))
)]
pub async fn my_complaints(
    State(app_state): State<AppState>,
    ctx: GuestContext,
) -> Result<impl IntoResponse, AppError> {
    let complaints = app_state.complaint_service.list_for_guest(ctx.guest.id).await?;
    Ok((StatusCode::OK, Json(complaints)))
}

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = RaiseComplaintPayload,
    responses(
        (status = 201, description = "Complaint registered", body = Complaint),
        (status = 400, description = "Invalid payload")
    ),
    security(("api_jwt" = []))
)]
pub async fn raise_complaint(
    State(app_state): State<AppState>,
    ctx: GuestContext,
    Json(payload): Json<RaiseComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state.complaint_service.raise(ctx.guest.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "Complaint id")),
    responses(
        (status = 204, description = "Complaint withdrawn"),
        (status = 400, description = "Work on it has already started")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_complaint(
    State(app_state): State<AppState>,
    ctx: GuestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.complaint_service.cancel(ctx.guest.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
