// src/handlers/superadmin.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{RequireRole, SuperAdminOnly},
    models::property::{ActiveStatus, AddPropertyPayload, PropertyCreated, PropertySummary},
};

#[utoipa::path(
    post,
    path = "/api/superadmin/add-property",
    tag = "Super Admin",
    request_body = AddPropertyPayload,
    responses(
        (status = 201, description = "Property, admin login and UPI settings created", body = PropertyCreated),
        (status = 400, description = "Invalid payload or admin username/mobile taken")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_property(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<AddPropertyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state.property_service.add_property(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/superadmin/properties",
    tag = "Super Admin",
    responses((status = 200, description = "Every property with its admin", body = Vec<PropertySummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let properties = app_state.property_service.list_properties().await?;
    Ok((StatusCode::OK, Json(properties)))
}

#[utoipa::path(
    post,
    path = "/api/superadmin/toggle-property/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "Property id")),
    responses(
        (status = 200, description = "New login flag of the whole property", body = ActiveStatus),
        (status = 404, description = "Property not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_property(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state.property_service.toggle_property(id).await?;
    Ok((StatusCode::OK, Json(status)))
}
