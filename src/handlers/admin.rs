// src/handlers/admin.rs

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
    middleware::tenancy::AdminContext,
    models::{
        auth::MessageResponse,
        guest::{AddGuestPayload, GuestListEntry, GuestStay},
        property::ActiveStatus,
        room::{AddRoomPayload, Room, RoomFilter},
        supervisor::{AddSupervisorPayload, Supervisor, SupervisorView},
    },
};

// =========================================================================
//  SUPERVISORS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/admin/supervisors",
    tag = "Admin",
    responses(
        (status = 200, description = "Supervisors of the property", body = Vec<SupervisorView>),
        (status = 401, description = "Not an admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_supervisors(
    State(app_state): State<AppState>,
    ctx: AdminContext,
) -> Result<impl IntoResponse, AppError> {
    let supervisors = app_state.staff_service.list_supervisors(ctx.property.id).await?;
    Ok((StatusCode::OK, Json(supervisors)))
}

#[utoipa::path(
    post,
    path = "/api/admin/add-supervisor",
    tag = "Admin",
    request_body = AddSupervisorPayload,
    responses(
        (status = 201, description = "Supervisor created, password chosen on first login", body = Supervisor),
        (status = 400, description = "Invalid payload or mobile already registered")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_supervisor(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Json(payload): Json<AddSupervisorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supervisor = app_state.staff_service.add_supervisor(ctx.property.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(supervisor)))
}

#[utoipa::path(
    post,
    path = "/api/admin/toggle-supervisor/{userId}",
    tag = "Admin",
    params(("userId" = Uuid, Path, description = "User id of the supervisor")),
    responses(
        (status = 200, description = "New login flag", body = ActiveStatus),
        (status = 404, description = "Supervisor not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_supervisor(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state.staff_service.toggle_supervisor(ctx.property.id, user_id).await?;
    Ok((StatusCode::OK, Json(status)))
}

#[utoipa::path(
    post,
    path = "/api/admin/reset-password/{userId}",
    tag = "Admin",
    params(("userId" = Uuid, Path, description = "Supervisor or guest user id")),
    responses(
        (status = 200, description = "Password cleared, next login goes through first-login", body = MessageResponse),
        (status = 401, description = "User does not belong to this property")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.reset_password(ctx.property.id, user_id).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Password reset"))))
}

// =========================================================================
//  GUESTS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/admin/guests",
    tag = "Admin",
    responses((status = 200, description = "Guests with their active stay", body = Vec<GuestListEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_guests(
    State(app_state): State<AppState>,
    ctx: AdminContext,
) -> Result<impl IntoResponse, AppError> {
    let guests = app_state.guest_service.list_guests(ctx.property.id).await?;
    Ok((StatusCode::OK, Json(guests)))
}

#[utoipa::path(
    post,
    path = "/api/admin/add-guest",
    tag = "Admin",
    request_body = AddGuestPayload,
    responses(
        (status = 201, description = "Guest registered and bed taken", body = GuestStay),
        (status = 400, description = "Invalid payload, mobile in use or room full"),
        (status = 404, description = "Room not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_guest(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Json(payload): Json<AddGuestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let stay = app_state.guest_service.add_guest(ctx.property.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(stay)))
}

#[utoipa::path(
    post,
    path = "/api/admin/toggle-guest/{guestId}",
    tag = "Admin",
    params(("guestId" = Uuid, Path, description = "Guest id")),
    responses((status = 200, description = "New login flag", body = ActiveStatus)),
    security(("api_jwt" = []))
)]
pub async fn toggle_guest(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(guest_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let status = app_state.guest_service.toggle_guest(ctx.property.id, guest_id).await?;
    Ok((StatusCode::OK, Json(status)))
}

#[utoipa::path(
    post,
    path = "/api/admin/checkout/{guestId}",
    tag = "Admin",
    params(("guestId" = Uuid, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Stay closed and bed released", body = GuestStay),
        (status = 400, description = "Notice not approved")
    ),
    security(("api_jwt" = []))
)]
pub async fn checkout_guest(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(guest_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stay = app_state.guest_service.checkout_guest(ctx.property.id, guest_id).await?;
    Ok((StatusCode::OK, Json(stay)))
}

// =========================================================================
//  NOTICE PERIOD
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/admin/approve-notice/{guestId}",
    tag = "Admin",
    params(("guestId" = Uuid, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Notice period started", body = GuestStay),
        (status = 400, description = "No pending notice request")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_notice(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(guest_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stay = app_state.notice_service.approve_notice(ctx.property.id, guest_id).await?;
    Ok((StatusCode::OK, Json(stay)))
}

#[utoipa::path(
    post,
    path = "/api/admin/reject-notice/{guestId}",
    tag = "Admin",
    params(("guestId" = Uuid, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Notice request dropped", body = GuestStay),
        (status = 400, description = "No pending notice request")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_notice(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(guest_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stay = app_state.notice_service.reject_notice(ctx.property.id, guest_id).await?;
    Ok((StatusCode::OK, Json(stay)))
}

#[utoipa::path(
    post,
    path = "/api/admin/revert-notice/{guestId}",
    tag = "Admin",
    params(("guestId" = Uuid, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Notice period cancelled", body = GuestStay),
        (status = 400, description = "Guest is not in notice period")
    ),
    security(("api_jwt" = []))
)]
pub async fn revert_notice(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(guest_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stay = app_state.notice_service.revert_notice(ctx.property.id, guest_id).await?;
    Ok((StatusCode::OK, Json(stay)))
}

// =========================================================================
//  ROOMS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/admin/rooms",
    tag = "Rooms",
    params(RoomFilter),
    responses((status = 200, description = "Rooms of the property", body = Vec<Room>)),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Query(filter): Query<RoomFilter>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state.room_service.list_rooms(ctx.property.id, &filter).await?;
    Ok((StatusCode::OK, Json(rooms)))
}

#[utoipa::path(
    get,
    path = "/api/admin/available-rooms",
    tag = "Rooms",
    params(RoomFilter),
    responses((status = 200, description = "Rooms with at least one free bed", body = Vec<Room>)),
    security(("api_jwt" = []))
)]
pub async fn available_rooms(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Query(filter): Query<RoomFilter>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state.room_service.available_rooms(ctx.property.id, &filter).await?;
    Ok((StatusCode::OK, Json(rooms)))
}

#[utoipa::path(
    post,
    path = "/api/admin/add-room",
    tag = "Rooms",
    request_body = AddRoomPayload,
    responses(
        (status = 201, description = "Room created with every bed free", body = Room),
        (status = 400, description = "Invalid payload or room number already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_room(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Json(payload): Json<AddRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let room = app_state.room_service.add_room(ctx.property.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}
