// src/handlers/payment.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::{AdminContext, GuestContext},
    models::transaction::{
        SubmitPaymentPayload, Transaction, TransactionDecision, TransactionView, UpiLink, UpiLinkQuery,
    },
};

// ---
// Guest side
// ---

#[utoipa::path(
    get,
    path = "/api/payment/upi-link",
    tag = "Payments",
    params(UpiLinkQuery),
    responses(
        (status = 200, description = "UPI deep link for the property's payee", body = UpiLink),
        (status = 400, description = "Invalid amount or UPI not configured")
    ),
    security(("api_jwt" = []))
)]
pub async fn upi_link(
    State(app_state): State<AppState>,
    ctx: GuestContext,
    Query(query): Query<UpiLinkQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let link = app_state
        .payment_service
        .upi_link(ctx.guest.property_id, query.amount)
        .await?;
    Ok((StatusCode::OK, Json(link)))
}

#[utoipa::path(
    get,
    path = "/api/payment/upi-qr",
    tag = "Payments",
    params(UpiLinkQuery),
    responses(
        (status = 200, description = "The UPI link as a PNG QR code (image/png)"),
        (status = 400, description = "Invalid amount or UPI not configured")
    ),
    security(("api_jwt" = []))
)]
pub async fn upi_qr(
    State(app_state): State<AppState>,
    ctx: GuestContext,
    Query(query): Query<UpiLinkQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let png = app_state
        .payment_service
        .upi_qr(ctx.guest.property_id, query.amount)
        .await?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png))
}

#[utoipa::path(
    post,
    path = "/api/payment/submit",
    tag = "Payments",
    request_body = SubmitPaymentPayload,
    responses(
        (status = 201, description = "Payment recorded, waiting for the admin", body = Transaction),
        (status = 400, description = "Invalid payload or UTR already submitted")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_payment(
    State(app_state): State<AppState>,
    ctx: GuestContext,
    Json(payload): Json<SubmitPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let transaction = app_state
        .payment_service
        .submit_payment(ctx.guest.id, ctx.guest.property_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/api/payment/history",
    tag = "Payments",
    responses((status = 200, description = "Own payments, newest first", body = Vec<Transaction>)),
    security(("api_jwt" = []))
)]
pub async fn my_history(
    State(app_state): State<AppState>,
    ctx: GuestContext,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.payment_service.history_for_guest(ctx.guest.id).await?;
    Ok((StatusCode::OK, Json(history)))
}

// ---
// Admin side
// ---

#[utoipa::path(
    get,
    path = "/api/payment/history/all",
    tag = "Payments",
    responses((status = 200, description = "Every payment of the property, newest first", body = Vec<TransactionView>)),
    security(("api_jwt" = []))
)]
pub async fn property_history(
    State(app_state): State<AppState>,
    ctx: AdminContext,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.payment_service.history_for_property(ctx.property.id).await?;
    Ok((StatusCode::OK, Json(history)))
}

#[utoipa::path(
    post,
    path = "/api/payment/approve/{txId}",
    tag = "Payments",
    params(("txId" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Payment accepted; rent moves the due date", body = TransactionDecision),
        (status = 400, description = "Transaction already processed"),
        (status = 401, description = "Transaction of another property")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_transaction(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(tx_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let decision = app_state
        .payment_service
        .approve_transaction(ctx.property.id, tx_id)
        .await?;
    Ok((StatusCode::OK, Json(decision)))
}

#[utoipa::path(
    post,
    path = "/api/payment/reject/{txId}",
    tag = "Payments",
    params(("txId" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Payment rejected", body = TransactionDecision),
        (status = 400, description = "Transaction already processed")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_transaction(
    State(app_state): State<AppState>,
    ctx: AdminContext,
    Path(tx_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let decision = app_state
        .payment_service
        .reject_transaction(ctx.property.id, tx_id)
        .await?;
    Ok((StatusCode::OK, Json(decision)))
}
