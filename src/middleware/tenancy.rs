// src/middleware/tenancy.rs
//
// A property is the tenant boundary. These extractors resolve it from the
// verified user, never from anything the client sends.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{ensure_role, AdminOnly, GuestOnly, Staff},
    },
    models::{
        auth::{User, UserRole},
        guest::Guest,
        property::Property,
    },
};

/// An admin and the property they own.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub user: User,
    pub property: Property,
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        ensure_role::<AdminOnly>(&user)?;

        let app_state = AppState::from_ref(state);
        let property = app_state
            .property_repo
            .find_by_admin(user.id)
            .await?
            .ok_or(AppError::PropertyNotFoundForAdmin)?;

        Ok(AdminContext { user, property })
    }
}

/// An admin or supervisor, with the property they work for.
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub user: User,
    pub property_id: Uuid,
}

impl<S> FromRequestParts<S> for StaffContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        ensure_role::<Staff>(&user)?;

        let app_state = AppState::from_ref(state);
        let property = if user.role == UserRole::Admin {
            app_state.property_repo.find_by_admin(user.id).await?
        } else {
            app_state.property_repo.find_by_member(user.id).await?
        };
        let property = property.ok_or(AppError::PropertyNotFoundForAdmin)?;

        Ok(StaffContext {
            user,
            property_id: property.id,
        })
    }
}

/// A guest user and their guest record.
#[derive(Debug, Clone)]
pub struct GuestContext {
    pub user: User,
    pub guest: Guest,
}

impl<S> FromRequestParts<S> for GuestContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        ensure_role::<GuestOnly>(&user)?;

        let app_state = AppState::from_ref(state);
        let guest = app_state
            .guest_repo
            .find_by_user(user.id)
            .await?
            .ok_or(AppError::NotFound("Guest"))?;

        Ok(GuestContext { user, guest })
    }
}
