// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{User, UserRole},
};

/// A set of roles allowed through a route.
pub trait RoleSet: Send + Sync + 'static {
    fn allows(role: UserRole) -> bool;
}

pub fn ensure_role<T: RoleSet>(user: &User) -> Result<(), AppError> {
    if T::allows(user.role) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Rejects the request unless the authenticated user's role is in `T`.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        ensure_role::<T>(&user)?;
        Ok(RequireRole(PhantomData))
    }
}

// ---
// Role sets
// ---

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::Admin
    }
}

/// Admins and supervisors
pub struct Staff;
impl RoleSet for Staff {
    fn allows(role: UserRole) -> bool {
        matches!(role, UserRole::Admin | UserRole::Supervisor)
    }
}

pub struct GuestOnly;
impl RoleSet for GuestOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::Guest
    }
}

pub struct SuperAdminOnly;
impl RoleSet for SuperAdminOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::SuperAdmin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [UserRole; 4] = [UserRole::Admin, UserRole::Supervisor, UserRole::Guest, UserRole::SuperAdmin];

    fn allowed<T: RoleSet>() -> Vec<UserRole> {
        ALL.into_iter().filter(|r| T::allows(*r)).collect()
    }

    #[test]
    fn each_role_set_admits_only_its_roles() {
        assert_eq!(allowed::<AdminOnly>(), vec![UserRole::Admin]);
        assert_eq!(allowed::<Staff>(), vec![UserRole::Admin, UserRole::Supervisor]);
        assert_eq!(allowed::<GuestOnly>(), vec![UserRole::Guest]);
        assert_eq!(allowed::<SuperAdminOnly>(), vec![UserRole::SuperAdmin]);
    }
}
