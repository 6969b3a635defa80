// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{GuestRepository, PropertyRepository, SupervisorRepository, UserRepository},
    models::{
        auth::{Claims, LoginResponse, PasswordStatus, User, UserRole},
        property::Property,
    },
};

pub const SUPER_PORTAL_NAME: &str = "Super Portal";
const SUPER_ADMIN_DISPLAY_NAME: &str = "Super Admin";

/// Name shown in the client header after login: the person's own name when
/// the role has one, otherwise the login itself.
pub fn display_name_for(user: &User, person_name: Option<&str>) -> String {
    if let Some(name) = person_name.filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }
    match user.role {
        UserRole::SuperAdmin => SUPER_ADMIN_DISPLAY_NAME.to_string(),
        _ if !user.username.is_empty() => user.username.clone(),
        _ => user.mobile.clone(),
    }
}

pub fn property_name_for(role: UserRole, property: Option<&Property>) -> String {
    match (role, property) {
        (UserRole::SuperAdmin, _) => SUPER_PORTAL_NAME.to_string(),
        (_, Some(p)) => p.name.clone(),
        (_, None) => String::new(),
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    property_repo: PropertyRepository,
    supervisor_repo: SupervisorRepository,
    guest_repo: GuestRepository,
    jwt_secret: String,
    jwt_ttl_hours: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        property_repo: PropertyRepository,
        supervisor_repo: SupervisorRepository,
        guest_repo: GuestRepository,
        jwt_secret: String,
        jwt_ttl_hours: i64,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            property_repo,
            supervisor_repo,
            guest_repo,
            jwt_secret,
            jwt_ttl_hours,
            pool,
        }
    }

    pub async fn login_user(&self, login: &str, password: &str) -> Result<LoginResponse, AppError> {
        // 1. Identity
        let user = self
            .user_repo
            .find_by_login(login.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // 2. First-login users have nothing to verify against yet
        let password_hash = match user.password_hash.clone() {
            Some(h) if !h.is_empty() => h,
            _ => return Err(AppError::PasswordNotSet),
        };

        // 3. bcrypt runs on the blocking pool
        let password_clone = password.to_owned();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // 4. Disabled accounts are refused only after a correct password
        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        // 5. Property and display name depend on the role
        let (property, person_name) = match user.role {
            UserRole::Admin => (self.property_repo.find_by_admin(user.id).await?, None),
            UserRole::Supervisor => {
                let supervisor = self.supervisor_repo.find_by_user(user.id).await?;
                (
                    self.property_repo.find_by_member(user.id).await?,
                    supervisor.map(|s| s.name),
                )
            }
            UserRole::Guest => {
                let guest = self.guest_repo.find_by_user(user.id).await?;
                (
                    self.property_repo.find_by_member(user.id).await?,
                    guest.map(|g| g.name),
                )
            }
            UserRole::SuperAdmin => (None, None),
        };

        let token = self.create_token(&user)?;

        tracing::info!(user_id = %user.id, role = ?user.role, "User logged in");

        Ok(LoginResponse {
            token,
            id: user.id,
            role: user.role,
            display_name: display_name_for(&user, person_name.as_deref()),
            property_name: property_name_for(user.role, property.as_ref()),
            property_id: property.map(|p| p.id),
            username: user.username,
            mobile: user.mobile,
        })
    }

    pub async fn check_status(&self, login: &str) -> Result<PasswordStatus, AppError> {
        let user = self
            .user_repo
            .find_by_login(login.trim())
            .await?
            .ok_or(AppError::NotFound("User"))?;

        Ok(PasswordStatus {
            is_password_set: user.is_password_set(),
        })
    }

    /// First-login flow. Refused once a password exists.
    pub async fn set_password(&self, login: &str, password: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_login(login.trim())
            .await?
            .ok_or(AppError::NotFound("User"))?;

        if user.is_password_set() {
            return Err(AppError::PasswordAlreadySet);
        }

        let hashed_password = hash_password(password).await?;
        self.user_repo
            .set_password_hash(&self.pool, user.id, Some(&hashed_password))
            .await?;

        tracing::info!(user_id = %user.id, "Password set on first login");
        Ok(())
    }

    /// Clears the password of a supervisor or guest of the admin's property.
    pub async fn reset_password(&self, property_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !self.guest_repo.user_in_property(property_id, user_id).await? {
            return Err(AppError::Unauthorized);
        }

        self.user_repo.set_password_hash(&self.pool, user_id, None).await?;

        tracing::info!(user_id = %user_id, property_id = %property_id, "Password reset by admin");
        Ok(())
    }

    /// Creates the platform super admin on an empty installation.
    pub async fn ensure_super_admin(&self, username: &str, mobile: Option<&str>) -> Result<bool, AppError> {
        if self.user_repo.any_with_role(UserRole::SuperAdmin).await? {
            return Ok(false);
        }

        let mobile = mobile.unwrap_or(username);
        let user = self
            .user_repo
            .create_user(&self.pool, username, mobile, UserRole::SuperAdmin)
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Super admin bootstrapped");
        Ok(true)
    }

    /// Decodes a bearer token and loads the active user behind it.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }
        Ok(user)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.jwt_ttl_hours);

        let claims = Claims {
            sub: user.id,
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {}", e))??;
    Ok(hashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn user(role: UserRole, username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            mobile: "9876543210".to_string(),
            password_hash: None,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn property(name: &str) -> Property {
        Property {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: "Main Road".to_string(),
            owner_name: "Owner".to_string(),
            admin_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/staynest_test")
            .unwrap();
        AuthService::new(
            UserRepository::new(pool.clone()),
            PropertyRepository::new(pool.clone()),
            SupervisorRepository::new(pool.clone()),
            GuestRepository::new(pool.clone()),
            secret.to_string(),
            24,
            pool,
        )
    }

    #[test]
    fn display_name_prefers_the_person_name() {
        let guest = user(UserRole::Guest, "9876543210");
        assert_eq!(display_name_for(&guest, Some("Ravi Kumar")), "Ravi Kumar");
    }

    #[test]
    fn display_name_falls_back_by_role() {
        assert_eq!(display_name_for(&user(UserRole::SuperAdmin, "root"), None), "Super Admin");
        assert_eq!(display_name_for(&user(UserRole::Admin, "sunrise"), None), "sunrise");
        assert_eq!(display_name_for(&user(UserRole::Admin, ""), Some(" ")), "9876543210");
    }

    #[test]
    fn super_admin_sees_the_super_portal() {
        let p = property("Sunrise PG");
        assert_eq!(property_name_for(UserRole::SuperAdmin, None), SUPER_PORTAL_NAME);
        assert_eq!(property_name_for(UserRole::Admin, Some(&p)), "Sunrise PG");
        assert_eq!(property_name_for(UserRole::Guest, None), "");
    }

    #[tokio::test]
    async fn issued_tokens_decode_to_the_same_user() {
        let auth = service("test-secret");
        let admin = user(UserRole::Admin, "sunrise");

        let token = auth.create_token(&admin).unwrap();
        let claims = auth.decode_token(&token).unwrap();

        assert_eq!(claims.sub, admin.id);
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn tokens_signed_with_another_secret_are_rejected() {
        let token = service("one-secret").create_token(&user(UserRole::Guest, "g")).unwrap();
        assert!(matches!(service("other-secret").decode_token(&token), Err(AppError::InvalidToken)));
        assert!(matches!(service("one-secret").decode_token("not-a-jwt"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashed_passwords_verify() {
        let hashed = hash_password("secret123").await.unwrap();
        assert!(verify("secret123", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }
}
