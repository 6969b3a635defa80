// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::auth::{User, UserRole},
};

// Every interaction with the 'users' table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks a user up by username or mobile number.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 OR mobile = $1 ORDER BY username = $1 DESC LIMIT 1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn any_with_role(&self, role: UserRole) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = $1)")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn mobile_or_username_taken<'e, E>(
        &self,
        executor: E,
        username: &str,
        mobile: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username IN ($1, $2) OR mobile IN ($1, $2))",
        )
        .bind(username)
        .bind(mobile)
        .fetch_one(executor)
        .await?;
        Ok(taken)
    }

    /// Creates a user without a password; it is chosen on first login.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        username: &str,
        mobile: &str,
        role: UserRole,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, mobile, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(mobile)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::UserAlreadyExists))
    }

    /// `None` clears the password and sends the user back to the first-login flow.
    pub async fn set_password_hash<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        password_hash: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Flips the login flag and returns the updated user.
    pub async fn toggle_active<'e, E>(&self, executor: E, user_id: Uuid) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("User"))
    }

    pub async fn set_active<'e, E>(&self, executor: E, user_id: Uuid, active: bool) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(active)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Sets the login flag of every supervisor and every guest still staying
    /// at a property. Checked-out guests keep their login disabled.
    pub async fn set_active_for_property_members<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        active: bool,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE users SET is_active = $2, updated_at = NOW()
            WHERE id IN (
                SELECT user_id FROM supervisors WHERE property_id = $1
                UNION
                SELECT g.user_id
                FROM guests g
                JOIN guest_stays s ON s.guest_id = g.id AND s.checked_out_at IS NULL
                WHERE g.property_id = $1
            )
            "#,
        )
        .bind(property_id)
        .bind(active)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
