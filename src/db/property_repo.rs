// src/db/property_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::property::{Property, PropertySummary},
};

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_property<'e, E>(
        &self,
        executor: E,
        name: &str,
        address: &str,
        owner_name: &str,
        admin_id: Uuid,
    ) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (name, address, owner_name, admin_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(owner_name)
        .bind(admin_id)
        .fetch_one(executor)
        .await?;
        Ok(property)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Property>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(property)
    }

    /// The property owned by an admin user.
    pub async fn find_by_admin(&self, admin_id: Uuid) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE admin_id = $1")
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    /// The property a supervisor or guest user belongs to.
    pub async fn find_by_member(&self, user_id: Uuid) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT p.* FROM properties p
            WHERE p.id = (
                SELECT property_id FROM supervisors WHERE user_id = $1
                UNION ALL
                SELECT property_id FROM guests WHERE user_id = $1
                LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(property)
    }

    pub async fn list_summaries(&self) -> Result<Vec<PropertySummary>, AppError> {
        let properties = sqlx::query_as::<_, PropertySummary>(
            r#"
            SELECT p.id, p.name, p.address, p.owner_name, p.admin_id,
                   u.username AS admin_username,
                   u.mobile AS admin_mobile,
                   u.is_active
            FROM properties p
            JOIN users u ON u.id = p.admin_id
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(properties)
    }
}
