// src/db/supervisor_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::supervisor::{Supervisor, SupervisorView},
};

#[derive(Clone)]
pub struct SupervisorRepository {
    pool: PgPool,
}

impl SupervisorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_supervisor<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        property_id: Uuid,
        name: &str,
        joining_date: NaiveDate,
    ) -> Result<Supervisor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supervisor = sqlx::query_as::<_, Supervisor>(
            r#"
            INSERT INTO supervisors (user_id, property_id, name, joining_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .bind(name)
        .bind(joining_date)
        .fetch_one(executor)
        .await?;
        Ok(supervisor)
    }

    pub async fn list_views(&self, property_id: Uuid) -> Result<Vec<SupervisorView>, AppError> {
        let supervisors = sqlx::query_as::<_, SupervisorView>(
            r#"
            SELECT s.id, s.user_id, s.name, s.joining_date, u.mobile, u.is_active
            FROM supervisors s
            JOIN users u ON u.id = s.user_id
            WHERE s.property_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(supervisors)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Supervisor>, AppError> {
        let supervisor = sqlx::query_as::<_, Supervisor>("SELECT * FROM supervisors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(supervisor)
    }
}
