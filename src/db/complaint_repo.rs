// src/db/complaint_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::complaint::{Complaint, ComplaintStatus, ComplaintView},
};

// Shared projection for the staff views
const COMPLAINT_VIEW_SELECT: &str = r#"
    SELECT c.id, c.guest_id, g.name AS guest_name, r.room_number,
           c.complaint_type, c.description, c.status, c.estimated_resolution_days,
           c.notes, c.created_at, c.solved_date
    FROM complaints c
    JOIN guests g ON g.id = c.guest_id
    LEFT JOIN guest_stays s ON s.guest_id = g.id AND s.checked_out_at IS NULL
    LEFT JOIN rooms r ON r.id = s.room_id
"#;

#[derive(Clone)]
pub struct ComplaintRepository {
    pool: PgPool,
}

impl ComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_complaint(
        &self,
        guest_id: Uuid,
        complaint_type: &str,
        description: &str,
    ) -> Result<Complaint, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (guest_id, complaint_type, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(guest_id)
        .bind(complaint_type)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(complaint)
    }

    pub async fn list_for_property(
        &self,
        property_id: Uuid,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<ComplaintView>, AppError> {
        let sql = format!(
            "{COMPLAINT_VIEW_SELECT} WHERE g.property_id = $1 AND ($2::complaint_status IS NULL OR c.status = $2) ORDER BY c.created_at DESC"
        );
        let complaints = sqlx::query_as::<_, ComplaintView>(&sql)
            .bind(property_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(complaints)
    }

    pub async fn find_view_in_property(
        &self,
        property_id: Uuid,
        complaint_id: Uuid,
    ) -> Result<Option<ComplaintView>, AppError> {
        let sql = format!("{COMPLAINT_VIEW_SELECT} WHERE g.property_id = $1 AND c.id = $2");
        let complaint = sqlx::query_as::<_, ComplaintView>(&sql)
            .bind(property_id)
            .bind(complaint_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(complaint)
    }

    pub async fn list_for_guest(&self, guest_id: Uuid) -> Result<Vec<Complaint>, AppError> {
        let complaints = sqlx::query_as::<_, Complaint>(
            "SELECT * FROM complaints WHERE guest_id = $1 ORDER BY created_at DESC",
        )
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(complaints)
    }

    /// Locks a complaint of the given property for a status change.
    pub async fn find_in_property_for_update<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        complaint_id: Uuid,
    ) -> Result<Option<Complaint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT c.* FROM complaints c
            JOIN guests g ON g.id = c.guest_id
            WHERE c.id = $1 AND g.property_id = $2
            FOR UPDATE OF c
            "#,
        )
        .bind(complaint_id)
        .bind(property_id)
        .fetch_optional(executor)
        .await?;
        Ok(complaint)
    }

    pub async fn find_for_guest_for_update<'e, E>(
        &self,
        executor: E,
        guest_id: Uuid,
        complaint_id: Uuid,
    ) -> Result<Option<Complaint>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let complaint = sqlx::query_as::<_, Complaint>(
            "SELECT * FROM complaints WHERE id = $1 AND guest_id = $2 FOR UPDATE",
        )
        .bind(complaint_id)
        .bind(guest_id)
        .fetch_optional(executor)
        .await?;
        Ok(complaint)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        complaint_id: Uuid,
        status: ComplaintStatus,
        estimated_resolution_days: Option<i32>,
        notes: Option<&str>,
        solved_date: Option<DateTime<Utc>>,
    ) -> Result<Complaint, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET status = $2,
                estimated_resolution_days = $3,
                notes = $4,
                solved_date = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(complaint_id)
        .bind(status)
        .bind(estimated_resolution_days)
        .bind(notes)
        .bind(solved_date)
        .fetch_one(executor)
        .await?;
        Ok(complaint)
    }

    pub async fn delete_complaint<'e, E>(&self, executor: E, complaint_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(complaint_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
