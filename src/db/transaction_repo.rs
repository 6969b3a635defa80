// src/db/transaction_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::transaction::{Transaction, TransactionKind, TransactionStatus, TransactionView},
};

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a guest-submitted payment as Pending.
    pub async fn create_pending<'e, E>(
        &self,
        executor: E,
        guest_id: Uuid,
        stay_id: Uuid,
        property_id: Uuid,
        utr: &str,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (guest_id, stay_id, property_id, utr, amount, kind, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(guest_id)
        .bind(stay_id)
        .bind(property_id)
        .bind(utr)
        .bind(amount)
        .bind(kind)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::DuplicateUtr))
    }

    pub async fn list_for_guest(&self, guest_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        let history = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE guest_id = $1 ORDER BY payment_date DESC",
        )
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }

    pub async fn list_views_for_property(&self, property_id: Uuid) -> Result<Vec<TransactionView>, AppError> {
        let history = sqlx::query_as::<_, TransactionView>(
            r#"
            SELECT t.id, t.guest_id, t.utr, t.amount, t.kind, t.status,
                   t.payment_date, t.resolved_at,
                   g.name AS guest_name, r.room_number
            FROM transactions t
            JOIN guests g ON g.id = t.guest_id
            JOIN guest_stays s ON s.id = t.stay_id
            LEFT JOIN rooms r ON r.id = s.room_id
            WHERE t.property_id = $1
            ORDER BY t.payment_date DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }

    /// Locks a transaction of the given property for a decision.
    pub async fn find_in_property_for_update<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 AND property_id = $2 FOR UPDATE",
        )
        .bind(transaction_id)
        .bind(property_id)
        .fetch_optional(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn resolve<'e, E>(
        &self,
        executor: E,
        transaction_id: Uuid,
        status: TransactionStatus,
        resolved_at: DateTime<Utc>,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            "UPDATE transactions SET status = $2, resolved_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(transaction_id)
        .bind(status)
        .bind(resolved_at)
        .fetch_one(executor)
        .await?;
        Ok(transaction)
    }
}
