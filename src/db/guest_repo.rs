// src/db/guest_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::guest::{Guest, GuestListEntry, GuestStay, NoticeStatus, PaymentStatus, RentType},
};

/// Fields of a new stay, already run through the rent rules.
#[derive(Debug, Clone)]
pub struct NewStay {
    pub room_id: Uuid,
    pub rent_amount: Decimal,
    pub advance_amount: Decimal,
    pub rent_type: RentType,
    pub per_day_rent: Option<Decimal>,
    pub joining_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub rent_due_date: NaiveDate,
}

// Guests and their stays. A stay is "active" while checked_out_at is NULL.
#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  GUESTS
    // =========================================================================

    pub async fn create_guest<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        property_id: Uuid,
        name: &str,
        occupation: &str,
    ) -> Result<Guest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let guest = sqlx::query_as::<_, Guest>(
            r#"
            INSERT INTO guests (user_id, property_id, name, occupation)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .bind(name)
        .bind(occupation)
        .fetch_one(executor)
        .await?;
        Ok(guest)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Guest>, AppError> {
        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(guest)
    }

    /// A guest by id, only if it belongs to the given property.
    pub async fn find_in_property<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        guest_id: Uuid,
    ) -> Result<Option<Guest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = $1 AND property_id = $2")
            .bind(guest_id)
            .bind(property_id)
            .fetch_optional(executor)
            .await?;
        Ok(guest)
    }

    pub async fn user_in_property(&self, property_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM guests WHERE user_id = $1 AND property_id = $2
                UNION ALL
                SELECT 1 FROM supervisors WHERE user_id = $1 AND property_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn list_entries(&self, property_id: Uuid) -> Result<Vec<GuestListEntry>, AppError> {
        let guests = sqlx::query_as::<_, GuestListEntry>(
            r#"
            SELECT g.id, g.user_id, g.name, g.occupation,
                   u.mobile, u.is_active,
                   s.id AS stay_id, r.room_number, s.rent_amount, s.rent_type,
                   s.rent_due_date, s.payment_status, s.notice_status, s.is_in_notice_period
            FROM guests g
            JOIN users u ON u.id = g.user_id
            LEFT JOIN guest_stays s ON s.guest_id = g.id AND s.checked_out_at IS NULL
            LEFT JOIN rooms r ON r.id = s.room_id
            WHERE g.property_id = $1
            ORDER BY g.name ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(guests)
    }

    // =========================================================================
    //  STAYS
    // =========================================================================

    pub async fn create_stay<'e, E>(&self, executor: E, guest_id: Uuid, stay: &NewStay) -> Result<GuestStay, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>(
            r#"
            INSERT INTO guest_stays (
                guest_id, room_id, rent_amount, advance_amount, rent_type,
                per_day_rent, joining_date, end_date, rent_due_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(guest_id)
        .bind(stay.room_id)
        .bind(stay.rent_amount)
        .bind(stay.advance_amount)
        .bind(stay.rent_type)
        .bind(stay.per_day_rent)
        .bind(stay.joining_date)
        .bind(stay.end_date)
        .bind(stay.rent_due_date)
        .fetch_one(executor)
        .await?;
        Ok(stay)
    }

    pub async fn active_stay<'e, E>(&self, executor: E, guest_id: Uuid) -> Result<Option<GuestStay>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>(
            "SELECT * FROM guest_stays WHERE guest_id = $1 AND checked_out_at IS NULL",
        )
        .bind(guest_id)
        .fetch_optional(executor)
        .await?;
        Ok(stay)
    }

    /// Same as `active_stay`, locking the row for the current transaction.
    pub async fn active_stay_for_update<'e, E>(
        &self,
        executor: E,
        guest_id: Uuid,
    ) -> Result<Option<GuestStay>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>(
            "SELECT * FROM guest_stays WHERE guest_id = $1 AND checked_out_at IS NULL FOR UPDATE",
        )
        .bind(guest_id)
        .fetch_optional(executor)
        .await?;
        Ok(stay)
    }

    pub async fn find_stay_for_update<'e, E>(&self, executor: E, stay_id: Uuid) -> Result<Option<GuestStay>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>("SELECT * FROM guest_stays WHERE id = $1 FOR UPDATE")
            .bind(stay_id)
            .fetch_optional(executor)
            .await?;
        Ok(stay)
    }

    pub async fn update_notice<'e, E>(
        &self,
        executor: E,
        stay_id: Uuid,
        notice_status: NoticeStatus,
        is_in_notice_period: bool,
        notice_start_date: Option<DateTime<Utc>>,
    ) -> Result<GuestStay, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>(
            r#"
            UPDATE guest_stays
            SET notice_status = $2, is_in_notice_period = $3, notice_start_date = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(stay_id)
        .bind(notice_status)
        .bind(is_in_notice_period)
        .bind(notice_start_date)
        .fetch_one(executor)
        .await?;
        Ok(stay)
    }

    pub async fn update_payment<'e, E>(
        &self,
        executor: E,
        stay_id: Uuid,
        payment_status: PaymentStatus,
        last_paid_date: Option<DateTime<Utc>>,
        rent_due_date: NaiveDate,
    ) -> Result<GuestStay, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>(
            r#"
            UPDATE guest_stays
            SET payment_status = $2, last_paid_date = $3, rent_due_date = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(stay_id)
        .bind(payment_status)
        .bind(last_paid_date)
        .bind(rent_due_date)
        .fetch_one(executor)
        .await?;
        Ok(stay)
    }

    pub async fn check_out<'e, E>(
        &self,
        executor: E,
        stay_id: Uuid,
        checked_out_at: DateTime<Utc>,
        end_date: NaiveDate,
    ) -> Result<GuestStay, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, GuestStay>(
            r#"
            UPDATE guest_stays
            SET checked_out_at = $2, end_date = $3, is_in_notice_period = FALSE
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(stay_id)
        .bind(checked_out_at)
        .bind(end_date)
        .fetch_one(executor)
        .await?;
        Ok(stay)
    }
}
