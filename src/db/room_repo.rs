// src/db/room_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::room::{Room, RoomFilter, RoomType},
};

#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Reads
    // ---

    /// Rooms of a property matching the filter. `only_available` keeps rooms
    /// with at least one free bed.
    pub async fn list_rooms(
        &self,
        property_id: Uuid,
        filter: &RoomFilter,
        only_available: bool,
    ) -> Result<Vec<Room>, AppError> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT * FROM rooms
            WHERE property_id = $1
              AND ($2::INT IS NULL OR sharing_type = $2)
              AND ($3::INT IS NULL OR floor_number = $3)
              AND ($4::room_type IS NULL OR room_type = $4)
              AND (NOT $5 OR available_beds > 0)
            ORDER BY room_number ASC
            "#,
        )
        .bind(property_id)
        .bind(filter.share)
        .bind(filter.floor)
        .bind(filter.room_type)
        .bind(only_available)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, room_id: Uuid) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(executor)
            .await?;
        Ok(room)
    }

    /// Locks the room row until the surrounding transaction ends.
    pub async fn find_by_number_for_update<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        room_number: &str,
    ) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let room = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE property_id = $1 AND room_number = $2 FOR UPDATE",
        )
        .bind(property_id)
        .bind(room_number)
        .fetch_optional(executor)
        .await?;
        Ok(room)
    }

    // ---
    // Writes
    // ---

    pub async fn create_room<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        room_number: &str,
        floor_number: i32,
        sharing_type: i32,
        room_type: RoomType,
    ) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // A new room starts with every bed free
        sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (property_id, room_number, floor_number, sharing_type, room_type, total_beds, available_beds)
            VALUES ($1, $2, $3, $4, $5, $4, $4)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(room_number)
        .bind(floor_number)
        .bind(sharing_type)
        .bind(room_type)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::RoomNumberAlreadyExists))
    }

    /// Takes one bed. Returns `None` when the room has no free bed left.
    pub async fn occupy_bed<'e, E>(&self, executor: E, room_id: Uuid) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms SET available_beds = available_beds - 1
            WHERE id = $1 AND available_beds > 0
            RETURNING *
            "#,
        )
        .bind(room_id)
        .fetch_optional(executor)
        .await?;
        Ok(room)
    }

    /// Frees one bed, never beyond the room's capacity.
    pub async fn release_bed<'e, E>(&self, executor: E, room_id: Uuid) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms SET available_beds = LEAST(available_beds + 1, total_beds)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(room_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Room"))
    }
}
