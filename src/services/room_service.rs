// src/services/room_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RoomRepository,
    models::room::{AddRoomPayload, Room, RoomFilter},
};

#[derive(Clone)]
pub struct RoomService {
    room_repo: RoomRepository,
    pool: PgPool,
}

impl RoomService {
    pub fn new(room_repo: RoomRepository, pool: PgPool) -> Self {
        Self { room_repo, pool }
    }

    /// Beds follow the sharing type; all of them start free.
    pub async fn add_room(&self, property_id: Uuid, payload: &AddRoomPayload) -> Result<Room, AppError> {
        let room = self
            .room_repo
            .create_room(
                &self.pool,
                property_id,
                payload.room_number.trim(),
                payload.floor_number,
                payload.sharing_type,
                payload.room_type,
            )
            .await?;

        tracing::info!(room_id = %room.id, room_number = %room.room_number, "Room added");
        Ok(room)
    }

    pub async fn list_rooms(&self, property_id: Uuid, filter: &RoomFilter) -> Result<Vec<Room>, AppError> {
        self.room_repo.list_rooms(property_id, filter, false).await
    }

    pub async fn available_rooms(&self, property_id: Uuid, filter: &RoomFilter) -> Result<Vec<Room>, AppError> {
        self.room_repo.list_rooms(property_id, filter, true).await
    }
}
