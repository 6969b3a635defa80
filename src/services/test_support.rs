// src/services/test_support.rs
//
// Shared setup for the database-backed service tests. They run against the
// database behind DATABASE_URL (`cargo test -- --ignored`); `#[sqlx::test]`
// creates a fresh database per test and applies `migrations/`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::{AppConfig, AppState},
    db::UserRepository,
    models::{
        auth::User,
        guest::{AddGuestPayload, GuestStay, RentType},
        property::AddPropertyPayload,
        room::{AddRoomPayload, Room, RoomFilter, RoomType},
    },
};

/// One provisioned property and the services to act on it.
pub(crate) struct Fixture {
    pub state: AppState,
    pub property_id: Uuid,
}

impl Fixture {
    pub async fn provision(pool: PgPool) -> Self {
        let state = AppState::build(AppConfig::for_tests("postgres://test-pool", "fixture-secret"), pool);
        let created = state
            .property_service
            .add_property(&AddPropertyPayload {
                property_name: "Sunrise PG".into(),
                address: "12 MG Road".into(),
                owner_name: "Asha Rao".into(),
                admin_username: "sunrise-admin".into(),
                admin_mobile: "9000000001".into(),
                upi_id: "sunrisepg@ybl".into(),
                upi_name: "Sunrise PG".into(),
            })
            .await
            .unwrap();

        Self {
            state,
            property_id: created.property_id,
        }
    }

    pub async fn add_room(&self, room_number: &str, sharing_type: i32) -> Room {
        self.state
            .room_service
            .add_room(
                self.property_id,
                &AddRoomPayload {
                    room_number: room_number.into(),
                    floor_number: 1,
                    sharing_type,
                    room_type: RoomType::Ac,
                },
            )
            .await
            .unwrap()
    }

    pub async fn room(&self, room_number: &str) -> Room {
        self.state
            .room_service
            .list_rooms(self.property_id, &RoomFilter::default())
            .await
            .unwrap()
            .into_iter()
            .find(|room| room.room_number == room_number)
            .unwrap()
    }

    pub async fn add_guest(&self, mobile: &str, room_number: &str) -> Result<GuestStay, AppError> {
        self.state
            .guest_service
            .add_guest(self.property_id, &guest_payload(mobile, room_number))
            .await
    }

    /// The login behind a guest record.
    pub async fn guest_user(&self, guest_id: Uuid) -> User {
        let guest = self
            .state
            .guest_repo
            .find_in_property(&self.state.db_pool, self.property_id, guest_id)
            .await
            .unwrap()
            .unwrap();
        self.users().find_by_id(guest.user_id).await.unwrap().unwrap()
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.state.db_pool.clone())
    }
}

/// A Regular guest joining today.
pub(crate) fn guest_payload(mobile: &str, room_number: &str) -> AddGuestPayload {
    AddGuestPayload {
        name: "Ravi Kumar".into(),
        mobile: mobile.into(),
        room_number: room_number.into(),
        occupation: "Engineer".into(),
        advance_amount: Decimal::from(10_000),
        rent_amount: Decimal::from(8_000),
        joining_date: None,
        rent_type: RentType::Regular,
        per_day_rent: None,
        end_date: None,
    }
}
