// src/services/guest_service.rs

use chrono::{FixedOffset, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{GuestRepository, NewStay, RoomRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        guest::{AddGuestPayload, Guest, GuestListEntry, GuestProfile, GuestStay, GuestUserSummary, NoticeStatus},
        property::ActiveStatus,
        room::Room,
    },
    services::billing::{initial_due_date, is_rent_due, local_date, local_today, refund_amount},
};

const UNKNOWN_ROOM: &str = "N/A";

/// Turns the admin's form into the stay row; `joining_date` defaults to today.
pub fn plan_stay(room_id: Uuid, payload: &AddGuestPayload, today: NaiveDate) -> Result<NewStay, AppError> {
    let joining_date = payload.joining_date.unwrap_or(today);
    if payload.end_date.is_some_and(|end| end < joining_date) {
        return Err(AppError::EndBeforeJoining);
    }
    let rent_due_date = initial_due_date(payload.rent_type, joining_date, payload.end_date)?;

    Ok(NewStay {
        room_id,
        rent_amount: payload.rent_amount,
        advance_amount: payload.advance_amount,
        rent_type: payload.rent_type,
        per_day_rent: payload.per_day_rent,
        joining_date,
        end_date: payload.end_date,
        rent_due_date,
    })
}

pub fn build_profile(
    guest: &Guest,
    user: &User,
    stay: &GuestStay,
    room_number: Option<String>,
    today: NaiveDate,
) -> GuestProfile {
    GuestProfile {
        id: guest.id,
        name: guest.name.clone(),
        room_number: room_number.unwrap_or_else(|| UNKNOWN_ROOM.to_string()),
        advance_amount: stay.advance_amount,
        rent_amount: stay.rent_amount,
        joining_date: stay.joining_date,
        rent_due_date: stay.rent_due_date,
        is_in_notice_period: stay.is_in_notice_period,
        notice_start_date: stay.notice_start_date,
        notice_status: stay.notice_status,
        refund_amount: refund_amount(stay.advance_amount),
        is_rent_due: is_rent_due(stay.rent_due_date, today),
        payment_status: stay.payment_status,
        last_paid_date: stay.last_paid_date,
        rent_type: stay.rent_type,
        per_day_rent: stay.per_day_rent,
        end_date: stay.end_date,
        user: GuestUserSummary {
            id: user.id,
            mobile: user.mobile.clone(),
            is_active: user.is_active,
        },
    }
}

pub fn check_bed_available(room: &Room) -> Result<(), AppError> {
    if room.available_beds <= 0 {
        return Err(AppError::RoomFull);
    }
    Ok(())
}

pub fn check_checkout(stay: &GuestStay) -> Result<(), AppError> {
    if stay.notice_status != NoticeStatus::Approved || !stay.is_in_notice_period {
        return Err(AppError::CheckoutRequiresApprovedNotice);
    }
    Ok(())
}

#[derive(Clone)]
pub struct GuestService {
    user_repo: UserRepository,
    room_repo: RoomRepository,
    guest_repo: GuestRepository,
    pool: PgPool,
    utc_offset: FixedOffset,
}

impl GuestService {
    pub fn new(
        user_repo: UserRepository,
        room_repo: RoomRepository,
        guest_repo: GuestRepository,
        pool: PgPool,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            user_repo,
            room_repo,
            guest_repo,
            pool,
            utc_offset,
        }
    }

    /// Registers a guest and takes a bed in one transaction. The room row is
    /// locked so two admins cannot both take the last bed.
    pub async fn add_guest(&self, property_id: Uuid, payload: &AddGuestPayload) -> Result<GuestStay, AppError> {
        let mobile = payload.mobile.trim();
        let mut tx = self.pool.begin().await?;

        // 1. Mobile doubles as the guest's username
        if self.user_repo.mobile_or_username_taken(&mut *tx, mobile, mobile).await? {
            return Err(AppError::UserAlreadyExists);
        }

        // 2. Room of this property, locked
        let room = self
            .room_repo
            .find_by_number_for_update(&mut *tx, property_id, payload.room_number.trim())
            .await?
            .ok_or(AppError::NotFound("Room"))?;

        check_bed_available(&room)?;
        let new_stay = plan_stay(room.id, payload, local_today(self.utc_offset))?;

        // 3. Identity and guest record
        let user = self.user_repo.create_user(&mut *tx, mobile, mobile, UserRole::Guest).await?;
        let guest = self
            .guest_repo
            .create_guest(&mut *tx, user.id, property_id, payload.name.trim(), payload.occupation.trim())
            .await?;

        // 4. Stay with its first due date
        let stay = self.guest_repo.create_stay(&mut *tx, guest.id, &new_stay).await?;

        // 5. Conditional decrement; None means the bed went in the meantime
        self.room_repo
            .occupy_bed(&mut *tx, room.id)
            .await?
            .ok_or(AppError::RoomFull)?;

        tx.commit().await?;

        tracing::info!(
            guest_id = %guest.id,
            room_number = %room.room_number,
            rent_due_date = %stay.rent_due_date,
            "Guest added"
        );
        Ok(stay)
    }

    pub async fn list_guests(&self, property_id: Uuid) -> Result<Vec<GuestListEntry>, AppError> {
        self.guest_repo.list_entries(property_id).await
    }

    pub async fn toggle_guest(&self, property_id: Uuid, guest_id: Uuid) -> Result<ActiveStatus, AppError> {
        let mut tx = self.pool.begin().await?;

        let guest = self
            .guest_repo
            .find_in_property(&mut *tx, property_id, guest_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = self.user_repo.toggle_active(&mut *tx, guest.user_id).await?;
        tx.commit().await?;

        tracing::info!(guest_id = %guest.id, is_active = user.is_active, "Guest access toggled");
        Ok(ActiveStatus {
            is_active: user.is_active,
        })
    }

    /// Ends an approved notice period: frees the bed and disables the login.
    pub async fn checkout_guest(&self, property_id: Uuid, guest_id: Uuid) -> Result<GuestStay, AppError> {
        let mut tx = self.pool.begin().await?;

        let guest = self
            .guest_repo
            .find_in_property(&mut *tx, property_id, guest_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let stay = self
            .guest_repo
            .active_stay_for_update(&mut *tx, guest.id)
            .await?
            .ok_or(AppError::StayNotFound)?;

        check_checkout(&stay)?;

        let now = Utc::now();
        let end_date = stay.end_date.unwrap_or_else(|| local_date(now, self.utc_offset));
        let checked_out = self.guest_repo.check_out(&mut *tx, stay.id, now, end_date).await?;

        let room = self.room_repo.release_bed(&mut *tx, stay.room_id).await?;
        self.user_repo.set_active(&mut *tx, guest.user_id, false).await?;

        tx.commit().await?;

        tracing::info!(
            guest_id = %guest.id,
            room_number = %room.room_number,
            available_beds = room.available_beds,
            "Guest checked out"
        );
        Ok(checked_out)
    }

    pub async fn profile(&self, guest: &Guest, user: &User) -> Result<GuestProfile, AppError> {
        let stay = self
            .guest_repo
            .active_stay(&self.pool, guest.id)
            .await?
            .ok_or(AppError::StayNotFound)?;

        let room = self.room_repo.find_by_id(&self.pool, stay.room_id).await?;

        Ok(build_profile(
            guest,
            user,
            &stay,
            room.map(|r| r.room_number),
            local_today(self.utc_offset),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        guest::{PaymentStatus, RentType},
        room::RoomType,
    };
    use rust_decimal::Decimal;
    use validator::Validate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(rent_type: RentType, joining: Option<NaiveDate>, end: Option<NaiveDate>) -> AddGuestPayload {
        AddGuestPayload {
            name: "Ravi Kumar".into(),
            mobile: "9876543210".into(),
            room_number: "A-101".into(),
            occupation: "Engineer".into(),
            advance_amount: Decimal::from(10_000),
            rent_amount: Decimal::from(8_000),
            joining_date: joining,
            rent_type,
            per_day_rent: None,
            end_date: end,
        }
    }

    fn stay(notice_status: NoticeStatus, in_notice: bool) -> GuestStay {
        GuestStay {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            rent_amount: Decimal::from(8_000),
            advance_amount: Decimal::from(10_000),
            rent_type: RentType::Regular,
            per_day_rent: None,
            joining_date: date(2026, 1, 1),
            end_date: None,
            rent_due_date: date(2026, 1, 31),
            payment_status: PaymentStatus::Pending,
            last_paid_date: None,
            notice_status,
            is_in_notice_period: in_notice,
            notice_start_date: None,
            checked_out_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn regular_guest_joining_new_year_is_due_end_of_january() {
        let room_id = Uuid::new_v4();
        let planned = plan_stay(room_id, &payload(RentType::Regular, Some(date(2026, 1, 1)), None), date(2026, 3, 1)).unwrap();
        assert_eq!(planned.room_id, room_id);
        assert_eq!(planned.joining_date, date(2026, 1, 1));
        assert_eq!(planned.rent_due_date, date(2026, 1, 31));
    }

    #[test]
    fn joining_date_defaults_to_today() {
        let today = date(2026, 5, 10);
        let planned = plan_stay(Uuid::new_v4(), &payload(RentType::Regular, None, None), today).unwrap();
        assert_eq!(planned.joining_date, today);
        assert_eq!(planned.rent_due_date, date(2026, 6, 9));
    }

    #[test]
    fn daily_guest_is_due_at_end_of_stay() {
        let planned = plan_stay(
            Uuid::new_v4(),
            &payload(RentType::Daily, Some(date(2026, 1, 10)), Some(date(2026, 1, 15))),
            date(2026, 1, 10),
        )
        .unwrap();
        assert_eq!(planned.rent_due_date, date(2026, 1, 15));
        assert_eq!(planned.end_date, Some(date(2026, 1, 15)));
    }

    #[test]
    fn end_date_before_defaulted_joining_is_rejected() {
        let p = payload(RentType::Daily, None, Some(date(2020, 1, 1)));
        assert!(p.validate().is_ok());
        assert!(matches!(
            plan_stay(Uuid::new_v4(), &p, date(2026, 10, 17)),
            Err(AppError::EndBeforeJoining)
        ));
    }

    #[test]
    fn same_day_daily_stay_is_allowed() {
        let today = date(2026, 10, 17);
        let planned = plan_stay(Uuid::new_v4(), &payload(RentType::Daily, None, Some(today)), today).unwrap();
        assert_eq!(planned.rent_due_date, today);
    }

    fn room(total_beds: i32, available_beds: i32) -> Room {
        Room {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            room_number: "A-101".into(),
            floor_number: 1,
            sharing_type: total_beds,
            room_type: RoomType::Ac,
            total_beds,
            available_beds,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_room_takes_no_more_guests() {
        assert!(check_bed_available(&room(1, 1)).is_ok());
        assert!(matches!(check_bed_available(&room(1, 0)), Err(AppError::RoomFull)));
        assert_eq!(AppError::RoomFull.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn checkout_needs_an_approved_notice() {
        assert!(check_checkout(&stay(NoticeStatus::Approved, true)).is_ok());
        assert!(matches!(
            check_checkout(&stay(NoticeStatus::Pending, false)),
            Err(AppError::CheckoutRequiresApprovedNotice)
        ));
        assert!(matches!(
            check_checkout(&stay(NoticeStatus::None, false)),
            Err(AppError::CheckoutRequiresApprovedNotice)
        ));
    }

    #[test]
    fn profile_reports_refund_and_due_flag() {
        let user = User {
            id: Uuid::new_v4(),
            username: "9876543210".into(),
            mobile: "9876543210".into(),
            password_hash: None,
            role: UserRole::Guest,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let guest = Guest {
            id: Uuid::new_v4(),
            user_id: user.id,
            property_id: Uuid::new_v4(),
            name: "Ravi Kumar".into(),
            occupation: "Engineer".into(),
            created_at: Utc::now(),
        };
        let s = stay(NoticeStatus::None, false);

        let before_due = build_profile(&guest, &user, &s, Some("A-101".into()), date(2026, 1, 30));
        assert_eq!(before_due.room_number, "A-101");
        assert_eq!(before_due.refund_amount, Decimal::from(9_000));
        assert!(!before_due.is_rent_due);
        assert_eq!(before_due.user.mobile, "9876543210");

        let on_due = build_profile(&guest, &user, &s, None, date(2026, 1, 31));
        assert_eq!(on_due.room_number, "N/A");
        assert!(on_due.is_rent_due);
    }
}

#[cfg(test)]
mod db_tests {
    use sqlx::PgPool;

    use crate::{common::error::AppError, services::test_support::Fixture};

    #[sqlx::test]
    #[ignore = "needs Postgres at DATABASE_URL"]
    async fn last_bed_goes_to_the_first_guest(pool: PgPool) {
        let fx = Fixture::provision(pool).await;
        fx.add_room("A-101", 1).await;

        let stay = fx.add_guest("9876543210", "A-101").await.unwrap();
        assert_eq!(stay.rent_due_date, stay.joining_date + chrono::Days::new(30));
        assert_eq!(fx.room("A-101").await.available_beds, 0);
    }

    #[sqlx::test]
    #[ignore = "needs Postgres at DATABASE_URL"]
    async fn full_room_rejects_guest_without_side_effects(pool: PgPool) {
        let fx = Fixture::provision(pool).await;
        fx.add_room("A-101", 1).await;
        fx.add_guest("9876543210", "A-101").await.unwrap();

        let err = fx.add_guest("9876543211", "A-101").await.unwrap_err();
        assert!(matches!(err, AppError::RoomFull));

        assert_eq!(fx.room("A-101").await.available_beds, 0);
        assert!(fx.users().find_by_login("9876543211").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "needs Postgres at DATABASE_URL"]
    async fn property_toggle_keeps_checked_out_guests_disabled(pool: PgPool) {
        let fx = Fixture::provision(pool).await;
        fx.add_room("A-101", 2).await;
        let leaving = fx.add_guest("9876543210", "A-101").await.unwrap();
        let staying = fx.add_guest("9876543211", "A-101").await.unwrap();

        let state = &fx.state;
        state.notice_service.request_notice(leaving.guest_id).await.unwrap();
        state.notice_service.approve_notice(fx.property_id, leaving.guest_id).await.unwrap();
        state.guest_service.checkout_guest(fx.property_id, leaving.guest_id).await.unwrap();

        assert_eq!(fx.room("A-101").await.available_beds, 1);
        assert!(!fx.guest_user(leaving.guest_id).await.is_active);

        let disabled = state.property_service.toggle_property(fx.property_id).await.unwrap();
        assert!(!disabled.is_active);
        assert!(!fx.guest_user(staying.guest_id).await.is_active);

        let enabled = state.property_service.toggle_property(fx.property_id).await.unwrap();
        assert!(enabled.is_active);
        assert!(fx.guest_user(staying.guest_id).await.is_active);
        assert!(!fx.guest_user(leaving.guest_id).await.is_active);
    }
}
