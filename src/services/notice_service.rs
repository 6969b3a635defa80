// src/services/notice_service.rs

use chrono::{FixedOffset, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::GuestRepository,
    models::guest::{GuestStay, NoticeStatus},
    services::billing::{days_until_due, local_today, MIN_NOTICE_DAYS},
};

// ---
// Transition rules (None -> Pending -> Approved, Approved -> None)
// ---

/// A guest may ask to leave only when no request is open and the next due
/// date is at least `MIN_NOTICE_DAYS` away.
pub fn check_notice_request(stay: &GuestStay, today: NaiveDate) -> Result<(), AppError> {
    match stay.notice_status {
        NoticeStatus::Pending => return Err(AppError::NoticeAlreadyPending),
        NoticeStatus::Approved => return Err(AppError::AlreadyInNoticePeriod),
        NoticeStatus::None => {}
    }

    let days_left = days_until_due(stay.rent_due_date, today);
    if days_left < MIN_NOTICE_DAYS {
        return Err(AppError::InsufficientNoticeWindow { days_left });
    }
    Ok(())
}

pub fn check_pending(stay: &GuestStay) -> Result<(), AppError> {
    if stay.notice_status != NoticeStatus::Pending {
        return Err(AppError::NoPendingNotice);
    }
    Ok(())
}

pub fn check_revertible(stay: &GuestStay) -> Result<(), AppError> {
    if !stay.is_in_notice_period {
        return Err(AppError::NotInNoticePeriod);
    }
    Ok(())
}

#[derive(Clone)]
pub struct NoticeService {
    guest_repo: GuestRepository,
    pool: PgPool,
    utc_offset: FixedOffset,
}

impl NoticeService {
    pub fn new(guest_repo: GuestRepository, pool: PgPool, utc_offset: FixedOffset) -> Self {
        Self {
            guest_repo,
            pool,
            utc_offset,
        }
    }

    /// Guest side: None -> Pending.
    pub async fn request_notice(&self, guest_id: Uuid) -> Result<GuestStay, AppError> {
        let mut tx = self.pool.begin().await?;

        let stay = self
            .guest_repo
            .active_stay_for_update(&mut *tx, guest_id)
            .await?
            .ok_or(AppError::StayNotFound)?;

        check_notice_request(&stay, local_today(self.utc_offset))?;

        let updated = self
            .guest_repo
            .update_notice(&mut *tx, stay.id, NoticeStatus::Pending, false, None)
            .await?;

        tx.commit().await?;

        tracing::info!(guest_id = %guest_id, stay_id = %updated.id, "Notice requested");
        Ok(updated)
    }

    /// Admin side: Pending -> Approved, the notice period starts now.
    pub async fn approve_notice(&self, property_id: Uuid, guest_id: Uuid) -> Result<GuestStay, AppError> {
        let mut tx = self.pool.begin().await?;

        let stay = self.locked_stay(&mut tx, property_id, guest_id).await?;
        check_pending(&stay)?;

        let updated = self
            .guest_repo
            .update_notice(&mut *tx, stay.id, NoticeStatus::Approved, true, Some(Utc::now()))
            .await?;

        tx.commit().await?;

        tracing::info!(guest_id = %guest_id, stay_id = %updated.id, "Notice approved");
        Ok(updated)
    }

    /// Admin side: Pending -> None.
    pub async fn reject_notice(&self, property_id: Uuid, guest_id: Uuid) -> Result<GuestStay, AppError> {
        let mut tx = self.pool.begin().await?;

        let stay = self.locked_stay(&mut tx, property_id, guest_id).await?;
        check_pending(&stay)?;

        let updated = self
            .guest_repo
            .update_notice(&mut *tx, stay.id, NoticeStatus::None, false, None)
            .await?;

        tx.commit().await?;

        tracing::info!(guest_id = %guest_id, stay_id = %updated.id, "Notice rejected");
        Ok(updated)
    }

    /// Admin side: Approved -> None. The due date is left alone.
    pub async fn revert_notice(&self, property_id: Uuid, guest_id: Uuid) -> Result<GuestStay, AppError> {
        let mut tx = self.pool.begin().await?;

        let stay = self.locked_stay(&mut tx, property_id, guest_id).await?;
        check_revertible(&stay)?;

        let updated = self
            .guest_repo
            .update_notice(&mut *tx, stay.id, NoticeStatus::None, false, None)
            .await?;

        tx.commit().await?;

        tracing::info!(guest_id = %guest_id, stay_id = %updated.id, "Notice reverted");
        Ok(updated)
    }

    // Guest must belong to the admin's property; anything else is unauthorized
    async fn locked_stay(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        property_id: Uuid,
        guest_id: Uuid,
    ) -> Result<GuestStay, AppError> {
        self.guest_repo
            .find_in_property(&mut **tx, property_id, guest_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.guest_repo
            .active_stay_for_update(&mut **tx, guest_id)
            .await?
            .ok_or(AppError::StayNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guest::{PaymentStatus, RentType};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(due: NaiveDate, notice_status: NoticeStatus) -> GuestStay {
        GuestStay {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            rent_amount: Decimal::from(8000),
            advance_amount: Decimal::from(10000),
            rent_type: RentType::Regular,
            per_day_rent: None,
            joining_date: date(2026, 1, 2),
            end_date: None,
            rent_due_date: due,
            payment_status: PaymentStatus::Pending,
            last_paid_date: None,
            notice_status,
            is_in_notice_period: notice_status == NoticeStatus::Approved,
            notice_start_date: None,
            checked_out_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn notice_with_a_full_month_left_is_accepted() {
        let s = stay(date(2026, 2, 1), NoticeStatus::None);
        assert!(check_notice_request(&s, date(2026, 1, 1)).is_ok());
    }

    #[test]
    fn notice_exactly_thirty_days_ahead_is_accepted() {
        let s = stay(date(2026, 1, 31), NoticeStatus::None);
        assert!(check_notice_request(&s, date(2026, 1, 1)).is_ok());
    }

    #[test]
    fn notice_too_close_to_due_date_reports_days_left() {
        let s = stay(date(2026, 2, 1), NoticeStatus::None);
        let err = check_notice_request(&s, date(2026, 1, 10)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientNoticeWindow { days_left: 22 }));
        assert!(err.to_string().starts_with("Oops! You have only 22 days left"));
    }

    #[test]
    fn notice_after_due_date_is_rejected() {
        let s = stay(date(2026, 2, 1), NoticeStatus::None);
        let err = check_notice_request(&s, date(2026, 2, 5)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientNoticeWindow { days_left: -4 }));
    }

    #[test]
    fn duplicate_notice_requests_are_rejected() {
        let today = date(2026, 1, 1);
        let pending = stay(date(2026, 3, 1), NoticeStatus::Pending);
        assert!(matches!(check_notice_request(&pending, today), Err(AppError::NoticeAlreadyPending)));

        let approved = stay(date(2026, 3, 1), NoticeStatus::Approved);
        assert!(matches!(check_notice_request(&approved, today), Err(AppError::AlreadyInNoticePeriod)));
    }

    #[test]
    fn only_pending_notices_can_be_decided() {
        assert!(check_pending(&stay(date(2026, 3, 1), NoticeStatus::Pending)).is_ok());
        assert!(matches!(
            check_pending(&stay(date(2026, 3, 1), NoticeStatus::None)),
            Err(AppError::NoPendingNotice)
        ));
        assert!(matches!(
            check_pending(&stay(date(2026, 3, 1), NoticeStatus::Approved)),
            Err(AppError::NoPendingNotice)
        ));
    }

    #[test]
    fn only_running_notice_periods_can_be_reverted() {
        assert!(check_revertible(&stay(date(2026, 3, 1), NoticeStatus::Approved)).is_ok());
        assert!(matches!(
            check_revertible(&stay(date(2026, 3, 1), NoticeStatus::Pending)),
            Err(AppError::NotInNoticePeriod)
        ));
    }
}
