// src/services/billing.rs
//
// Date and money rules of a stay. Pure functions, no I/O.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{common::error::AppError, models::guest::RentType};

/// Length of one Regular rent cycle.
pub const RENT_CYCLE_DAYS: u64 = 30;

/// A notice can only be raised this many days (or more) before the due date.
pub const MIN_NOTICE_DAYS: i64 = 30;

/// Kept from the advance when it is refunded.
pub const MAINTENANCE_DEDUCTION: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// First due date of a new stay.
///
/// Daily stays are due on their end date (or the joining date when open
/// ended); Regular stays one cycle after joining.
pub fn initial_due_date(
    rent_type: RentType,
    joining_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<NaiveDate, AppError> {
    match rent_type {
        RentType::Daily => Ok(end_date.unwrap_or(joining_date)),
        RentType::Regular => add_cycle(joining_date),
    }
}

/// Due date after an approved rent payment. The cadence follows the previous
/// due date, not the day the guest paid.
pub fn next_due_date(current_due: NaiveDate) -> Result<NaiveDate, AppError> {
    add_cycle(current_due)
}

fn add_cycle(date: NaiveDate) -> Result<NaiveDate, AppError> {
    date.checked_add_days(Days::new(RENT_CYCLE_DAYS))
        .ok_or_else(|| AppError::BadRequest("Due date is out of range.".into()))
}

/// Calendar day of `at` at the property's UTC offset.
pub fn local_date(at: DateTime<Utc>, utc_offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&utc_offset).date_naive()
}

pub fn local_today(utc_offset: FixedOffset) -> NaiveDate {
    local_date(Utc::now(), utc_offset)
}

pub fn is_rent_due(rent_due_date: NaiveDate, today: NaiveDate) -> bool {
    today >= rent_due_date
}

/// Whole days from `today` until the due date; negative once it has passed.
pub fn days_until_due(rent_due_date: NaiveDate, today: NaiveDate) -> i64 {
    (rent_due_date - today).num_days()
}

pub fn refund_amount(advance_amount: Decimal) -> Decimal {
    (advance_amount - MAINTENANCE_DEDUCTION).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn regular_stay_is_due_thirty_days_after_joining() {
        let due = initial_due_date(RentType::Regular, date(2026, 1, 1), None).unwrap();
        assert_eq!(due, date(2026, 1, 31));
    }

    #[test]
    fn regular_stay_ignores_end_date() {
        let due = initial_due_date(RentType::Regular, date(2026, 1, 1), Some(date(2026, 1, 5))).unwrap();
        assert_eq!(due, date(2026, 1, 31));
    }

    #[test]
    fn daily_stay_is_due_on_end_date() {
        let due = initial_due_date(RentType::Daily, date(2026, 1, 10), Some(date(2026, 1, 15))).unwrap();
        assert_eq!(due, date(2026, 1, 15));
    }

    #[test]
    fn open_ended_daily_stay_is_due_on_joining() {
        let due = initial_due_date(RentType::Daily, date(2026, 1, 10), None).unwrap();
        assert_eq!(due, date(2026, 1, 10));
    }

    #[test]
    fn next_due_date_follows_previous_due_date() {
        assert_eq!(next_due_date(date(2026, 1, 31)).unwrap(), date(2026, 3, 2));
        assert_eq!(next_due_date(date(2026, 2, 1)).unwrap(), date(2026, 3, 3));
    }

    #[test]
    fn rent_is_due_on_and_after_the_due_date() {
        let due = date(2026, 2, 1);
        assert!(!is_rent_due(due, date(2026, 1, 31)));
        assert!(is_rent_due(due, due));
        assert!(is_rent_due(due, date(2026, 2, 10)));
    }

    #[test]
    fn days_until_due_counts_whole_days() {
        assert_eq!(days_until_due(date(2026, 2, 1), date(2026, 1, 1)), 31);
        assert_eq!(days_until_due(date(2026, 2, 1), date(2026, 1, 10)), 22);
        assert_eq!(days_until_due(date(2026, 2, 1), date(2026, 2, 3)), -2);
    }

    #[test]
    fn local_date_follows_the_property_offset() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        // 20:00 UTC on the 9th is already the 10th in IST
        let at = date(2026, 1, 9).and_hms_opt(20, 0, 0).unwrap().and_utc();
        assert_eq!(local_date(at, ist), date(2026, 1, 10));
        assert_eq!(local_date(at, FixedOffset::east_opt(0).unwrap()), date(2026, 1, 9));
    }

    #[test]
    fn refund_keeps_the_maintenance_deduction() {
        assert_eq!(refund_amount(Decimal::from(10_000)), Decimal::from(9_000));
        assert_eq!(refund_amount(Decimal::from(1_000)), Decimal::ZERO);
        assert_eq!(refund_amount(Decimal::from(500)), Decimal::ZERO);
    }
}
