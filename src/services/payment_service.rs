// src/services/payment_service.rs

use chrono::{NaiveDate, Utc};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{GuestRepository, SettingsRepository, TransactionRepository},
    models::{
        guest::{GuestStay, PaymentStatus, RentType},
        settings::UpiSettings,
        transaction::{
            SubmitPaymentPayload, Transaction, TransactionDecision, TransactionKind, TransactionStatus,
            TransactionView, UpiLink,
        },
    },
    services::billing::next_due_date,
};

// ---
// UPI deep link and QR
// ---

fn encode_component(value: &str) -> String {
    // form_urlencoded writes spaces as '+', UPI apps expect %20
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `upi://pay?pa=<id>&pn=<name>&am=<amount>&cu=INR`
pub fn build_upi_link(upi: &UpiSettings, amount: Decimal) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={:.2}&cu=INR",
        encode_component(&upi.upi_id),
        encode_component(&upi.upi_name),
        amount,
    )
}

/// Renders any text as a PNG QR code.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>, AppError> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

    let image_buffer = code.render::<Luma<u8>>().quiet_zone(true).min_dimensions(256, 256).build();
    let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

    let mut buffer = Vec::new();
    dynamic_image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

    Ok(buffer)
}

// ---
// Reconciliation rules
// ---

pub fn check_pending_transaction(transaction: &Transaction) -> Result<(), AppError> {
    if transaction.status != TransactionStatus::Pending {
        return Err(AppError::TransactionAlreadyProcessed);
    }
    Ok(())
}

/// Due date after approving a payment: only rent on a Regular stay moves it.
pub fn due_date_after_approval(stay: &GuestStay, kind: TransactionKind) -> Result<NaiveDate, AppError> {
    if kind == TransactionKind::Rent && stay.rent_type == RentType::Regular {
        next_due_date(stay.rent_due_date)
    } else {
        Ok(stay.rent_due_date)
    }
}

#[derive(Clone)]
pub struct PaymentService {
    settings_repo: SettingsRepository,
    guest_repo: GuestRepository,
    transaction_repo: TransactionRepository,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(
        settings_repo: SettingsRepository,
        guest_repo: GuestRepository,
        transaction_repo: TransactionRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            settings_repo,
            guest_repo,
            transaction_repo,
            pool,
        }
    }

    pub async fn upi_link(&self, property_id: Uuid, amount: Decimal) -> Result<UpiLink, AppError> {
        let settings = self.settings_repo.get_settings(property_id).await?;
        let upi = UpiSettings::from_settings(&settings).ok_or(AppError::UpiNotConfigured)?;

        Ok(UpiLink {
            link: build_upi_link(&upi, amount),
            upi_id: upi.upi_id,
            upi_name: upi.upi_name,
            amount,
        })
    }

    pub async fn upi_qr(&self, property_id: Uuid, amount: Decimal) -> Result<Vec<u8>, AppError> {
        let link = self.upi_link(property_id, amount).await?;
        render_qr_png(&link.link)
    }

    /// Records the guest's claim of payment; the stay waits for the admin.
    pub async fn submit_payment(
        &self,
        guest_id: Uuid,
        property_id: Uuid,
        payload: &SubmitPaymentPayload,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        let stay = self
            .guest_repo
            .active_stay_for_update(&mut *tx, guest_id)
            .await?
            .ok_or(AppError::StayNotFound)?;

        let transaction = self
            .transaction_repo
            .create_pending(
                &mut *tx,
                guest_id,
                stay.id,
                property_id,
                payload.utr.trim(),
                payload.amount,
                payload.kind,
            )
            .await?;

        self.guest_repo
            .update_payment(&mut *tx, stay.id, PaymentStatus::Pending, stay.last_paid_date, stay.rent_due_date)
            .await?;

        tx.commit().await?;

        tracing::info!(transaction_id = %transaction.id, guest_id = %guest_id, "Payment submitted");
        Ok(transaction)
    }

    pub async fn approve_transaction(
        &self,
        property_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<TransactionDecision, AppError> {
        let mut tx = self.pool.begin().await?;

        let (pending, stay) = self.locked_pending(&mut tx, property_id, transaction_id).await?;

        let now = Utc::now();
        let next_due = due_date_after_approval(&stay, pending.kind)?;

        let stay = self
            .guest_repo
            .update_payment(&mut *tx, stay.id, PaymentStatus::Paid, Some(now), next_due)
            .await?;
        let transaction = self
            .transaction_repo
            .resolve(&mut *tx, pending.id, TransactionStatus::Success, now)
            .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %transaction.id,
            next_due_date = %stay.rent_due_date,
            "Transaction approved"
        );

        Ok(TransactionDecision {
            transaction,
            next_due_date: stay.rent_due_date,
            payment_status: stay.payment_status,
        })
    }

    pub async fn reject_transaction(
        &self,
        property_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<TransactionDecision, AppError> {
        let mut tx = self.pool.begin().await?;

        let (pending, stay) = self.locked_pending(&mut tx, property_id, transaction_id).await?;

        let stay = self
            .guest_repo
            .update_payment(&mut *tx, stay.id, PaymentStatus::Pending, stay.last_paid_date, stay.rent_due_date)
            .await?;
        let transaction = self
            .transaction_repo
            .resolve(&mut *tx, pending.id, TransactionStatus::Rejected, Utc::now())
            .await?;

        tx.commit().await?;

        tracing::info!(transaction_id = %transaction.id, "Transaction rejected");

        Ok(TransactionDecision {
            transaction,
            next_due_date: stay.rent_due_date,
            payment_status: stay.payment_status,
        })
    }

    pub async fn history_for_guest(&self, guest_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.transaction_repo.list_for_guest(guest_id).await
    }

    pub async fn history_for_property(&self, property_id: Uuid) -> Result<Vec<TransactionView>, AppError> {
        self.transaction_repo.list_views_for_property(property_id).await
    }

    // Transaction of this property, still Pending, with its stay; both locked
    async fn locked_pending(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        property_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(Transaction, GuestStay), AppError> {
        let transaction = self
            .transaction_repo
            .find_in_property_for_update(&mut **tx, property_id, transaction_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        check_pending_transaction(&transaction)?;

        let stay = self
            .guest_repo
            .find_stay_for_update(&mut **tx, transaction.stay_id)
            .await?
            .ok_or(AppError::StayNotFound)?;

        Ok((transaction, stay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guest::NoticeStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn upi() -> UpiSettings {
        UpiSettings {
            upi_id: "sunrisepg@ybl".into(),
            upi_name: "Sunrise PG & Co".into(),
        }
    }

    fn stay(rent_type: RentType, due: NaiveDate) -> GuestStay {
        GuestStay {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            rent_amount: Decimal::from(8_000),
            advance_amount: Decimal::from(10_000),
            rent_type,
            per_day_rent: None,
            joining_date: date(2026, 1, 1),
            end_date: None,
            rent_due_date: due,
            payment_status: PaymentStatus::Pending,
            last_paid_date: None,
            notice_status: NoticeStatus::None,
            is_in_notice_period: false,
            notice_start_date: None,
            checked_out_at: None,
            created_at: Utc::now(),
        }
    }

    fn transaction(status: TransactionStatus) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            stay_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            utr: "412345678901".into(),
            amount: Decimal::from(8_000),
            kind: TransactionKind::Rent,
            status,
            payment_date: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn upi_link_is_percent_encoded() {
        let link = build_upi_link(&upi(), Decimal::from(8_000));
        assert_eq!(link, "upi://pay?pa=sunrisepg%40ybl&pn=Sunrise%20PG%20%26%20Co&am=8000.00&cu=INR");
    }

    #[test]
    fn upi_link_keeps_two_decimals() {
        let link = build_upi_link(&upi(), Decimal::new(49950, 2));
        assert!(link.contains("&am=499.50&"));
    }

    #[test]
    fn qr_code_is_a_png() {
        let png = render_qr_png("upi://pay?pa=sunrisepg%40ybl&am=1.00&cu=INR").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn approved_rent_moves_regular_due_date_by_a_cycle() {
        let s = stay(RentType::Regular, date(2026, 1, 31));
        assert_eq!(due_date_after_approval(&s, TransactionKind::Rent).unwrap(), date(2026, 3, 2));
    }

    #[test]
    fn advance_and_daily_payments_leave_due_date_alone() {
        let regular = stay(RentType::Regular, date(2026, 1, 31));
        assert_eq!(due_date_after_approval(&regular, TransactionKind::Advance).unwrap(), date(2026, 1, 31));

        let daily = stay(RentType::Daily, date(2026, 1, 15));
        assert_eq!(due_date_after_approval(&daily, TransactionKind::Rent).unwrap(), date(2026, 1, 15));
    }

    #[test]
    fn only_pending_transactions_can_be_decided() {
        assert!(check_pending_transaction(&transaction(TransactionStatus::Pending)).is_ok());
        assert!(matches!(
            check_pending_transaction(&transaction(TransactionStatus::Success)),
            Err(AppError::TransactionAlreadyProcessed)
        ));
        assert!(matches!(
            check_pending_transaction(&transaction(TransactionStatus::Rejected)),
            Err(AppError::TransactionAlreadyProcessed)
        ));
    }
}

#[cfg(test)]
mod db_tests {
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use crate::{
        models::{
            guest::PaymentStatus,
            transaction::{SubmitPaymentPayload, TransactionKind, TransactionStatus},
        },
        services::{billing::next_due_date, test_support::Fixture},
    };

    #[sqlx::test]
    #[ignore = "needs Postgres at DATABASE_URL"]
    async fn approving_rent_marks_stay_paid(pool: PgPool) {
        let fx = Fixture::provision(pool).await;
        fx.add_room("A-101", 1).await;
        let stay = fx.add_guest("9876543210", "A-101").await.unwrap();

        let payments = &fx.state.payment_service;
        let pending = payments
            .submit_payment(
                stay.guest_id,
                fx.property_id,
                &SubmitPaymentPayload {
                    utr: "412345678901".into(),
                    amount: Decimal::from(8_000),
                    kind: TransactionKind::Rent,
                },
            )
            .await
            .unwrap();
        assert_eq!(pending.status, TransactionStatus::Pending);

        let decision = payments.approve_transaction(fx.property_id, pending.id).await.unwrap();
        assert_eq!(decision.transaction.status, TransactionStatus::Success);
        assert!(decision.transaction.resolved_at.is_some());
        assert_eq!(decision.payment_status, PaymentStatus::Paid);
        assert_eq!(decision.next_due_date, next_due_date(stay.rent_due_date).unwrap());

        let after = fx
            .state
            .guest_repo
            .active_stay(&fx.state.db_pool, stay.guest_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.payment_status, PaymentStatus::Paid);
        assert!(after.last_paid_date.is_some());
        assert_eq!(after.rent_due_date, decision.next_due_date);

        // Already decided
        assert!(payments.approve_transaction(fx.property_id, pending.id).await.is_err());
    }
}
