// src/services/complaint_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ComplaintRepository,
    models::complaint::{
        Complaint, ComplaintStatus, ComplaintView, RaiseComplaintPayload, UpdateComplaintStatusPayload,
    },
};

/// Column values a status update writes.
#[derive(Debug, PartialEq, Eq)]
pub struct ComplaintUpdate {
    pub status: ComplaintStatus,
    pub estimated_resolution_days: Option<i32>,
    pub notes: Option<String>,
    pub solved_date: Option<DateTime<Utc>>,
}

/// Registered -> InProgress -> Solved. Solved is terminal and nothing moves
/// back to Registered.
pub fn plan_status_update(
    current: &Complaint,
    payload: &UpdateComplaintStatusPayload,
    now: DateTime<Utc>,
) -> Result<ComplaintUpdate, AppError> {
    if current.status == ComplaintStatus::Solved {
        return Err(AppError::ComplaintSolved);
    }

    // Blank notes keep whatever was stored before
    let notes = payload
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| current.notes.clone());

    match payload.status {
        ComplaintStatus::Registered => Err(AppError::InvalidComplaintTransition),
        ComplaintStatus::InProgress => {
            let days = payload
                .estimated_resolution_days
                .ok_or(AppError::EstimatedDaysRequired)?;
            Ok(ComplaintUpdate {
                status: ComplaintStatus::InProgress,
                estimated_resolution_days: Some(days),
                notes,
                solved_date: None,
            })
        }
        ComplaintStatus::Solved => Ok(ComplaintUpdate {
            status: ComplaintStatus::Solved,
            estimated_resolution_days: payload
                .estimated_resolution_days
                .or(current.estimated_resolution_days),
            notes,
            solved_date: Some(now),
        }),
    }
}

pub fn check_cancellable(complaint: &Complaint) -> Result<(), AppError> {
    if complaint.status != ComplaintStatus::Registered {
        return Err(AppError::ComplaintNotCancellable);
    }
    Ok(())
}

#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    pool: PgPool,
}

impl ComplaintService {
    pub fn new(complaint_repo: ComplaintRepository, pool: PgPool) -> Self {
        Self { complaint_repo, pool }
    }

    pub async fn raise(&self, guest_id: Uuid, payload: &RaiseComplaintPayload) -> Result<Complaint, AppError> {
        let complaint = self
            .complaint_repo
            .create_complaint(guest_id, payload.complaint_type.trim(), payload.description.trim())
            .await?;

        tracing::info!(complaint_id = %complaint.id, guest_id = %guest_id, "Complaint raised");
        Ok(complaint)
    }

    pub async fn list_for_property(
        &self,
        property_id: Uuid,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<ComplaintView>, AppError> {
        self.complaint_repo.list_for_property(property_id, status).await
    }

    pub async fn list_for_guest(&self, guest_id: Uuid) -> Result<Vec<Complaint>, AppError> {
        self.complaint_repo.list_for_guest(guest_id).await
    }

    pub async fn get(&self, property_id: Uuid, complaint_id: Uuid) -> Result<ComplaintView, AppError> {
        self.complaint_repo
            .find_view_in_property(property_id, complaint_id)
            .await?
            .ok_or(AppError::NotFound("Complaint"))
    }

    pub async fn update_status(
        &self,
        property_id: Uuid,
        complaint_id: Uuid,
        payload: &UpdateComplaintStatusPayload,
    ) -> Result<Complaint, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .complaint_repo
            .find_in_property_for_update(&mut *tx, property_id, complaint_id)
            .await?
            .ok_or(AppError::NotFound("Complaint"))?;

        let update = plan_status_update(&current, payload, Utc::now())?;

        let complaint = self
            .complaint_repo
            .update_status(
                &mut *tx,
                current.id,
                update.status,
                update.estimated_resolution_days,
                update.notes.as_deref(),
                update.solved_date,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(complaint_id = %complaint.id, status = ?complaint.status, "Complaint status updated");
        Ok(complaint)
    }

    /// Guests may withdraw their own complaint until work has started.
    pub async fn cancel(&self, guest_id: Uuid, complaint_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let complaint = self
            .complaint_repo
            .find_for_guest_for_update(&mut *tx, guest_id, complaint_id)
            .await?
            .ok_or(AppError::NotFound("Complaint"))?;

        check_cancellable(&complaint)?;

        self.complaint_repo.delete_complaint(&mut *tx, complaint.id).await?;
        tx.commit().await?;

        tracing::info!(complaint_id = %complaint_id, guest_id = %guest_id, "Complaint cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(status: ComplaintStatus) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            complaint_type: "Plumbing".into(),
            description: "Tap is leaking".into(),
            status,
            estimated_resolution_days: None,
            notes: None,
            created_at: Utc::now(),
            solved_date: None,
        }
    }

    fn update(status: ComplaintStatus, days: Option<i32>, notes: Option<&str>) -> UpdateComplaintStatusPayload {
        UpdateComplaintStatusPayload {
            status,
            estimated_resolution_days: days,
            notes: notes.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn starting_work_requires_an_estimate() {
        let c = complaint(ComplaintStatus::Registered);
        let err = plan_status_update(&c, &update(ComplaintStatus::InProgress, None, None), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::EstimatedDaysRequired));

        let planned =
            plan_status_update(&c, &update(ComplaintStatus::InProgress, Some(2), Some("Plumber booked")), Utc::now())
                .unwrap();
        assert_eq!(planned.status, ComplaintStatus::InProgress);
        assert_eq!(planned.estimated_resolution_days, Some(2));
        assert_eq!(planned.notes.as_deref(), Some("Plumber booked"));
        assert_eq!(planned.solved_date, None);
    }

    #[test]
    fn solving_stamps_the_solved_date() {
        let now = Utc::now();
        let mut c = complaint(ComplaintStatus::InProgress);
        c.estimated_resolution_days = Some(3);
        c.notes = Some("Plumber booked".into());

        let planned = plan_status_update(&c, &update(ComplaintStatus::Solved, None, Some("  ")), now).unwrap();
        assert_eq!(planned.solved_date, Some(now));
        assert_eq!(planned.estimated_resolution_days, Some(3));
        assert_eq!(planned.notes.as_deref(), Some("Plumber booked"));
    }

    #[test]
    fn solved_complaints_are_frozen() {
        let c = complaint(ComplaintStatus::Solved);
        for target in [ComplaintStatus::Registered, ComplaintStatus::InProgress, ComplaintStatus::Solved] {
            let err = plan_status_update(&c, &update(target, Some(1), None), Utc::now()).unwrap_err();
            assert!(matches!(err, AppError::ComplaintSolved));
        }
        assert!(matches!(check_cancellable(&c), Err(AppError::ComplaintNotCancellable)));
    }

    #[test]
    fn complaints_never_move_back_to_registered() {
        let c = complaint(ComplaintStatus::InProgress);
        let err = plan_status_update(&c, &update(ComplaintStatus::Registered, None, None), Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::InvalidComplaintTransition));
    }

    #[test]
    fn only_registered_complaints_can_be_cancelled() {
        assert!(check_cancellable(&complaint(ComplaintStatus::Registered)).is_ok());
        assert!(matches!(
            check_cancellable(&complaint(ComplaintStatus::InProgress)),
            Err(AppError::ComplaintNotCancellable)
        ));
    }
}
