// src/services/staff_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SupervisorRepository, UserRepository},
    models::{
        auth::UserRole,
        property::ActiveStatus,
        supervisor::{AddSupervisorPayload, Supervisor, SupervisorView},
    },
};

#[derive(Clone)]
pub struct StaffService {
    user_repo: UserRepository,
    supervisor_repo: SupervisorRepository,
    pool: PgPool,
}

impl StaffService {
    pub fn new(user_repo: UserRepository, supervisor_repo: SupervisorRepository, pool: PgPool) -> Self {
        Self {
            user_repo,
            supervisor_repo,
            pool,
        }
    }

    pub async fn add_supervisor(
        &self,
        property_id: Uuid,
        payload: &AddSupervisorPayload,
    ) -> Result<Supervisor, AppError> {
        let mobile = payload.mobile.trim();
        let mut tx = self.pool.begin().await?;

        if self.user_repo.mobile_or_username_taken(&mut *tx, mobile, mobile).await? {
            return Err(AppError::UserAlreadyExists);
        }

        let user = self
            .user_repo
            .create_user(&mut *tx, mobile, mobile, UserRole::Supervisor)
            .await?;
        let supervisor = self
            .supervisor_repo
            .create_supervisor(&mut *tx, user.id, property_id, payload.name.trim(), payload.joining_date)
            .await?;

        tx.commit().await?;

        tracing::info!(supervisor_id = %supervisor.id, property_id = %property_id, "Supervisor added");
        Ok(supervisor)
    }

    pub async fn list_supervisors(&self, property_id: Uuid) -> Result<Vec<SupervisorView>, AppError> {
        self.supervisor_repo.list_views(property_id).await
    }

    /// Flips the login flag of a supervisor user of this property.
    pub async fn toggle_supervisor(&self, property_id: Uuid, user_id: Uuid) -> Result<ActiveStatus, AppError> {
        let supervisor = self
            .supervisor_repo
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound("Supervisor"))?;

        if supervisor.property_id != property_id {
            return Err(AppError::Unauthorized);
        }

        let user = self.user_repo.toggle_active(&self.pool, user_id).await?;

        tracing::info!(user_id = %user_id, is_active = user.is_active, "Supervisor access toggled");
        Ok(ActiveStatus {
            is_active: user.is_active,
        })
    }
}
