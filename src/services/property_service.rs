// src/services/property_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PropertyRepository, SettingsRepository, UserRepository},
    models::{
        auth::UserRole,
        property::{ActiveStatus, AddPropertyPayload, PropertyCreated, PropertySummary},
        settings::{PropertySetting, UpdateUpiPayload, UPI_ID_KEY, UPI_NAME_KEY},
    },
};

// Provisioning of properties (super admin) and their settings (admin)
#[derive(Clone)]
pub struct PropertyService {
    user_repo: UserRepository,
    property_repo: PropertyRepository,
    settings_repo: SettingsRepository,
    pool: PgPool,
}

impl PropertyService {
    pub fn new(
        user_repo: UserRepository,
        property_repo: PropertyRepository,
        settings_repo: SettingsRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            property_repo,
            settings_repo,
            pool,
        }
    }

    // =========================================================================
    //  SUPER ADMIN
    // =========================================================================

    /// Creates the admin login, the property and its UPI settings together.
    pub async fn add_property(&self, payload: &AddPropertyPayload) -> Result<PropertyCreated, AppError> {
        let username = payload.admin_username.trim();
        let mobile = payload.admin_mobile.trim();

        let mut tx = self.pool.begin().await?;

        // 1. Login identity must be free
        if self.user_repo.mobile_or_username_taken(&mut *tx, username, mobile).await? {
            return Err(AppError::UserAlreadyExists);
        }

        // 2. Admin user, no password until first login
        let admin = self
            .user_repo
            .create_user(&mut *tx, username, mobile, UserRole::Admin)
            .await?;

        // 3. Property owned by that admin
        let property = self
            .property_repo
            .create_property(
                &mut *tx,
                payload.property_name.trim(),
                payload.address.trim(),
                payload.owner_name.trim(),
                admin.id,
            )
            .await?;

        // 4. Payee details used by the guest payment links
        self.settings_repo
            .upsert_setting(&mut *tx, property.id, UPI_ID_KEY, payload.upi_id.trim())
            .await?;
        self.settings_repo
            .upsert_setting(&mut *tx, property.id, UPI_NAME_KEY, payload.upi_name.trim())
            .await?;

        tx.commit().await?;

        tracing::info!(property_id = %property.id, admin_id = %admin.id, "Property provisioned");

        Ok(PropertyCreated {
            property_id: property.id,
            admin_id: admin.id,
        })
    }

    pub async fn list_properties(&self) -> Result<Vec<PropertySummary>, AppError> {
        self.property_repo.list_summaries().await
    }

    /// Flips the admin's login flag and applies the new value to every
    /// supervisor and staying guest of the property.
    pub async fn toggle_property(&self, property_id: Uuid) -> Result<ActiveStatus, AppError> {
        let mut tx = self.pool.begin().await?;

        let property = self
            .property_repo
            .find_by_id(&mut *tx, property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        let admin = self.user_repo.toggle_active(&mut *tx, property.admin_id).await?;
        let members = self
            .user_repo
            .set_active_for_property_members(&mut *tx, property.id, admin.is_active)
            .await?;

        tx.commit().await?;

        tracing::info!(
            property_id = %property.id,
            is_active = admin.is_active,
            members,
            "Property access toggled"
        );

        Ok(ActiveStatus {
            is_active: admin.is_active,
        })
    }

    // =========================================================================
    //  SETTINGS
    // =========================================================================

    pub async fn get_settings(&self, property_id: Uuid) -> Result<Vec<PropertySetting>, AppError> {
        self.settings_repo.get_settings(property_id).await
    }

    pub async fn update_upi(
        &self,
        property_id: Uuid,
        payload: &UpdateUpiPayload,
    ) -> Result<Vec<PropertySetting>, AppError> {
        let mut tx = self.pool.begin().await?;

        let upi_id = self
            .settings_repo
            .upsert_setting(&mut *tx, property_id, UPI_ID_KEY, payload.upi_id.trim())
            .await?;
        let upi_name = self
            .settings_repo
            .upsert_setting(&mut *tx, property_id, UPI_NAME_KEY, payload.upi_name.trim())
            .await?;

        tx.commit().await?;

        tracing::info!(property_id = %property_id, "UPI settings updated");
        Ok(vec![upi_id, upi_name])
    }
}
