// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::settings::PropertySetting,
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_settings(&self, property_id: Uuid) -> Result<Vec<PropertySetting>, AppError> {
        let settings = sqlx::query_as::<_, PropertySetting>(
            "SELECT * FROM property_settings WHERE property_id = $1 ORDER BY key ASC",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn upsert_setting<'e, E>(
        &self,
        executor: E,
        property_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<PropertySetting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT (Insert or Update)
        let setting = sqlx::query_as::<_, PropertySetting>(
            r#"
            INSERT INTO property_settings (property_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (property_id, key)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(key)
        .bind(value)
        .fetch_one(executor)
        .await?;

        Ok(setting)
    }
}
