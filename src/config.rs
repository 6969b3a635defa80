// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        ComplaintRepository, GuestRepository, PropertyRepository, RoomRepository, SettingsRepository,
        SupervisorRepository, TransactionRepository, UserRepository,
    },
    services::{
        auth::AuthService, complaint_service::ComplaintService, guest_service::GuestService,
        notice_service::NoticeService, payment_service::PaymentService, property_service::PropertyService,
        room_service::RoomService, staff_service::StaffService,
    },
};

// ---
// Configuration read from the environment (and .env)
// ---
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub jwt_ttl_hours: i64,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
    pub superadmin_username: Option<String>,
    pub superadmin_mobile: Option<String>,
    /// Offset used to decide which calendar day "today" is (due dates, notice window)
    pub utc_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env_opt("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env_opt("JWT_SECRET").context("JWT_SECRET must be set")?,
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse_or("PORT", 3000),
            db_max_connections: env_parse_or("DB_MAX_CONNECTIONS", 5),
            jwt_ttl_hours: env_parse_or("JWT_TTL_HOURS", 168),
            cors_origins: parse_csv(&env_or("CORS_ORIGINS", "")),
            superadmin_username: env_opt("SUPERADMIN_USERNAME"),
            superadmin_mobile: env_opt("SUPERADMIN_MOBILE"),
            utc_offset: utc_offset_from_minutes(env_parse_or("PROPERTY_UTC_OFFSET_MINUTES", IST_OFFSET_MINUTES))?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Properties are in India unless configured otherwise
const IST_OFFSET_MINUTES: i32 = 330;

fn utc_offset_from_minutes(minutes: i32) -> anyhow::Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("PROPERTY_UTC_OFFSET_MINUTES out of range: {minutes}"))
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

// ---
// Shared application state
// ---
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,

    // Repositories the request extractors read from
    pub property_repo: PropertyRepository,
    pub guest_repo: GuestRepository,

    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub staff_service: StaffService,
    pub room_service: RoomService,
    pub guest_service: GuestService,
    pub notice_service: NoticeService,
    pub payment_service: PaymentService,
    pub complaint_service: ComplaintService,
}

impl AppState {
    /// Connects to the database and wires the service graph.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("Database connection established");

        Ok(Self::build(config, db_pool))
    }

    pub fn build(config: AppConfig, db_pool: PgPool) -> Self {
        // 1. Repositories
        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let supervisor_repo = SupervisorRepository::new(db_pool.clone());
        let room_repo = RoomRepository::new(db_pool.clone());
        let guest_repo = GuestRepository::new(db_pool.clone());
        let complaint_repo = ComplaintRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());

        // 2. Services
        let auth_service = AuthService::new(
            user_repo.clone(),
            property_repo.clone(),
            supervisor_repo.clone(),
            guest_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
            db_pool.clone(),
        );
        let property_service = PropertyService::new(
            user_repo.clone(),
            property_repo.clone(),
            settings_repo.clone(),
            db_pool.clone(),
        );
        let staff_service = StaffService::new(user_repo.clone(), supervisor_repo, db_pool.clone());
        let room_service = RoomService::new(room_repo.clone(), db_pool.clone());
        let guest_service = GuestService::new(
            user_repo.clone(),
            room_repo.clone(),
            guest_repo.clone(),
            db_pool.clone(),
            config.utc_offset,
        );
        let notice_service = NoticeService::new(guest_repo.clone(), db_pool.clone(), config.utc_offset);
        let payment_service = PaymentService::new(
            settings_repo,
            guest_repo.clone(),
            transaction_repo,
            db_pool.clone(),
        );
        let complaint_service = ComplaintService::new(complaint_repo, db_pool.clone());

        Self {
            db_pool,
            config: Arc::new(config),
            property_repo,
            guest_repo,
            auth_service,
            property_service,
            staff_service,
            room_service,
            guest_service,
            notice_service,
            payment_service,
            complaint_service,
        }
    }
}

#[cfg(test)]
impl AppConfig {
    pub(crate) fn for_tests(database_url: &str, jwt_secret: &str) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            host: "127.0.0.1".into(),
            port: 0,
            db_max_connections: 1,
            jwt_ttl_hours: 1,
            cors_origins: vec![],
            superadmin_username: None,
            superadmin_mobile: None,
            utc_offset: FixedOffset::east_opt(IST_OFFSET_MINUTES * 60).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_drops_blank_entries() {
        assert_eq!(
            parse_csv(" http://localhost:5173, ,https://pg.example.com "),
            vec!["http://localhost:5173".to_string(), "https://pg.example.com".to_string()]
        );
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let mut config = AppConfig::for_tests("postgres://localhost/staynest", "secret");
        config.host = "127.0.0.1".into();
        config.port = 8080;
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn utc_offset_is_read_in_minutes() {
        assert_eq!(utc_offset_from_minutes(330).unwrap().local_minus_utc(), 19_800);
        assert_eq!(utc_offset_from_minutes(-300).unwrap().local_minus_utc(), -18_000);
        assert!(utc_offset_from_minutes(24 * 60).is_err());
    }
}
