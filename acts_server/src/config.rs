//! Server configuration
//!
//! Every setting comes from an `ACTS_*` environment variable (optionally loaded from `.env`). Missing or invalid
//! values fall back to the defaults below, and the fallback is logged.
use std::{env, path::PathBuf, time::Duration};

use acts_common::{env_or_default, parse_boolean_flag};
use acts_engine::{credentials::DEFAULT_TOKENS_PATH, marketplace::MarketplaceConfig, sqlite_db::{db_url, SQLITE_DB_URL}};
use chrono::NaiveTime;
use log::*;

use crate::jobs::JobKind;

const DEFAULT_ACTS_HOST: &str = "127.0.0.1";
const DEFAULT_ACTS_PORT: u16 = 8370;
const DEFAULT_POOL_SIZE: u32 = 5;
const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(60 * 60);
const TIME_OF_DAY_FORMAT: &str = "%H:%M";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Connections kept open by each pool. Pools may grow by a fixed overflow under load.
    pub pool_size: u32,
    /// JSON file mapping account names to marketplace API tokens.
    pub tokens_path: PathBuf,
    pub marketplace: MarketplaceConfig,
    /// Hard wall-clock limit for a single job run.
    pub run_timeout: Duration,
    pub scheduler: SchedulerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ACTS_HOST.to_string(),
            port: DEFAULT_ACTS_PORT,
            database_url: SQLITE_DB_URL.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            tokens_path: PathBuf::from(DEFAULT_TOKENS_PATH),
            marketplace: MarketplaceConfig::default(),
            run_timeout: DEFAULT_RUN_TIMEOUT,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("ACTS_HOST").ok().unwrap_or_else(|| DEFAULT_ACTS_HOST.into());
        let port = env_or_default("ACTS_PORT", DEFAULT_ACTS_PORT);
        let database_url = db_url();
        let pool_size = env_or_default("ACTS_POOL_SIZE", DEFAULT_POOL_SIZE).max(1);
        let tokens_path = env::var("ACTS_TOKENS_PATH").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ ACTS_TOKENS_PATH is not set. Reading account tokens from {DEFAULT_TOKENS_PATH}.");
            PathBuf::from(DEFAULT_TOKENS_PATH)
        });
        let marketplace = MarketplaceConfig::new_from_env_or_default();
        let run_timeout = Duration::from_secs(env_or_default("ACTS_RUN_TIMEOUT", DEFAULT_RUN_TIMEOUT.as_secs()));
        let scheduler = SchedulerConfig::from_env_or_default();
        Self { host, port, database_url, pool_size, tokens_path, marketplace, run_timeout, scheduler }
    }
}

/// Daily run times for the scheduled jobs, in UTC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub update_certificates_at: NaiveTime,
    pub healthcheck_at: NaiveTime,
    pub validate_orders_at: NaiveTime,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_certificates_at: JobKind::UpdateCertificates.default_run_time(),
            healthcheck_at: JobKind::Healthcheck.default_run_time(),
            validate_orders_at: JobKind::ValidateOrders.default_run_time(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env_or_default() -> Self {
        let enabled = parse_boolean_flag(env::var("ACTS_SCHEDULER_ENABLED").ok(), true);
        if !enabled {
            warn!("🪛️ The job scheduler is disabled. Jobs will only run when triggered.");
        }
        Self {
            enabled,
            update_certificates_at: run_time_from_env("ACTS_UPDATE_CERTIFICATES_AT", JobKind::UpdateCertificates),
            healthcheck_at: run_time_from_env("ACTS_HEALTHCHECK_AT", JobKind::Healthcheck),
            validate_orders_at: run_time_from_env("ACTS_VALIDATE_ORDERS_AT", JobKind::ValidateOrders),
        }
    }

    pub fn run_time(&self, kind: JobKind) -> NaiveTime {
        match kind {
            JobKind::UpdateCertificates => self.update_certificates_at,
            JobKind::Healthcheck => self.healthcheck_at,
            JobKind::ValidateOrders => self.validate_orders_at,
        }
    }
}

/// Parses a `HH:MM` time of day.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_OF_DAY_FORMAT).ok()
}

fn run_time_from_env(name: &str, kind: JobKind) -> NaiveTime {
    let default = kind.default_run_time();
    match env::var(name) {
        Ok(s) => parse_time_of_day(&s).unwrap_or_else(|| {
            warn!("🪛️ {s} is not a valid HH:MM time for {name}. Running {kind} at {default} UTC instead.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Running {kind} at {default} UTC.");
            default
        },
    }
}
