//! Scheduled jobs
//!
//! Every job runs through [`run_job`], which loads the account credentials, opens a connection pool for the duration
//! of the run, bounds the run by the configured timeout and closes the pool however the run ends. The scheduler
//! calls `run_job` once a day per job, at the job's configured UTC time.
use std::fmt::Display;

use acts_engine::{
    db_types::{AccountCredential, HealthcheckEntry, ReconciliationResult},
    marketplace::MarketplaceClient,
    CertificateSyncApi,
    CredentialSource,
    HealthcheckApi,
    JsonFileCredentials,
    OrderValidationApi,
    SqliteDatabase,
    SyncReport,
};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use log::*;
use tokio::task::JoinHandle;

use crate::{config::ServerConfig, errors::JobError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    UpdateCertificates,
    Healthcheck,
    ValidateOrders,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [JobKind::UpdateCertificates, JobKind::Healthcheck, JobKind::ValidateOrders];

    pub fn default_run_time(&self) -> NaiveTime {
        let hour = match self {
            JobKind::UpdateCertificates => 6,
            JobKind::Healthcheck => 9,
            JobKind::ValidateOrders => 10,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::UpdateCertificates => write!(f, "update_certificates"),
            JobKind::Healthcheck => write!(f, "healthcheck"),
            JobKind::ValidateOrders => write!(f, "validate_orders"),
        }
    }
}

/// What a successful job run produced.
#[derive(Debug, Clone)]
pub enum JobSummary {
    Synced(SyncReport),
    Healthcheck(HealthcheckEntry),
    Validated(Vec<ReconciliationResult>),
}

impl Display for JobSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobSummary::Synced(report) => write!(
                f,
                "{} of {} certificate lines were new. Failed accounts: {:?}",
                report.records_inserted,
                report.records_submitted,
                report.failed_accounts()
            ),
            JobSummary::Healthcheck(entry) => write!(f, "Healthcheck #{} outcome: {}", entry.id, entry.outcome()),
            JobSummary::Validated(results) => {
                let inconsistent = results.iter().filter(|r| !r.is_consistent).count();
                write!(f, "{} certificates reconciled, {inconsistent} inconsistent", results.len())
            },
        }
    }
}

/// Runs one job to completion, failure or timeout.
pub async fn run_job(kind: JobKind, config: &ServerConfig) -> Result<JobSummary, JobError> {
    let accounts = JsonFileCredentials::new(&config.tokens_path).load_credentials()?;
    let db = SqliteDatabase::new_with_url(&config.database_url, config.pool_size)
        .await
        .map_err(|e| JobError::Database(e.to_string()))?;
    if let Err(e) = db.run_migrations().await {
        db.close().await;
        return Err(JobError::Database(e.to_string()));
    }
    let now = Utc::now();
    let result = match tokio::time::timeout(config.run_timeout, execute(kind, &db, &accounts, config, now)).await {
        Ok(result) => result,
        Err(_) => {
            error!("🕰️ {kind} did not finish within {}s and was abandoned", config.run_timeout.as_secs());
            Err(JobError::TimedOut(config.run_timeout))
        },
    };
    db.close().await;
    result
}

async fn execute(
    kind: JobKind,
    db: &SqliteDatabase,
    accounts: &[AccountCredential],
    config: &ServerConfig,
    now: DateTime<Utc>,
) -> Result<JobSummary, JobError> {
    let today = now.date_naive();
    match kind {
        JobKind::UpdateCertificates => {
            let client = MarketplaceClient::new(config.marketplace.clone())?;
            let api = CertificateSyncApi::new(db.clone(), client);
            let report = api.sync_update_certificates(accounts, today).await?;
            Ok(JobSummary::Synced(report))
        },
        JobKind::Healthcheck => {
            let client = MarketplaceClient::new(config.marketplace.clone())?;
            let sync = CertificateSyncApi::new(db.clone(), client);
            let api = HealthcheckApi::new(db.clone());
            let entry = api.healthcheck_and_self_heal(&sync, accounts, now).await?;
            Ok(JobSummary::Healthcheck(entry))
        },
        JobKind::ValidateOrders => {
            let api = OrderValidationApi::new(db.clone());
            let results = api.validate_orders(accounts, today).await;
            Ok(JobSummary::Validated(results))
        },
    }
}

/// The first time strictly after `now` at which a job scheduled daily at `at` (UTC) should run.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(at));
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Starts one scheduler task per job. Do not await the returned JoinHandles, as they will run indefinitely.
pub fn start_scheduler(config: ServerConfig) -> Vec<JoinHandle<()>> {
    JobKind::ALL
        .into_iter()
        .map(|kind| {
            let config = config.clone();
            tokio::spawn(async move {
                let at = config.scheduler.run_time(kind);
                info!("🕰️ {kind} job scheduled daily at {at} UTC");
                loop {
                    let now = Utc::now();
                    let next = next_run_after(now, at);
                    debug!("🕰️ Next {kind} run at {next}");
                    tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;
                    info!("🕰️ Running {kind} job");
                    match run_job(kind, &config).await {
                        Ok(summary) => info!("🕰️ {kind} job complete. {summary}"),
                        Err(e) => error!("🕰️ {kind} job failed. {e}"),
                    }
                }
            })
        })
        .collect()
}
