use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, Utc};
use log::*;

use crate::{
    acts_api::{errors::HealthcheckApiError, sync_api::CertificateSyncApi},
    db_types::{AccountCredential, HealthOutcome, HealthcheckEntry, NewHealthcheckEntry},
    marketplace::DocumentSource,
    traits::{CertificateManagement, HealthcheckManagement},
};

/// `HealthcheckApi` keeps the healthcheck log and performs the daily data freshness check.
pub struct HealthcheckApi<B> {
    db: B,
}

impl<B: Debug> Debug for HealthcheckApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HealthcheckApi ({:?})", self.db)
    }
}

impl<B> HealthcheckApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> HealthcheckApi<B>
where B: HealthcheckManagement
{
    pub async fn record_run(&self, entry: &NewHealthcheckEntry) -> Result<HealthcheckEntry, HealthcheckApiError> {
        let entry = self.db.record_healthcheck(entry).await?;
        info!("🩺️ Healthcheck #{} recorded: {}", entry.id, entry.outcome());
        Ok(entry)
    }

    /// The healthcheck log, newest first.
    pub async fn statuses(&self) -> Result<Vec<HealthcheckEntry>, HealthcheckApiError> {
        let statuses = self.db.fetch_healthcheck_statuses().await?;
        Ok(statuses)
    }
}

impl<B> HealthcheckApi<B>
where B: HealthcheckManagement + CertificateManagement
{
    /// Checks that certificates were ingested today. If they were not, the certificate sync is re-run once and the
    /// freshness check repeated. Exactly one entry is recorded per call.
    pub async fn healthcheck_and_self_heal<C, S>(
        &self,
        sync: &CertificateSyncApi<C, S>,
        accounts: &[AccountCredential],
        now: DateTime<Utc>,
    ) -> Result<HealthcheckEntry, HealthcheckApiError>
    where
        C: CertificateManagement,
        S: DocumentSource,
    {
        let today = now.date_naive();
        let outcome = match self.db.has_certificates_ingested_on(today).await {
            Ok(true) => {
                info!("🩺️ Certificates were ingested today ({today})");
                HealthOutcome::Success
            },
            Ok(false) => {
                warn!("🩺️ No certificates were ingested today ({today}). Re-running the certificate sync.");
                self.heal(sync, accounts, today).await
            },
            Err(e) => {
                error!("🩺️ The freshness check failed. {e}");
                HealthOutcome::InnerMethodFailure
            },
        };
        self.record_run(&NewHealthcheckEntry::new(now, outcome)).await
    }

    async fn heal<C, S>(&self, sync: &CertificateSyncApi<C, S>, accounts: &[AccountCredential], today: NaiveDate) -> HealthOutcome
    where
        C: CertificateManagement,
        S: DocumentSource,
    {
        let report = match sync.sync_update_certificates(accounts, today).await {
            Ok(report) => report,
            Err(e) => {
                error!("🩺️ The certificate sync re-run failed. {e}");
                return HealthOutcome::InnerMethodFailure;
            },
        };
        if report.upstream_failed() {
            warn!("🩺️ The marketplace API reported an outage during the re-run");
            return HealthOutcome::UpstreamApiFailure;
        }
        match self.db.has_certificates_ingested_on(today).await {
            Ok(true) => {
                info!("🩺️ The re-run stored {} new certificate lines", report.records_inserted);
                HealthOutcome::Success
            },
            Ok(false) => {
                warn!("🩺️ There is still no certificate data for {today} after the re-run");
                HealthOutcome::InnerMethodFailure
            },
            Err(e) => {
                error!("🩺️ The freshness check after the re-run failed. {e}");
                HealthOutcome::InnerMethodFailure
            },
        }
    }
}
