//! `SqliteDatabase` is a concrete implementation of an acceptance certificate storage backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
//! Every method acquires its own connection from the shared pool and returns it when done.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;
use sqlx::SqlitePool;

use super::db::{certificates, create_database_if_missing, db_url, healthcheck, new_pool, reconciliation, run_migrations};
use crate::{
    db_types::{
        CandidateDocument,
        HealthcheckEntry,
        NewCertificate,
        NewHealthcheckEntry,
        ReconciliationTarget,
        SetComparison,
        ValidatedOrder,
    },
    traits::{
        CertificateManagement,
        HealthcheckManagement,
        ReconciliationManagement,
        StorageError,
        ValidatedOrderFilter,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the `ACTS_DATABASE_URL` environment variable.
    pub async fn new(pool_size: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), pool_size).await
    }

    pub async fn new_with_url(url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        create_database_if_missing(url).await?;
        let pool = new_pool(url, pool_size).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        run_migrations(&self.pool).await
    }

    /// Closes every connection in the pool. Clones of this object share the pool and are closed too.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Connection pool for {} closed", self.url);
    }
}

impl CertificateManagement for SqliteDatabase {
    async fn insert_certificates(&self, records: &[NewCertificate]) -> Result<u64, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }
        let fail = |e| StorageError::dependency_failure("insert_certificates", e);
        let mut tx = self.pool.begin().await.map_err(fail)?;
        let inserted = certificates::insert_certificates(records, &mut tx).await.map_err(fail)?;
        tx.commit().await.map_err(fail)?;
        debug!("🗃️ Stored {inserted} new certificate lines ({} submitted)", records.len());
        Ok(inserted)
    }

    async fn fetch_reconciliation_candidates(
        &self,
        date: NaiveDate,
        account: &str,
    ) -> Result<Vec<CandidateDocument>, StorageError> {
        let fail = |e| StorageError::dependency_failure("fetch_reconciliation_candidates", e);
        let mut conn = self.pool.acquire().await.map_err(fail)?;
        certificates::fetch_reconciliation_candidates(date, account, &mut conn).await.map_err(fail)
    }

    async fn has_certificates_ingested_on(&self, date: NaiveDate) -> Result<bool, StorageError> {
        let fail = |e| StorageError::dependency_failure("has_certificates_ingested_on", e);
        let mut conn = self.pool.acquire().await.map_err(fail)?;
        certificates::has_certificates_ingested_on(date, &mut conn).await.map_err(fail)
    }
}

impl ReconciliationManagement for SqliteDatabase {
    async fn compare_order_sets(&self, target: &ReconciliationTarget) -> Result<SetComparison, StorageError> {
        let fail = |e| StorageError::dependency_failure("compare_order_sets", e);
        let mut conn = self.pool.acquire().await.map_err(fail)?;
        reconciliation::compare_order_sets(target, &mut conn).await.map_err(fail)
    }

    async fn search_validated_orders(&self, filter: &ValidatedOrderFilter) -> Result<Vec<ValidatedOrder>, StorageError> {
        let fail = |e| StorageError::dependency_failure("search_validated_orders", e);
        let mut conn = self.pool.acquire().await.map_err(fail)?;
        reconciliation::search_validated_orders(filter, &mut conn).await.map_err(fail)
    }
}

impl HealthcheckManagement for SqliteDatabase {
    async fn record_healthcheck(&self, entry: &NewHealthcheckEntry) -> Result<HealthcheckEntry, StorageError> {
        let fail = |e| StorageError::dependency_failure("record_healthcheck", e);
        let mut tx = self.pool.begin().await.map_err(fail)?;
        let entry = healthcheck::insert_healthcheck(entry, &mut tx).await.map_err(fail)?;
        tx.commit().await.map_err(fail)?;
        Ok(entry)
    }

    async fn fetch_healthcheck_statuses(&self) -> Result<Vec<HealthcheckEntry>, StorageError> {
        let fail = |e| StorageError::dependency_failure("fetch_healthcheck_statuses", e);
        let mut conn = self.pool.acquire().await.map_err(fail)?;
        healthcheck::fetch_healthcheck_statuses(&mut conn).await.map_err(fail)
    }
}
