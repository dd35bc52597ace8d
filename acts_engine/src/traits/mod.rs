//! # Storage contracts
//!
//! These traits define what a storage backend must provide for the engine to run on top of it. The SQLite backend
//! implements all of them.
//!
//! * [`CertificateManagement`] stores certificate lines idempotently and answers the questions the scheduled jobs ask
//!   about them (what was issued on a day, was anything ingested today).
//! * [`ReconciliationManagement`] compares certificate order sets with the internal order tables.
//! * [`HealthcheckManagement`] keeps the append-only log of healthcheck runs.
//!
//! Every method reports failures as a [`StorageError`], which never carries driver error text.
mod certificate_management;
mod data_objects;
mod errors;
mod healthcheck_management;
mod reconciliation_management;

pub use certificate_management::CertificateManagement;
pub use data_objects::{Pagination, ValidatedOrderFilter, DEFAULT_PAGE_SIZE};
pub use errors::{StorageError, DEPENDENCY_FAILURE_MESSAGE};
pub use healthcheck_management::HealthcheckManagement;
pub use reconciliation_management::ReconciliationManagement;
