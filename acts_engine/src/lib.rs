//! Acceptance Certificate Engine
//!
//! Marketplaces issue "acceptance certificates" (acts) for every supply a seller ships. Each act lists the orders,
//! stickers and unit counts the marketplace accepted. This library downloads those acts for every configured seller
//! account, persists their line items, and reconciles them against the orders tracked internally.
//!
//! The library is divided into the following sections:
//! 1. Document acquisition ([`mod@marketplace`]). An HTTP client for the marketplace documents API, with retry and
//!    rate-limit handling, plus a fan-out fetcher that runs one pipeline per account concurrently.
//! 2. Document parsing ([`mod@archive`]). Nested zip archives are unpacked and the spreadsheets inside are turned into
//!    certificate rows.
//! 3. Storage ([`mod@traits`] and the SQLite backend). Backends implement the traits in `traits` and are accessed
//!    through the public API objects; you should never need to touch the database directly.
//! 4. The public API ([`mod@acts_api`]). The three scheduled jobs (certificate sync, healthcheck and self-heal, order
//!    validation) live here.
pub mod acts_api;
pub mod archive;
pub mod credentials;
pub mod db_types;
pub mod helpers;
pub mod marketplace;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase};

pub use acts_api::{
    errors::{HealthcheckApiError, SyncError, ValidationApiError},
    healthcheck_api::HealthcheckApi,
    sync_api::CertificateSyncApi,
    sync_objects::{AccountSyncStatus, SyncReport},
    validation_api::OrderValidationApi,
};
pub use credentials::{CredentialError, CredentialSource, JsonFileCredentials};
pub use traits::{CertificateManagement, HealthcheckManagement, ReconciliationManagement, StorageError};
