//! # Acceptance certificate engine public API
//!
//! The API is modular, so that each scheduled job only needs the backend capabilities it actually uses.
//!
//! * [`sync_api`] fetches every account's certificates, parses them and stores the lines (`syncUpdateCertificates`).
//! * [`validation_api`] reconciles stored certificates with the internal order tables (`validateOrders`) and serves
//!   the validated order report.
//! * [`healthcheck_api`] checks that today's certificates arrived, re-runs the sync when they did not, and keeps the
//!   healthcheck log (`healthcheckAndSelfHeal`).
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use acts_engine::{marketplace::{MarketplaceClient, MarketplaceConfig}, CertificateSyncApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/acts_store.db", 5).await?;
//! let client = MarketplaceClient::new(MarketplaceConfig::new_from_env_or_default())?;
//! let api = CertificateSyncApi::new(db, client);
//! let report = api.sync_update_certificates(&accounts, chrono::Utc::now().date_naive()).await?;
//! ```
pub mod errors;
pub mod healthcheck_api;
pub mod sync_api;
pub mod sync_objects;
pub mod validation_api;
