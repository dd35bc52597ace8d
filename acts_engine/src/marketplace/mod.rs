//! # Marketplace documents API
//!
//! * [`MarketplaceClient`] talks to the documents API. It lists the certificates issued in a date window and
//!   downloads them as one bulk archive, retrying through connection failures and rate limiting.
//! * [`DocumentSource`] is the seam the rest of the engine depends on, so that pipelines can run against anything
//!   that can produce certificate archives.
//! * [`fetch_all`] runs one fetch per seller account concurrently and isolates their failures from each other.
mod client;
mod config;
mod errors;
mod fan_out;
mod objects;
mod source;

pub use client::MarketplaceClient;
pub use config::{MarketplaceConfig, DEFAULT_MARKETPLACE_URL};
pub use errors::MarketplaceError;
pub use fan_out::{fetch_all, FanOutResult};
pub use objects::{
    DateWindow,
    DocumentDescriptor,
    DocumentListResponse,
    DocumentListing,
    DownloadOutcome,
    DownloadRequest,
    DownloadResponse,
    CREATION_TIME_FORMAT,
    DOCUMENT_CATEGORY,
};
pub use source::{AccountDocuments, DocumentSource};
