use thiserror::Error;

use crate::traits::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Certificates could not be stored. {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationApiError {
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthcheckApiError {
    #[error("The healthcheck result could not be recorded. {0}")]
    Storage(#[from] StorageError),
}
