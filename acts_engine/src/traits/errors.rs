use log::*;
use thiserror::Error;

/// The message callers see for any storage failure. The underlying error is logged instead.
pub const DEPENDENCY_FAILURE_MESSAGE: &str = "A database error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{message} (status {status})")]
    DependencyFailure { operation: &'static str, status: u16, message: String },
}

impl StorageError {
    /// Logs `e` and replaces it with the uniform dependency failure.
    pub fn dependency_failure<E: std::fmt::Display>(operation: &'static str, e: E) -> Self {
        error!("🗃️ Storage failure during {operation}. {e}");
        Self::DependencyFailure { operation, status: 500, message: DEPENDENCY_FAILURE_MESSAGE.to_string() }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::DependencyFailure { status, .. } => *status,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::DependencyFailure { operation, .. } => operation,
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        Self::dependency_failure("database access", e)
    }
}
