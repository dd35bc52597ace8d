use std::time::Duration;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use acts_engine::{
    marketplace::MarketplaceError,
    traits::DEPENDENCY_FAILURE_MESSAGE,
    CredentialError,
    HealthcheckApiError,
    StorageError,
    SyncError,
    ValidationApiError,
};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    DependencyFailure(#[from] StorageError),
    #[error("Invalid request query: {0}")]
    InvalidRequestQuery(String),
    #[error("Account credentials could not be loaded. {0}")]
    CredentialsUnavailable(#[from] CredentialError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestQuery(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DependencyFailure(e) => StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::CredentialsUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Backend details are logged, never sent to the caller
        let message = match self {
            Self::InvalidRequestQuery(_) => self.to_string(),
            Self::DependencyFailure(_) => DEPENDENCY_FAILURE_MESSAGE.to_string(),
            _ => {
                error!("💻️ {self}");
                "An internal error occurred. Please check the server logs.".to_string()
            },
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

impl From<SyncError> for ServerError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Storage(e) => Self::DependencyFailure(e),
        }
    }
}

impl From<ValidationApiError> for ServerError {
    fn from(e: ValidationApiError) -> Self {
        match e {
            ValidationApiError::Storage(e) => Self::DependencyFailure(e),
            ValidationApiError::InvalidQuery(s) => Self::InvalidRequestQuery(s),
        }
    }
}

impl From<HealthcheckApiError> for ServerError {
    fn from(e: HealthcheckApiError) -> Self {
        match e {
            HealthcheckApiError::Storage(e) => Self::DependencyFailure(e),
        }
    }
}

/// Reasons a scheduled or triggered job run can fail as a whole.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Account credentials could not be loaded. {0}")]
    Credentials(#[from] CredentialError),
    #[error("The database pool could not be created. {0}")]
    Database(String),
    #[error("The marketplace client could not be created. {0}")]
    Marketplace(#[from] MarketplaceError),
    #[error("{0}")]
    Sync(#[from] SyncError),
    #[error("{0}")]
    Healthcheck(#[from] HealthcheckApiError),
    #[error("The job run did not finish within {}s", .0.as_secs())]
    TimedOut(Duration),
}
