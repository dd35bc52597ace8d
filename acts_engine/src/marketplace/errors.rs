use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketplaceError {
    #[error("Could not initialize the marketplace client: {0}")]
    Initialization(String),
    #[error("Gave up on {endpoint} after {attempts} attempts. {last_error}")]
    RetriesExhausted { endpoint: String, attempts: u32, last_error: String },
    #[error("Still rate limited on {endpoint} after {attempts} attempts")]
    RateLimited { endpoint: String, attempts: u32 },
    #[error("Request to {endpoint} failed. Error {status}. {message}")]
    Status { endpoint: String, status: u16, message: String },
    #[error("Request to {endpoint} could not be completed. {message}")]
    Transport { endpoint: String, message: String },
    #[error("Could not deserialize the response from {endpoint}. {message}")]
    Decode { endpoint: String, message: String },
    #[error("The document fetch for account {0} panicked")]
    TaskPanicked(String),
}
