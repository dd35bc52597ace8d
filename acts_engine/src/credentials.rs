//! Seller account credentials.
//!
//! Credentials are loaded once at the start of every run and are immutable for the rest of it. Failing to load them
//! aborts the run.
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use acts_common::Secret;
use log::*;
use thiserror::Error;

use crate::db_types::AccountCredential;

pub const DEFAULT_TOKENS_PATH: &str = "tokens.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Could not read the credentials file {path}. {reason}")]
    Io { path: String, reason: String },
    #[error("The credentials file {path} is not a JSON object of account names to tokens. {reason}")]
    Format { path: String, reason: String },
    #[error("No seller accounts are configured in {0}")]
    NoAccounts(String),
}

pub trait CredentialSource {
    fn load_credentials(&self) -> Result<Vec<AccountCredential>, CredentialError>;
}

/// Reads credentials from a JSON file of the form `{"account-name": "api-token", ...}`.
#[derive(Debug, Clone)]
pub struct JsonFileCredentials {
    path: PathBuf,
}

impl JsonFileCredentials {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl Default for JsonFileCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS_PATH)
    }
}

impl CredentialSource for JsonFileCredentials {
    fn load_credentials(&self) -> Result<Vec<AccountCredential>, CredentialError> {
        let path = self.path.display().to_string();
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| CredentialError::Io { path: path.clone(), reason: e.to_string() })?;
        let tokens: BTreeMap<String, Secret<String>> = serde_json::from_str(&contents)
            .map_err(|e| CredentialError::Format { path: path.clone(), reason: e.to_string() })?;
        if tokens.is_empty() {
            return Err(CredentialError::NoAccounts(path));
        }
        let credentials = tokens
            .into_iter()
            .map(|(account_id, token)| AccountCredential { account_id, token })
            .collect::<Vec<_>>();
        info!("🔑️ Loaded credentials for {} accounts from {path}", credentials.len());
        Ok(credentials)
    }
}

/// Credentials that are already known, e.g. supplied by a caller or a test.
impl CredentialSource for Vec<AccountCredential> {
    fn load_credentials(&self) -> Result<Vec<AccountCredential>, CredentialError> {
        Ok(self.clone())
    }
}
