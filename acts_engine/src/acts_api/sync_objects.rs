use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What happened to one account during a certificate sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountSyncStatus {
    Ingested { documents: usize, records: usize },
    NoData,
    UpstreamFailure { code: u16 },
    FetchFailed { reason: String },
    ParseFailed { reason: String },
}

impl AccountSyncStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. } | Self::FetchFailed { .. } | Self::ParseFailed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub accounts: BTreeMap<String, AccountSyncStatus>,
    /// Certificate lines handed to storage, duplicates included.
    pub records_submitted: usize,
    /// Certificate lines that were new.
    pub records_inserted: u64,
}

impl SyncReport {
    /// True if the marketplace API reported an outage for any account.
    pub fn upstream_failed(&self) -> bool {
        self.accounts.values().any(|s| matches!(s, AccountSyncStatus::UpstreamFailure { .. }))
    }

    /// Accounts that produced nothing because of a failure, in account order.
    pub fn failed_accounts(&self) -> Vec<&str> {
        self.accounts.iter().filter(|(_, s)| s.is_failure()).map(|(a, _)| a.as_str()).collect()
    }

    pub fn status_for(&self, account: &str) -> Option<&AccountSyncStatus> {
        self.accounts.get(account)
    }
}
