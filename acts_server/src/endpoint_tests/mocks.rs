use acts_engine::{
    db_types::{
        AccountCredential,
        CandidateDocument,
        HealthcheckEntry,
        NewCertificate,
        NewHealthcheckEntry,
        ReconciliationTarget,
        SetComparison,
        ValidatedOrder,
    },
    marketplace::{DateWindow, DocumentDescriptor, DocumentListing, DocumentSource, DownloadOutcome, MarketplaceError},
    traits::{CertificateManagement, HealthcheckManagement, ReconciliationManagement, StorageError, ValidatedOrderFilter},
};
use chrono::NaiveDate;
use mockall::mock;

mock! {
    pub OrderStore {}
    impl CertificateManagement for OrderStore {
        async fn insert_certificates(&self, records: &[NewCertificate]) -> Result<u64, StorageError>;
        async fn fetch_reconciliation_candidates(&self, date: NaiveDate, account: &str) -> Result<Vec<CandidateDocument>, StorageError>;
        async fn has_certificates_ingested_on(&self, date: NaiveDate) -> Result<bool, StorageError>;
    }
    impl ReconciliationManagement for OrderStore {
        async fn compare_order_sets(&self, target: &ReconciliationTarget) -> Result<SetComparison, StorageError>;
        async fn search_validated_orders(&self, filter: &ValidatedOrderFilter) -> Result<Vec<ValidatedOrder>, StorageError>;
    }
}

mock! {
    pub HealthcheckStore {}
    impl HealthcheckManagement for HealthcheckStore {
        async fn record_healthcheck(&self, entry: &NewHealthcheckEntry) -> Result<HealthcheckEntry, StorageError>;
        async fn fetch_healthcheck_statuses(&self) -> Result<Vec<HealthcheckEntry>, StorageError>;
    }
}

mock! {
    pub Source {}
    impl DocumentSource for Source {
        async fn list_documents(&self, credential: &AccountCredential, window: &DateWindow) -> Result<DocumentListing, MarketplaceError>;
        async fn download_all(&self, credential: &AccountCredential, documents: &[DocumentDescriptor]) -> Result<DownloadOutcome, MarketplaceError>;
    }
}

pub fn storage_failure(operation: &'static str) -> StorageError {
    StorageError::dependency_failure(operation, "database is locked")
}
