use chrono::NaiveDate;

use crate::{
    db_types::{CandidateDocument, NewCertificate},
    traits::StorageError,
};

#[allow(async_fn_in_trait)]
pub trait CertificateManagement {
    /// Stores the certificate lines in a single transaction. Lines whose natural key
    /// `(order_id, document_number, account_id)` is already stored are skipped silently.
    ///
    /// Returns the number of lines actually inserted.
    async fn insert_certificates(&self, records: &[NewCertificate]) -> Result<u64, StorageError>;

    /// The distinct certificate documents dated `date` for `account`.
    async fn fetch_reconciliation_candidates(
        &self,
        date: NaiveDate,
        account: &str,
    ) -> Result<Vec<CandidateDocument>, StorageError>;

    /// True if at least one certificate line was ingested on `date`.
    async fn has_certificates_ingested_on(&self, date: NaiveDate) -> Result<bool, StorageError>;
}
