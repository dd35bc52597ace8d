use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;

use crate::{
    acts_api::{
        errors::SyncError,
        sync_objects::{AccountSyncStatus, SyncReport},
    },
    archive::{ArchiveExtractor, ExtractedDocument, ExtractionLimits},
    db_types::{document_filename_for, document_number_from_supply_id, AccountCredential, NewCertificate},
    marketplace::{fetch_all, DateWindow, DocumentSource, DownloadOutcome},
    traits::CertificateManagement,
};

/// `CertificateSyncApi` pulls certificates from the marketplace for every account, parses them and stores the lines.
///
/// One account failing never stops the others. Whatever rows were collected are written in a single storage call;
/// a storage failure is the only error the sync itself reports.
pub struct CertificateSyncApi<B, S> {
    db: B,
    source: S,
    extractor: ArchiveExtractor,
}

impl<B: Debug, S> Debug for CertificateSyncApi<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CertificateSyncApi ({:?})", self.db)
    }
}

impl<B, S> CertificateSyncApi<B, S> {
    pub fn new(db: B, source: S) -> Self {
        Self { db, source, extractor: ArchiveExtractor::default() }
    }

    pub fn with_limits(mut self, limits: ExtractionLimits) -> Self {
        self.extractor = ArchiveExtractor::new(limits);
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<B, S> CertificateSyncApi<B, S>
where
    B: CertificateManagement,
    S: DocumentSource,
{
    /// Syncs the certificates issued on the day before `run_date`. Lines are stamped as ingested on `run_date`.
    pub async fn sync_update_certificates(
        &self,
        accounts: &[AccountCredential],
        run_date: NaiveDate,
    ) -> Result<SyncReport, SyncError> {
        self.sync_window(accounts, &DateWindow::yesterday(run_date), run_date).await
    }

    pub async fn sync_window(
        &self,
        accounts: &[AccountCredential],
        window: &DateWindow,
        ingested_date: NaiveDate,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        if accounts.is_empty() {
            warn!("🔄️ No accounts are configured. There is nothing to sync.");
            return Ok(report);
        }
        info!("🔄️ Syncing certificates from {} to {} for {} accounts", window.begin, window.end, accounts.len());
        let fetched = fetch_all(&self.source, accounts, window).await;
        let mut records = Vec::new();
        for (account, outcome) in fetched {
            if !accounts.iter().any(|c| c.account_id == account) {
                warn!("🔄️ Ignoring certificates for {account}, which is not a configured account");
                continue;
            }
            let status = match outcome {
                Ok(DownloadOutcome::Payload(payload)) => match self.unpack(&payload).await {
                    Ok(documents) => {
                        let rows = certificate_records(&account, &documents, ingested_date);
                        let status = AccountSyncStatus::Ingested { documents: documents.len(), records: rows.len() };
                        info!("🔄️ {account}: parsed {} lines from {} certificates", rows.len(), documents.len());
                        records.extend(rows);
                        status
                    },
                    Err(reason) => {
                        error!("🔄️ {account}: the certificate archive could not be read. {reason}");
                        AccountSyncStatus::ParseFailed { reason }
                    },
                },
                Ok(DownloadOutcome::NoData) => AccountSyncStatus::NoData,
                Ok(DownloadOutcome::UpstreamFailure(code)) => AccountSyncStatus::UpstreamFailure { code },
                Err(e) => AccountSyncStatus::FetchFailed { reason: e.to_string() },
            };
            report.accounts.insert(account, status);
        }
        report.records_submitted = records.len();
        if records.is_empty() {
            info!("🔄️ No certificate lines were collected");
            return Ok(report);
        }
        report.records_inserted = self.db.insert_certificates(&records).await.map_err(|e| {
            error!("🔄️ {} certificate lines could not be stored. {e}", records.len());
            SyncError::Storage(e)
        })?;
        info!(
            "🔄️ Sync complete. {} of {} certificate lines were new",
            report.records_inserted, report.records_submitted
        );
        Ok(report)
    }

    /// Decodes and extracts one account's archive. Extraction is CPU bound, so it runs on the blocking pool.
    async fn unpack(&self, payload: &str) -> Result<Vec<ExtractedDocument>, String> {
        let bytes = base64::decode(payload.trim()).map_err(|e| format!("Invalid base64 payload. {e}"))?;
        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| format!("Archive extraction was aborted. {e}"))?
            .map_err(|e| e.to_string())
    }
}

/// Flattens parsed documents into storable certificate lines for `account`.
pub fn certificate_records(
    account: &str,
    documents: &[ExtractedDocument],
    ingested_date: NaiveDate,
) -> Vec<NewCertificate> {
    documents
        .iter()
        .flat_map(|doc| {
            let document_number = document_number_from_supply_id(&doc.supply_id).to_string();
            let document_filename = document_filename_for(&document_number);
            doc.rows.iter().map(move |row| NewCertificate {
                order_id: row.order_id.to_string(),
                sticker_id: row.sticker.to_string(),
                unit_count: row.count,
                document_filename: document_filename.clone(),
                document_number: document_number.clone(),
                document_date: doc.document_date,
                account_id: account.to_string(),
                ingested_date,
            })
        })
        .collect()
}
