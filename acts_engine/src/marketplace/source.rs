use log::*;

use super::{DateWindow, DocumentDescriptor, DocumentListing, DownloadOutcome, MarketplaceError};
use crate::db_types::AccountCredential;

/// Anything that can produce certificate archives for a seller account.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Lists the certificates issued to the account within `window`.
    async fn list_documents(
        &self,
        credential: &AccountCredential,
        window: &DateWindow,
    ) -> Result<DocumentListing, MarketplaceError>;

    /// Downloads all of `documents` as a single base64 encoded archive.
    async fn download_all(
        &self,
        credential: &AccountCredential,
        documents: &[DocumentDescriptor],
    ) -> Result<DownloadOutcome, MarketplaceError>;

    /// Lists and then downloads the account's certificates. An empty listing short-circuits to
    /// [`DownloadOutcome::NoData`] without calling the download endpoint.
    async fn fetch_documents(
        &self,
        credential: &AccountCredential,
        window: &DateWindow,
    ) -> Result<DownloadOutcome, MarketplaceError> {
        match self.list_documents(credential, window).await? {
            DocumentListing::UpstreamFailure(status) => Ok(DownloadOutcome::UpstreamFailure(status)),
            DocumentListing::Documents(documents) if documents.is_empty() => {
                info!("🌐️ No certificates were issued to {credential} between {} and {}", window.begin, window.end);
                Ok(DownloadOutcome::NoData)
            },
            DocumentListing::Documents(documents) => {
                debug!("🌐️ {} certificates listed for {credential}. Downloading.", documents.len());
                self.download_all(credential, &documents).await
            },
        }
    }
}

/// One account's view of a [`DocumentSource`]: the credential together with the source it fetches through.
pub struct AccountDocuments<'a, S> {
    credential: &'a AccountCredential,
    source: &'a S,
}

impl<'a, S: DocumentSource> AccountDocuments<'a, S> {
    pub fn new(credential: &'a AccountCredential, source: &'a S) -> Self {
        Self { credential, source }
    }

    pub fn account_id(&self) -> &str {
        self.credential.account_id.as_str()
    }

    pub async fn download(&self, window: &DateWindow) -> Result<DownloadOutcome, MarketplaceError> {
        self.source.fetch_documents(self.credential, window).await
    }
}
