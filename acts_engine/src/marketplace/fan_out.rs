use std::{collections::HashMap, panic::AssertUnwindSafe};

use futures::{future::join_all, FutureExt};
use log::*;

use super::{AccountDocuments, DateWindow, DocumentSource, DownloadOutcome, MarketplaceError};
use crate::db_types::AccountCredential;

/// Per-account fetch results. An `Err` entry means nothing usable came back for that account.
pub type FanOutResult = HashMap<String, Result<DownloadOutcome, MarketplaceError>>;

/// Fetches the certificates of every account concurrently.
///
/// Each account's pipeline runs to completion or failure independently: errors and panics are captured per account,
/// logged, and recorded against that account alone. The keys of the result are exactly the input account ids.
pub async fn fetch_all<S: DocumentSource>(
    source: &S,
    accounts: &[AccountCredential],
    window: &DateWindow,
) -> FanOutResult {
    info!("🌐️ Fetching certificates for {} accounts", accounts.len());
    let fetches = accounts.iter().map(|credential| {
        let pipeline = AccountDocuments::new(credential, source);
        async move {
            let account = pipeline.account_id().to_string();
            let outcome = match AssertUnwindSafe(pipeline.download(window)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => Err(MarketplaceError::TaskPanicked(account.clone())),
            };
            match &outcome {
                Ok(DownloadOutcome::Payload(p)) => debug!("🌐️ {account}: received {} bytes of certificates", p.len()),
                Ok(DownloadOutcome::NoData) => info!("🌐️ {account}: no certificates"),
                Ok(DownloadOutcome::UpstreamFailure(status)) => {
                    error!("🌐️ {account}: the marketplace API is failing (HTTP {status})")
                },
                Err(e) => error!("🌐️ {account}: certificate fetch failed. {e}"),
            }
            (account, outcome)
        }
    });
    join_all(fetches).await.into_iter().collect()
}
