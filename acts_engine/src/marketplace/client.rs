use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
    RequestBuilder,
    StatusCode,
};
use serde::de::DeserializeOwned;

use super::{
    objects::DOCUMENT_LOCALE,
    DateWindow,
    DocumentDescriptor,
    DocumentListResponse,
    DocumentListing,
    DocumentSource,
    DownloadOutcome,
    DownloadRequest,
    DownloadResponse,
    MarketplaceConfig,
    MarketplaceError,
    DOCUMENT_CATEGORY,
};
use crate::db_types::AccountCredential;

const LIST_PATH: &str = "/list";
const DOWNLOAD_PATH: &str = "/download/all";

enum Reply<T> {
    Body(T),
    UpstreamFailure(u16),
}

/// HTTP client for the marketplace documents API.
///
/// Every request is retried according to the [`MarketplaceConfig`]:
/// * connection failures, disconnects and timeouts wait `retry_delay` and try again,
/// * `429 Too Many Requests` waits `rate_limit_cooldown` and tries again,
/// * `500 Internal Server Error` is reported as an upstream failure straight away,
/// * any other non-success status is an error.
///
/// All retries count against the same `retries` ceiling.
#[derive(Clone)]
pub struct MarketplaceClient {
    config: MarketplaceConfig,
    client: Arc<Client>,
}

impl MarketplaceClient {
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_connections)
            .build()
            .map_err(|e| MarketplaceError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorization(credential: &AccountCredential) -> Result<HeaderValue, MarketplaceError> {
        let mut value = HeaderValue::from_str(credential.token.reveal().as_str()).map_err(|e| {
            MarketplaceError::Initialization(format!("The token for {credential} is not a valid header value. {e}"))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    async fn send_with_retry<T, F>(&self, endpoint: &str, build_request: F) -> Result<Reply<T>, MarketplaceError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let max_attempts = self.config.retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = match build_request().send().await {
                Ok(response) => response,
                Err(e) if is_connection_error(&e) => {
                    self.wait_after_connection_error(endpoint, attempt, max_attempts, e).await?;
                    continue;
                },
                Err(e) => {
                    return Err(MarketplaceError::Transport { endpoint: endpoint.to_string(), message: e.to_string() })
                },
            };
            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= max_attempts {
                    error!("🌐️ {endpoint} is still rate limiting after {attempt} attempts. Giving up.");
                    return Err(MarketplaceError::RateLimited { endpoint: endpoint.to_string(), attempts: attempt });
                }
                warn!(
                    "🌐️ {endpoint} is rate limiting (attempt {attempt}/{max_attempts}). Cooling down for {}s.",
                    self.config.rate_limit_cooldown.as_secs()
                );
                tokio::time::sleep(self.config.rate_limit_cooldown).await;
                continue;
            }
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!("🌐️ {endpoint} answered with an internal server error. Not retrying.");
                return Ok(Reply::UpstreamFailure(status.as_u16()));
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(MarketplaceError::Status {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    message,
                });
            }
            trace!("🌐️ {endpoint} answered {status}");
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) if is_connection_error(&e) => {
                    self.wait_after_connection_error(endpoint, attempt, max_attempts, e).await?;
                    continue;
                },
                Err(e) => {
                    return Err(MarketplaceError::Transport { endpoint: endpoint.to_string(), message: e.to_string() })
                },
            };
            return serde_json::from_slice::<T>(&body)
                .map(Reply::Body)
                .map_err(|e| MarketplaceError::Decode { endpoint: endpoint.to_string(), message: e.to_string() });
        }
    }

    /// Sleeps for `retry_delay` if there are attempts left, otherwise gives up.
    async fn wait_after_connection_error(
        &self,
        endpoint: &str,
        attempt: u32,
        max_attempts: u32,
        e: reqwest::Error,
    ) -> Result<(), MarketplaceError> {
        if attempt >= max_attempts {
            error!("🌐️ {endpoint} is unreachable. Giving up after {attempt} attempts. {e}");
            return Err(MarketplaceError::RetriesExhausted {
                endpoint: endpoint.to_string(),
                attempts: attempt,
                last_error: e.to_string(),
            });
        }
        warn!(
            "🌐️ Attempt {attempt}/{max_attempts} to reach {endpoint} failed. Retrying in {}s. {e}",
            self.config.retry_delay.as_secs()
        );
        tokio::time::sleep(self.config.retry_delay).await;
        Ok(())
    }
}

/// Anything that went wrong on the wire before a complete response arrived: refused or reset connections, server
/// disconnects, timeouts and truncated bodies.
fn is_connection_error(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
}

impl DocumentSource for MarketplaceClient {
    async fn list_documents(
        &self,
        credential: &AccountCredential,
        window: &DateWindow,
    ) -> Result<DocumentListing, MarketplaceError> {
        let authorization = Self::authorization(credential)?;
        let url = self.url(LIST_PATH);
        let (begin, end) = (window.begin_param(), window.end_param());
        debug!("🌐️ Listing certificates for {credential} from {begin} to {end}");
        let reply = self
            .send_with_retry::<DocumentListResponse, _>(LIST_PATH, || {
                self.client.get(&url).header(AUTHORIZATION, authorization.clone()).query(&[
                    ("locale", DOCUMENT_LOCALE),
                    ("beginTime", begin.as_str()),
                    ("endTime", end.as_str()),
                    ("category", DOCUMENT_CATEGORY),
                ])
            })
            .await?;
        match reply {
            Reply::Body(body) => Ok(DocumentListing::Documents(body.into_descriptors())),
            Reply::UpstreamFailure(status) => Ok(DocumentListing::UpstreamFailure(status)),
        }
    }

    async fn download_all(
        &self,
        credential: &AccountCredential,
        documents: &[DocumentDescriptor],
    ) -> Result<DownloadOutcome, MarketplaceError> {
        if documents.is_empty() {
            return Ok(DownloadOutcome::NoData);
        }
        let authorization = Self::authorization(credential)?;
        let url = self.url(DOWNLOAD_PATH);
        let body = DownloadRequest::for_documents(documents);
        debug!("🌐️ Downloading {} certificates for {credential}", documents.len());
        let reply = self
            .send_with_retry::<DownloadResponse, _>(DOWNLOAD_PATH, || {
                self.client.post(&url).header(AUTHORIZATION, authorization.clone()).json(&body)
            })
            .await?;
        match reply {
            Reply::Body(body) => match body.into_document() {
                Some(document) => Ok(DownloadOutcome::Payload(document)),
                None => {
                    warn!("🌐️ The certificate download for {credential} came back empty");
                    Ok(DownloadOutcome::NoData)
                },
            },
            Reply::UpstreamFailure(status) => Ok(DownloadOutcome::UpstreamFailure(status)),
        }
    }
}
