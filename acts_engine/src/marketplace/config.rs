use std::time::Duration;

use acts_common::env_or_default;

pub const DEFAULT_MARKETPLACE_URL: &str = "https://documents-api.wildberries.ru/api/v1/documents";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_RETRIES: u32 = 8;
const DEFAULT_RETRY_DELAY_SECS: u64 = 61;
const DEFAULT_RATE_LIMIT_COOLDOWN_SECS: u64 = 300;
const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// The documents API root. Endpoint paths (`/list`, `/download/all`) are appended to it.
    pub base_url: String,
    /// Total timeout for a single request.
    pub timeout: Duration,
    /// The most attempts made for one request, counting the first.
    pub retries: u32,
    /// Wait between attempts after a connection failure or timeout.
    pub retry_delay: Duration,
    /// Wait after the API answers 429 Too Many Requests.
    pub rate_limit_cooldown: Duration,
    pub max_idle_connections: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKETPLACE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            rate_limit_cooldown: Duration::from_secs(DEFAULT_RATE_LIMIT_COOLDOWN_SECS),
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
        }
    }
}

impl MarketplaceConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = env_or_default("ACTS_MARKETPLACE_URL", DEFAULT_MARKETPLACE_URL.to_string());
        let timeout = Duration::from_secs(env_or_default("ACTS_HTTP_TIMEOUT", DEFAULT_TIMEOUT_SECS));
        let retries = env_or_default("ACTS_HTTP_RETRIES", DEFAULT_RETRIES).max(1);
        let retry_delay = Duration::from_secs(env_or_default("ACTS_HTTP_RETRY_DELAY", DEFAULT_RETRY_DELAY_SECS));
        let rate_limit_cooldown =
            Duration::from_secs(env_or_default("ACTS_RATE_LIMIT_COOLDOWN", DEFAULT_RATE_LIMIT_COOLDOWN_SECS));
        let max_idle_connections = env_or_default("ACTS_HTTP_MAX_IDLE_CONNECTIONS", DEFAULT_MAX_IDLE_CONNECTIONS);
        Self { base_url, timeout, retries, retry_delay, rate_limit_cooldown, max_idle_connections }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    pub fn with_delays(mut self, retry_delay: Duration, rate_limit_cooldown: Duration) -> Self {
        self.retry_delay = retry_delay;
        self.rate_limit_cooldown = rate_limit_cooldown;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
