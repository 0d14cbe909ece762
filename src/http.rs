//! Outbound HTTP client construction

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::{ExplorerError, Result};

const USER_AGENT: &str = concat!("PunoExplorer/", env!("CARGO_PKG_VERSION"));

/// Build a provider client with a fixed per-request timeout.
///
/// `max_retries` transient failures (connect errors, timeouts, 5xx, 429) are
/// retried with exponential backoff; zero disables retrying.
pub fn provider_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ExplorerError::config(format!("Failed to create HTTP client: {e}")))?;

    let mut builder = ClientBuilder::new(client);
    if max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}
