// ABOUTME: HTTP client construction with connection pooling and timeout configuration
// ABOUTME: Builds the backend clients for plain calls, streaming calls and the reverse proxy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::environment::HttpClientConfig;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for token, session and plain message calls
#[must_use]
pub fn api_client(config: &HttpClientConfig) -> Client {
    create_client_with_timeout(config.timeout_secs, config.connect_timeout_secs)
}

/// Client for SSE replies
///
/// Only the connect phase is bounded; a reply may legitimately stream for
/// longer than any request timeout.
#[must_use]
pub fn streaming_client(config: &HttpClientConfig) -> Client {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client used by the reverse proxy to reach the upstream server
#[must_use]
pub fn proxy_client() -> Client {
    api_client(&HttpClientConfig::default())
}
