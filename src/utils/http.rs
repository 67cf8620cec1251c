use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::collections::HashMap;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::RetryPolicy;
use crate::error::{AttemptFailure, FetchError};

pub fn create_client(user_agent: &str) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .pool_max_idle_per_host(2)
        .build()?;

    Ok(client)
}

/// Turn configured header pairs into a header map, dropping invalid entries.
pub fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!("Ignoring invalid request header {:?}", name),
        }
    }
    map
}

/// What a fetch attempt is aimed at.
#[derive(Debug, Clone)]
pub struct Target {
    pub url: String,
    pub headers: HeaderMap,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Success predicate for listing pages: exactly HTTP 200.
pub fn require_status_ok(response: &FetchedResponse) -> Result<(), String> {
    if response.status == StatusCode::OK {
        Ok(())
    } else {
        Err(format!("server error - status: {}", response.status))
    }
}

/// Retry-with-fixed-backoff HTTP GET shared by every network call site.
///
/// Transport faults and predicate rejections are both retried. The caller
/// only ever sees the accepted response or a `FetchError::Exhausted`.
#[derive(Debug, Clone)]
pub struct ResilientFetcher {
    client: Client,
}

impl ResilientFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch<P>(
        &self,
        target: &Target,
        policy: &RetryPolicy,
        is_success: P,
    ) -> Result<FetchedResponse, FetchError>
    where
        P: Fn(&FetchedResponse) -> Result<(), String>,
    {
        let max_attempts = policy.max_attempts.max(1);
        let mut last_failure = AttemptFailure::Transport("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            info!("[{}/{}] fetching {}", attempt, max_attempts, target.url);

            match self.attempt(target, policy).await {
                Ok(response) => match is_success(&response) {
                    Ok(()) => return Ok(response),
                    Err(reason) => {
                        warn!("[{}/{}] {} - {}", attempt, max_attempts, target.url, reason);
                        last_failure = AttemptFailure::Rejected(reason);
                    }
                },
                Err(failure) => {
                    warn!("[{}/{}] request failed: {}", attempt, max_attempts, failure);
                    last_failure = failure;
                }
            }

            if attempt < max_attempts {
                sleep(policy.backoff()).await;
            }
        }

        error!("Failed to fetch {} after {} attempts", target.url, max_attempts);
        Err(FetchError::Exhausted {
            target: target.url.clone(),
            attempts: max_attempts,
            last: last_failure,
        })
    }

    async fn attempt(
        &self,
        target: &Target,
        policy: &RetryPolicy,
    ) -> Result<FetchedResponse, AttemptFailure> {
        let response = self
            .client
            .get(&target.url)
            .headers(target.headers.clone())
            .timeout(policy.timeout())
            .send()
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Transport(e.to_string()))?;

        Ok(FetchedResponse { status, body })
    }
}
