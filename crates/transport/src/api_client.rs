// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream control-plane HTTP client (spec §2 `APIClient`, §6 "APIClient
//! surface").
//!
//! The client owns its own retry loop per `retryAttempts`/`retryBackoff`;
//! callers (the step executor) never retry a call themselves. Grounded on
//! the teacher's `connect_with_retry` poll-with-backoff shape in
//! `crates/cli/src/client.rs`, ported from a blocking `std::thread::sleep`
//! loop to an async `tokio::time::sleep` one.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reconadapter_core::Value;

use crate::error::{ApiStatusError, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// Backoff shape between retry attempts. Mirrors
/// `reconadapter_recipe::BackoffKind` without creating a dependency from
/// this crate on the recipe crate — the step executor translates one into
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Exponential,
    Linear,
    Constant,
}

impl Backoff {
    fn delay(self, attempt: u32, base: Duration, max: Duration) -> Duration {
        let scaled = match self {
            Backoff::Exponential => base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX)),
            Backoff::Linear => base.saturating_mul(attempt.saturating_add(1)),
            Backoff::Constant => base,
        };
        scaled.min(max)
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Backoff,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            backoff: Backoff::Constant,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: IndexMap<String, String>,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an [`ApiStatusError`]; `Ok(self)` on 2xx.
    pub fn into_status_result(self) -> Result<Self, ApiStatusError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiStatusError {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}

/// Sends one request/response round trip, retrying transient failures
/// internally per [`RetryPolicy`].
#[async_trait]
pub trait APIClient: Send + Sync {
    async fn do_request(&self, req: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Shared retry-loop helper: drives `attempt` up to `policy.attempts` times,
/// sleeping between attempts per `policy.backoff`, and stops retrying the
/// moment `is_retryable` returns false.
pub async fn retrying<F, Fut, T>(
    policy: &RetryPolicy,
    mut is_retryable: impl FnMut(&TransportError) -> bool,
    mut attempt: F,
) -> Result<T, TransportError>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, TransportError>>,
{
    let mut last_err = TransportError::Fatal("retry policy ran zero attempts".to_string());
    for n in 0..policy.attempts.max(1) {
        match attempt(n).await {
            Ok(v) => return Ok(v),
            Err(e) if n + 1 < policy.attempts && is_retryable(&e) => {
                let delay = policy.backoff.delay(n, policy.base_delay, policy.max_delay);
                tokio::time::sleep(delay).await;
                last_err = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err)
}

#[cfg(test)]
#[path = "api_client_tests.rs"]
mod tests;
