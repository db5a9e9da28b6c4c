// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};

#[tokio::test]
async fn retries_until_success() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy {
        attempts: 3,
        backoff: Backoff::Constant,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    };
    let result: Result<u32, TransportError> = retrying(
        &policy,
        |e| matches!(e, TransportError::Retryable(_)),
        |_n| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(TransportError::Retryable("not yet".to_string()))
                } else {
                    Ok(42)
                }
            }
        },
    )
    .await;
    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fatal_errors_stop_retrying_immediately() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy {
        attempts: 5,
        ..RetryPolicy::default()
    };
    let result: Result<u32, TransportError> = retrying(
        &policy,
        |e| matches!(e, TransportError::Retryable(_)),
        |_n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(TransportError::Fatal("nope".to_string())) }
        },
    )
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
