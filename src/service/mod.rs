//! Engines: stateless policy over the stores.
//!
//! - `auth.rs`: authentication, token lifecycle, account CRUD policy
//! - `credential.rs`: ownership + role checks for credential CRUD

pub mod auth;
pub mod credential;

pub use auth::AuthEngine;
pub use credential::CredentialEngine;

use crate::error::{IsRetryable, LockboxError};
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::warn;

fn store_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(250))
        .with_max_times(5)
        .with_jitter()
}

/// Run a store mutation, retrying transient contention with backoff.
/// Non-transient failures (constraint violations, fatal store errors)
/// propagate on the first occurrence.
pub(crate) async fn with_store_retry<T, F, Fut>(op: F) -> Result<T, LockboxError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LockboxError>>,
{
    op.retry(store_retry_policy())
        .when(|e: &LockboxError| e.is_retryable())
        .notify(|err, dur: Duration| {
            warn!(error = %err, "store busy, retrying after {:?}", dur);
        })
        .await
}
