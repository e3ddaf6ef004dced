use std::future::Future;
use std::time::Duration;

use crate::core::errors::ApiError;

const BASE_BACKOFF: Duration = Duration::from_millis(250);

/// Timeout and retry settings for one external collaborator.
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl CallPolicy {
    pub fn new(timeout_secs: u64, max_retries: u32) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
        }
    }
}

/// Runs `call` under the policy's deadline.
///
/// A call that outlives the deadline becomes `ApiError::UpstreamTimeout`.
/// `ApiError::Upstream` failures are retried up to `max_retries` times with
/// exponential backoff; every other error is returned as-is.
pub async fn call_with_policy<T, F, Fut>(
    service: &str,
    policy: CallPolicy,
    mut call: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt: u32 = 0;
    loop {
        let result = match tokio::time::timeout(policy.timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::UpstreamTimeout(format!(
                "{} did not respond within {}s",
                service,
                policy.timeout.as_secs_f32()
            ))),
        };

        match result {
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                let backoff = BASE_BACKOFF * 2u32.saturating_pow(attempt);
                attempt += 1;
                tracing::warn!(
                    "{} call failed (attempt {}/{}), retrying in {:?}: {}",
                    service,
                    attempt,
                    policy.max_retries + 1,
                    backoff,
                    err
                );
                tokio::time::sleep(backoff).await;
            }
            other => return other,
        }
    }
}
