//! The retry engine coordinating credential and model selection.
//!
//! One dispatch call runs a bounded number of outer attempts. Each attempt
//! binds one randomly picked credential and walks the model preference list
//! in order. Classification of each failure decides the next step: try the
//! next model on the same credential, abandon the credential, or abort.

use crate::classify::{classify, FailureKind};
use crate::models::ModelList;
use crate::pool::{Credential, CredentialPool};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use studyforge_core::{StudyError, StudyResult};
use tracing::{debug, info, warn};

/// Type alias for the injectable sleep function used in tests.
#[cfg(test)]
type SleepFn = Box<
    dyn Fn(u64) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> + Send + Sync,
>;

/// Configures retry behaviour across the credential pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Extra outer attempts after the first; `None` derives
    /// `max(3, pool size + 1)` so every credential gets a statistical
    /// chance under full rotation.
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Base delay in milliseconds for exponential backoff.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Maximum delay in milliseconds (cap for exponential backoff).
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_backoff_max_ms() -> u64 {
    30_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl RetryPolicy {
    /// The extra-attempt budget for a pool of the given size, never below 1.
    fn budget(&self, pool_size: usize) -> u32 {
        self.max_attempts
            .unwrap_or_else(|| 3.max(pool_size as u32 + 1))
            .max(1)
    }
}

/// Computes the backoff delay for a given attempt using exponential backoff
/// capped at `backoff_max_ms`.
fn compute_backoff(policy: &RetryPolicy, attempt: u32) -> u64 {
    let delay = policy
        .backoff_base_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    delay.min(policy.backoff_max_ms)
}

/// Executes caller-supplied generation closures robustly across the
/// credential pool and model list.
///
/// Attempts within one call are strictly sequential. The pool is shared
/// read-only, so concurrent dispatches need no locking; all counters and
/// timers are local to the call.
pub struct Dispatcher {
    pool: Arc<CredentialPool>,
    models: ModelList,
    policy: RetryPolicy,
    /// Injectable sleep function for testing (allows skipping real delays).
    #[cfg(test)]
    sleep_fn: Option<SleepFn>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given pool, model list, and policy.
    pub fn new(pool: Arc<CredentialPool>, models: ModelList, policy: RetryPolicy) -> Self {
        Self {
            pool,
            models,
            policy,
            #[cfg(test)]
            sleep_fn: None,
        }
    }

    /// The credential pool this dispatcher draws from.
    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Perform a sleep for the given duration in milliseconds.
    async fn do_sleep(&self, ms: u64) {
        #[cfg(test)]
        if let Some(ref f) = self.sleep_fn {
            f(ms).await;
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    ///
    /// Per failure class: model-unavailable advances to the next model on
    /// the same credential without consuming any delay; rate-limited and
    /// credential-invalid abandon the credential and back off before the
    /// next one; unknown errors propagate immediately. When every attempt
    /// is exhausted the last observed error is returned, never a
    /// success-shaped empty value.
    pub async fn dispatch<T, F, Fut>(&self, op: F) -> StudyResult<T>
    where
        F: Fn(Credential, String) -> Fut,
        Fut: Future<Output = StudyResult<T>>,
    {
        let budget = self.policy.budget(self.pool.len());
        let mut last_err: Option<StudyError> = None;

        for attempt in 0..=budget {
            let credential = self.pool.pick();
            let mut abandoned = false;

            for model in self.models.iter() {
                match op(credential.clone(), model.to_string()).await {
                    Ok(value) => return Ok(value),
                    Err(e) => match classify(&e) {
                        FailureKind::ModelUnavailable => {
                            debug!(attempt, model, error = %e, "model unavailable, trying next");
                            last_err = Some(e);
                        }
                        FailureKind::RateLimited | FailureKind::CredentialInvalid => {
                            info!(
                                attempt,
                                model,
                                credential = %credential,
                                error = %e,
                                "abandoning credential"
                            );
                            last_err = Some(e);
                            abandoned = true;
                            break;
                        }
                        FailureKind::Unknown => {
                            warn!(attempt, model, error = %e, "fatal error, aborting retries");
                            return Err(e);
                        }
                    },
                }
            }

            // Model-list exhaustion switches credentials immediately; only a
            // busy/invalid credential consumes backoff delay.
            if abandoned && attempt < budget {
                let delay = compute_backoff(&self.policy, attempt);
                info!(attempt, delay_ms = delay, "backing off before next credential");
                self.do_sleep(delay).await;
            }
        }

        Err(last_err
            .unwrap_or_else(|| StudyError::Config("dispatch ran with no models to try".into())))
    }
}
