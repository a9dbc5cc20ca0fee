//! Fan-Out Coordinator - concurrent dispatch with per-key correlation
//!
//! Runs one async operation per key on the tokio runtime and joins the
//! results back into maps keyed by the originating key, whatever order the
//! units finish in.

use crate::utils::error::{Error, Result};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What the coordinator does when a unit of work fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the first error; abort and ignore the remaining units
    #[serde(alias = "fail-fast")]
    FailFast,
    /// Await every unit and report failures next to the partial results
    #[default]
    #[serde(alias = "fail-soft")]
    FailSoft,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail_fast"),
            Self::FailSoft => write!(f, "fail_soft"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(Self::FailFast),
            "fail_soft" => Ok(Self::FailSoft),
            _ => Err(Error::config(format!("Invalid failure policy: {}", s))),
        }
    }
}

/// Configuration for the coordinator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    pub failure_policy: FailurePolicy,
    /// Upper bound on units in flight; `None` runs every unit at once
    pub max_concurrency: Option<usize>,
}

impl FanOutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Set concurrency limit
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency.max(1));
        self
    }
}

/// Joined results of one fan-out round.
///
/// Under fail-soft the key sets of `succeeded` and `failed` are disjoint and
/// together equal the dispatched key set.
#[derive(Debug)]
pub struct Dispatched<K, V> {
    pub succeeded: HashMap<K, V>,
    pub failed: HashMap<K, Error>,
    /// Wall-clock time from the first spawn to the last join
    pub elapsed: Duration,
}

impl<K, V> Dispatched<K, V> {
    /// Number of units that settled
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Concurrent executor that correlates results back to their keys
#[derive(Debug, Clone, Default)]
pub struct FanOutCoordinator {
    config: FanOutConfig,
    cancellation: Option<CancellationToken>,
}

impl FanOutCoordinator {
    pub fn new(config: FanOutConfig) -> Self {
        Self {
            config,
            cancellation: None,
        }
    }

    /// Units still in flight when `token` fires settle with `Error::Cancelled`
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &FanOutConfig {
        &self.config
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    /// Run `operation` once per distinct key, concurrently, and join the
    /// results by key.
    ///
    /// Returns only after every unit has settled, except under fail-fast
    /// where the first error is returned and the remaining units are
    /// aborted. Duplicate keys are dispatched once.
    pub async fn dispatch_all<K, V, F, Fut>(
        &self,
        items: impl IntoIterator<Item = K>,
        operation: F,
    ) -> Result<Dispatched<K, V>>
    where
        K: Eq + Hash + Clone + Send + 'static,
        V: Send + 'static,
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let start = Instant::now();

        let mut seen = HashSet::new();
        let keys: Vec<K> = items
            .into_iter()
            .filter(|key| seen.insert(key.clone()))
            .collect();
        let total = keys.len();

        debug!(
            units = total,
            policy = %self.config.failure_policy,
            max_concurrency = ?self.config.max_concurrency,
            "Dispatching fan-out round"
        );

        let operation = Arc::new(operation);
        let limiter = self
            .config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits)));
        let cancellation = self.cancellation.clone().unwrap_or_default();

        let mut units = JoinSet::new();
        for key in keys {
            let operation = Arc::clone(&operation);
            let limiter = limiter.clone();
            let cancellation = cancellation.clone();

            units.spawn(async move {
                let outcome = run_unit(key.clone(), operation, limiter, cancellation).await;
                (key, outcome)
            });
        }

        // Single writer: only this loop touches the result maps.
        let mut succeeded = HashMap::with_capacity(total);
        let mut failed = HashMap::new();

        while let Some(joined) = units.join_next().await {
            let (key, outcome) = joined.map_err(|e| {
                warn!(error = %e, "Fan-out unit was lost before reporting");
                Error::Internal(format!("Fan-out unit was lost: {}", e))
            })?;

            match outcome {
                Ok(value) => {
                    succeeded.insert(key, value);
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::FailFast => {
                        units.abort_all();
                        warn!(
                            error = %error,
                            settled = succeeded.len() + 1,
                            units = total,
                            "Fan-out round aborted on first failure"
                        );
                        return Err(error);
                    }
                    FailurePolicy::FailSoft => {
                        debug!(error = %error, "Fan-out unit failed");
                        failed.insert(key, error);
                    }
                },
            }
        }

        let elapsed = start.elapsed();
        info!(
            units = total,
            succeeded = succeeded.len(),
            failed = failed.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Fan-out round settled"
        );

        Ok(Dispatched {
            succeeded,
            failed,
            elapsed,
        })
    }
}

async fn run_unit<K, V, F, Fut>(
    key: K,
    operation: Arc<F>,
    limiter: Option<Arc<Semaphore>>,
    cancellation: CancellationToken,
) -> Result<V>
where
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<V>>,
{
    let work = async move {
        let _permit = match limiter {
            Some(limiter) => Some(
                limiter
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::Internal("Concurrency limiter closed".to_string()))?,
            ),
            None => None,
        };

        AssertUnwindSafe(async move { operation(key).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(Error::Internal(panic_message(payload))))
    };

    tokio::select! {
        biased;
        _ = cancellation.cancelled() => Err(Error::Cancelled),
        outcome = work => outcome,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("Unit of work panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("Unit of work panicked: {}", message)
    } else {
        "Unit of work panicked".to_string()
    }
}
