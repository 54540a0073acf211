//! Transactional, retried statement execution.

use crate::pool::DatabasePoolInterface;
use futures::future::BoxFuture;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tabula_config::RetryConfig;
use tabula_core::{TabulaError, TabulaResult};
use tabula_resilience::retry::RetryPolicy;
use tracing::{debug, warn};

/// Builds the executor's retry policy from configuration.
#[must_use]
pub fn retry_policy_from_config(config: &RetryConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.max_attempts,
        initial_delay: config.delay(),
        max_delay: config.max_delay(),
        multiplier: config.multiplier,
        jitter: false,
    }
}

/// Runs units of work inside one transaction per attempt.
///
/// Each attempt acquires a connection, begins a transaction, runs the work,
/// and commits. A failed attempt is rolled back; a dropped transaction rolls
/// back on its own. Failures classified as retriable by
/// [`TabulaError::is_retriable`] are retried under the policy.
#[derive(Clone)]
pub struct TransactionalExecutor {
    pool: Arc<dyn DatabasePoolInterface>,
    policy: RetryPolicy,
}

impl TransactionalExecutor {
    /// Creates an executor with the default policy (3 attempts, 100 ms apart).
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self::with_policy(pool, RetryPolicy::default())
    }

    #[must_use]
    pub fn with_policy(pool: Arc<dyn DatabasePoolInterface>, policy: RetryPolicy) -> Self {
        Self { pool, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<dyn DatabasePoolInterface> {
        &self.pool
    }

    /// Runs `work` transactionally, retrying transient failures.
    ///
    /// `work` is invoked once per attempt and must be repeatable.
    pub async fn run<T, F>(&self, operation: &str, work: F) -> TabulaResult<T>
    where
        T: Send,
        F: for<'c> Fn(&'c mut SqliteConnection) -> BoxFuture<'c, TabulaResult<T>> + Send + Sync,
    {
        self.policy
            .execute_if(|| self.attempt(operation, &work), TabulaError::is_retriable)
            .await
    }

    async fn attempt<T, F>(&self, operation: &str, work: &F) -> TabulaResult<T>
    where
        F: for<'c> Fn(&'c mut SqliteConnection) -> BoxFuture<'c, TabulaResult<T>>,
    {
        debug!(operation, "Beginning transaction");
        let mut tx = self.pool.inner().begin().await?;

        let outcome = work(&mut *tx).await;
        match outcome {
            Ok(value) => {
                tx.commit().await?;
                debug!(operation, "Transaction committed");
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(operation, error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for TransactionalExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalExecutor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
