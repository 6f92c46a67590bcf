use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::BannerStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{Banner, FilterCriteria};
use crate::query_builder::compile;

/// Filtered scan result queries
///
/// Compiles criteria, runs the query through the [`BannerStore`] and encodes
/// each row for API callers. Failures are returned as-is; nothing is retried.
#[derive(Clone)]
pub struct ResultRepository {
    store: Arc<dyn BannerStore>,
}

impl std::fmt::Debug for ResultRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultRepository").finish_non_exhaustive()
    }
}

impl ResultRepository {
    pub fn new(store: Arc<dyn BannerStore>) -> Self {
        Self { store }
    }

    pub async fn query(&self, criteria: &FilterCriteria) -> StoreResult<Vec<Banner>> {
        let compiled = compile(criteria);
        debug!(
            sql = %compiled.sql(),
            argument_count = compiled.arguments().len(),
            "Executing result query"
        );

        let rows = self.store.fetch(&compiled).await?;
        Ok(rows.into_iter().map(Banner::from).collect())
    }

    /// Like [`query`](Self::query), failing with [`StoreError::Timeout`]
    /// once `deadline` elapses
    pub async fn query_with_deadline(
        &self,
        criteria: &FilterCriteria,
        deadline: Duration,
    ) -> StoreResult<Vec<Banner>> {
        tokio::time::timeout(deadline, self.query(criteria))
            .await
            .map_err(|_| StoreError::Timeout {
                timeout_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}
