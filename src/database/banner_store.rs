//! Execution of compiled result queries against the store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::BannerRow;
use crate::query_builder::CompiledQuery;

/// Executes a compiled query and decodes every row
///
/// Rows are expected in projection order `(ip, port, service, content)`.
/// Implementations either return every row or fail; they never hand back a
/// partial result set.
#[async_trait]
pub trait BannerStore: Send + Sync + 'static {
    async fn fetch(&self, query: &CompiledQuery) -> Result<Vec<BannerRow>, StoreError>;
}

/// MySQL result store
#[derive(Debug, Clone)]
pub struct MySqlBannerStore {
    pool: MySqlPool,
}

impl MySqlBannerStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BannerStore for MySqlBannerStore {
    async fn fetch(&self, query: &CompiledQuery) -> Result<Vec<BannerRow>, StoreError> {
        let mut statement = sqlx::query(query.sql());
        for argument in query.arguments() {
            statement = statement.bind(argument.as_str());
        }

        // fetch_all acquires a pooled connection and returns it once the
        // result set is drained
        let rows = statement.fetch_all(&self.pool).await?;

        rows.iter()
            .enumerate()
            .map(|(index, row)| decode_row(index, row))
            .collect()
    }
}

fn decode_row(index: usize, row: &MySqlRow) -> Result<BannerRow, StoreError> {
    let decode_err = |column: usize| move |e: sqlx::Error| StoreError::decode(index, column, e.to_string());

    Ok(BannerRow {
        ip: row.try_get::<String, _>(0).map_err(decode_err(0))?,
        port: row.try_get::<u32, _>(1).map_err(decode_err(1))?,
        service: row.try_get::<String, _>(2).map_err(decode_err(2))?,
        content: row.try_get::<Vec<u8>, _>(3).map_err(decode_err(3))?,
    })
}

/// In-memory result store for tests and local development
///
/// Returns its configured rows for every query and records the compiled
/// queries it was handed. It does not evaluate the SQL.
#[derive(Debug, Default)]
pub struct InMemoryBannerStore {
    rows: Vec<BannerRow>,
    queries: RwLock<Vec<CompiledQuery>>,
    delay: Option<Duration>,
    failing: bool,
}

impl InMemoryBannerStore {
    pub fn new(rows: Vec<BannerRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every query as if the pool could not hand out a connection
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Compiled queries received so far
    pub async fn queries(&self) -> Vec<CompiledQuery> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl BannerStore for InMemoryBannerStore {
    async fn fetch(&self, query: &CompiledQuery) -> Result<Vec<BannerRow>, StoreError> {
        self.queries.write().await.push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(StoreError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(self.rows.clone())
    }
}
