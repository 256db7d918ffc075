use anyhow::Context;
use assetdesk_chat::QueryExecutor;
use assetdesk_core::DatabaseConfig;
use assetdesk_guard::{SanitizedQuery, MAX_ROW_LIMIT};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PostgresExecutorOptions {
    /// Server-side bound on a single statement.
    pub statement_timeout_ms: u64,
    /// Rows returned at most, whatever the statement's own LIMIT says.
    pub max_rows: u64,
}

impl Default for PostgresExecutorOptions {
    fn default() -> Self {
        Self {
            statement_timeout_ms: 5000,
            max_rows: MAX_ROW_LIMIT,
        }
    }
}

/// Runs sanitized queries in read-only transactions.
pub struct PostgresExecutor {
    pool: sqlx::PgPool,
    options: PostgresExecutorOptions,
}

impl PostgresExecutor {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        options: PostgresExecutorOptions,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool, options })
    }

    /// Connect using the `database` section of the configuration.
    pub async fn from_config(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let url = config.resolve_url().with_context(|| {
            format!("no database URL configured (set database.url or ${})", config.url_env)
        })?;
        let options = PostgresExecutorOptions {
            statement_timeout_ms: config.statement_timeout_ms,
            ..Default::default()
        };
        Self::new(&url, config.max_connections, options).await
    }

    pub fn from_pool(pool: sqlx::PgPool, options: PostgresExecutorOptions) -> Self {
        Self { pool, options }
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn fetch_rows(&self, query: &SanitizedQuery) -> anyhow::Result<Vec<serde_json::Value>> {
        let sql = wrap_query(query.as_str(), self.options.max_rows);
        debug!(sql = %sql, "Executing guarded query");

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;
        sqlx::query(&statement_timeout(self.options.statement_timeout_ms))
            .execute(&mut *tx)
            .await?;

        let recs = sqlx::query(&sql).fetch_all(&mut *tx).await?;
        let mut rows = Vec::with_capacity(recs.len());
        for r in recs {
            rows.push(r.try_get::<serde_json::Value, _>("row")?);
        }

        tx.rollback().await?;
        Ok(rows)
    }
}

/// Wrap a query so each row comes back as one JSON object, with an outer
/// row cap.
fn wrap_query(sql: &str, max_rows: u64) -> String {
    format!("SELECT to_jsonb(t) AS row FROM ({}) AS t LIMIT {}", sql, max_rows)
}

/// `SET` does not take bind parameters; the value is an integer.
fn statement_timeout(ms: u64) -> String {
    format!("SET LOCAL statement_timeout = {}", ms)
}
