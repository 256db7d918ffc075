use assetdesk_guard::SanitizedQuery;
use async_trait::async_trait;

/// Runs guarded queries against the asset database.
///
/// Only a [`SanitizedQuery`] can be executed, so every statement that
/// reaches an implementation has passed the guard.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run the query and return one JSON object per row.
    async fn fetch_rows(&self, query: &SanitizedQuery) -> anyhow::Result<Vec<serde_json::Value>>;
}
