// Boundary trait for snapshot ingestion
use async_trait::async_trait;

/// Fetches one raw snapshot document from wherever the readings live.
/// The document is the nested JSON form described in the ingestion adapter;
/// flattening and validation happen behind this boundary, not inside it.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> anyhow::Result<serde_json::Value>;
}
