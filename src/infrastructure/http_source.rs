// HTTP snapshot source implementation
use crate::application::snapshot_source::SnapshotSource;
use anyhow::Context;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self) -> anyhow::Result<serde_json::Value> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send snapshot request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("snapshot fetch failed with status {}: {}", status, body);
        }

        response
            .json::<serde_json::Value>()
            .await
            .context("Failed to parse snapshot response")
    }
}
