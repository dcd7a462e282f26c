// Fixed-interval snapshot ingestion loop
use crate::application::aggregator::DailyAggregator;
use crate::application::snapshot_source::SnapshotSource;
use crate::error::ChartError;
use crate::infrastructure::snapshot::SnapshotFlattener;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Poll health, surfaced via the status endpoint so a host UI can show a
/// non-fatal banner instead of losing the chart.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollStatus {
    pub polls: u64,
    pub accepted_total: u64,
    pub dropped_total: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Run the ingestion loop forever.
///
/// Ticks fire at the configured interval; a tick that lands while the
/// previous fetch is still in flight is skipped rather than queued. A failed
/// fetch records the error and leaves the last good data untouched. The
/// flattener lives across ticks: the feed re-delivers the full document
/// every poll, and only readings it has not delivered before may reach the
/// append-only buckets.
pub async fn run_poller(
    source: Arc<dyn SnapshotSource>,
    aggregator: Arc<RwLock<DailyAggregator>>,
    status: Arc<RwLock<PollStatus>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut flattener = SnapshotFlattener::new();

    loop {
        ticker.tick().await;
        poll_once(&source, &aggregator, &status, &mut flattener).await;
    }
}

async fn poll_once(
    source: &Arc<dyn SnapshotSource>,
    aggregator: &Arc<RwLock<DailyAggregator>>,
    status: &Arc<RwLock<PollStatus>>,
    flattener: &mut SnapshotFlattener,
) {
    let document = match source.fetch_snapshot().await {
        Ok(document) => document,
        Err(e) => {
            let error = ChartError::Fetch(format!("{e:#}"));
            tracing::warn!("{}, keeping last good data", error);
            let mut status = status.write().await;
            status.polls += 1;
            status.last_error = Some(error.to_string());
            return;
        }
    };

    let flat = flattener.flatten(&document);
    let dropped = flat.dropped;
    let accepted = aggregator.write().await.ingest(flat.readings);

    let mut status = status.write().await;
    status.polls += 1;
    status.accepted_total += accepted as u64;
    status.dropped_total += dropped as u64;
    status.last_success = Some(Utc::now());
    status.last_error = None;

    tracing::debug!(accepted, dropped, "snapshot ingested");
}
