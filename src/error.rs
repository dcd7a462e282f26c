// Typed error kinds for the chart engine
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A single record could not be turned into a reading. Recovered locally:
    /// the record is skipped and counted, aggregation continues.
    #[error("unparsable record: {0}")]
    Parse(String),

    /// Snapshot fetch failed. The last good data stays on screen; the error
    /// is surfaced through the status endpoint, never by clearing state.
    #[error("snapshot fetch failed: {0}")]
    Fetch(String),

    /// No buckets exist for the requested metric. Callers receive an explicit
    /// empty frame, not a panic or a 500.
    #[error("no data for metric '{0}'")]
    EmptyDataset(String),

    /// Zero-width value range. Auto-widened inside the scale mapper and
    /// never surfaced to callers.
    #[error("degenerate value domain at {0}")]
    DomainDegenerate(f64),
}
