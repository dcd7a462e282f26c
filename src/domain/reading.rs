// Raw reading domain model
use chrono::{DateTime, Utc};

/// Metric fields a snapshot record may carry. Records are flattened into one
/// reading per present field.
pub const KNOWN_METRICS: &[&str] = &[
    "aqi",
    "pm1",
    "pm25",
    "pm10",
    "co2",
    "voc",
    "temperature",
    "humidity",
];

/// One timestamped value for one metric, as flattened from a snapshot record.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub timestamp: DateTime<Utc>,
    pub metric: String,
    pub value: f64,
}

impl RawReading {
    pub fn new(timestamp: DateTime<Utc>, metric: String, value: f64) -> Self {
        Self {
            timestamp,
            metric,
            value,
        }
    }
}
