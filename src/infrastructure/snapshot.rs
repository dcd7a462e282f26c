// Snapshot document flattening
//
// The feed delivers a nested JSON document: date-bucket ids mapping to
// record ids mapping to record objects, each record carrying numeric metric
// fields plus a `createdAt` timestamp. The flattener turns it into one
// `RawReading` per metric field, dropping malformed records individually so
// one bad row never sinks the batch.
//
// The feed is a full document, not a delta: every poll re-delivers
// everything already seen. Buckets downstream are append-only, so the
// flattener remembers which readings it has emitted and yields only the
// unseen ones.
use crate::domain::reading::{RawReading, KNOWN_METRICS};
use crate::error::ChartError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct FlattenedSnapshot {
    /// Readings not seen in any earlier document.
    pub readings: Vec<RawReading>,
    /// Readings lost to per-record parse failures, counted once per record.
    pub dropped: usize,
}

/// Parse a `createdAt` value. Two formats exist in the wild: ISO-8601
/// (with or without a UTC offset) and underscore-separated
/// `"YYYY_M_D_H_Mi_S"` with unpadded components.
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, ChartError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(t.and_utc());
        }
    }
    parse_underscore(raw).ok_or_else(|| ChartError::Parse(format!("bad createdAt '{raw}'")))
}

fn parse_underscore(raw: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = raw.split('_').collect();
    if parts.len() != 6 {
        return None;
    }
    let nums: Vec<u32> = parts.iter().map(|p| p.parse().ok()).collect::<Option<_>>()?;
    let date = NaiveDate::from_ymd_opt(nums[0] as i32, nums[1], nums[2])?;
    let time = date.and_hms_opt(nums[3], nums[4], nums[5])?;
    Some(time.and_utc())
}

/// Stateful flattener held across polls. Record ids are stable in the feed,
/// so a `(bucket, record, metric)` key identifies a reading for the whole
/// session; readings and parse failures are emitted and counted exactly
/// once no matter how often the document repeats them.
#[derive(Debug, Default)]
pub struct SnapshotFlattener {
    seen: HashSet<String>,
}

impl SnapshotFlattener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten one document into the readings not yet emitted.
    ///
    /// A record with an unparsable timestamp loses all its metric fields; a
    /// non-numeric metric field loses only that reading. Both are counted
    /// the first time the record appears, not escalated.
    pub fn flatten(&mut self, document: &serde_json::Value) -> FlattenedSnapshot {
        let mut out = FlattenedSnapshot::default();

        let Some(date_buckets) = document.as_object() else {
            tracing::warn!("snapshot document is not an object, ignoring");
            return out;
        };

        for (bucket_id, records) in date_buckets {
            let Some(records) = records.as_object() else {
                if self.seen.insert(bucket_id.clone()) {
                    out.dropped += 1;
                }
                continue;
            };
            for (record_id, record) in records {
                self.flatten_record(&format!("{bucket_id}/{record_id}"), record, &mut out);
            }
        }

        out
    }

    fn flatten_record(
        &mut self,
        record_key: &str,
        record: &serde_json::Value,
        out: &mut FlattenedSnapshot,
    ) {
        let Some(fields) = record.as_object() else {
            if self.seen.insert(record_key.to_string()) {
                out.dropped += 1;
            }
            return;
        };

        let metric_count = KNOWN_METRICS
            .iter()
            .filter(|m| fields.contains_key(**m))
            .count();

        let timestamp = match fields
            .get("createdAt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ChartError::Parse(format!("record {record_key} has no createdAt")))
            .and_then(parse_created_at)
        {
            Ok(t) => t,
            Err(e) => {
                if self.seen.insert(record_key.to_string()) {
                    tracing::debug!("dropping record {}: {}", record_key, e);
                    out.dropped += metric_count.max(1);
                }
                return;
            }
        };

        for metric in KNOWN_METRICS {
            let Some(field) = fields.get(*metric) else {
                continue;
            };
            if !self.seen.insert(format!("{record_key}#{metric}")) {
                continue;
            }
            match field.as_f64() {
                Some(value) => {
                    out.readings
                        .push(RawReading::new(timestamp, metric.to_string(), value));
                }
                None => {
                    tracing::debug!("dropping non-numeric {} in record {}", metric, record_key);
                    out.dropped += 1;
                }
            }
        }
    }
}
