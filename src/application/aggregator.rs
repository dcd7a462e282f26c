// Incremental daily aggregation of raw readings
use crate::domain::bucket::DailyBucket;
use crate::domain::reading::RawReading;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

/// Running min/max over everything observed for one metric. Averages always
/// sit inside the raw value extent, so observing raw readings alone covers
/// the union of readings and averages the domain contract asks for.
#[derive(Debug, Clone, Copy)]
pub struct SeriesExtent {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub value_min: f64,
    pub value_max: f64,
}

impl SeriesExtent {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            time_min: timestamp,
            time_max: timestamp,
            value_min: value,
            value_max: value,
        }
    }

    pub fn observe(&mut self, timestamp: DateTime<Utc>, value: f64) {
        self.time_min = self.time_min.min(timestamp);
        self.time_max = self.time_max.max(timestamp);
        self.value_min = self.value_min.min(value);
        self.value_max = self.value_max.max(value);
    }
}

#[derive(Debug, Default)]
struct MetricSeries {
    /// Buckets in calendar order; the index maps a date to its slot.
    buckets: Vec<DailyBucket>,
    index: HashMap<NaiveDate, usize>,
    extent: Option<SeriesExtent>,
    /// Reading with the latest timestamp, for the "current value" tile.
    latest: Option<(DateTime<Utc>, f64)>,
}

impl MetricSeries {
    fn push(&mut self, reading: &RawReading) {
        let date = reading.timestamp.date_naive();
        let slot = match self.index.get(&date) {
            Some(&slot) => slot,
            None => self.insert_bucket(date, reading.timestamp),
        };
        self.buckets[slot].push(reading.value);

        match &mut self.extent {
            Some(extent) => extent.observe(reading.timestamp, reading.value),
            None => self.extent = Some(SeriesExtent::new(reading.timestamp, reading.value)),
        }
        if self.latest.is_none_or(|(t, _)| reading.timestamp >= t) {
            self.latest = Some((reading.timestamp, reading.value));
        }
    }

    /// New calendar days are rare relative to readings, so the index rebuild
    /// on insert keeps steady-state ingest O(1) per reading.
    fn insert_bucket(&mut self, date: NaiveDate, anchor: DateTime<Utc>) -> usize {
        let slot = self.buckets.partition_point(|b| b.date < date);
        self.buckets.insert(slot, DailyBucket::new(date, anchor));
        for (i, bucket) in self.buckets.iter().enumerate() {
            self.index.insert(bucket.date, i);
        }
        slot
    }
}

/// Arena-style accumulation of buckets keyed by `(metric, day)`.
///
/// Existing buckets are extended in place on every poll, never rebuilt, so
/// repeated ingestion stays linear in the number of new readings. The
/// generation counter bumps whenever data changes and invalidates any
/// memoized frames downstream.
#[derive(Debug, Default)]
pub struct DailyAggregator {
    series: HashMap<String, MetricSeries>,
    generation: u64,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of parsed readings into the buckets. Returns the number
    /// accepted (parse failures were already dropped upstream, per record).
    pub fn ingest<I>(&mut self, readings: I) -> usize
    where
        I: IntoIterator<Item = RawReading>,
    {
        let mut accepted = 0;
        for reading in readings {
            self.series
                .entry(reading.metric.clone())
                .or_default()
                .push(&reading);
            accepted += 1;
        }
        if accepted > 0 {
            self.generation += 1;
        }
        accepted
    }

    /// Metric ids with at least one bucket, sorted for stable listings.
    pub fn metrics(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.series.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Buckets for one metric in calendar order, or None if never seen.
    pub fn buckets(&self, metric: &str) -> Option<&[DailyBucket]> {
        self.series.get(metric).map(|s| s.buckets.as_slice())
    }

    pub fn extent(&self, metric: &str) -> Option<SeriesExtent> {
        self.series.get(metric).and_then(|s| s.extent)
    }

    /// Value of the most recent reading for the metric.
    pub fn latest_value(&self, metric: &str) -> Option<f64> {
        self.series.get(metric).and_then(|s| s.latest.map(|(_, v)| v))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(day: u32, hour: u32, metric: &str, value: f64) -> RawReading {
        RawReading::new(
            Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            metric.to_string(),
            value,
        )
    }

    #[test]
    fn test_groups_by_metric_and_day() {
        let mut agg = DailyAggregator::new();
        agg.ingest(vec![
            reading(1, 8, "pm25", 10.0),
            reading(1, 9, "pm25", 20.0),
            reading(2, 8, "pm25", 30.0),
            reading(1, 8, "co2", 400.0),
        ]);

        let pm25 = agg.buckets("pm25").unwrap();
        assert_eq!(pm25.len(), 2);
        assert_eq!(pm25[0].values, vec![10.0, 20.0]);
        assert_eq!(pm25[1].values, vec![30.0]);
        assert_eq!(agg.buckets("co2").unwrap().len(), 1);
    }

    #[test]
    fn test_incremental_ingest_extends_buckets() {
        let mut agg = DailyAggregator::new();
        agg.ingest(vec![reading(1, 8, "pm10", 58.0), reading(1, 9, "pm10", 66.0)]);
        let anchor_before = agg.buckets("pm10").unwrap()[0].anchor;

        agg.ingest(vec![reading(1, 10, "pm10", 8.0)]);
        let bucket = &agg.buckets("pm10").unwrap()[0];
        // Same bucket, extended in arrival order; the anchor never moves.
        assert_eq!(bucket.values, vec![58.0, 66.0, 8.0]);
        assert_eq!(bucket.anchor, anchor_before);
    }

    #[test]
    fn test_out_of_order_arrival_preserved() {
        use chrono::Timelike;

        let mut agg = DailyAggregator::new();
        // Later timestamp arrives first; value order must follow arrival.
        agg.ingest(vec![reading(1, 22, "voc", 5.0), reading(1, 6, "voc", 1.0)]);
        let bucket = &agg.buckets("voc").unwrap()[0];
        assert_eq!(bucket.values, vec![5.0, 1.0]);
        // Anchor is the first-parsed timestamp, not the earliest.
        assert_eq!(bucket.anchor.hour(), 22);
    }

    #[test]
    fn test_buckets_in_calendar_order_despite_arrival() {
        let mut agg = DailyAggregator::new();
        agg.ingest(vec![
            reading(9, 8, "aqi", 3.0),
            reading(2, 8, "aqi", 1.0),
            reading(5, 8, "aqi", 2.0),
        ]);
        let dates: Vec<u32> = agg
            .buckets("aqi")
            .unwrap()
            .iter()
            .map(|b| chrono::Datelike::day(&b.date))
            .collect();
        assert_eq!(dates, vec![2, 5, 9]);
    }

    #[test]
    fn test_aggregate_then_flatten_round_trip() {
        let values = [58.0, 66.0, 8.0, 8.0, 8.0, 8.0, 69.0, 71.0];
        let mut agg = DailyAggregator::new();
        agg.ingest(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| reading(1, i as u32, "pm10", v)),
        );

        let flattened: Vec<f64> = agg
            .buckets("pm10")
            .unwrap()
            .iter()
            .flat_map(|b| b.values.iter().copied())
            .collect();
        assert_eq!(flattened, values);
        assert_eq!(agg.buckets("pm10").unwrap()[0].average, 37.0);
    }

    #[test]
    fn test_extent_spans_all_readings() {
        let mut agg = DailyAggregator::new();
        agg.ingest(vec![
            reading(1, 8, "pm25", 10.0),
            reading(3, 8, "pm25", 90.0),
            reading(2, 8, "pm25", 2.0),
        ]);
        let extent = agg.extent("pm25").unwrap();
        assert_eq!(extent.value_min, 2.0);
        assert_eq!(extent.value_max, 90.0);
        assert_eq!(extent.time_min, reading(1, 8, "pm25", 0.0).timestamp);
        assert_eq!(extent.time_max, reading(3, 8, "pm25", 0.0).timestamp);
    }

    #[test]
    fn test_generation_bumps_only_on_data() {
        let mut agg = DailyAggregator::new();
        assert_eq!(agg.generation(), 0);
        agg.ingest(vec![reading(1, 8, "co2", 400.0)]);
        assert_eq!(agg.generation(), 1);
        agg.ingest(Vec::new());
        assert_eq!(agg.generation(), 1);
    }

    #[test]
    fn test_unknown_metric_is_none() {
        let agg = DailyAggregator::new();
        assert!(agg.buckets("pm25").is_none());
        assert!(agg.extent("pm25").is_none());
    }
}
