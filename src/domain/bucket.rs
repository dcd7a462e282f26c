// Per-day aggregation bucket
use chrono::{DateTime, NaiveDate, Utc};

/// Rounding applied to every bucket average. Two decimals is part of the
/// bucket contract, not a display choice.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// All values seen for one metric on one calendar day.
///
/// `values` keeps arrival order: snapshots can deliver readings out of order
/// and the sequence is never sorted or truncated. `anchor` is the timestamp
/// of the first reading parsed for the day and anchors synthetic point
/// timestamps at render time.
#[derive(Debug, Clone)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub anchor: DateTime<Utc>,
    pub values: Vec<f64>,
    sum: f64,
    pub average: f64,
}

impl DailyBucket {
    pub fn new(date: NaiveDate, anchor: DateTime<Utc>) -> Self {
        Self {
            date,
            anchor,
            values: Vec::new(),
            sum: 0.0,
            average: 0.0,
        }
    }

    /// Append one value, keeping the running average consistent.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
        self.sum += value;
        self.average = round2(self.sum / self.values.len() as f64);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bucket() -> DailyBucket {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
        DailyBucket::new(anchor.date_naive(), anchor)
    }

    #[test]
    fn test_average_is_rounded_mean() {
        let mut b = bucket();
        for v in [1.0, 2.0, 2.0] {
            b.push(v);
        }
        // mean = 5/3 = 1.666..., rounded to 2 decimals
        assert_eq!(b.average, 1.67);
    }

    #[test]
    fn test_average_tracks_every_push() {
        let mut b = bucket();
        b.push(10.0);
        assert_eq!(b.average, 10.0);
        b.push(11.0);
        assert_eq!(b.average, 10.5);
        b.push(0.33);
        assert_eq!(b.average, round2((10.0 + 11.0 + 0.33) / 3.0));
    }

    #[test]
    fn test_pm10_scenario_average() {
        // Hand-computed: sum = 296, mean = 37.0
        let mut b = bucket();
        for v in [58.0, 66.0, 8.0, 8.0, 8.0, 8.0, 69.0, 71.0] {
            b.push(v);
        }
        assert_eq!(b.average, 37.0);
    }

    #[test]
    fn test_values_keep_arrival_order() {
        let mut b = bucket();
        for v in [3.0, 1.0, 2.0] {
            b.push(v);
        }
        assert_eq!(b.values, vec![3.0, 1.0, 2.0]);
    }
}
