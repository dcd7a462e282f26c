// Level-of-detail point synthesis for one daily bucket
use crate::domain::bucket::DailyBucket;
use crate::domain::chart::{InterpolatedPoint, PointKind};
use chrono::Duration;

/// Number of points rendered for a bucket of `n` values at detail level `d`:
/// one at d = 0, all n at d = 1, linear in between.
pub fn points_to_show(n: usize, detail_level: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let raw = (1.0 + (n as f64 - 1.0) * detail_level).floor() as usize;
    raw.max(1)
}

/// Synthesize the display points for one bucket at the given detail level.
///
/// Values follow the fixed blend contract: bucket average at d = 0, the raw
/// readings in arrival order at d = 1, and `avg * (1 - d) + raw * d`
/// in between. Timestamps are synthetic: points spread symmetrically over
/// one hour around the bucket anchor, or sit exactly on the anchor when a
/// single point is shown. `PointKind` tells tooltips which case they have.
//
// TODO: the mixed blend is a linear mix of a statistic and a sample, kept
// for compatibility with the data it was tuned against; replacing it with a
// windowed-mean progressive disclosure is tracked as a follow-up.
pub fn interpolate(bucket: &DailyBucket, detail_level: f64) -> Vec<InterpolatedPoint> {
    if bucket.is_empty() {
        return Vec::new();
    }
    let n = bucket.len();
    let count = points_to_show(n, detail_level);
    let mut points = Vec::with_capacity(count);

    for i in 0..count {
        let progress = i as f64 / (count - 1).max(1) as f64;
        let raw_index = (progress * (n as f64 - 1.0)).floor() as usize;
        let raw = bucket.values[raw_index];

        let (value, kind) = if detail_level <= 0.0 {
            (bucket.average, PointKind::Average)
        } else if detail_level >= 1.0 {
            (raw, PointKind::Reading)
        } else {
            (
                bucket.average * (1.0 - detail_level) + raw * detail_level,
                PointKind::Mixed,
            )
        };

        let timestamp = if count > 1 {
            let offset_ms = ((progress - 0.5) * 60.0 * 60_000.0).round() as i64;
            bucket.anchor + Duration::milliseconds(offset_ms)
        } else {
            bucket.anchor
        };

        points.push(InterpolatedPoint::new(timestamp, value, kind));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bucket_with(values: &[f64]) -> DailyBucket {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let mut bucket = DailyBucket::new(anchor.date_naive(), anchor);
        for &v in values {
            bucket.push(v);
        }
        bucket
    }

    #[test]
    fn test_points_to_show_endpoints() {
        for n in [1usize, 2, 7, 100] {
            assert_eq!(points_to_show(n, 0.0), 1);
            assert_eq!(points_to_show(n, 1.0), n);
        }
    }

    #[test]
    fn test_points_to_show_monotonic_in_detail() {
        let mut prev = 0;
        for step in 0..=20 {
            let d = step as f64 / 20.0;
            let count = points_to_show(9, d);
            assert!(count >= prev);
            prev = count;
        }
    }

    #[test]
    fn test_zero_detail_is_single_average_point_on_anchor() {
        let bucket = bucket_with(&[58.0, 66.0, 8.0, 8.0, 8.0, 8.0, 69.0, 71.0]);
        let points = interpolate(&bucket, 0.0);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, bucket.average);
        assert_eq!(points[0].kind, PointKind::Average);
        // Single point carries the anchor exactly, no synthetic jitter.
        assert_eq!(points[0].timestamp, bucket.anchor);
    }

    #[test]
    fn test_full_detail_reproduces_arrival_order() {
        let values = [5.0, 1.0, 9.0, 2.0];
        let bucket = bucket_with(&values);
        let points = interpolate(&bucket, 1.0);

        let rendered: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(rendered, values.to_vec());
        assert!(points.iter().all(|p| p.kind == PointKind::Reading));
    }

    #[test]
    fn test_mixed_blend_is_exact() {
        let bucket = bucket_with(&[10.0, 30.0]);
        // N = 2, d = 0.5 → points_to_show = max(1, floor(1.5)) = 1
        let points = interpolate(&bucket, 0.5);
        assert_eq!(points.len(), 1);
        // progress = 0 → raw index 0; blend 20*0.5 + 10*0.5
        assert_eq!(points[0].value, 15.0);
        assert_eq!(points[0].kind, PointKind::Mixed);

        // N = 3, d = 0.5 → 2 points, raw indices 0 and 2
        let bucket = bucket_with(&[10.0, 20.0, 60.0]);
        let points = interpolate(&bucket, 0.5);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, bucket.average * 0.5 + 10.0 * 0.5);
        assert_eq!(points[1].value, bucket.average * 0.5 + 60.0 * 0.5);
    }

    #[test]
    fn test_synthetic_spread_is_one_hour_around_anchor() {
        let bucket = bucket_with(&[1.0, 2.0, 3.0]);
        let points = interpolate(&bucket, 1.0);
        assert_eq!(points.len(), 3);

        let offsets_min: Vec<i64> = points
            .iter()
            .map(|p| (p.timestamp - bucket.anchor).num_minutes())
            .collect();
        assert_eq!(offsets_min, vec![-30, 0, 30]);
    }

    #[test]
    fn test_empty_bucket_yields_no_points() {
        let bucket = bucket_with(&[]);
        assert!(interpolate(&bucket, 0.7).is_empty());
    }
}
