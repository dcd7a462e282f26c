// Chart service - use case for assembling render frames
use crate::application::aggregator::DailyAggregator;
use crate::application::interpolator::interpolate;
use crate::application::lod::coarse_detail_level;
use crate::application::scale::{
    default_domain, domain_from_extent, hover_probe, HoverSample, Scales,
};
use crate::domain::chart::{ChartFrame, Domain, InterpolatedPoint, ZoomState};
use crate::error::ChartError;
use crate::infrastructure::config::ThresholdsConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Memoization key: metric, detail level snapped to its 0.05 grid cell, and
/// the aggregator generation so new data invalidates stale frames.
type PointSetKey = (String, u8, u64);
type PointSet = Arc<(Vec<InterpolatedPoint>, Domain)>;

/// Builds `ChartFrame`s from the aggregator state.
///
/// Every frame is a pure recompute from `(buckets, ZoomState)`; the only
/// state here is the memo of interpolated point sets per coarse detail
/// level, which bounds recompute cost while a zoom gesture streams events.
#[derive(Clone)]
pub struct ChartService {
    aggregator: Arc<RwLock<DailyAggregator>>,
    thresholds: ThresholdsConfig,
    memo: Arc<Mutex<HashMap<PointSetKey, PointSet>>>,
}

impl ChartService {
    pub fn new(aggregator: Arc<RwLock<DailyAggregator>>, thresholds: ThresholdsConfig) -> Self {
        Self {
            aggregator,
            thresholds,
            memo: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn metrics(&self) -> Vec<String> {
        self.aggregator.read().await.metrics()
    }

    /// Assemble the frame for one metric at the current zoom/pan state.
    ///
    /// A metric with no buckets escalates as `ChartError::EmptyDataset`, the
    /// typed "no data" result; everything recoverable stays internal.
    pub async fn chart_frame(
        &self,
        metric: &str,
        zoom: &ZoomState,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Result<ChartFrame, ChartError> {
        let detail = coarse_detail_level(zoom.zoom_factor);
        let (set, current) = {
            let agg = self.aggregator.read().await;
            if agg.buckets(metric).is_none() {
                return Err(ChartError::EmptyDataset(metric.to_string()));
            }
            (self.point_set(&agg, metric, detail), agg.latest_value(metric))
        };
        let (points, domain) = (&set.0, set.1);

        let scales = Scales::with_transform(&domain, zoom, pixel_width, pixel_height);
        let severity = current.map(|v| self.thresholds.categorize(metric, v));

        Ok(ChartFrame {
            metric: metric.to_string(),
            detail_level: detail,
            points: points.iter().map(Into::into).collect(),
            domain: (&domain).into(),
            visible: scales.visible().into(),
            current_value: current,
            severity: severity.map(|s| s.as_str().to_string()),
        })
    }

    /// Tooltip target for a pointer x position, in frame pixel space.
    pub async fn hover(
        &self,
        metric: &str,
        zoom: &ZoomState,
        pixel_width: f64,
        pixel_height: f64,
        pointer_x: f64,
    ) -> Result<Option<HoverSample>, ChartError> {
        let detail = coarse_detail_level(zoom.zoom_factor);
        let set = {
            let agg = self.aggregator.read().await;
            if agg.buckets(metric).is_none() {
                return Err(ChartError::EmptyDataset(metric.to_string()));
            }
            self.point_set(&agg, metric, detail)
        };
        let scales = Scales::with_transform(&set.1, zoom, pixel_width, pixel_height);
        Ok(hover_probe(&set.0, &scales, pointer_x))
    }

    /// Interpolated points plus the stable domain for one coarse detail
    /// cell, memoized until new data arrives.
    fn point_set(&self, agg: &DailyAggregator, metric: &str, detail: f64) -> PointSet {
        let key: PointSetKey = (
            metric.to_string(),
            (detail * 20.0).round() as u8,
            agg.generation(),
        );
        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = memo.get(&key) {
            return hit.clone();
        }

        let buckets = agg.buckets(metric).unwrap_or(&[]);
        let points: Vec<InterpolatedPoint> = buckets
            .iter()
            .flat_map(|b| interpolate(b, detail))
            .collect();
        let domain = agg
            .extent(metric)
            .map(|e| domain_from_extent(&e))
            .unwrap_or_else(default_domain);

        // Frames from older generations are dead weight once data moved on.
        memo.retain(|(_, _, generation), _| *generation == agg.generation());
        let set: PointSet = Arc::new((points, domain));
        memo.insert(key, set.clone());
        set
    }
}
