// Chart frame domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable zoom/pan gesture state, passed into the pure pipeline rather
/// than held as mutable component state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    /// Magnification in [1, 8]; drives point density.
    pub zoom_factor: f64,
    /// Horizontal pan in pixels; shifts the visible time window.
    pub pan_offset_px: f64,
}

impl ZoomState {
    pub fn new(zoom_factor: f64, pan_offset_px: f64) -> Self {
        Self {
            zoom_factor,
            pan_offset_px,
        }
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// Whether a point carries a real reading, a daily average, or a blend of
/// the two. Synthetic timestamps must stay distinguishable from measured
/// ones in tooltips, so the kind travels with every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PointKind {
    Average,
    Mixed,
    Reading,
}

/// One display point. Ephemeral: recomputed every frame, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub kind: PointKind,
}

impl InterpolatedPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64, kind: PointKind) -> Self {
        Self {
            timestamp,
            value,
            kind,
        }
    }
}

/// Stable axis extents, computed over everything ever observed for a metric
/// (raw readings and bucket averages alike) so bounds do not jump with zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub time_range: [DateTime<Utc>; 2],
    pub value_range: [f64; 2],
}

impl Domain {
    pub fn time_width_ms(&self) -> i64 {
        self.time_range[1].timestamp_millis() - self.time_range[0].timestamp_millis()
    }

    pub fn value_span(&self) -> f64 {
        self.value_range[1] - self.value_range[0]
    }
}

/// Wire form of one point, epoch milliseconds for the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePoint {
    pub time_ms: i64,
    pub value: f64,
    pub kind: PointKind,
}

impl From<&InterpolatedPoint> for FramePoint {
    fn from(p: &InterpolatedPoint) -> Self {
        Self {
            time_ms: p.timestamp.timestamp_millis(),
            value: p.value,
            kind: p.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDomain {
    pub time_start_ms: i64,
    pub time_end_ms: i64,
    pub value_min: f64,
    pub value_max: f64,
}

impl From<&Domain> for FrameDomain {
    fn from(d: &Domain) -> Self {
        Self {
            time_start_ms: d.time_range[0].timestamp_millis(),
            time_end_ms: d.time_range[1].timestamp_millis(),
            value_min: d.value_range[0],
            value_max: d.value_range[1],
        }
    }
}

/// Everything the render pipeline needs for one pass: the point set at the
/// current detail level, the stable full domain, and the panned window the
/// scale functions were derived from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFrame {
    pub metric: String,
    pub detail_level: f64,
    pub points: Vec<FramePoint>,
    pub domain: FrameDomain,
    pub visible: FrameDomain,
    pub current_value: Option<f64>,
    pub severity: Option<String>,
}
