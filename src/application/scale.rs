// Axis domains and pixel mapping
use crate::application::aggregator::SeriesExtent;
use crate::domain::chart::{Domain, InterpolatedPoint, ZoomState};
use crate::error::ChartError;
use chrono::{DateTime, TimeZone, Utc};

/// Widening applied when every observed value is identical, so the value
/// axis never has zero height.
const FLAT_VALUE_EPSILON: f64 = 0.5;

/// Axis-friendly step for a raw span: 1/2/5 times a power of ten.
fn nice_step(span: f64) -> f64 {
    let raw = span / 10.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Round a min/max pair outward to the nearest nice step boundaries.
fn nice_bounds(min: f64, max: f64) -> [f64; 2] {
    if max - min <= 0.0 {
        // Recovered by widening, never surfaced to callers.
        tracing::debug!("{}", ChartError::DomainDegenerate(min));
        return [min - FLAT_VALUE_EPSILON, max + FLAT_VALUE_EPSILON];
    }
    let step = nice_step(max - min);
    [(min / step).floor() * step, (max / step).ceil() * step]
}

/// The sentinel returned for an empty point set: a single instant at the
/// Unix epoch with a unit value range. Callers always get a usable domain.
pub fn default_domain() -> Domain {
    let epoch = Utc.timestamp_opt(0, 0).unwrap();
    Domain {
        time_range: [epoch, epoch],
        value_range: [0.0, 1.0],
    }
}

/// Domain over an explicit point set. The time extent is taken as-is; the
/// value extent is widened to nice round bounds for axis labels.
pub fn compute_domains<I>(points: I) -> Domain
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut iter = points.into_iter();
    let Some((first_t, first_v)) = iter.next() else {
        return default_domain();
    };

    let mut extent = SeriesExtent::new(first_t, first_v);
    for (t, v) in iter {
        extent.observe(t, v);
    }
    domain_from_extent(&extent)
}

/// Domain from the aggregator's running extent. This is the stable chart
/// domain: it covers every reading and average ever observed, so axis
/// bounds hold still while zoom only changes point density.
pub fn domain_from_extent(extent: &SeriesExtent) -> Domain {
    Domain {
        time_range: [extent.time_min, extent.time_max],
        value_range: nice_bounds(extent.value_min, extent.value_max),
    }
}

/// Pixel-mapping functions for one render pass.
///
/// Pan shifts the visible time window by `pan_px / zoom` converted to domain
/// units; the zoom factor does not shrink the window width itself (zoom is
/// expressed purely as point density upstream) and never touches the value
/// axis.
#[derive(Debug, Clone, Copy)]
pub struct Scales {
    visible: Domain,
    pixel_width: f64,
    pixel_height: f64,
}

impl Scales {
    pub fn new(domain: &Domain, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            visible: *domain,
            pixel_width: pixel_width.max(1.0),
            pixel_height: pixel_height.max(1.0),
        }
    }

    /// Compose the pan/zoom transform onto the stable domain.
    pub fn with_transform(
        domain: &Domain,
        zoom: &ZoomState,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Self {
        let scales = Self::new(domain, pixel_width, pixel_height);
        let width_ms = domain.time_width_ms() as f64;
        let shift_ms =
            (zoom.pan_offset_px / zoom.zoom_factor.max(1.0)) * width_ms / scales.pixel_width;

        // Pan offsets come straight from the query string; a shift that
        // cannot land inside representable time keeps the window unshifted
        // instead of overflowing.
        let time_range = chrono::Duration::try_milliseconds(shift_ms.round() as i64)
            .and_then(|shift| {
                Some([
                    domain.time_range[0].checked_sub_signed(shift)?,
                    domain.time_range[1].checked_sub_signed(shift)?,
                ])
            })
            .unwrap_or(domain.time_range);

        Self {
            visible: Domain {
                time_range,
                value_range: domain.value_range,
            },
            ..scales
        }
    }

    pub fn visible(&self) -> &Domain {
        &self.visible
    }

    pub fn time_to_x(&self, t: DateTime<Utc>) -> f64 {
        let width_ms = (self.visible.time_width_ms() as f64).max(1.0);
        let offset_ms =
            (t.timestamp_millis() - self.visible.time_range[0].timestamp_millis()) as f64;
        offset_ms / width_ms * self.pixel_width
    }

    /// Screen y grows downward: the domain maximum maps to 0.
    pub fn value_to_y(&self, v: f64) -> f64 {
        let span = self.visible.value_span().max(f64::EPSILON);
        (self.visible.value_range[1] - v) / span * self.pixel_height
    }
}

/// A hover hit: the point under the pointer and where it sits on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverSample {
    pub point: InterpolatedPoint,
    pub pixel: (f64, f64),
}

/// Derive the tooltip target from pointer coordinates and the current
/// scales: the rendered point whose x position is nearest the pointer.
pub fn hover_probe(
    points: &[InterpolatedPoint],
    scales: &Scales,
    pointer_x: f64,
) -> Option<HoverSample> {
    points
        .iter()
        .min_by(|a, b| {
            let da = (scales.time_to_x(a.timestamp) - pointer_x).abs();
            let db = (scales.time_to_x(b.timestamp) - pointer_x).abs();
            da.total_cmp(&db)
        })
        .map(|p| HoverSample {
            point: p.clone(),
            pixel: (scales.time_to_x(p.timestamp), scales.value_to_y(p.value)),
        })
}
