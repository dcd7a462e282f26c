// Severity band lookup for current values
use serde::{Deserialize, Serialize};

/// Display severity of a current value. Chosen from static per-metric
/// thresholds; plays no part in the aggregation or interpolation math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    VeryHazardous,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Moderate => "moderate",
            Severity::Unhealthy => "unhealthy",
            Severity::VeryUnhealthy => "veryUnhealthy",
            Severity::Hazardous => "hazardous",
            Severity::VeryHazardous => "veryHazardous",
        }
    }
}

/// Ascending cut-points for one metric. A value below `cuts[0]` is good,
/// below `cuts[1]` moderate, and so on; past the last cut it is
/// very hazardous. Fewer than five cuts simply never reach the top bands.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricThresholds {
    pub cuts: Vec<f64>,
}

impl MetricThresholds {
    pub fn categorize(&self, value: f64) -> Severity {
        const BANDS: [Severity; 6] = [
            Severity::Good,
            Severity::Moderate,
            Severity::Unhealthy,
            Severity::VeryUnhealthy,
            Severity::Hazardous,
            Severity::VeryHazardous,
        ];
        let crossed = self.cuts.iter().take(5).filter(|c| value >= **c).count();
        BANDS[crossed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pm25() -> MetricThresholds {
        MetricThresholds {
            cuts: vec![12.0, 35.4, 55.4, 150.4, 250.4],
        }
    }

    #[test]
    fn test_bands_in_order() {
        let t = pm25();
        assert_eq!(t.categorize(5.0), Severity::Good);
        assert_eq!(t.categorize(12.0), Severity::Moderate);
        assert_eq!(t.categorize(40.0), Severity::Unhealthy);
        assert_eq!(t.categorize(100.0), Severity::VeryUnhealthy);
        assert_eq!(t.categorize(200.0), Severity::Hazardous);
        assert_eq!(t.categorize(500.0), Severity::VeryHazardous);
    }

    #[test]
    fn test_short_cut_list_caps_band() {
        let t = MetricThresholds { cuts: vec![50.0] };
        assert_eq!(t.categorize(10.0), Severity::Good);
        assert_eq!(t.categorize(90.0), Severity::Moderate);
    }
}
