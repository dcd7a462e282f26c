// Configuration loading
use crate::domain::severity::{MetricThresholds, Severity};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// URL of the snapshot document the poller fetches.
    pub source_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub chart: ChartDefaults,
}

/// Fallback frame size when the renderer does not say otherwise.
#[derive(Debug, Deserialize, Clone)]
pub struct ChartDefaults {
    #[serde(default = "default_pixel_width")]
    pub pixel_width: f64,
    #[serde(default = "default_pixel_height")]
    pub pixel_height: f64,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            pixel_width: default_pixel_width(),
            pixel_height: default_pixel_height(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_pixel_width() -> f64 {
    800.0
}

fn default_pixel_height() -> f64 {
    400.0
}

/// Per-metric severity cut-points, consumed for current-value display only.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ThresholdsConfig {
    #[serde(default)]
    pub metrics: HashMap<String, MetricThresholds>,
}

impl ThresholdsConfig {
    /// Metrics without configured thresholds read as good.
    pub fn categorize(&self, metric: &str, value: f64) -> Severity {
        self.metrics
            .get(metric)
            .map(|t| t.categorize(value))
            .unwrap_or(Severity::Good)
    }
}

pub fn load_engine_config() -> anyhow::Result<EngineConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/engine"))
        .add_source(config::Environment::with_prefix("AIRCHART"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_thresholds_config() -> anyhow::Result<ThresholdsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/thresholds").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_fall_back_to_good() {
        let config = ThresholdsConfig::default();
        assert_eq!(config.categorize("pm25", 9999.0), Severity::Good);
    }

    #[test]
    fn test_configured_thresholds_apply() {
        let mut metrics = HashMap::new();
        metrics.insert(
            "co2".to_string(),
            MetricThresholds {
                cuts: vec![800.0, 1200.0],
            },
        );
        let config = ThresholdsConfig { metrics };

        assert_eq!(config.categorize("co2", 500.0), Severity::Good);
        assert_eq!(config.categorize("co2", 1000.0), Severity::Moderate);
        assert_eq!(config.categorize("co2", 2000.0), Severity::Unhealthy);
    }
}
