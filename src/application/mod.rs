pub mod aggregator;
pub mod chart_service;
pub mod interpolator;
pub mod lod;
pub mod scale;
pub mod snapshot_source;
