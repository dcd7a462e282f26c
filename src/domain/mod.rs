pub mod bucket;
pub mod chart;
pub mod reading;
pub mod severity;
