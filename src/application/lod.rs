// Zoom factor to level-of-detail mapping
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;

/// Normalized detail level in [0, 1] for a zoom factor in [1, 8].
///
/// 0 renders one average point per day, 1 renders every raw reading.
/// Monotonic and continuous; out-of-range zoom factors clamp.
pub fn detail_level(zoom_factor: f64) -> f64 {
    ((zoom_factor - MIN_ZOOM) / (MAX_ZOOM - MIN_ZOOM)).clamp(0.0, 1.0)
}

/// Detail level rounded to a coarse grid so frames memoized per grid cell
/// absorb the flood of intermediate zoom events.
pub fn coarse_detail_level(zoom_factor: f64) -> f64 {
    const GRID: f64 = 0.05;
    (detail_level(zoom_factor) / GRID).round() * GRID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(detail_level(1.0), 0.0);
        assert_eq!(detail_level(8.0), 1.0);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(detail_level(0.2), 0.0);
        assert_eq!(detail_level(25.0), 1.0);
    }

    #[test]
    fn test_monotonic_over_range() {
        let mut prev = detail_level(1.0);
        let mut z = 1.0;
        while z <= 8.0 {
            let d = detail_level(z);
            assert!(d >= prev);
            prev = d;
            z += 0.01;
        }
    }

    #[test]
    fn test_coarse_grid_snaps() {
        // 4.5 → d = 0.5 exactly; nearby zooms snap onto the same cell.
        assert_eq!(coarse_detail_level(4.5), 0.5);
        assert_eq!(coarse_detail_level(4.55), 0.5);
        assert!((coarse_detail_level(4.7) - 0.55).abs() < 1e-12);
    }
}
