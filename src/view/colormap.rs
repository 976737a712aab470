//! Per-vertex scalar to color mapping.
//!
//! Scalars are mapped through a blue-white-red diverging colormap. The range is
//! taken from the 5th and 95th percentiles so a few extreme vertices do not wash
//! out the rest of the surface.

/// Color used for NaN and infinite values.
pub const INVALID_COLOR: [f32; 3] = [1.0, 0.0, 1.0];

/// Robust `(min, max)` range of the finite values.
///
/// Falls back to `(0, 1)` without finite values and widens a zero-width range.
pub fn robust_range(values: &[f64]) -> (f64, f64) {
    let mut sorted: Vec<f64> = values.iter().filter(|v| v.is_finite()).copied().collect();
    if sorted.is_empty() {
        return (0.0, 1.0);
    }

    sorted.sort_by(f64::total_cmp);

    // Use 5th and 95th percentiles
    let low_idx = (sorted.len() as f64 * 0.05) as usize;
    let high_idx = ((sorted.len() as f64 * 0.95) as usize).min(sorted.len() - 1);

    let min = sorted[low_idx];
    let max = sorted[high_idx];

    if (max - min).abs() < 1e-10 {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

/// Robust range centered on zero, so zero always maps to white.
///
/// Suited to eigenmodes, whose sign is arbitrary.
pub fn symmetric_range(values: &[f64]) -> (f64, f64) {
    let (min, max) = robust_range(values);
    let extent = min.abs().max(max.abs());
    (-extent, extent)
}

/// Map a value to an RGB color using a blue-white-red diverging colormap.
pub fn diverging(value: f64, min: f64, max: f64) -> [f32; 3] {
    if !value.is_finite() {
        return INVALID_COLOR;
    }

    let normalized = if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    };

    // [0, 1] to [-1, 1]
    let d = normalized.clamp(0.0, 1.0) * 2.0 - 1.0;

    // Saturation bottoms out at 0.3 to keep both ends bright
    let (r, g, b) = if d < 0.0 {
        let s = 0.3 + 0.7 * (1.0 + d);
        (s, s, 1.0)
    } else {
        let s = 0.3 + 0.7 * (1.0 - d);
        (1.0, s, s)
    };

    [r as f32, g as f32, b as f32]
}

/// Convert a color in `[0, 1]` to 8-bit channels.
pub fn to_rgb8(color: [f32; 3]) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Colors for per-vertex values over the given range.
pub fn colorize(values: &[f64], (min, max): (f64, f64)) -> Vec<[u8; 3]> {
    values
        .iter()
        .map(|&v| to_rgb8(diverging(v, min, max)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robust_range_ignores_outliers() {
        let mut values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        values[99] = 1e9;
        values.push(f64::NAN);

        let (min, max) = robust_range(&values);
        assert_eq!(min, 5.0);
        assert_eq!(max, 95.0);
    }

    #[test]
    fn test_robust_range_degenerate() {
        assert_eq!(robust_range(&[]), (0.0, 1.0));
        assert_eq!(robust_range(&[f64::NAN]), (0.0, 1.0));
        assert_eq!(robust_range(&[2.0, 2.0]), (1.0, 3.0));
    }

    #[test]
    fn test_symmetric_range() {
        assert_eq!(symmetric_range(&[-1.0, 3.0]), (-3.0, 3.0));
    }

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging(0.0, 0.0, 1.0), [0.3, 0.3, 1.0]);
        assert_eq!(diverging(0.5, 0.0, 1.0), [1.0, 1.0, 1.0]);
        assert_eq!(diverging(1.0, 0.0, 1.0), [1.0, 0.3, 0.3]);
        // Out of range values clamp
        assert_eq!(diverging(7.0, 0.0, 1.0), [1.0, 0.3, 0.3]);
        assert_eq!(diverging(f64::INFINITY, 0.0, 1.0), INVALID_COLOR);
    }

    #[test]
    fn test_colorize() {
        let colors = colorize(&[-1.0, 0.0, 1.0], (-1.0, 1.0));
        assert_eq!(colors[0], [77, 77, 255]);
        assert_eq!(colors[1], [255, 255, 255]);
        assert_eq!(colors[2], [255, 77, 77]);
    }
}
