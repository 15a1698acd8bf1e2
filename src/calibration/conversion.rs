/// Pixel ↔ physical unit conversion
///
/// All functions take an already resolved ratio (physical units per pixel).
/// `None` means no calibration is active and is a valid "not measurable"
/// result rather than an error.

/// `pixels * ratio`, or `None` without a ratio
pub fn pixels_to_units(pixels: f64, ratio: Option<f64>) -> Option<f64> {
    ratio.map(|r| pixels * r)
}

/// `units / ratio`, or `None` without a ratio or with a zero ratio
pub fn units_to_pixels(units: f64, ratio: Option<f64>) -> Option<f64> {
    match ratio {
        Some(r) if r != 0.0 => Some(units / r),
        _ => None,
    }
}

/// Physical length of a pixel offset `(dx, dy)` with separate axis ratios
pub fn distance_to_units(dx: f64, dy: f64, x_ratio: f64, y_ratio: f64) -> f64 {
    let x = dx * x_ratio;
    let y = dy * y_ratio;
    (x * x + y * y).sqrt()
}

/// Four-decimal rendering used by the measurement views
pub fn format_measurement(value: f64, unit: &str) -> String {
    format!("{:.4} {}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_to_units() {
        assert_eq!(pixels_to_units(50.0, Some(4.0)), Some(200.0));
        assert_eq!(pixels_to_units(100.0, None), None);
    }

    #[test]
    fn test_units_to_pixels_guards_zero_ratio() {
        assert_eq!(units_to_pixels(200.0, Some(4.0)), Some(50.0));
        assert_eq!(units_to_pixels(200.0, Some(0.0)), None);
        assert_eq!(units_to_pixels(200.0, None), None);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for &ratio in &[1e-6, 0.001, 0.25, 0.5, 3.7, 4.0, 1234.5] {
            for &pixels in &[0.5, 1.0, 17.0, 333.3, 4096.0, 1e6] {
                let units = pixels_to_units(pixels, Some(ratio));
                let back = units_to_pixels(units.unwrap(), Some(ratio)).unwrap();
                assert!(
                    ((back - pixels) / pixels).abs() <= 1e-9,
                    "ratio={} pixels={} back={}",
                    ratio,
                    pixels,
                    back
                );
            }
        }
    }

    #[test]
    fn test_distance_to_units_anisotropic() {
        assert_eq!(distance_to_units(3.0, 4.0, 1.0, 1.0), 5.0);
        assert_eq!(distance_to_units(10.0, 0.0, 0.5, 2.0), 5.0);
        assert_eq!(distance_to_units(0.0, 10.0, 0.5, 2.0), 20.0);
    }

    #[test]
    fn test_format_measurement() {
        assert_eq!(format_measurement(200.0, "µm"), "200.0000 µm");
        assert_eq!(format_measurement(0.123456, "mm"), "0.1235 mm");
    }
}
