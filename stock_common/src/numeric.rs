//! Rounding and percentage formatting used by the wire format.

/// Rounds `value` to `places` decimals; exact halves go to the even neighbour.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Formats a ratio as a percentage string such as `"12.3%"`.
///
/// The ratio is rounded to three decimals first and only then scaled by 100,
/// so binary artefacts of the scaling survive (`0.29` becomes
/// `"28.999999999999996%"`). Integral values keep a trailing `.0`.
pub fn percent(ratio: f64) -> String {
    format!("{:?}%", round_to(ratio, 3) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_to(100.456, 2), 100.46);
        assert_eq!(round_to(2.0, 2), 2.0);
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(1.0 / 32.0 * 100.0, 2), 3.12);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn percent_rounds_before_scaling() {
        assert_eq!(percent(0.123), "12.3%");
        assert_eq!(percent(0.4567), "45.7%");
        assert_eq!(percent(0.1), "10.0%");
        assert_eq!(percent(0.29), "28.999999999999996%");
    }

    #[test]
    fn percent_always_has_suffix() {
        for ratio in [0.01, 0.05, 0.25, 0.5] {
            let text = percent(ratio);
            assert!(text.ends_with('%'), "{}", text);
            let number: f64 = text.trim_end_matches('%').parse().unwrap();
            assert!((number - ratio * 100.0).abs() < 0.051);
        }
    }
}
