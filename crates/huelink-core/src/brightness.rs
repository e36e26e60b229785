// ── Brightness math ──
//
// Bridge brightness runs 1..=254. 0 is never produced: downstream UIs
// cannot tell a room at 0 from a room that is off.

pub const MIN_BRI: u8 = 1;
pub const MAX_BRI: u8 = 254;

/// Clamp any requested brightness into `1..=254`.
pub fn clamp(bri: i64) -> u8 {
    u8::try_from(bri.clamp(i64::from(MIN_BRI), i64::from(MAX_BRI))).unwrap_or(MIN_BRI)
}

/// Map a brightness in `1..=254` to a percentage in `1..=100`.
///
/// Monotonic, with `1 → 1` and `254 → 100`. Halves round to even.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn to_percent(bri: u8) -> u8 {
    let pct = (f64::from(bri) / f64::from(MAX_BRI) * 100.0).round_ties_even();
    (pct as i64).clamp(1, 100).try_into().unwrap_or(1)
}

/// Mean of the samples, rounded half-to-even and clamped to `1..=254`.
///
/// No samples means "unknown / not dimmable" and yields 1. The sum is
/// taken in `i128` so out-of-range bridge values cannot overflow it.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn average(samples: &[i64]) -> u8 {
    if samples.is_empty() {
        return MIN_BRI;
    }
    let sum: i128 = samples.iter().copied().map(i128::from).sum();
    let mean = (sum as f64 / samples.len() as f64).round_ties_even();
    clamp(mean as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(i64::MIN), 1);
        assert_eq!(clamp(-5), 1);
        assert_eq!(clamp(0), 1);
        assert_eq!(clamp(1), 1);
        assert_eq!(clamp(128), 128);
        assert_eq!(clamp(254), 254);
        assert_eq!(clamp(255), 254);
        assert_eq!(clamp(i64::MAX), 254);
    }

    #[test]
    fn percent_endpoints() {
        assert_eq!(to_percent(1), 1);
        assert_eq!(to_percent(254), 100);
        assert_eq!(to_percent(150), 59);
        assert_eq!(to_percent(127), 50);
    }

    #[test]
    fn percent_is_monotonic() {
        let mut last = 0;
        for bri in MIN_BRI..=MAX_BRI {
            let pct = to_percent(bri);
            assert!(pct >= last, "to_percent({bri}) = {pct} < {last}");
            assert!((1..=100).contains(&pct));
            last = pct;
        }
    }

    #[test]
    fn average_without_samples_is_one() {
        assert_eq!(average(&[]), 1);
    }

    #[test]
    fn average_rounds_half_to_even_and_clamps() {
        assert_eq!(average(&[100, 200]), 150);
        assert_eq!(average(&[1, 2]), 2);
        assert_eq!(average(&[2, 3]), 2);
        assert_eq!(average(&[0, 0]), 1);
        assert_eq!(average(&[400, 300]), 254);
    }

    #[test]
    fn average_survives_extreme_samples() {
        assert_eq!(average(&[i64::MAX, i64::MAX]), 254);
        assert_eq!(average(&[i64::MAX, 10]), 254);
        assert_eq!(average(&[i64::MIN, i64::MIN]), 1);
        assert_eq!(average(&[i64::MIN, i64::MAX]), 1);
    }
}
