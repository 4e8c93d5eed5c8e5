//! Billing unit arithmetic.

/// Minutes in one billing unit.
pub const MINUTES_PER_UNIT: i64 = 6;

/// Convert minutes to billing units, rounding partial units up.
///
/// Non-positive input yields zero units.
pub fn calculate_units(minutes: i64) -> i64 {
    if minutes <= 0 {
        return 0;
    }
    // `(minutes + 5) / 6` would overflow near i64::MAX.
    minutes / MINUTES_PER_UNIT + i64::from(minutes % MINUTES_PER_UNIT != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_minutes_are_zero_units() {
        for minutes in [i64::MIN, -60, -1, 0] {
            assert_eq!(calculate_units(minutes), 0, "minutes = {minutes}");
        }
    }

    #[test]
    fn partial_units_round_up() {
        assert_eq!(calculate_units(1), 1);
        assert_eq!(calculate_units(6), 1);
        assert_eq!(calculate_units(7), 2);
        assert_eq!(calculate_units(12), 2);
        assert_eq!(calculate_units(13), 3);
        assert_eq!(calculate_units(90), 15);
    }

    #[test]
    fn matches_ceiling_division() {
        for minutes in 1..=600 {
            let expected = (minutes + MINUTES_PER_UNIT - 1) / MINUTES_PER_UNIT;
            assert_eq!(calculate_units(minutes), expected, "minutes = {minutes}");
        }
    }

    #[test]
    fn largest_input_does_not_overflow() {
        assert_eq!(calculate_units(i64::MAX), i64::MAX / 6 + 1);
    }
}
