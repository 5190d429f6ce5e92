/// Values closer than this to an integer are snapped onto it before `floor` or `ceil`,
/// so that e.g. `2000 × 1.15 = 2299.9999…` still floors to `2300`.
const SNAP_DECIMALS: u8 = 6;

/// How many decimal places a quantity value may carry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Precision {
    /// Fixed number of decimal places, zero meaning whole numbers.
    Decimals(u8),

    /// At most one decimal place up to and including the threshold, whole numbers above it.
    Stepped { threshold: f64 },
}

impl Precision {
    /// Maximum number of decimal places allowed for the value.
    #[must_use]
    pub fn max_decimals(self, value: f64) -> u8 {
        match self {
            Self::Decimals(decimals) => decimals,
            Self::Stepped { threshold } if value <= threshold => 1,
            Self::Stepped { .. } => 0,
        }
    }

    /// Round half-up so that the result satisfies the precision rule.
    #[must_use]
    pub fn round(self, value: f64) -> f64 {
        match self {
            Self::Decimals(decimals) => round_to(value, decimals),
            Self::Stepped { threshold } => {
                let rounded = round_to(value, 1);
                if rounded <= threshold { rounded } else { round_to(value, 0) }
            }
        }
    }
}

/// How a computed result is rounded before it is reported.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rounding {
    /// Half-up to the number of decimal places.
    Nearest(u8),

    /// Up to the next whole number.
    Ceiling,
}

impl Rounding {
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Nearest(decimals) => round_to(value, decimals),
            Self::Ceiling => ceil_snapped(value),
        }
    }
}

#[must_use]
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let scale = 10_f64.powi(i32::from(decimals));
    (value * scale).round() / scale
}

#[must_use]
pub fn ceil_snapped(value: f64) -> f64 {
    round_to(value, SNAP_DECIMALS).ceil()
}

#[must_use]
pub fn floor_snapped(value: f64) -> f64 {
    round_to(value, SNAP_DECIMALS).floor()
}

/// Format the value the way it is written back into a field: no trailing zeros.
#[must_use]
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const LOAD: Precision = Precision::Stepped { threshold: 20.0 };

    #[test]
    fn stepped_max_decimals_ok() {
        assert_eq!(LOAD.max_decimals(7.0), 1);
        assert_eq!(LOAD.max_decimals(20.0), 1);
        assert_eq!(LOAD.max_decimals(20.5), 0);
    }

    #[test]
    fn stepped_round_ok() {
        assert_abs_diff_eq!(LOAD.round(12.25), 12.3);
        assert_abs_diff_eq!(LOAD.round(22.5), 23.0);
        assert_abs_diff_eq!(LOAD.round(20.04), 20.0);
    }

    #[test]
    fn ceiling_ignores_floating_noise() {
        assert_abs_diff_eq!(Rounding::Ceiling.apply(1.000_000_000_1), 1.0);
        assert_abs_diff_eq!(Rounding::Ceiling.apply(1.736), 2.0);
    }

    #[test]
    fn floor_snapped_ok() {
        assert_abs_diff_eq!(floor_snapped(2000.0 * 1.15), 2300.0);
    }

    #[test]
    fn format_value_ok() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(302.4), "302.4");
    }
}
