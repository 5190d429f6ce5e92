use std::ops::Div;

use crate::quantity::{
    charge::{MilliampHours, Volts},
    power::Watts,
    time::Hours,
};

quantity!(WattHours, "Wh");

impl Div<Watts> for WattHours {
    type Output = Hours;

    fn div(self, load: Watts) -> Self::Output {
        Hours(self.0 / load.0)
    }
}

impl Div<Hours> for WattHours {
    type Output = Watts;

    fn div(self, hours: Hours) -> Self::Output {
        Watts(self.0 / hours.0)
    }
}

impl Div<Volts> for WattHours {
    type Output = MilliampHours;

    fn div(self, voltage: Volts) -> Self::Output {
        MilliampHours(self.0 * 1000.0 / voltage.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn runtime_ok() {
        let hours = WattHours(50.4) / Watts(10.0);
        assert_abs_diff_eq!(hours.0, 5.04, epsilon = 1e-9);
    }

    #[test]
    fn capacity_ok() {
        let capacity = WattHours(12.6) / Volts(25.2);
        assert_abs_diff_eq!(capacity.0, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn ratio_ok() {
        assert_abs_diff_eq!(WattHours(12.5) / WattHours(7.2), 1.736, epsilon = 1e-3);
    }
}
