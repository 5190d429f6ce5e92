use std::ops::Mul;

use crate::quantity::energy::WattHours;

quantity!(Cells, "cells");
quantity!(Volts, "V");
quantity!(MilliampHours, "mAh");

impl Mul<Volts> for Cells {
    type Output = Volts;

    /// Series pack voltage.
    fn mul(self, cell_voltage: Volts) -> Self::Output {
        Volts(self.0 * cell_voltage.0)
    }
}

impl Mul<MilliampHours> for Volts {
    type Output = WattHours;

    fn mul(self, capacity: MilliampHours) -> Self::Output {
        WattHours(self.0 * capacity.0 * 0.001)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn pack_energy_ok() {
        let energy = Cells(7.0) * Volts(3.6) * MilliampHours(2000.0);
        assert_abs_diff_eq!(energy.0, 50.4, epsilon = 1e-9);
    }
}
