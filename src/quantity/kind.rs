use std::ops::RangeInclusive;

use crate::quantity::precision::{Precision, Rounding};

/// Physical quantity a field or a result stands for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// Number of cells in series.
    CellCount,

    /// Cell capacity, mAh.
    Capacity,

    /// Load power, W.
    Load,

    /// Run time, minutes.
    Time,

    /// Energy, Wh.
    Energy,
}

impl Kind {
    /// Absolute inclusive domain.
    #[must_use]
    pub const fn range(self) -> RangeInclusive<f64> {
        match self {
            Self::CellCount => 1.0..=1000.0,
            Self::Capacity => 1.0..=1_000_000.0,
            Self::Load | Self::Time => 0.1..=100_000.0,
            Self::Energy => 0.01..=1_000_000.0,
        }
    }

    #[must_use]
    pub const fn precision(self) -> Precision {
        match self {
            Self::CellCount | Self::Capacity => Precision::Decimals(0),
            Self::Load => Precision::Stepped { threshold: 20.0 },
            Self::Time => Precision::Decimals(1),
            Self::Energy => Precision::Decimals(2),
        }
    }

    /// Rounding policy for a value computed by the solver.
    ///
    /// Pack sizing always rounds up.
    #[must_use]
    pub const fn rounding(self) -> Rounding {
        match self {
            Self::CellCount | Self::Capacity => Rounding::Ceiling,
            Self::Load | Self::Time => Rounding::Nearest(1),
            Self::Energy => Rounding::Nearest(2),
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::CellCount => "cells",
            Self::Capacity => "mAh",
            Self::Load => "W",
            Self::Time => "min",
            Self::Energy => "Wh",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CellCount => "Cells",
            Self::Capacity => "Capacity",
            Self::Load => "Load",
            Self::Time => "Run time",
            Self::Energy => "Energy",
        }
    }
}
