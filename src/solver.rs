use itertools::{Itertools, MinMaxResult};
use ordered_float::OrderedFloat;

use crate::quantity::{
    Kind,
    Triple,
    charge::{Cells, MilliampHours, Volts},
    energy::WattHours,
    power::Watts,
    time::{Hours, Minutes},
};

/// Fixed arithmetic relation combining two known quantities into a third one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Relation {
    /// `T = E / L`: minutes from watt-hours and watts.
    Time,

    /// `E = L × T`: watt-hours from watts and minutes.
    Energy,

    /// `L = E / T`: watts from watt-hours and minutes.
    Load,

    /// `C = E / (N × k)`: cell capacity from watt-hours and the cell count.
    Capacity { cell_voltage: Volts },

    /// `N = E / (k × C)`: cell count from watt-hours and the cell capacity.
    CellCount { cell_voltage: Volts },

    /// `E = N × k × C`: pack energy from the cell count and the cell capacity.
    PackEnergy { cell_voltage: Volts },
}

impl Relation {
    /// Quantity the relation produces.
    #[must_use]
    pub const fn output(self) -> Kind {
        match self {
            Self::Time => Kind::Time,
            Self::Energy | Self::PackEnergy { .. } => Kind::Energy,
            Self::Load => Kind::Load,
            Self::Capacity { .. } => Kind::Capacity,
            Self::CellCount { .. } => Kind::CellCount,
        }
    }

    /// Exact, unrounded value; absent when not evaluable (for instance, a zero denominator).
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        let value = match self {
            Self::Time => Minutes::from(WattHours(a) / Watts(b)).0,
            Self::Energy => (Watts(a) * Hours::from(Minutes(b))).0,
            Self::Load => (WattHours(a) / Hours::from(Minutes(b))).0,
            Self::Capacity { cell_voltage } => (WattHours(a) / (Cells(b) * cell_voltage)).0,
            Self::CellCount { cell_voltage } => WattHours(a) / (cell_voltage * MilliampHours(b)),
            Self::PackEnergy { cell_voltage } => (Cells(a) * cell_voltage * MilliampHours(b)).0,
        };
        value.is_finite().then_some(value)
    }
}

/// Third quantity computed from two known ones.
///
/// The extremes are only reported when they differ from the nominal.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Solution {
    pub nominal: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,

    /// Unrounded nominal, a footnote to the rounded-up pack sizing.
    pub exact: f64,

    /// Unrounded lowest and highest candidates.
    pub exact_min: f64,
    pub exact_max: f64,
}

impl Solution {
    /// Unrounded values to feed into another relation, so that only the final result is rounded.
    pub const fn exact_triple(&self) -> Triple {
        Triple::nominal(self.exact).with_min(self.exact_min).with_max(self.exact_max)
    }
}

impl From<Solution> for Triple {
    fn from(solution: Solution) -> Self {
        Self { nominal: Some(solution.nominal), min: solution.min, max: solution.max }
    }
}

/// Compute the nominal result and the true achievable extremes.
///
/// The extremes are taken over the full cross product of the present input values: a relation
/// that divides by one of its inputs does not necessarily reach its extremes by pairing
/// the extremes of both inputs. Rounding is monotonic, so the extremes are rounded last.
#[must_use]
pub fn solve(relation: Relation, a: &Triple, b: &Triple) -> Option<Solution> {
    let rounding = relation.output().rounding();
    let exact = relation.apply(a.nominal?, b.nominal?)?;

    let (exact_min, exact_max) = match a
        .values()
        .cartesian_product(b.values().collect_vec())
        .filter_map(|(a, b)| relation.apply(a, b))
        .map(OrderedFloat)
        .minmax()
    {
        MinMaxResult::NoElements => (exact, exact),
        MinMaxResult::OneElement(candidate) => (candidate.0, candidate.0),
        MinMaxResult::MinMax(min, max) => (min.0, max.0),
    };

    let nominal = rounding.apply(exact);
    let min = rounding.apply(exact_min);
    let max = rounding.apply(exact_max);
    Some(Solution {
        nominal,
        min: (min < nominal).then_some(min),
        max: (max > nominal).then_some(max),
        exact,
        exact_min,
        exact_max,
    })
}
