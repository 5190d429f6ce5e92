use enumset::{EnumSet, enum_set};

use crate::{
    field::Role,
    quantity::precision::{ceil_snapped, floor_snapped},
    settings::Settings,
    validation::Bounds,
};

/// Derivation relationship shared by the fields of a group.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Shape {
    /// Nominal, minimum, and maximum derive from each other.
    Symmetric,

    /// Cell count plus capacity nominal with its extremes seeded from the nominal.
    Paired,

    /// Nominal and minimum, whichever comes first seeds the other.
    MutualSeed,

    /// Cell count and capacity without any derivation.
    Independent,
}

impl Shape {
    /// Roles in the declaration order, which is also the evaluation and error priority order.
    #[must_use]
    pub const fn roles(self) -> EnumSet<Role> {
        match self {
            Self::Symmetric => enum_set!(Role::Nominal | Role::Min | Role::Max),
            Self::Paired => enum_set!(Role::Count | Role::Nominal | Role::Min | Role::Max),
            Self::MutualSeed => enum_set!(Role::Nominal | Role::Min),
            Self::Independent => enum_set!(Role::Count | Role::Nominal),
        }
    }

    /// Whether the role is eligible for auto-population while not owned.
    #[must_use]
    pub const fn derives(self, role: Role) -> bool {
        match self {
            Self::Symmetric => matches!(role, Role::Nominal | Role::Min | Role::Max),
            Self::Paired => matches!(role, Role::Min | Role::Max),
            Self::MutualSeed => matches!(role, Role::Nominal | Role::Min),
            Self::Independent => false,
        }
    }

    /// Derivation table: the value of a non-owner role computed from the anchors.
    #[must_use]
    pub fn derive(self, role: Role, anchor: impl Fn(Role) -> Option<f64>) -> Option<f64> {
        match (self, role) {
            (Self::Symmetric, Role::Nominal) => match (anchor(Role::Min), anchor(Role::Max)) {
                (Some(min), Some(max)) => Some(f64::midpoint(min, max)),
                (min, max) => min.or(max),
            },
            (Self::Symmetric, Role::Min) => anchor(Role::Nominal).or_else(|| anchor(Role::Max)),
            (Self::Symmetric, Role::Max) => anchor(Role::Nominal).or_else(|| anchor(Role::Min)),
            (Self::Paired, Role::Min | Role::Max) => anchor(Role::Nominal),
            (Self::MutualSeed, Role::Nominal) => anchor(Role::Min),
            (Self::MutualSeed, Role::Min) => anchor(Role::Nominal),
            _ => None,
        }
    }

    /// Anchor-relative bounds of the role; absent anchors impose nothing.
    pub fn bounds(
        self,
        role: Role,
        anchor: impl Fn(Role) -> Option<f64>,
        settings: &Settings,
    ) -> Bounds {
        let bounds = Bounds::default();
        match (self, role) {
            (Self::Symmetric, Role::Nominal) => {
                bounds.at_least(anchor(Role::Min)).at_most(anchor(Role::Max))
            }
            (Self::Symmetric, Role::Min) => {
                bounds.at_most(anchor(Role::Nominal)).at_most(anchor(Role::Max))
            }
            (Self::Symmetric, Role::Max) => {
                bounds.at_least(anchor(Role::Nominal)).at_least(anchor(Role::Min))
            }
            (Self::Paired, Role::Min) => {
                let nominal = anchor(Role::Nominal);
                bounds
                    .at_least(nominal.map(|nominal| ceil_snapped(nominal * settings.capacity_min_ratio)))
                    .at_most(nominal)
                    .at_most(anchor(Role::Max))
            }
            (Self::Paired, Role::Max) => {
                let nominal = anchor(Role::Nominal);
                bounds
                    .at_least(nominal)
                    .at_least(anchor(Role::Min))
                    .at_most(nominal.map(|nominal| floor_snapped(nominal * settings.capacity_max_ratio)))
            }
            (Self::MutualSeed, Role::Nominal) => bounds.at_least(anchor(Role::Min)),
            (Self::MutualSeed, Role::Min) => bounds.at_most(anchor(Role::Nominal)),
            _ => bounds,
        }
    }
}
