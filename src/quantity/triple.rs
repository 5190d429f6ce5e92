use std::iter::Sum;

/// Nominal value of a quantity with its independently optional extremes.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Triple {
    pub nominal: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Triple {
    pub const fn nominal(nominal: f64) -> Self {
        Self { nominal: Some(nominal), min: None, max: None }
    }

    pub const fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Present values, nominal first.
    pub fn values(&self) -> impl Iterator<Item = f64> + use<> {
        [self.nominal, self.min, self.max].into_iter().flatten()
    }

    /// Check `min ≤ nominal ≤ max` for the present members.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        let below = |lhs: Option<f64>, rhs: Option<f64>| match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => lhs <= rhs,
            _ => true,
        };
        below(self.min, self.nominal) && below(self.nominal, self.max) && below(self.min, self.max)
    }
}

/// Sum the triples that have a nominal value, an absent extreme standing in with the nominal.
impl Sum for Triple {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |total, triple| {
            let Some(nominal) = triple.nominal else {
                return total;
            };
            Self {
                nominal: Some(total.nominal.unwrap_or(0.0) + nominal),
                min: Some(total.min.unwrap_or(0.0) + triple.min.unwrap_or(nominal)),
                max: Some(total.max.unwrap_or(0.0) + triple.max.unwrap_or(nominal)),
            }
        })
    }
}
