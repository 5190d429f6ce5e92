use crate::validation::{Limit, ValidationError};

/// Anchor-relative inclusive bounds; an absent side is unbounded.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Bounds {
    /// Tighten the lower bound with the anchor, if present.
    pub fn at_least(mut self, anchor: Option<f64>) -> Self {
        if let Some(anchor) = anchor {
            self.low = Some(self.low.map_or(anchor, |low| low.max(anchor)));
        }
        self
    }

    /// Tighten the upper bound with the anchor, if present.
    pub fn at_most(mut self, anchor: Option<f64>) -> Self {
        if let Some(anchor) = anchor {
            self.high = Some(self.high.map_or(anchor, |high| high.min(anchor)));
        }
        self
    }

    #[must_use]
    pub const fn limit(self) -> Option<Limit> {
        match (self.low, self.high) {
            (Some(low), Some(high)) => Some(Limit::Between(low, high)),
            (Some(low), None) => Some(Limit::AtLeast(low)),
            (None, Some(high)) => Some(Limit::AtMost(high)),
            (None, None) => None,
        }
    }

    pub fn check(self, value: f64) -> Result<(), ValidationError> {
        let is_below = self.low.is_some_and(|low| value < low);
        let is_above = self.high.is_some_and(|high| value > high);
        match self.limit() {
            Some(limit) if is_below || is_above => Err(ValidationError::CrossFieldViolation(limit)),
            _ => Ok(()),
        }
    }
}
