use std::fmt::{Display, Formatter};

/// Recoverable, user-visible validation failure of a single field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ValidationError {
    NotANumber,
    OutOfRange { min: f64, max: f64 },
    WrongPrecision { max_decimals: u8 },
    CrossFieldViolation(Limit),
}

impl std::error::Error for ValidationError {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber => write!(f, "enter a number"),
            Self::OutOfRange { min, max } => write!(f, "must be between {min} and {max}"),
            Self::WrongPrecision { max_decimals: 0 } => write!(f, "must be a whole number"),
            Self::WrongPrecision { max_decimals: 1 } => write!(f, "at most one decimal place"),
            Self::WrongPrecision { max_decimals } => {
                write!(f, "at most {max_decimals} decimal places")
            }
            Self::CrossFieldViolation(limit) => write!(f, "{limit} given the other fields"),
        }
    }
}

/// Bound imposed on a field by its anchors.
#[derive(Copy, Clone, Debug, PartialEq, derive_more::Display)]
pub enum Limit {
    #[display("must be at least {_0}")]
    AtLeast(f64),

    #[display("must be at most {_0}")]
    AtMost(f64),

    #[display("must be between {_0} and {_1}")]
    Between(f64, f64),
}
