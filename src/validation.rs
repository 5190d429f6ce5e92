mod bounds;
mod error;

pub use self::{
    bounds::Bounds,
    error::{Limit, ValidationError},
};
use crate::quantity::Kind;

/// Number typed into a field, with the count of digits after the decimal point.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Decimal {
    value: f64,
    decimals: usize,
}

impl Decimal {
    /// Parse plain decimal text: optional sign, digits, and an optional fractional part.
    ///
    /// Exponents, `inf`, and `NaN` are not numbers here even though [`f64`] accepts them.
    fn parse(text: &str) -> Result<Option<Self>, ValidationError> {
        if text.is_empty() {
            return Ok(None);
        }
        let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(ValidationError::NotANumber);
        }
        // Too many digits overflow to an infinity, which the range check rejects:
        let value = text.parse::<f64>().map_err(|_| ValidationError::NotANumber)?;
        Ok(Some(Self { value, decimals: fraction.len() }))
    }
}

/// Validate the raw field text against the quantity domain and the anchor-relative bounds.
///
/// Empty text is valid and absent.
pub fn validate(kind: Kind, text: &str, bounds: Bounds) -> Result<Option<f64>, ValidationError> {
    let Some(Decimal { value, decimals }) = Decimal::parse(text.trim())? else {
        return Ok(None);
    };

    let range = kind.range();
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange { min: *range.start(), max: *range.end() });
    }

    let max_decimals = kind.precision().max_decimals(value);
    if decimals > usize::from(max_decimals) {
        return Err(ValidationError::WrongPrecision { max_decimals });
    }

    bounds.check(value)?;
    Ok(Some(value))
}
