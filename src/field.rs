mod id;

use serde::Deserialize;

pub use self::id::{Card, FieldId, GroupId, GroupKind, Role};
use crate::{quantity::precision::format_value, validation::ValidationError};

/// Who put the current text into a field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    Empty,

    /// Typed by the user: the field is an owner.
    User,

    /// Auto-populated from the owner peers.
    Derived,

    /// Caller-supplied default from a group reset.
    Seeded,
}

/// One user-facing numeric input.
///
/// [`Field::value`] is the validated value of [`Field::raw_text`], absent when the text is empty
/// or currently fails validation. [`Field::error`] is what the group's error surface shows:
/// for a rejected edit, the text has already been reverted and the error explains the rejection.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub raw_text: String,
    pub origin: Origin,
    pub error: Option<ValidationError>,
    pub last_valid_text: String,
    pub value: Option<f64>,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            raw_text: String::new(),
            origin: Origin::Empty,
            error: None,
            last_valid_text: String::new(),
            value: None,
        }
    }
}

impl Field {
    pub fn seeded(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }
        Self { raw_text: text.to_owned(), origin: Origin::Seeded, ..Self::default() }
    }

    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self.origin, Origin::User)
    }

    /// Auto-populate with the already rounded value.
    pub(crate) fn write_derived(&mut self, value: f64) {
        let text = format_value(value);
        self.raw_text.clone_from(&text);
        self.last_valid_text = text;
        self.origin = Origin::Derived;
        self.error = None;
        self.value = Some(value);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Default text for a field, supplied on a group reset.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
    pub role: Role,
    pub text: String,
}

impl Seed {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_ok() {
        let field = Field::seeded(" 10 ");
        assert_eq!(field.raw_text, "10");
        assert_eq!(field.origin, Origin::Seeded);
        assert!(!field.is_owner());
    }

    #[test]
    fn seeded_empty_ok() {
        assert_eq!(Field::seeded(""), Field::default());
    }

    #[test]
    fn write_derived_ok() {
        let mut field = Field::default();
        field.write_derived(10.0);
        assert_eq!(field.raw_text, "10");
        assert_eq!(field.last_valid_text, "10");
        assert_eq!(field.value, Some(10.0));
        assert!(!field.is_owner());
    }
}
