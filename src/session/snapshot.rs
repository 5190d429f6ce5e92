use crate::{
    field::{FieldId, GroupId},
    session::report::Output,
    validation::ValidationError,
};

/// Read-only projection of one field for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
    pub id: FieldId,
    pub text: String,
    pub is_owner: bool,
    pub error: Option<ValidationError>,
}

/// Read-only projection of a group for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub fields: Vec<FieldSnapshot>,

    /// The one message the group's error surface shows.
    pub error: Option<(FieldId, ValidationError)>,

    /// Cleared for the opposing input section once the planner path is locked.
    pub is_visible: bool,

    /// Primary result of the card the group belongs to.
    pub derived: Option<Output>,
}

impl GroupSnapshot {
    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// Result of the sole mutation entry point.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurOutcome {
    pub is_accepted: bool,
    pub error: Option<ValidationError>,
    pub snapshot: GroupSnapshot,
}
