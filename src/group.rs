mod shape;

use std::collections::BTreeMap;

use itertools::Itertools;

pub use self::shape::Shape;
use crate::{
    field::{Field, GroupId, GroupKind, Origin, Role, Seed},
    prelude::*,
    quantity::{Kind, Triple},
    settings::Settings,
    validation::{Bounds, ValidationError, validate},
};

impl GroupKind {
    #[must_use]
    pub const fn shape(self) -> Shape {
        match self {
            Self::Pack => Shape::Paired,
            Self::Load | Self::Energy => Shape::Symmetric,
            Self::Time => Shape::MutualSeed,
            Self::Cell => Shape::Independent,
        }
    }

    /// Quantity kind of the field with the role.
    #[must_use]
    pub const fn quantity(self, role: Role) -> Kind {
        match (self, role) {
            (Self::Pack | Self::Cell, Role::Count) => Kind::CellCount,
            (Self::Pack | Self::Cell, _) => Kind::Capacity,
            (Self::Load, _) => Kind::Load,
            (Self::Time, _) => Kind::Time,
            (Self::Energy, _) => Kind::Energy,
        }
    }
}

/// Fields sharing one derivation relationship.
///
/// Updates never mutate a group in place from the outside: [`FieldGroup::blur`] and
/// [`FieldGroup::reset`] return the next record, and the caller replaces the old one.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct FieldGroup {
    id: GroupId,
    fields: BTreeMap<Role, Field>,
}

impl FieldGroup {
    pub fn new(id: GroupId) -> Self {
        let fields = id.kind.shape().roles().iter().map(|role| (role, Field::default())).collect();
        Self { id, fields }
    }

    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.id.kind.shape()
    }

    /// Fields in the priority order.
    pub fn fields(&self) -> impl Iterator<Item = (Role, &Field)> {
        self.fields.iter().map(|(role, field)| (*role, field))
    }

    #[must_use]
    pub fn field(&self, role: Role) -> Option<&Field> {
        self.fields.get(&role)
    }

    #[must_use]
    pub fn value(&self, role: Role) -> Option<f64> {
        self.fields.get(&role)?.value
    }

    /// Nominal, minimum, and maximum as exposed to the solver.
    pub fn triple(&self) -> Triple {
        Triple {
            nominal: self.value(Role::Nominal),
            min: self.value(Role::Min),
            max: self.value(Role::Max),
        }
    }

    #[must_use]
    pub fn has_values(&self) -> bool {
        self.fields.values().any(|field| field.value.is_some())
    }

    /// The single error the group's error surface shows.
    #[must_use]
    pub fn error(&self) -> Option<(Role, ValidationError)> {
        self.fields().find_map(|(role, field)| field.error.map(|error| (role, error)))
    }

    /// Apply the user's edit of one field and re-evaluate the group.
    ///
    /// Returns the next group record, and the rejection if the edit failed validation,
    /// in which case the field has been reverted to its last valid text.
    pub fn blur(
        &self,
        role: Role,
        raw_text: &str,
        settings: &Settings,
    ) -> Result<(Self, Option<ValidationError>)> {
        ensure!(self.fields.contains_key(&role), "`{}` has no `{role}` field", self.id);
        let mut next = self.clone();
        let rejection = next.assert(role, raw_text.trim(), settings);
        next.revalidate(Some(role), settings);
        next.resolve();
        if let Some(error) = rejection
            && let Some(field) = next.fields.get_mut(&role)
        {
            // Auto-population of a reverted field must not hide the rejection:
            field.error = Some(error);
        }
        Ok((next, rejection))
    }

    /// Reinitialize the fields with the defaults, clearing ownership and errors.
    pub fn reset(&self, defaults: &[Seed], settings: &Settings) -> Result<Self> {
        let mut next = Self::new(self.id);
        for seed in defaults {
            let field = next
                .fields
                .get_mut(&seed.role)
                .with_context(|| format!("`{}` has no `{}` field", self.id, seed.role))?;
            *field = Field::seeded(&seed.text);
        }
        next.revalidate(None, settings);
        next.resolve();
        Ok(next)
    }

    /// Auto-populate every non-owner derivable field from the anchors.
    ///
    /// Sources are anchors only, and anchors are never written here, so the result does not
    /// depend on the evaluation order and a repeated call changes nothing.
    pub fn resolve(&mut self) {
        let shape = self.shape();
        let updates = shape
            .roles()
            .iter()
            .filter(|role| {
                shape.derives(*role) && self.fields.get(role).is_some_and(|field| !field.is_owner())
            })
            .map(|role| (role, shape.derive(role, |peer| self.anchor(peer))))
            .collect_vec();
        for (role, value) in updates {
            let precision = self.id.kind.quantity(role).precision();
            let Some(field) = self.fields.get_mut(&role) else {
                continue;
            };
            match value {
                Some(value) => field.write_derived(precision.round(value)),
                None if field.origin == Origin::Derived => field.clear(),
                None => {}
            }
        }
    }

    /// Value the peers may rely on: valid, and either owned or not derivable at all.
    fn anchor(&self, role: Role) -> Option<f64> {
        let field = self.fields.get(&role)?;
        if field.is_owner() || !self.shape().derives(role) { field.value } else { None }
    }

    fn bounds(&self, role: Role, settings: &Settings) -> Bounds {
        self.shape().bounds(
            role,
            |peer| if peer == role { None } else { self.anchor(peer) },
            settings,
        )
    }

    /// Bounds of a re-checked field.
    ///
    /// A default is also held against the defaults of the roles before it, so that the defaults
    /// cannot cross each other. They still give way to the owners.
    fn revalidation_bounds(&self, role: Role, settings: &Settings) -> Bounds {
        let is_seeded = |peer: Role| {
            self.fields.get(&peer).is_some_and(|field| field.origin == Origin::Seeded)
        };
        if !is_seeded(role) {
            return self.bounds(role, settings);
        }
        self.shape().bounds(
            role,
            |peer| match self.anchor(peer) {
                Some(value) if peer != role => Some(value),
                _ if peer < role && is_seeded(peer) => self.fields.get(&peer)?.value,
                _ => None,
            },
            settings,
        )
    }

    /// First pass for the edited field: take the text or revert it.
    fn assert(&mut self, role: Role, text: &str, settings: &Settings) -> Option<ValidationError> {
        let kind = self.id.kind.quantity(role);
        let bounds = self.bounds(role, settings);
        let field = self.fields.get_mut(&role)?;
        match validate(kind, text, bounds) {
            Ok(value) => {
                field.raw_text = text.to_owned();
                field.last_valid_text = text.to_owned();
                field.origin = if value.is_some() { Origin::User } else { Origin::Empty };
                field.error = None;
                field.value = value;
                None
            }
            Err(error) => {
                field.raw_text.clone_from(&field.last_valid_text);
                field.value = validate(kind, &field.raw_text, bounds).ok().flatten();
                field.error = Some(error);
                Some(error)
            }
        }
    }

    /// Second pass: re-check every other non-derived field in the declaration order.
    fn revalidate(&mut self, edited: Option<Role>, settings: &Settings) {
        for role in self.shape().roles() {
            if Some(role) == edited {
                continue;
            }
            let kind = self.id.kind.quantity(role);
            let bounds = self.revalidation_bounds(role, settings);
            let Some(field) = self.fields.get_mut(&role) else {
                continue;
            };
            if field.origin == Origin::Derived {
                continue;
            }
            match validate(kind, &field.raw_text, bounds) {
                Ok(value) => {
                    field.value = value;
                    field.error = None;
                    field.last_valid_text.clone_from(&field.raw_text);
                }
                Err(error) => {
                    field.value = None;
                    field.error = Some(error);
                }
            }
        }
    }
}
