use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Calculator page.
#[derive(Debug, Hash, PartialOrd, Ord, EnumSetType)]
pub enum Card {
    /// Forward calculation: how long the pack lasts under the load.
    Runtime,

    /// Ambiguous entry: required energy from the load, or sustainable load from the pack.
    Planner,

    /// Cell count or cell capacity needed for the required energy.
    Sizing,
}

/// Field group shape within a card.
#[derive(Debug, Hash, PartialOrd, Ord, EnumSetType)]
pub enum GroupKind {
    /// Cell count and capacity nominal, minimum, and maximum.
    Pack,

    /// Load nominal, minimum, and maximum.
    Load,

    /// Run time nominal and minimum.
    Time,

    /// Required energy nominal, minimum, and maximum.
    Energy,

    /// Either the cell capacity or the cell count for pack sizing.
    Cell,
}

/// Member of a group. The declaration order is the error surface priority.
#[derive(Debug, Hash, PartialOrd, Ord, EnumSetType)]
pub enum Role {
    Count,
    Nominal,
    Min,
    Max,
}

macro_rules! named {
    ($type:ty, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $type {
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl Display for $type {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $type {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                EnumSet::<Self>::all()
                    .iter()
                    .find(|variant| variant.as_str() == s)
                    .with_context(|| format!(concat!("unknown ", $what, " `{}`"), s))
            }
        }

        impl Serialize for $type {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

named!(Card, "card", { Runtime => "runtime", Planner => "planner", Sizing => "sizing" });
named!(GroupKind, "group", {
    Pack => "pack",
    Load => "load",
    Time => "time",
    Energy => "energy",
    Cell => "cell",
});
named!(Role, "role", { Count => "count", Nominal => "nominal", Min => "min", Max => "max" });

/// Stable group identifier, `card.kind` or `card.kind#index` for repeated load entries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GroupId {
    pub card: Card,
    pub kind: GroupKind,
    pub index: usize,
}

impl GroupId {
    #[must_use]
    pub const fn new(card: Card, kind: GroupKind) -> Self {
        Self { card, kind, index: 0 }
    }

    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    #[must_use]
    pub const fn field(self, role: Role) -> FieldId {
        FieldId { group: self, role }
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.card, self.kind)?;
        if self.index != 0 {
            write!(f, "#{}", self.index)?;
        }
        Ok(())
    }
}

impl FromStr for GroupId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (card, kind) = s.split_once('.').with_context(|| format!("invalid group `{s}`"))?;
        let (kind, index) = match kind.split_once('#') {
            Some((kind, index)) => {
                (kind, index.parse().with_context(|| format!("invalid group index in `{s}`"))?)
            }
            None => (kind, 0),
        };
        Ok(Self { card: card.parse()?, kind: kind.parse()?, index })
    }
}

/// Stable field identifier, `group.role`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub group: GroupId,
    pub role: Role,
}

impl Display for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group, self.role)
    }
}

impl FromStr for FieldId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (group, role) = s.rsplit_once('.').with_context(|| format!("invalid field `{s}`"))?;
        Ok(Self { group: group.parse()?, role: role.parse()? })
    }
}

macro_rules! serde_via_str {
    ($type:ty) => {
        impl Serialize for $type {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_via_str!(GroupId);
serde_via_str!(FieldId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_id_ok() {
        let id: FieldId = "runtime.load#2.min".parse().unwrap();
        assert_eq!(id, GroupId::new(Card::Runtime, GroupKind::Load).with_index(2).field(Role::Min));
    }

    #[test]
    fn display_field_id_ok() {
        let id = GroupId::new(Card::Planner, GroupKind::Time).field(Role::Nominal);
        assert_eq!(id.to_string(), "planner.time.nominal");
        assert_eq!(id.to_string().parse::<FieldId>().unwrap(), id);
    }

    #[test]
    fn parse_unknown_role() {
        assert!("sizing.cell.median".parse::<FieldId>().is_err());
    }

    #[test]
    fn role_priority_order() {
        assert!(Role::Count < Role::Nominal);
        assert!(Role::Nominal < Role::Min);
        assert!(Role::Min < Role::Max);
    }
}
