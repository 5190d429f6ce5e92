use crate::field::GroupKind;

/// Algebraic direction of the planner card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Path {
    /// Required energy from the load and the run time.
    #[display("via load")]
    ViaLoad,

    /// Sustainable load from the pack energy and the run time.
    #[display("via energy")]
    ViaEnergy,
}

impl Path {
    /// Input category that drives the path.
    #[must_use]
    pub const fn category(self) -> GroupKind {
        match self {
            Self::ViaLoad => GroupKind::Load,
            Self::ViaEnergy => GroupKind::Pack,
        }
    }

    #[must_use]
    pub const fn from_category(kind: GroupKind) -> Option<Self> {
        match kind {
            GroupKind::Load => Some(Self::ViaLoad),
            GroupKind::Pack => Some(Self::ViaEnergy),
            _ => None,
        }
    }
}

/// Solve-path lock: once the first unambiguous entry picks a path, only a reset clears it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SolvePath {
    #[default]
    Unset,

    Locked(Path),
}

impl SolvePath {
    /// Observe an accepted, non-empty entry.
    ///
    /// The lock only fires when the prerequisite (run time) is in place. A locked state
    /// ignores everything: clearing fields never unlocks it.
    #[must_use]
    pub const fn observe(self, is_prerequisite_met: bool, entry: Option<Path>) -> Self {
        match (self, entry) {
            (Self::Unset, Some(path)) if is_prerequisite_met => Self::Locked(path),
            _ => self,
        }
    }

    #[must_use]
    pub const fn locked(self) -> Option<Path> {
        match self {
            Self::Unset => None,
            Self::Locked(path) => Some(path),
        }
    }

    /// Whether the group kind belongs to the opposing path's input section.
    #[must_use]
    pub fn hides(self, kind: GroupKind) -> bool {
        self.locked().is_some_and(|path| {
            Path::from_category(kind).is_some_and(|category| category != path)
        })
    }
}
