use crate::{
    field::{Card, GroupKind},
    path::SolvePath,
    quantity::Kind,
    solver::{Relation, Solution},
};

/// Computed quantity of a card.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Output {
    pub kind: Kind,
    pub solution: Solution,
}

impl Output {
    pub fn from_solution(relation: Relation, solution: Option<Solution>) -> Option<Self> {
        solution.map(|solution| Self { kind: relation.output(), solution })
    }
}

/// Everything a card computes, in the calculation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub card: Card,

    /// Solve path of the planner card, absent for the other cards.
    pub path: Option<SolvePath>,

    pub outputs: Vec<Output>,
}

impl Report {
    /// The last computed quantity, which is what the card is for.
    #[must_use]
    pub fn primary(&self) -> Option<Output> {
        self.outputs.last().copied()
    }

    /// Input section ignored by the locked planner path.
    #[must_use]
    pub fn hidden(&self) -> Option<GroupKind> {
        let path = self.path?;
        [GroupKind::Load, GroupKind::Pack].into_iter().find(|kind| path.hides(*kind))
    }

    #[must_use]
    pub fn output(&self, kind: Kind) -> Option<Output> {
        self.outputs.iter().copied().find(|output| output.kind == kind)
    }
}
