mod report;
mod snapshot;

use std::collections::BTreeMap;

use itertools::Itertools;

pub use self::{
    report::{Output, Report},
    snapshot::{BlurOutcome, FieldSnapshot, GroupSnapshot},
};
use crate::{
    field::{Card, FieldId, GroupId, GroupKind, Role, Seed},
    group::FieldGroup,
    path::{Path, SolvePath},
    prelude::*,
    quantity::Triple,
    settings::Settings,
    solver::{Relation, Solution, solve},
};

/// Groups instantiated on a fresh page.
const LAYOUT: [(Card, GroupKind); 7] = [
    (Card::Runtime, GroupKind::Pack),
    (Card::Runtime, GroupKind::Load),
    (Card::Planner, GroupKind::Time),
    (Card::Planner, GroupKind::Load),
    (Card::Planner, GroupKind::Pack),
    (Card::Sizing, GroupKind::Energy),
    (Card::Sizing, GroupKind::Cell),
];

/// Session-scoped store of every field group and the planner lock.
///
/// Every mutation evaluates the affected group into a new record and replaces the old one
/// before returning, so no partially derived state is ever observable.
#[must_use]
pub struct Session {
    settings: Settings,
    groups: BTreeMap<GroupId, FieldGroup>,
    path: SolvePath,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let groups = LAYOUT
            .into_iter()
            .map(|(card, kind)| GroupId::new(card, kind))
            .map(|id| (id, FieldGroup::new(id)))
            .collect();
        Self { settings, groups, path: SolvePath::Unset }
    }

    #[must_use]
    pub const fn path(&self) -> SolvePath {
        self.path
    }

    /// Groups of the card, load entries in the order they were added.
    pub fn group_ids(&self, card: Card) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.keys().copied().filter(move |id| id.card == card)
    }

    pub fn group(&self, id: GroupId) -> Result<&FieldGroup> {
        self.groups.get(&id).with_context(|| format!("there is no group `{id}`"))
    }

    /// Sole mutation entry point: the field lost focus with the raw text in it.
    #[instrument(skip_all, fields(field = %id))]
    pub fn on_field_blur(&mut self, id: FieldId, raw_text: &str) -> Result<BlurOutcome> {
        let (group, rejection) = self.group(id.group)?.blur(id.role, raw_text, &self.settings)?;
        let is_entry = rejection.is_none() && group.value(id.role).is_some();
        self.groups.insert(id.group, group);

        if let Some(error) = rejection {
            debug!(raw_text, %error, "rejected");
        } else {
            debug!(raw_text, "accepted");
        }
        if is_entry && id.group.card == Card::Planner {
            self.observe_planner_entry(id.group.kind);
        }

        Ok(BlurOutcome {
            is_accepted: rejection.is_none(),
            error: rejection,
            snapshot: self.group_snapshot(id.group)?,
        })
    }

    pub fn group_snapshot(&self, id: GroupId) -> Result<GroupSnapshot> {
        let group = self.group(id)?;
        Ok(GroupSnapshot {
            id,
            fields: group
                .fields()
                .map(|(role, field)| FieldSnapshot {
                    id: id.field(role),
                    text: field.raw_text.clone(),
                    is_owner: field.is_owner(),
                    error: field.error,
                })
                .collect(),
            error: group.error().map(|(role, error)| (id.field(role), error)),
            is_visible: id.card != Card::Planner || !self.path.hides(id.kind),
            derived: self.report(id.card).primary(),
        })
    }

    /// Reinitialize the group with the defaults. Resetting a planner group unlocks the path.
    #[instrument(skip_all, fields(group = %id))]
    pub fn reset_group(&mut self, id: GroupId, defaults: &[Seed]) -> Result {
        let group = self.group(id)?.reset(defaults, &self.settings)?;
        self.groups.insert(id, group);
        if id.card == Card::Planner {
            self.unlock();
        }
        info!(n_defaults = defaults.len(), "reset");
        Ok(())
    }

    /// Page reset: drop the extra load entries and clear every group of the card.
    #[instrument(skip_all, fields(card = %card))]
    pub fn reset_card(&mut self, card: Card) {
        self.groups.retain(|id, _| id.card != card);
        for (_, kind) in LAYOUT.into_iter().filter(|(layout_card, _)| *layout_card == card) {
            let id = GroupId::new(card, kind);
            self.groups.insert(id, FieldGroup::new(id));
        }
        if card == Card::Planner {
            self.unlock();
        }
        info!("reset");
    }

    /// Add a repeatable load entry to the runtime card.
    pub fn add_load(&mut self) -> GroupId {
        let index = self.loads().map(|group| group.id().index).max().map_or(0, |index| index + 1);
        let id = GroupId::new(Card::Runtime, GroupKind::Load).with_index(index);
        self.groups.insert(id, FieldGroup::new(id));
        info!(group = %id, "added a load entry");
        id
    }

    /// Remove a load entry from the runtime card, keeping at least one.
    pub fn remove_load(&mut self, id: GroupId) -> Result {
        ensure!(
            id.card == Card::Runtime && id.kind == GroupKind::Load,
            "`{id}` is not a runtime load entry",
        );
        self.group(id)?;
        ensure!(self.loads().count() > 1, "the last load entry cannot be removed");
        self.groups.remove(&id);
        info!(group = %id, "removed the load entry");
        Ok(())
    }

    /// Recompute every output of the card from the current snapshot.
    #[must_use]
    pub fn report(&self, card: Card) -> Report {
        let outputs = match card {
            Card::Runtime => self.runtime_outputs(),
            Card::Planner => self.planner_outputs(),
            Card::Sizing => self.sizing_outputs(),
        };
        Report { card, path: (card == Card::Planner).then_some(self.path), outputs }
    }

    fn runtime_outputs(&self) -> Vec<Output> {
        let energy = self.pack_energy(Card::Runtime);
        let load = self.loads().map(FieldGroup::triple).sum::<Triple>();
        let time = energy.and_then(|energy| solve(Relation::Time, &energy.exact_triple(), &load));
        [
            Output::from_solution(self.pack_energy_relation(), energy),
            Output::from_solution(Relation::Time, time),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn planner_outputs(&self) -> Vec<Output> {
        let time = self.triple(GroupId::new(Card::Planner, GroupKind::Time));
        match self.path.locked() {
            None => Vec::new(),
            Some(Path::ViaLoad) => {
                let load = self.triple(GroupId::new(Card::Planner, GroupKind::Load));
                Output::from_solution(Relation::Energy, solve(Relation::Energy, &load, &time))
                    .into_iter()
                    .collect()
            }
            Some(Path::ViaEnergy) => {
                let energy = self.pack_energy(Card::Planner);
                let load = energy
                    .and_then(|energy| solve(Relation::Load, &energy.exact_triple(), &time));
                [
                    Output::from_solution(self.pack_energy_relation(), energy),
                    Output::from_solution(Relation::Load, load),
                ]
                .into_iter()
                .flatten()
                .collect()
            }
        }
    }

    /// Size by the capacity when there is one, otherwise by the cell count.
    fn sizing_outputs(&self) -> Vec<Output> {
        let energy = self.triple(GroupId::new(Card::Sizing, GroupKind::Energy));
        let cell = GroupId::new(Card::Sizing, GroupKind::Cell);
        let cell_voltage = self.settings.cell_voltage;
        let (relation, known) = if let Some(capacity) = self.value(cell.field(Role::Nominal)) {
            (Relation::CellCount { cell_voltage }, capacity)
        } else if let Some(count) = self.value(cell.field(Role::Count)) {
            (Relation::Capacity { cell_voltage }, count)
        } else {
            return Vec::new();
        };
        Output::from_solution(relation, solve(relation, &energy, &Triple::nominal(known)))
            .into_iter()
            .collect()
    }

    const fn pack_energy_relation(&self) -> Relation {
        Relation::PackEnergy { cell_voltage: self.settings.cell_voltage }
    }

    fn pack_energy(&self, card: Card) -> Option<Solution> {
        let pack = GroupId::new(card, GroupKind::Pack);
        let cells = Triple { nominal: self.value(pack.field(Role::Count)), ..Triple::default() };
        solve(self.pack_energy_relation(), &cells, &self.triple(pack))
    }

    fn loads(&self) -> impl Iterator<Item = &FieldGroup> {
        self.groups
            .values()
            .filter(|group| group.id().card == Card::Runtime && group.id().kind == GroupKind::Load)
    }

    fn value(&self, id: FieldId) -> Option<f64> {
        self.groups.get(&id.group)?.value(id.role)
    }

    fn triple(&self, id: GroupId) -> Triple {
        self.groups.get(&id).map(FieldGroup::triple).unwrap_or_default()
    }

    /// Lock the planner on an accepted entry once the run time is known.
    ///
    /// An entry into the run time itself locks the path when exactly one category holds data.
    fn observe_planner_entry(&mut self, kind: GroupKind) {
        let time = GroupId::new(Card::Planner, GroupKind::Time);
        let is_prerequisite_met = self.value(time.field(Role::Nominal)).is_some();
        let entry = if kind == GroupKind::Time {
            [Path::ViaLoad, Path::ViaEnergy]
                .into_iter()
                .filter(|path| {
                    self.groups
                        .get(&GroupId::new(Card::Planner, path.category()))
                        .is_some_and(FieldGroup::has_values)
                })
                .exactly_one()
                .ok()
        } else {
            Path::from_category(kind)
        };
        let path = self.path.observe(is_prerequisite_met, entry);
        if path != self.path {
            info!(?path, "locked the solve path");
            self.path = path;
        }
    }

    fn unlock(&mut self) {
        if self.path != SolvePath::Unset {
            info!("unlocked the solve path");
            self.path = SolvePath::Unset;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        quantity::Kind,
        validation::{Limit, ValidationError},
    };

    fn field(card: Card, kind: GroupKind, role: Role) -> FieldId {
        GroupId::new(card, kind).field(role)
    }

    fn enter(session: &mut Session, id: FieldId, text: &str) {
        let outcome = session.on_field_blur(id, text).unwrap();
        assert!(outcome.is_accepted, "`{id}` rejected `{text}`: {:?}", outcome.error);
    }

    fn runtime_pack(session: &mut Session) {
        enter(session, field(Card::Runtime, GroupKind::Pack, Role::Count), "7");
        enter(session, field(Card::Runtime, GroupKind::Pack, Role::Nominal), "2000");
    }

    fn runtime_load(session: &mut Session) {
        enter(session, field(Card::Runtime, GroupKind::Load, Role::Min), "8");
        enter(session, field(Card::Runtime, GroupKind::Load, Role::Max), "12");
    }

    #[test]
    fn runtime_ok() {
        let mut session = Session::new(Settings::default());
        runtime_pack(&mut session);
        runtime_load(&mut session);

        let report = session.report(Card::Runtime);
        let energy = report.output(Kind::Energy).unwrap().solution;
        assert_abs_diff_eq!(energy.nominal, 50.4, epsilon = 1e-9);
        let time = report.primary().unwrap();
        assert_eq!(time.kind, Kind::Time);
        assert_abs_diff_eq!(time.solution.nominal, 302.4, epsilon = 1e-9);
        assert_abs_diff_eq!(time.solution.min.unwrap(), 252.0, epsilon = 1e-9);
        assert_abs_diff_eq!(time.solution.max.unwrap(), 378.0, epsilon = 1e-9);

        let snapshot = session.group_snapshot(GroupId::new(Card::Runtime, GroupKind::Load)).unwrap();
        let nominal = snapshot.field(field(Card::Runtime, GroupKind::Load, Role::Nominal)).unwrap();
        assert_eq!(nominal.text, "10");
        assert!(!nominal.is_owner);
        assert_eq!(snapshot.derived, Some(time));
    }

    #[test]
    fn runtime_is_rounded_once() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Runtime, GroupKind::Pack, Role::Count), "3");
        enter(&mut session, field(Card::Runtime, GroupKind::Pack, Role::Nominal), "1111");
        enter(&mut session, field(Card::Runtime, GroupKind::Load, Role::Nominal), "7");

        let report = session.report(Card::Runtime);
        assert_abs_diff_eq!(report.output(Kind::Energy).unwrap().solution.nominal, 12.0);
        let time = report.primary().unwrap().solution;
        assert_abs_diff_eq!(time.nominal, 102.8, epsilon = 1e-9);
        assert_abs_diff_eq!(time.exact, 102.847, epsilon = 1e-3);
    }

    #[test]
    fn runtime_keeps_extremes_hidden_by_energy_rounding() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Runtime, GroupKind::Pack, Role::Count), "1");
        enter(&mut session, field(Card::Runtime, GroupKind::Pack, Role::Nominal), "2000");
        enter(&mut session, field(Card::Runtime, GroupKind::Pack, Role::Max), "2001");
        enter(&mut session, field(Card::Runtime, GroupKind::Load, Role::Nominal), "0.1");

        let report = session.report(Card::Runtime);
        assert_eq!(report.output(Kind::Energy).unwrap().solution.max, None);
        let time = report.primary().unwrap().solution;
        assert_abs_diff_eq!(time.nominal, 4320.0, epsilon = 1e-9);
        assert_eq!(time.min, None);
        assert_abs_diff_eq!(time.max.unwrap(), 4322.2, epsilon = 1e-9);
    }

    #[test]
    fn planner_load_is_rounded_once() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Planner, GroupKind::Time, Role::Nominal), "60");
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Count), "1");
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Nominal), "2000");
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Max), "2013");

        // 7.2468 Wh shows as 7.25 Wh, yet it only sustains 7.2 W for an hour:
        let report = session.report(Card::Planner);
        let energy = report.output(Kind::Energy).unwrap().solution;
        assert_abs_diff_eq!(energy.max.unwrap(), 7.25, epsilon = 1e-9);
        let load = report.primary().unwrap().solution;
        assert_abs_diff_eq!(load.nominal, 7.2, epsilon = 1e-9);
        assert_eq!(load.max, None);
    }

    #[test]
    fn reset_rejects_crossing_defaults() {
        let mut session = Session::new(Settings::default());
        let load = GroupId::new(Card::Runtime, GroupKind::Load);
        session
            .reset_group(load, &[Seed::new(Role::Nominal, "10"), Seed::new(Role::Min, "20")])
            .unwrap();
        let snapshot = session.group_snapshot(load).unwrap();
        assert_eq!(
            snapshot.error,
            Some((load.field(Role::Min), ValidationError::CrossFieldViolation(Limit::AtMost(10.0)))),
        );
        assert!(session.group(load).unwrap().triple().is_ordered());
        assert_eq!(session.group(load).unwrap().value(Role::Min), None);
    }

    #[test]
    fn runtime_without_load() {
        let mut session = Session::new(Settings::default());
        runtime_pack(&mut session);
        let report = session.report(Card::Runtime);
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.primary().unwrap().kind, Kind::Energy);
    }

    #[test]
    fn multiple_loads_ok() {
        let mut session = Session::new(Settings::default());
        runtime_pack(&mut session);
        runtime_load(&mut session);
        let extra = session.add_load();
        assert_eq!(extra.index, 1);
        enter(&mut session, extra.field(Role::Nominal), "5");

        let time = session.report(Card::Runtime).primary().unwrap().solution;
        assert_abs_diff_eq!(time.nominal, 201.6, epsilon = 1e-9);
        assert_abs_diff_eq!(time.min.unwrap(), 177.9, epsilon = 1e-9);
        assert_abs_diff_eq!(time.max.unwrap(), 232.6, epsilon = 1e-9);

        session.remove_load(extra).unwrap();
        assert!(session.group(extra).is_err());
        assert!(session.remove_load(GroupId::new(Card::Runtime, GroupKind::Load)).is_err());
        assert!(session.remove_load(GroupId::new(Card::Runtime, GroupKind::Pack)).is_err());
    }

    #[test]
    fn reset_card_drops_extra_loads() {
        let mut session = Session::new(Settings::default());
        runtime_pack(&mut session);
        session.add_load();
        session.reset_card(Card::Runtime);
        assert_eq!(session.group_ids(Card::Runtime).count(), 2);
        assert!(session.report(Card::Runtime).outputs.is_empty());
    }

    #[test]
    fn planner_via_load_ok() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Planner, GroupKind::Time, Role::Nominal), "60");
        assert_eq!(session.path(), SolvePath::Unset);
        enter(&mut session, field(Card::Planner, GroupKind::Load, Role::Nominal), "10");
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaLoad));

        let energy = session.report(Card::Planner).primary().unwrap();
        assert_eq!(energy.kind, Kind::Energy);
        assert_abs_diff_eq!(energy.solution.nominal, 10.0, epsilon = 1e-9);

        // The opposing section is ignored from now on:
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Count), "7");
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaLoad));
        assert_eq!(session.report(Card::Planner).primary(), Some(energy));
        let pack = GroupId::new(Card::Planner, GroupKind::Pack);
        assert!(!session.group_snapshot(pack).unwrap().is_visible);
        assert_eq!(session.report(Card::Planner).hidden(), Some(GroupKind::Pack));

        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Nominal), "2000");
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaLoad));
        assert_eq!(session.report(Card::Planner).primary(), Some(energy));
        let snapshot = session.group_snapshot(GroupId::new(Card::Planner, GroupKind::Time)).unwrap();
        assert_eq!(snapshot.derived, Some(energy));

        // Clearing does not unlock:
        enter(&mut session, field(Card::Planner, GroupKind::Load, Role::Nominal), "");
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaLoad));

        session.reset_group(GroupId::new(Card::Planner, GroupKind::Load), &[]).unwrap();
        assert_eq!(session.path(), SolvePath::Unset);
        assert!(session.group_snapshot(pack).unwrap().is_visible);
    }

    #[test]
    fn planner_locks_on_time_entry() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Planner, GroupKind::Load, Role::Nominal), "10");
        assert_eq!(session.path(), SolvePath::Unset);
        enter(&mut session, field(Card::Planner, GroupKind::Time, Role::Nominal), "60");
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaLoad));
    }

    #[test]
    fn planner_ambiguous_time_entry() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Planner, GroupKind::Load, Role::Nominal), "10");
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Count), "7");
        enter(&mut session, field(Card::Planner, GroupKind::Time, Role::Nominal), "60");
        assert_eq!(session.path(), SolvePath::Unset);
        assert!(session.report(Card::Planner).outputs.is_empty());
    }

    #[test]
    fn planner_via_energy_ok() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Planner, GroupKind::Time, Role::Nominal), "60");
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Count), "7");
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaEnergy));
        enter(&mut session, field(Card::Planner, GroupKind::Pack, Role::Nominal), "2000");

        let report = session.report(Card::Planner);
        assert_eq!(report.path, Some(SolvePath::Locked(Path::ViaEnergy)));
        let load = report.primary().unwrap();
        assert_eq!(load.kind, Kind::Load);
        assert_abs_diff_eq!(load.solution.nominal, 50.4, epsilon = 1e-9);
        assert!(!session.group_snapshot(GroupId::new(Card::Planner, GroupKind::Load)).unwrap().is_visible);
    }

    #[test]
    fn sizing_ok() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Sizing, GroupKind::Energy, Role::Nominal), "12.5");
        enter(&mut session, field(Card::Sizing, GroupKind::Cell, Role::Nominal), "2000");

        let count = session.report(Card::Sizing).primary().unwrap();
        assert_eq!(count.kind, Kind::CellCount);
        assert_abs_diff_eq!(count.solution.nominal, 2.0);
        assert_abs_diff_eq!(count.solution.exact, 1.736, epsilon = 1e-3);
    }

    #[test]
    fn sizing_by_cell_count() {
        let mut session = Session::new(Settings::default());
        enter(&mut session, field(Card::Sizing, GroupKind::Energy, Role::Nominal), "12.5");
        enter(&mut session, field(Card::Sizing, GroupKind::Cell, Role::Count), "2");

        let capacity = session.report(Card::Sizing).primary().unwrap();
        assert_eq!(capacity.kind, Kind::Capacity);
        assert_abs_diff_eq!(capacity.solution.nominal, 1737.0);
    }

    #[test]
    fn unknown_field() {
        let mut session = Session::new(Settings::default());
        let id = GroupId::new(Card::Runtime, GroupKind::Load).with_index(5).field(Role::Nominal);
        assert!(session.on_field_blur(id, "10").is_err());
        let id = field(Card::Sizing, GroupKind::Energy, Role::Count);
        assert!(session.on_field_blur(id, "10").is_err());
    }

    #[test]
    fn rejected_blur_reverts() {
        let mut session = Session::new(Settings::default());
        let id = field(Card::Runtime, GroupKind::Pack, Role::Count);
        enter(&mut session, id, "7");
        let outcome = session.on_field_blur(id, "abc").unwrap();
        assert!(!outcome.is_accepted);
        assert_eq!(outcome.error, Some(ValidationError::NotANumber));
        let snapshot = outcome.snapshot.field(id).unwrap();
        assert_eq!(snapshot.text, "7");
        assert_eq!(snapshot.error, Some(ValidationError::NotANumber));
        assert_eq!(outcome.snapshot.error, Some((id, ValidationError::NotANumber)));
    }
}
