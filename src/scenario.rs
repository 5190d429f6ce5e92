use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    field::{Card, FieldId, GroupId, Seed},
    prelude::*,
    session::Session,
    validation::ValidationError,
};

/// Scripted sequence of user interactions.
#[must_use]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Event {
    /// The field lost focus with the text in it.
    Blur { field: FieldId, text: String },

    Reset {
        group: GroupId,

        #[serde(default)]
        defaults: Vec<Seed>,
    },

    ResetCard { card: Card },

    AddLoad,

    RemoveLoad { group: GroupId },
}

impl Scenario {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let scenario = Self::from_toml(&contents)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(n_events = scenario.events.len(), "loaded the scenario");
        Ok(scenario)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Feed the events into the session, returning the rejected edits.
    ///
    /// A rejected edit is an ordinary outcome and does not stop the replay, API misuse does.
    pub fn replay(&self, session: &mut Session) -> Result<Vec<(FieldId, ValidationError)>> {
        let mut rejections = Vec::new();
        for (i, event) in self.events.iter().enumerate() {
            debug!(i, ?event, "replaying");
            match event {
                Event::Blur { field, text } => {
                    let outcome = session.on_field_blur(*field, text)?;
                    if let Some(error) = outcome.error {
                        warn!(%field, %text, %error, "rejected");
                        rejections.push((*field, error));
                    }
                }
                Event::Reset { group, defaults } => session.reset_group(*group, defaults)?,
                Event::ResetCard { card } => session.reset_card(*card),
                Event::AddLoad => {
                    session.add_load();
                }
                Event::RemoveLoad { group } => session.remove_load(*group)?,
            }
        }
        Ok(rejections)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        field::{GroupKind, Role},
        path::{Path, SolvePath},
        settings::Settings,
    };

    const PLANNER: &str = r#"
        [[events]]
        action = "blur"
        field = "planner.time.nominal"
        text = "60"

        [[events]]
        action = "blur"
        field = "planner.load.nominal"
        text = "10"

        [[events]]
        action = "blur"
        field = "planner.pack.count"
        text = "7.5"
    "#;

    #[test]
    fn parse_ok() {
        let scenario = Scenario::from_toml(PLANNER).unwrap();
        assert_eq!(scenario.events.len(), 3);
        let Event::Blur { field, text } = &scenario.events[1] else {
            panic!("unexpected event: {:?}", scenario.events[1]);
        };
        assert_eq!(field.to_string(), "planner.load.nominal");
        assert_eq!(text, "10");
    }

    #[test]
    fn parse_reset_ok() {
        let scenario = Scenario::from_toml(
            r#"
            [[events]]
            action = "reset"
            group = "runtime.load#1"
            defaults = [{ role = "nominal", text = "5" }]

            [[events]]
            action = "reset-card"
            card = "sizing"

            [[events]]
            action = "add-load"
            "#,
        )
        .unwrap();
        let Event::Reset { group, defaults } = &scenario.events[0] else {
            panic!("unexpected event: {:?}", scenario.events[0]);
        };
        assert_eq!(*group, GroupId::new(Card::Runtime, GroupKind::Load).with_index(1));
        assert_eq!(defaults[0].role, Role::Nominal);
        assert!(matches!(scenario.events[1], Event::ResetCard { card: Card::Sizing }));
        assert!(matches!(scenario.events[2], Event::AddLoad));
    }

    #[test]
    fn parse_unknown_action() {
        assert!(Scenario::from_toml("[[events]]\naction = \"submit\"").is_err());
    }

    #[test]
    fn replay_ok() {
        let mut session = Session::new(Settings::default());
        let rejections = Scenario::from_toml(PLANNER).unwrap().replay(&mut session).unwrap();
        assert_eq!(
            rejections,
            [(
                GroupId::new(Card::Planner, GroupKind::Pack).field(Role::Count),
                ValidationError::WrongPrecision { max_decimals: 0 },
            )],
        );
        assert_eq!(session.path(), SolvePath::Locked(Path::ViaLoad));
        let energy = session.report(Card::Planner).primary().unwrap();
        assert_abs_diff_eq!(energy.solution.nominal, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn replay_fails_on_misuse() {
        let scenario = Scenario::from_toml(
            r#"
            [[events]]
            action = "remove-load"
            group = "runtime.load"
            "#,
        )
        .unwrap();
        assert!(scenario.replay(&mut Session::new(Settings::default())).is_err());
    }
}
