use std::{fs, path::Path};

use bon::bon;
use serde::Deserialize;

use crate::{prelude::*, quantity::charge::Volts};

/// Engine constants, loaded from a TOML file.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Nominal per-cell voltage used to convert capacity into energy.
    pub cell_voltage: Volts,

    /// Lowest allowed capacity minimum as a fraction of the capacity nominal.
    pub capacity_min_ratio: f64,

    /// Highest allowed capacity maximum as a fraction of the capacity nominal.
    pub capacity_max_ratio: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self { cell_voltage: Volts(3.6), capacity_min_ratio: 0.5, capacity_max_ratio: 1.15 }
    }
}

#[bon]
impl Settings {
    #[builder]
    pub fn new(
        #[builder(default = Volts(3.6))] cell_voltage: Volts,
        #[builder(default = 0.5)] capacity_min_ratio: f64,
        #[builder(default = 1.15)] capacity_max_ratio: f64,
    ) -> Result<Self> {
        if !cell_voltage.0.is_finite() || cell_voltage <= Volts::ZERO {
            bail!("invalid cell voltage: {cell_voltage}");
        }
        if !capacity_min_ratio.is_finite() || !(0.0..=1.0).contains(&capacity_min_ratio) {
            bail!("invalid capacity minimum ratio: {capacity_min_ratio}");
        }
        if !capacity_max_ratio.is_finite() || capacity_max_ratio < 1.0 {
            bail!("invalid capacity maximum ratio: {capacity_max_ratio}");
        }
        Ok(Self { cell_voltage, capacity_min_ratio, capacity_max_ratio })
    }
}

impl Settings {
    /// Read the settings file, or fall back to the defaults when there is none.
    #[instrument(skip_all)]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("using the default settings");
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let settings = Self::from_toml(&contents)
            .with_context(|| format!("failed to load the settings from `{}`", path.display()))?;
        info!(cell_voltage = ?settings.cell_voltage, "loaded the settings");
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw: Self = toml::from_str(contents)?;
        Self::builder()
            .cell_voltage(raw.cell_voltage)
            .capacity_min_ratio(raw.capacity_min_ratio)
            .capacity_max_ratio(raw.capacity_max_ratio)
            .build()
    }
}
