use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Settings file, the defaults are used without one.
    #[clap(long = "settings", env = "SETTINGS_PATH")]
    pub settings_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// How long the pack lasts under the load.
    #[clap(name = "runtime")]
    Runtime(Box<RuntimeArgs>),

    /// Required energy from the load, or sustainable load from the pack, for the run time.
    ///
    /// The first of the load and pack sections entered after the run time decides the direction.
    #[clap(name = "plan")]
    Plan(Box<PlanArgs>),

    /// Cell count or cell capacity needed for the required energy.
    #[clap(name = "size")]
    Size(Box<SizeArgs>),

    /// Replay a scenario file and print every card.
    #[clap(name = "replay")]
    Replay(ReplayArgs),
}

/// Field texts are passed to the engine as is, so that it could reject them.
#[derive(Parser)]
pub struct PackArgs {
    /// Number of cells in series.
    #[clap(long)]
    pub cells: Option<String>,

    /// Nominal cell capacity in milliamp-hours.
    #[clap(long)]
    pub capacity: Option<String>,

    #[clap(long)]
    pub capacity_min: Option<String>,

    #[clap(long)]
    pub capacity_max: Option<String>,
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Nominal load in watts.
    #[clap(long)]
    pub load: Option<String>,

    #[clap(long)]
    pub load_min: Option<String>,

    #[clap(long)]
    pub load_max: Option<String>,
}

#[derive(Parser)]
pub struct RuntimeArgs {
    #[clap(flatten)]
    pub pack: PackArgs,

    #[clap(flatten)]
    pub load: LoadArgs,

    /// Nominal load of an additional consumer, may be repeated.
    #[clap(long = "extra-load")]
    pub extra_loads: Vec<String>,
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Nominal run time in minutes.
    #[clap(long)]
    pub time: Option<String>,

    #[clap(long)]
    pub time_min: Option<String>,

    #[clap(flatten)]
    pub load: LoadArgs,

    #[clap(flatten)]
    pub pack: PackArgs,
}

#[derive(Parser)]
pub struct SizeArgs {
    /// Required energy in watt-hours.
    #[clap(long)]
    pub energy: Option<String>,

    #[clap(long)]
    pub energy_min: Option<String>,

    #[clap(long)]
    pub energy_max: Option<String>,

    /// Chosen cell capacity in milliamp-hours, takes precedence over the cell count.
    #[clap(long)]
    pub capacity: Option<String>,

    /// Chosen cell count.
    #[clap(long)]
    pub cells: Option<String>,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// Scenario TOML file.
    pub path: PathBuf,
}
