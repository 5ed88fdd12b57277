//! Command-line arguments.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use community_dispatch::config::ScenarioConfig;

#[derive(Debug, Parser)]
#[command(name = "community-dispatch")]
#[command(version, about = "Community battery dispatch simulator")]
#[command(
    long_about = "Builds a community of smart homes, aggregates their demand and PV,\n\
    and solves one day of shared battery dispatch as a mixed-integer program.\n\
    \nIf neither --scenario nor --preset is given, the baseline preset is used.\n\
    \nExamples:\n  \
    community-dispatch\n  \
    community-dispatch --preset solar_community --overview-out overview.json\n  \
    community-dispatch --scenario scenarios/peak_shaving.toml --schedule-out schedule.csv"
)]
pub struct Cli {
    /// Load the scenario from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, solar_community, peak_shaving)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Write the per-period schedule to a CSV file
    #[arg(long, value_name = "PATH")]
    pub schedule_out: Option<PathBuf>,

    /// Write the configuration and summary metrics to a JSON file
    #[arg(long, value_name = "PATH")]
    pub overview_out: Option<PathBuf>,

    /// Print only the summary metrics, not the schedule table
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    /// Resolves the scenario: `--scenario` file, then `--preset`, then baseline.
    pub fn scenario(&self) -> anyhow::Result<ScenarioConfig> {
        if let Some(path) = &self.scenario {
            ScenarioConfig::from_toml_file(path)
                .with_context(|| format!("loading scenario {}", path.display()))
        } else if let Some(name) = &self.preset {
            Ok(ScenarioConfig::from_preset(name)?)
        } else {
            Ok(ScenarioConfig::baseline())
        }
    }
}
