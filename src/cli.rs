use clap::Parser;

use crate::config::{
    ConfigError, CustomParameters, ExperimentConfig, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_STEPS,
    GRID_SIZE,
};
use crate::simulation::Experiment;

/// Excitation waves in a sheet of cardiac tissue, as a cellular automaton.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Experiment to run, 1-7 (see --list).
    #[arg(
        short,
        long,
        value_name = "ID",
        required_unless_present = "list",
        value_parser = clap::value_parser!(u8).range(1..=7)
    )]
    pub experiment: Option<u8>,
    /// Print the available experiments and exit.
    #[arg(long)]
    pub list: bool,
    /// Minimum number of excited neighbours required to excite a cell (1-4).
    #[arg(long, value_name = "NEIGHBOURS")]
    pub excitability: Option<u32>,
    /// Maximum refractory period in steps.
    #[arg(long, value_name = "STEPS")]
    pub max_refractory: Option<u32>,
    /// Draw a refractory period for each cell instead of using the maximum everywhere.
    #[arg(long)]
    pub vary_refractory: bool,
    /// Time step of the defibrillation shock (experiment 4, must be > 80).
    #[arg(long, value_name = "STEP")]
    pub defibrillation_time: Option<u32>,
    /// Number of time steps to simulate.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: u32,
    /// Cells along each side of the tissue sheet.
    #[arg(long, value_name = "CELLS", default_value_t = GRID_SIZE)]
    pub grid_size: usize,
    /// Milliseconds between animation frames.
    #[arg(
        long,
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_FRAME_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    pub interval_ms: u64,
    /// Seed for the parameter grids; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Run every step without a window and log statistics.
    #[arg(long)]
    pub headless: bool,
}

impl CliArgs {
    pub fn custom_parameters(&self) -> CustomParameters {
        CustomParameters {
            min_excited_neighbors: self.excitability,
            max_refractory_period: self.max_refractory,
            vary_refractory: self.vary_refractory.then_some(true),
            defibrillation_time: self.defibrillation_time,
        }
    }

    /// Resolve defaults, overrides and run settings into a checked config
    pub fn to_config(&self, seed: u64) -> Result<ExperimentConfig, ConfigError> {
        let id = self.experiment.unwrap_or_default();
        let mut config = ExperimentConfig::new(Experiment::from_id(id)?, seed);
        config.apply_custom(&self.custom_parameters())?;
        config.grid_size = self.grid_size;
        config.steps = self.steps;
        config.validate()?;
        Ok(config)
    }
}
