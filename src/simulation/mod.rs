mod cell;
mod engine;
mod experiment;
mod grid;
mod params;
mod seed;

pub use cell::{Category, CellState};
pub use engine::{step, Notice};
pub use experiment::Experiment;
pub use grid::{CellGrid, Grid, Region};
pub use params::ParameterGrids;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ExperimentConfig;

/// One experiment run: the current grid plus everything needed to advance it.
///
/// Each call to [`Simulation::advance`] replaces the grid with a complete new
/// snapshot; callers that want history keep their own copies.
pub struct Simulation {
    config: ExperimentConfig,
    params: ParameterGrids,
    grid: CellGrid,
    time: u32,
}

impl Simulation {
    pub fn new(config: ExperimentConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (grid, params) = seed::setup(&config, &mut rng);
        Self {
            config,
            params,
            grid,
            time: 0,
        }
    }

    /// Perform the step for the current time and move the clock on
    pub fn advance(&mut self) -> Option<Notice> {
        let outcome = step(
            &self.grid,
            &self.params,
            self.time,
            self.config.experiment,
            self.config.defibrillation_time,
        );
        self.grid = outcome.grid;
        self.time += 1;
        outcome.notice
    }

    /// Start over with the same settings and a new seed
    pub fn restart(&mut self, seed: u64) {
        let config = ExperimentConfig {
            seed,
            ..self.config.clone()
        };
        *self = Self::new(config);
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.config.steps
    }

    /// Time step the next call to `advance` will use
    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn params(&self) -> &ParameterGrids {
        &self.params
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn census(&self) -> Census {
        Census::of(&self.grid)
    }
}

/// Cell counts per category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub resting: usize,
    pub excited: usize,
    pub refractory: usize,
}

impl Census {
    pub fn of(grid: &CellGrid) -> Self {
        grid.iter().fold(Self::default(), |mut census, cell| {
            match cell.category() {
                Category::Resting => census.resting += 1,
                Category::Excited => census.excited += 1,
                Category::Refractory => census.refractory += 1,
            }
            census
        })
    }

    /// Nothing firing or recovering anywhere
    pub fn is_quiescent(&self) -> bool {
        self.excited == 0 && self.refractory == 0
    }
}
