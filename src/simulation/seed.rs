use rand::Rng;

use crate::config::{
    ExperimentConfig, SEED_REFRACTORY_MARKER, SPIRAL_EXCITED, SPIRAL_PAIR_LEFT_EXCITED,
    SPIRAL_PAIR_LEFT_REFRACTORY, SPIRAL_PAIR_RIGHT_EXCITED, SPIRAL_PAIR_RIGHT_REFRACTORY,
    SPIRAL_REFRACTORY,
};
use crate::simulation::cell::CellState;
use crate::simulation::grid::{CellGrid, Grid};
use crate::simulation::params::ParameterGrids;

/// Build the parameter grids and grid₀ for a run
pub fn setup<R: Rng>(config: &ExperimentConfig, rng: &mut R) -> (CellGrid, ParameterGrids) {
    let mut params = ParameterGrids::build(
        config.grid_size,
        config.excitability,
        config.max_refractory_period,
        config.vary_refractory,
        rng,
    );
    let mut grid = Grid::filled(config.grid_size, CellState::RESTING);
    (config.experiment.entry().seed)(&mut grid, &mut params, config);
    (grid, params)
}

/// Straight wavefront from the left edge
pub fn plane_wave(grid: &mut CellGrid, _params: &mut ParameterGrids, _config: &ExperimentConfig) {
    grid.set_column(0, CellState::EXCITED);
}

/// Excited band with a refractory band beside its lower part, so the free
/// end curls into a spiral
pub fn spiral_wave(grid: &mut CellGrid, _params: &mut ParameterGrids, _config: &ExperimentConfig) {
    grid.fill_region(SPIRAL_EXCITED, CellState::EXCITED);
    grid.fill_region(SPIRAL_REFRACTORY, CellState::refractory(SEED_REFRACTORY_MARKER));
}

/// Two mirrored spiral seeds
pub fn spiral_pair(grid: &mut CellGrid, _params: &mut ParameterGrids, _config: &ExperimentConfig) {
    grid.fill_region(SPIRAL_PAIR_RIGHT_EXCITED, CellState::EXCITED);
    grid.fill_region(SPIRAL_PAIR_RIGHT_REFRACTORY, CellState::refractory(SEED_REFRACTORY_MARKER));
    grid.fill_region(SPIRAL_PAIR_LEFT_EXCITED, CellState::EXCITED);
    grid.fill_region(SPIRAL_PAIR_LEFT_REFRACTORY, CellState::refractory(SEED_REFRACTORY_MARKER));
}

/// Spiral seed plus a paced left edge; the shock comes later
pub fn defibrillation(grid: &mut CellGrid, params: &mut ParameterGrids, config: &ExperimentConfig) {
    spiral_wave(grid, params, config);
    grid.set_column(0, CellState::EXCITED);
}

pub fn obstacle_reentry(grid: &mut CellGrid, params: &mut ParameterGrids, config: &ExperimentConfig) {
    params.reset_refractory(config.max_refractory_period);
    params.carve_obstacle();
    grid.set_column(0, CellState::EXCITED);
}

/// Two wavefronts heading for each other
pub fn annihilation(grid: &mut CellGrid, _params: &mut ParameterGrids, _config: &ExperimentConfig) {
    grid.set_column(0, CellState::EXCITED);
    grid.set_column(grid.last_index(), CellState::EXCITED);
}
