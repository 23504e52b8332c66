use crate::config::PACING_WARMUP_STEPS;
use crate::simulation::cell::{CellState, Category};
use crate::simulation::experiment::Experiment;
use crate::simulation::grid::CellGrid;
use crate::simulation::params::ParameterGrids;

/// Time-dependent inputs to the boundary rules
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepContext {
    pub time: u32,
    pub defibrillation_time: Option<u32>,
}

/// Events worth announcing; they never feed back into the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Defibrillated { time: u32 },
}

/// Result of one step
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub grid: CellGrid,
    pub notice: Option<Notice>,
}

/// Advance the tissue by one time step.
///
/// 1. The experiment's pre-step intervention is applied to a copy of `grid`.
/// 2. Every interior cell is updated from that copy into a fresh grid;
///    border cells are carried through unchanged.
/// 3. The experiment's post-step intervention is applied to the new grid.
///
/// `grid` and both parameter grids must have the same size.
pub fn step(
    grid: &CellGrid,
    params: &ParameterGrids,
    time: u32,
    experiment: Experiment,
    defibrillation_time: Option<u32>,
) -> StepOutcome {
    debug_assert_eq!(grid.size(), params.size(), "grid and parameter sizes differ");

    let entry = experiment.entry();
    let ctx = StepContext {
        time,
        defibrillation_time,
    };

    let mut current = grid.clone();
    let notice = (entry.before_step)(&mut current, &ctx);
    let mut next = apply_rule(&current, params);
    (entry.after_step)(&mut next, &ctx);

    StepOutcome { grid: next, notice }
}

/// The interior transition rule on its own
pub fn apply_rule(current: &CellGrid, params: &ParameterGrids) -> CellGrid {
    let mut next = current.clone();
    let last = current.last_index();

    for row in 1..last {
        for col in 1..last {
            let cell = current.get(row, col);
            let updated = match cell.category() {
                Category::Resting => {
                    if current.excited_neighbors(row, col) >= params.threshold(row, col) {
                        CellState::EXCITED
                    } else {
                        cell
                    }
                }
                Category::Excited => CellState::refractory(params.duration(row, col)),
                Category::Refractory => cell.recover(),
            };
            next.set(row, col, updated);
        }
    }

    next
}

pub fn no_intervention(_grid: &mut CellGrid, _ctx: &StepContext) -> Option<Notice> {
    None
}

pub fn no_pacing(_grid: &mut CellGrid, _ctx: &StepContext) {}

/// Excite the whole interior at the defibrillation time
pub fn defibrillation_shock(grid: &mut CellGrid, ctx: &StepContext) -> Option<Notice> {
    if ctx.defibrillation_time != Some(ctx.time) {
        return None;
    }
    grid.fill_region(grid.interior(), CellState::EXCITED);
    log::warn!("* * * DEFIBRILLATE * * * (time step {})", ctx.time);
    Some(Notice::Defibrillated { time: ctx.time })
}

/// Keep pacing the left edge once the shock has been delivered
pub fn pace_after_shock(grid: &mut CellGrid, ctx: &StepContext) {
    if matches!(ctx.defibrillation_time, Some(shock) if ctx.time > shock) {
        grid.set_column(0, CellState::EXCITED);
    }
}

/// Silence both side edges after the warm-up so the wave runs on its own
pub fn withdraw_edge_pacing(grid: &mut CellGrid, ctx: &StepContext) -> Option<Notice> {
    if ctx.time > PACING_WARMUP_STEPS {
        grid.set_column(0, CellState::RESTING);
        grid.set_column(grid.last_index(), CellState::RESTING);
    }
    None
}
