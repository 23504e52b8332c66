use thiserror::Error;

use crate::simulation::{Experiment, Region};

/// Grid dimensions (100x100 tissue sheet)
pub const GRID_SIZE: usize = 100;

/// Smallest grid that still has an interior
pub const MIN_GRID_SIZE: usize = 3;

/// Steps per run
pub const DEFAULT_STEPS: u32 = 300;

/// Delay between animation frames
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 200;

/// Rendered colour scale; refractory states below -1 are clamped
pub const COLOR_SCALE_MIN: f32 = -1.0;
pub const COLOR_SCALE_MAX: f32 = 1.0;

/// Window edge length in logical pixels
pub const WINDOW_SIZE: u32 = 800;

// ============================================
// Boundary interventions
// ============================================

/// Edge pacing is withdrawn once the time step exceeds this value
/// (re-entry and annihilation experiments)
pub const PACING_WARMUP_STEPS: u32 = 20;

/// Shock time used when no custom parameters are given
pub const DEFAULT_DEFIBRILLATION_TIME: u32 = 80;

/// A user-supplied shock time must be strictly greater than this
pub const MIN_CUSTOM_DEFIBRILLATION_TIME: u32 = 80;

/// Accepted range for "minimum excited neighbours" given on the command line
pub const MIN_EXCITED_NEIGHBORS: u32 = 1;
pub const MAX_EXCITED_NEIGHBORS: u32 = 4;

/// Longest refractory period a cell state can encode (`-k` must fit an `i32`)
pub const MAX_REFRACTORY_PERIOD: u32 = i32::MAX as u32;

// ============================================
// Initial seeds (row range x column range, half-open)
// ============================================

/// Seeded refractory cells use this state regardless of their own duration
pub const SEED_REFRACTORY_MARKER: u32 = 1;

pub const SPIRAL_EXCITED: Region = Region::new(30..99, 40..45);
pub const SPIRAL_REFRACTORY: Region = Region::new(50..99, 45..50);

pub const SPIRAL_PAIR_RIGHT_EXCITED: Region = Region::new(60..99, 70..75);
pub const SPIRAL_PAIR_RIGHT_REFRACTORY: Region = Region::new(80..99, 75..80);
pub const SPIRAL_PAIR_LEFT_EXCITED: Region = Region::new(20..99, 20..25);
pub const SPIRAL_PAIR_LEFT_REFRACTORY: Region = Region::new(40..99, 15..20);

// ============================================
// Obstacle (re-entry experiment)
// ============================================

/// Fast-conducting upper arm
pub const OBSTACLE_UPPER_ARM: Region = Region::new(1..33, 30..99);
/// Inert core; no cell can ever see 10 excited neighbours
pub const OBSTACLE_CORE: Region = Region::new(33..65, 30..70);
/// Lower arm, slow to recover
pub const OBSTACLE_LOWER_ARM: Region = Region::new(65..99, 30..60);

pub const ARM_THRESHOLD: u32 = 1;
pub const OBSTACLE_THRESHOLD: u32 = 10;
pub const FAST_ARM_REFRACTORY: u32 = 3;
pub const OBSTACLE_REFRACTORY: u32 = 1000;
pub const SLOW_ARM_REFRACTORY: u32 = 30;

/// Reasons a run configuration is rejected before the engine sees it
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown experiment {0}; choose 1-7")]
    UnknownExperiment(u8),
    #[error("excitability must be between 1 and 4 neighbours, got {0}")]
    ExcitabilityOutOfRange(u32),
    #[error("excitability bound n must be at least 2, got {0}")]
    ExcitabilityBound(u32),
    #[error("maximum refractory period must be at least 1")]
    ZeroRefractoryPeriod,
    #[error("maximum refractory period must be at most 2147483647, got {0}")]
    RefractoryPeriodTooLong(u32),
    #[error("grid size must be at least 3, got {0}")]
    GridTooSmall(usize),
    #[error("defibrillation time must be greater than 80, got {0}")]
    DefibrillationTooEarly(u32),
    #[error("defibrillation at step {time} is never reached in a run of {steps} steps")]
    DefibrillationUnreachable { time: u32, steps: u32 },
    #[error("{0} needs a defibrillation time")]
    MissingDefibrillationTime(&'static str),
}

/// Parameters the user chose to override; `None` keeps the experiment default
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomParameters {
    /// Minimum excited neighbours needed to excite a cell (1-4)
    pub min_excited_neighbors: Option<u32>,
    pub max_refractory_period: Option<u32>,
    pub vary_refractory: Option<bool>,
    pub defibrillation_time: Option<u32>,
}

impl CustomParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything that determines a run, fixed once the run starts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentConfig {
    pub experiment: Experiment,
    pub grid_size: usize,
    /// Draw bound: thresholds are uniform in `[1, n-1]`
    pub excitability: u32,
    pub max_refractory_period: u32,
    pub vary_refractory: bool,
    pub defibrillation_time: Option<u32>,
    pub steps: u32,
    pub seed: u64,
}

impl ExperimentConfig {
    /// Catalog defaults for `experiment` on the standard grid
    pub fn new(experiment: Experiment, seed: u64) -> Self {
        let defaults = experiment.entry().defaults;
        Self {
            experiment,
            grid_size: GRID_SIZE,
            excitability: defaults.excitability,
            max_refractory_period: defaults.max_refractory_period,
            vary_refractory: defaults.vary_refractory,
            defibrillation_time: defaults.defibrillation_time,
            steps: DEFAULT_STEPS,
            seed,
        }
    }

    /// Override defaults with user values.
    ///
    /// Experiments with fixed parameters keep their defaults.
    pub fn apply_custom(&mut self, custom: &CustomParameters) -> Result<(), ConfigError> {
        if custom.is_empty() {
            return Ok(());
        }
        let entry = self.experiment.entry();
        if entry.fixed_parameters {
            log::warn!("{} runs with fixed parameters; custom values ignored", entry.name);
            return Ok(());
        }

        if let Some(neighbors) = custom.min_excited_neighbors {
            if !(MIN_EXCITED_NEIGHBORS..=MAX_EXCITED_NEIGHBORS).contains(&neighbors) {
                return Err(ConfigError::ExcitabilityOutOfRange(neighbors));
            }
            self.excitability = neighbors + 1;
        }
        if let Some(period) = custom.max_refractory_period {
            check_refractory_period(period)?;
            self.max_refractory_period = period;
        }
        if let Some(vary) = custom.vary_refractory {
            self.vary_refractory = vary;
        }
        if let Some(time) = custom.defibrillation_time {
            if !entry.uses_defibrillation {
                log::warn!("{} has no defibrillation shock; time {} ignored", entry.name, time);
            } else if time <= MIN_CUSTOM_DEFIBRILLATION_TIME {
                return Err(ConfigError::DefibrillationTooEarly(time));
            } else {
                self.defibrillation_time = Some(time);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.excitability < 2 {
            return Err(ConfigError::ExcitabilityBound(self.excitability));
        }
        check_refractory_period(self.max_refractory_period)?;
        let entry = self.experiment.entry();
        if entry.uses_defibrillation {
            match self.defibrillation_time {
                None => return Err(ConfigError::MissingDefibrillationTime(entry.name)),
                Some(time) if time >= self.steps => {
                    return Err(ConfigError::DefibrillationUnreachable {
                        time,
                        steps: self.steps,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn check_refractory_period(period: u32) -> Result<(), ConfigError> {
    match period {
        0 => Err(ConfigError::ZeroRefractoryPeriod),
        p if p > MAX_REFRACTORY_PERIOD => Err(ConfigError::RefractoryPeriodTooLong(p)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_catalog() {
        let config = ExperimentConfig::new(Experiment::SpiralPair, 1);
        assert_eq!(config.excitability, 3);
        assert_eq!(config.max_refractory_period, 6);
        assert!(!config.vary_refractory);
        assert_eq!(config.defibrillation_time, None);
        assert_eq!(config.grid_size, GRID_SIZE);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_every_default_is_valid() {
        for experiment in Experiment::ALL {
            let config = ExperimentConfig::new(experiment, 7);
            assert_eq!(config.validate(), Ok(()), "{:?} defaults should validate", experiment);
        }
    }

    #[test]
    fn test_custom_excitability_is_shifted() {
        let mut config = ExperimentConfig::new(Experiment::PlaneWave, 0);
        let custom = CustomParameters {
            min_excited_neighbors: Some(3),
            max_refractory_period: Some(12),
            vary_refractory: Some(true),
            ..Default::default()
        };
        config.apply_custom(&custom).unwrap();
        assert_eq!(config.excitability, 4);
        assert_eq!(config.max_refractory_period, 12);
        assert!(config.vary_refractory);
    }

    #[test]
    fn test_custom_out_of_range() {
        let mut config = ExperimentConfig::new(Experiment::SpiralWave, 0);
        let custom = CustomParameters {
            min_excited_neighbors: Some(5),
            ..Default::default()
        };
        assert_eq!(
            config.apply_custom(&custom),
            Err(ConfigError::ExcitabilityOutOfRange(5))
        );

        let custom = CustomParameters {
            max_refractory_period: Some(0),
            ..Default::default()
        };
        assert_eq!(config.apply_custom(&custom), Err(ConfigError::ZeroRefractoryPeriod));
    }

    #[test]
    fn test_custom_defibrillation_time_must_exceed_default() {
        let mut config = ExperimentConfig::new(Experiment::Defibrillation, 0);
        let early = CustomParameters {
            defibrillation_time: Some(80),
            ..Default::default()
        };
        assert_eq!(
            config.apply_custom(&early),
            Err(ConfigError::DefibrillationTooEarly(80))
        );

        let late = CustomParameters {
            defibrillation_time: Some(150),
            ..Default::default()
        };
        config.apply_custom(&late).unwrap();
        assert_eq!(config.defibrillation_time, Some(150));
    }

    #[test]
    fn test_defibrillation_time_ignored_elsewhere() {
        let mut config = ExperimentConfig::new(Experiment::Annihilation, 0);
        let custom = CustomParameters {
            defibrillation_time: Some(120),
            ..Default::default()
        };
        config.apply_custom(&custom).unwrap();
        assert_eq!(config.defibrillation_time, None);
    }

    #[test]
    fn test_chaos_ignores_custom_parameters() {
        let mut config = ExperimentConfig::new(Experiment::Chaos, 0);
        let custom = CustomParameters {
            min_excited_neighbors: Some(4),
            max_refractory_period: Some(3),
            ..Default::default()
        };
        config.apply_custom(&custom).unwrap();
        assert_eq!(config, ExperimentConfig::new(Experiment::Chaos, 0));
    }

    #[test]
    fn test_unreachable_defibrillation() {
        let mut config = ExperimentConfig::new(Experiment::Defibrillation, 0);
        config.steps = 50;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefibrillationUnreachable { time: 80, steps: 50 })
        );

        config.steps = DEFAULT_STEPS;
        config.defibrillation_time = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDefibrillationTime(_))
        ));
    }

    #[test]
    fn test_grid_too_small() {
        let mut config = ExperimentConfig::new(Experiment::PlaneWave, 0);
        config.grid_size = 2;
        assert_eq!(config.validate(), Err(ConfigError::GridTooSmall(2)));
    }

    #[test]
    fn test_refractory_period_must_fit_cell_state() {
        let mut config = ExperimentConfig::new(Experiment::PlaneWave, 0);
        for period in [u32::MAX, 3_000_000_000, 1 << 31] {
            let custom = CustomParameters {
                max_refractory_period: Some(period),
                ..Default::default()
            };
            assert_eq!(
                config.apply_custom(&custom),
                Err(ConfigError::RefractoryPeriodTooLong(period))
            );
        }
        assert_eq!(config.max_refractory_period, 10);

        let longest = CustomParameters {
            max_refractory_period: Some(MAX_REFRACTORY_PERIOD),
            ..Default::default()
        };
        config.apply_custom(&longest).unwrap();
        assert_eq!(config.validate(), Ok(()));

        config.max_refractory_period = MAX_REFRACTORY_PERIOD + 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RefractoryPeriodTooLong(MAX_REFRACTORY_PERIOD + 1))
        );
    }
}
