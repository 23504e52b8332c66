use std::fmt;

use crate::config::{ConfigError, ExperimentConfig, DEFAULT_DEFIBRILLATION_TIME};
use crate::simulation::engine::{self, Notice, StepContext};
use crate::simulation::grid::CellGrid;
use crate::simulation::params::ParameterGrids;
use crate::simulation::seed;

/// The seven experiments, numbered as they are presented to the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Experiment {
    PlaneWave = 1,
    SpiralWave = 2,
    SpiralPair = 3,
    Defibrillation = 4,
    ObstacleReentry = 5,
    Chaos = 6,
    Annihilation = 7,
}

/// Initial-condition recipe: writes grid₀ and may reshape the parameter grids
pub type SeedFn = fn(&mut CellGrid, &mut ParameterGrids, &ExperimentConfig);

/// Intervention applied to the input grid before the interior rule runs
pub type BeforeStepFn = fn(&mut CellGrid, &StepContext) -> Option<Notice>;

/// Intervention applied to the output grid after the interior rule
pub type AfterStepFn = fn(&mut CellGrid, &StepContext);

/// Parameters used when the user does not supply their own
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Defaults {
    pub excitability: u32,
    pub max_refractory_period: u32,
    pub vary_refractory: bool,
    pub defibrillation_time: Option<u32>,
}

/// One row of the experiment catalog
pub struct CatalogEntry {
    pub experiment: Experiment,
    pub name: &'static str,
    pub defaults: Defaults,
    /// Custom parameters are ignored
    pub fixed_parameters: bool,
    /// A defibrillation time is required and user-settable
    pub uses_defibrillation: bool,
    pub seed: SeedFn,
    pub before_step: BeforeStepFn,
    pub after_step: AfterStepFn,
}

const fn defaults(excitability: u32, max_refractory_period: u32) -> Defaults {
    Defaults {
        excitability,
        max_refractory_period,
        vary_refractory: false,
        defibrillation_time: None,
    }
}

/// Experiment catalog, indexed by `id - 1`
pub static CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        experiment: Experiment::PlaneWave,
        name: "Plane Wave",
        defaults: defaults(2, 10),
        fixed_parameters: false,
        uses_defibrillation: false,
        seed: seed::plane_wave,
        before_step: engine::no_intervention,
        after_step: engine::no_pacing,
    },
    CatalogEntry {
        experiment: Experiment::SpiralWave,
        name: "Spiral Wave",
        defaults: defaults(3, 10),
        fixed_parameters: false,
        uses_defibrillation: false,
        seed: seed::spiral_wave,
        before_step: engine::no_intervention,
        after_step: engine::no_pacing,
    },
    CatalogEntry {
        experiment: Experiment::SpiralPair,
        name: "Pair of Spiral Waves",
        defaults: defaults(3, 6),
        fixed_parameters: false,
        uses_defibrillation: false,
        seed: seed::spiral_pair,
        before_step: engine::no_intervention,
        after_step: engine::no_pacing,
    },
    CatalogEntry {
        experiment: Experiment::Defibrillation,
        name: "Defibrillation of a Spiral Wave",
        defaults: Defaults {
            defibrillation_time: Some(DEFAULT_DEFIBRILLATION_TIME),
            ..defaults(3, 6)
        },
        fixed_parameters: false,
        uses_defibrillation: true,
        seed: seed::defibrillation,
        before_step: engine::defibrillation_shock,
        after_step: engine::pace_after_shock,
    },
    CatalogEntry {
        experiment: Experiment::ObstacleReentry,
        name: "Re-entry around an Obstacle",
        defaults: defaults(2, 6),
        fixed_parameters: false,
        uses_defibrillation: false,
        seed: seed::obstacle_reentry,
        before_step: engine::withdraw_edge_pacing,
        after_step: engine::no_pacing,
    },
    CatalogEntry {
        experiment: Experiment::Chaos,
        name: "Chaos & Fibrillation",
        defaults: defaults(3, 10),
        fixed_parameters: true,
        uses_defibrillation: false,
        seed: seed::spiral_pair,
        before_step: engine::no_intervention,
        after_step: engine::no_pacing,
    },
    CatalogEntry {
        experiment: Experiment::Annihilation,
        name: "Annihilation",
        defaults: defaults(2, 5),
        fixed_parameters: false,
        uses_defibrillation: false,
        seed: seed::annihilation,
        before_step: engine::withdraw_edge_pacing,
        after_step: engine::no_pacing,
    },
];

impl Experiment {
    pub const ALL: [Experiment; 7] = [
        Experiment::PlaneWave,
        Experiment::SpiralWave,
        Experiment::SpiralPair,
        Experiment::Defibrillation,
        Experiment::ObstacleReentry,
        Experiment::Chaos,
        Experiment::Annihilation,
    ];

    pub fn from_id(id: u8) -> Result<Self, ConfigError> {
        match id {
            1..=7 => Ok(Self::ALL[id as usize - 1]),
            _ => Err(ConfigError::UnknownExperiment(id)),
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self.id() as usize - 1]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.id(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_id() {
        for (index, entry) in CATALOG.iter().enumerate() {
            assert_eq!(entry.experiment.id() as usize, index + 1);
            assert_eq!(entry.experiment.entry().name, entry.name);
        }
    }

    #[test]
    fn test_from_id() {
        assert_eq!(Experiment::from_id(4), Ok(Experiment::Defibrillation));
        assert_eq!(Experiment::from_id(0), Err(ConfigError::UnknownExperiment(0)));
        assert_eq!(Experiment::from_id(8), Err(ConfigError::UnknownExperiment(8)));
    }

    #[test]
    fn test_only_defibrillation_has_shock_time() {
        for experiment in Experiment::ALL {
            let entry = experiment.entry();
            assert_eq!(
                entry.defaults.defibrillation_time.is_some(),
                experiment == Experiment::Defibrillation
            );
            assert_eq!(entry.uses_defibrillation, experiment == Experiment::Defibrillation);
        }
    }

    #[test]
    fn test_chaos_is_fixed() {
        let entry = Experiment::Chaos.entry();
        assert!(entry.fixed_parameters);
        assert_eq!(entry.defaults.excitability, 3);
        assert_eq!(entry.defaults.max_refractory_period, 10);
        assert!(!entry.defaults.vary_refractory);
    }

    #[test]
    fn test_display() {
        assert_eq!(Experiment::Annihilation.to_string(), "7. Annihilation");
    }
}
