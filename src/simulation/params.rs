use rand::Rng;

use crate::config::{
    ARM_THRESHOLD, FAST_ARM_REFRACTORY, OBSTACLE_CORE, OBSTACLE_LOWER_ARM, OBSTACLE_REFRACTORY,
    OBSTACLE_THRESHOLD, OBSTACLE_UPPER_ARM, SLOW_ARM_REFRACTORY,
};
use crate::simulation::grid::Grid;

/// Per-cell tissue parameters, fixed for the duration of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterGrids {
    /// Excited neighbours needed to excite a resting cell
    pub excitability: Grid<u32>,
    /// Steps an excited cell spends refractory
    pub refractory: Grid<u32>,
}

impl ParameterGrids {
    /// Draw fresh parameter grids.
    ///
    /// Thresholds are uniform in `[1, excitability - 1]` for every cell.
    /// Refractory durations are `max_refractory_period` everywhere, or uniform
    /// in `[1, max_refractory_period]` per cell when `vary_refractory` is set.
    pub fn build<R: Rng>(
        size: usize,
        excitability: u32,
        max_refractory_period: u32,
        vary_refractory: bool,
        rng: &mut R,
    ) -> Self {
        let excitability = Grid::from_fn(size, |_, _| rng.gen_range(1..excitability));
        let refractory = if vary_refractory {
            Grid::from_fn(size, |_, _| rng.gen_range(1..=max_refractory_period))
        } else {
            Grid::filled(size, max_refractory_period)
        };

        Self {
            excitability,
            refractory,
        }
    }

    pub fn size(&self) -> usize {
        self.excitability.size()
    }

    pub fn threshold(&self, row: usize, col: usize) -> u32 {
        self.excitability.get(row, col)
    }

    pub fn duration(&self, row: usize, col: usize) -> u32 {
        self.refractory.get(row, col)
    }

    /// Make every refractory duration `period`
    pub fn reset_refractory(&mut self, period: u32) {
        self.refractory.fill(period);
    }

    /// Carve the anatomical obstacle used by the re-entry experiment.
    ///
    /// Must run after the random fill, which would otherwise overwrite it.
    pub fn carve_obstacle(&mut self) {
        self.excitability.fill_region(OBSTACLE_UPPER_ARM, ARM_THRESHOLD);
        self.excitability.fill_region(OBSTACLE_CORE, OBSTACLE_THRESHOLD);
        self.excitability.fill_region(OBSTACLE_LOWER_ARM, ARM_THRESHOLD);

        self.refractory.fill_region(OBSTACLE_UPPER_ARM, FAST_ARM_REFRACTORY);
        self.refractory.fill_region(OBSTACLE_CORE, OBSTACLE_REFRACTORY);
        self.refractory.fill_region(OBSTACLE_LOWER_ARM, SLOW_ARM_REFRACTORY);
    }

    /// Same threshold and duration everywhere
    #[cfg(test)]
    pub fn uniform(size: usize, threshold: u32, duration: u32) -> Self {
        Self {
            excitability: Grid::filled(size, threshold),
            refractory: Grid::filled(size, duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_threshold_draw_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = ParameterGrids::build(50, 4, 10, false, &mut rng);
        assert!(params.excitability.iter().all(|&n| (1..=3).contains(&n)));
        // 2500 draws over three values should hit every one
        for value in 1..=3 {
            assert!(params.excitability.iter().any(|&n| n == value), "never drew {}", value);
        }
    }

    #[test]
    fn test_minimum_bound_gives_threshold_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = ParameterGrids::build(20, 2, 10, false, &mut rng);
        assert!(params.excitability.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_uniform_refractory() {
        let mut rng = StdRng::seed_from_u64(5);
        let params = ParameterGrids::build(30, 3, 7, false, &mut rng);
        assert!(params.refractory.iter().all(|&d| d == 7));
        assert_eq!(params.size(), 30);
    }

    #[test]
    fn test_varied_refractory() {
        let mut rng = StdRng::seed_from_u64(5);
        let params = ParameterGrids::build(30, 3, 7, true, &mut rng);
        assert!(params.refractory.iter().all(|&d| (1..=7).contains(&d)));
        assert!(params.refractory.iter().any(|&d| d != 7), "Durations should vary");
    }

    #[test]
    fn test_same_seed_same_grids() {
        let a = ParameterGrids::build(40, 5, 9, true, &mut StdRng::seed_from_u64(42));
        let b = ParameterGrids::build(40, 5, 9, true, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_obstacle_carve_out() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut params = ParameterGrids::build(100, 3, 6, true, &mut rng);
        params.carve_obstacle();

        for ((row, col), threshold) in params.excitability.indexed_iter() {
            let duration = params.duration(row, col);
            if OBSTACLE_CORE.contains(row, col) {
                assert_eq!((threshold, duration), (10, 1000), "core cell ({}, {})", row, col);
            } else if OBSTACLE_UPPER_ARM.contains(row, col) {
                assert_eq!((threshold, duration), (1, 3), "upper arm ({}, {})", row, col);
            } else if OBSTACLE_LOWER_ARM.contains(row, col) {
                assert_eq!((threshold, duration), (1, 30), "lower arm ({}, {})", row, col);
            } else {
                assert!((1..=2).contains(&threshold));
                assert!((1..=6).contains(&duration));
            }
        }
    }

    #[test]
    fn test_obstacle_region_bounds() {
        let mut params = ParameterGrids::uniform(100, 2, 6);
        params.carve_obstacle();
        // Rows 1-32 x cols 30-98, rows 33-64 x cols 30-69, rows 65-98 x cols 30-59
        assert_eq!(params.duration(1, 98), 3);
        assert_eq!(params.duration(0, 50), 6);
        assert_eq!(params.duration(32, 99), 6);
        assert_eq!(params.duration(33, 69), 1000);
        assert_eq!(params.duration(64, 70), 6);
        assert_eq!(params.duration(98, 59), 30);
        assert_eq!(params.duration(99, 40), 6);
        assert_eq!(params.threshold(50, 29), 2);
    }
}
