/// Fitness scoring for candidate levels.
///
/// Solvability is the gate: an invalid or unsolvable level scores 0.
/// Among solvable levels, difficulty is measured by the jump count of the
/// optimal path — jumps are what make a platformer level interesting, and
/// the solver already charges them a premium.

use crate::config::SolverConfig;
use crate::domain::grid::Grid;
use crate::domain::movement::MovementRules;
use crate::domain::solver::{PathSolver, PathStats};
use crate::sim::level;

const SOLVABLE_BASE: f64 = 1000.0;
const JUMP_BONUS: f64 = 10.0;

/// Scores levels and tracks aggregate statistics across a run.
pub struct FitnessScorer {
    movement: MovementRules,
    solver: SolverConfig,
    levels_scored: usize,
    levels_solvable: usize,
}

/// Aggregates over every level a scorer has seen.
#[derive(Clone, Copy, Debug)]
pub struct FitnessSummary {
    pub levels_scored: usize,
    pub levels_solvable: usize,
    pub solvable_rate: f64,
}

impl FitnessScorer {
    pub fn new(movement: MovementRules, solver: SolverConfig) -> Self {
        FitnessScorer {
            movement,
            solver,
            levels_scored: 0,
            levels_solvable: 0,
        }
    }

    /// Score one level. Also returns the path statistics so callers can
    /// report them without re-solving.
    pub fn score(&mut self, grid: &Grid) -> (f64, PathStats) {
        self.levels_scored += 1;

        let mut solver = PathSolver::new(grid, self.movement)
            .with_iteration_cap(self.solver.max_iterations);

        if level::validate(grid).is_err() || !solver.level_solvable() {
            return (0.0, solver.path_stats(None));
        }

        self.levels_solvable += 1;
        let stats = solver.path_stats(None);
        let fitness = SOLVABLE_BASE + stats.jump_count as f64 * JUMP_BONUS;
        (fitness, stats)
    }

    pub fn summary(&self) -> FitnessSummary {
        FitnessSummary {
            levels_scored: self.levels_scored,
            levels_solvable: self.levels_solvable,
            solvable_rate: if self.levels_scored == 0 {
                0.0
            } else {
                self.levels_solvable as f64 / self.levels_scored as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::sim::level::{empty_level, staircase_level};

    fn scorer() -> FitnessScorer {
        let cfg = AppConfig::default();
        FitnessScorer::new(cfg.movement, cfg.solver)
    }

    #[test]
    fn invalid_level_scores_zero() {
        let mut s = scorer();
        let (fitness, stats) = s.score(&empty_level());
        assert_eq!(fitness, 0.0);
        assert!(!stats.solvable);
    }

    #[test]
    fn solvable_level_scores_base_plus_jump_bonus() {
        let mut s = scorer();
        let (fitness, stats) = s.score(&staircase_level());
        assert!(stats.solvable);
        assert_eq!(fitness, 1000.0 + stats.jump_count as f64 * 10.0);
        assert!(fitness > 1000.0); // the staircase cannot be walked
    }

    #[test]
    fn summary_tracks_solvable_rate() {
        let mut s = scorer();
        s.score(&staircase_level());
        s.score(&empty_level());
        let summary = s.summary();
        assert_eq!(summary.levels_scored, 2);
        assert_eq!(summary.levels_solvable, 1);
        assert!((summary.solvable_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_scorer_summary_is_zero() {
        let s = scorer();
        assert_eq!(s.summary().solvable_rate, 0.0);
    }
}
