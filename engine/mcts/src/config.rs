//! Search configuration parameters.

use std::time::Duration;

use crate::simulator::DEFAULT_BATCH_SIZE;

/// Configuration for a whole game of tree search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Wall-clock budget for the very first search, before any move has been
    /// answered. Larger than the per-move budget to amortize the
    /// zero-information start.
    pub first_move_budget: Duration,

    /// Wall-clock budget for every subsequent move.
    pub move_budget: Duration,

    /// Playouts per simulation batch.
    pub batch_size: usize,

    /// Exploration constant of the UCB1 formula. √2 is the usual empirical
    /// default.
    pub exploration: f64,

    /// Seed for the selection RNG and the playout seed stream. A fixed seed
    /// makes a whole game reproducible.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            first_move_budget: Duration::from_millis(995),
            move_budget: Duration::from_millis(100),
            batch_size: DEFAULT_BATCH_SIZE,
            exploration: std::f64::consts::SQRT_2,
            seed: 0,
        }
    }
}

impl SearchConfig {
    /// Small budgets for fast tests.
    pub fn for_testing() -> Self {
        Self {
            first_move_budget: Duration::from_millis(50),
            move_budget: Duration::from_millis(25),
            batch_size: 4,
            exploration: std::f64::consts::SQRT_2,
            seed: 42,
        }
    }

    /// Builder pattern: set the first-move budget.
    pub fn with_first_move_budget(mut self, budget: Duration) -> Self {
        self.first_move_budget = budget;
        self
    }

    /// Builder pattern: set the per-move budget.
    pub fn with_move_budget(mut self, budget: Duration) -> Self {
        self.move_budget = budget;
        self
    }

    /// Builder pattern: set the playout batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder pattern: set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
