//! Batched random playouts.
//!
//! A batch fans out to the worker pool: every unit clones the node's state,
//! plays one random game with its own seeded RNG and back-propagates the
//! outcome right there on the worker thread. `run` joins every handle, so
//! all of the batch is in the counters before it returns.

use std::sync::Arc;

use engine_core::{GameState, Outcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::node::Node;
use crate::pool::{JobHandle, PoolError, WorkerPool};

/// Default number of playouts per batch; amortizes queue overhead without
/// making one tree-policy step too coarse.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Runs batches of independent playouts for the tree policy.
pub struct Simulator {
    pool: Arc<WorkerPool>,
    batch_size: usize,
    /// Source of per-playout seeds, so parallel playouts stay reproducible.
    seeds: ChaCha20Rng,
}

impl Simulator {
    /// Simulator on the process-wide pool.
    pub fn new(batch_size: usize, seed: u64) -> Self {
        Self::with_pool(WorkerPool::global(), batch_size, seed)
    }

    /// Simulator on a caller-supplied pool; lets tests control both the
    /// parallelism and the seeding.
    pub fn with_pool(pool: Arc<WorkerPool>, batch_size: usize, seed: u64) -> Self {
        Self {
            pool,
            batch_size,
            seeds: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run one batch of playouts from `node`. Every outcome has been
    /// back-propagated into `node` and its ancestors by the time this
    /// returns.
    pub fn run<S: GameState>(&mut self, node: &Arc<Node<S>>) -> Result<Vec<Outcome>, PoolError> {
        let handles: Vec<JobHandle<Outcome>> = (0..self.batch_size)
            .map(|_| {
                let node = Arc::clone(node);
                let seed: u64 = self.seeds.gen();
                self.pool.execute(move || {
                    let mut rng = ChaCha20Rng::seed_from_u64(seed);
                    let outcome = node.state().simulate(&mut rng);
                    node.back_propagate(outcome);
                    outcome
                })
            })
            .collect::<Result<_, _>>()?;

        let outcomes = handles
            .into_iter()
            .map(JobHandle::wait)
            .collect::<Result<Vec<_>, _>>()?;
        trace!(batch = outcomes.len(), "playout batch complete");
        Ok(outcomes)
    }
}
