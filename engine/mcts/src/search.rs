//! The tree policy: selection, expansion and where simulations happen.

use std::sync::Arc;

use engine_core::GameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::config::SearchConfig;
use crate::node::Node;
use crate::pool::PoolError;
use crate::simulator::Simulator;

/// Drives search iterations over a tree. Owns the selection RNG and the
/// simulator; the tree itself is held by the caller.
pub struct Searcher {
    simulator: Simulator,
    rng: ChaCha20Rng,
    exploration: f64,
}

impl Searcher {
    pub fn new(config: &SearchConfig) -> Self {
        // Split one seed into independent streams for selection and
        // playouts.
        let mut seeds = ChaCha20Rng::seed_from_u64(config.seed);
        let selection_seed: u64 = seeds.gen();
        let playout_seed: u64 = seeds.gen();
        Self::with_simulator(
            Simulator::new(config.batch_size, playout_seed),
            selection_seed,
            config.exploration,
        )
    }

    /// Full control over the simulator, for tests that inject their own
    /// pool.
    pub fn with_simulator(simulator: Simulator, selection_seed: u64, exploration: f64) -> Self {
        Self {
            simulator,
            rng: ChaCha20Rng::seed_from_u64(selection_seed),
            exploration,
        }
    }

    /// One search iteration, as a recursive descent from `node`:
    ///
    /// * expand the node on first visit;
    /// * terminal node — run a batch right here, return `None`;
    /// * some child unvisited — pick one uniformly at random, run a batch
    ///   at it;
    /// * otherwise descend into the UCB1 arg-max child.
    ///
    /// Returns the child of `node` the iteration went through, which is what
    /// a caller tracking the principal move wants.
    pub fn choose_child<S: GameState>(
        &mut self,
        node: &Arc<Node<S>>,
    ) -> Result<Option<Arc<Node<S>>>, PoolError> {
        let children = Node::expanded_children(node);
        if children.is_empty() {
            self.simulator.run(node)?;
            return Ok(None);
        }

        let unexplored: Vec<&Arc<Node<S>>> = children
            .iter()
            .filter(|child| child.total_trials() == 0)
            .collect();
        if !unexplored.is_empty() {
            let picked = Arc::clone(unexplored[self.rng.gen_range(0..unexplored.len())]);
            self.simulator.run(&picked)?;
            return Ok(Some(picked));
        }

        let best = Arc::clone(best_child(children, node.total_trials(), self.exploration));
        trace!(
            trials = node.total_trials(),
            child_trials = best.total_trials(),
            "descending into best child"
        );
        self.choose_child(&best)?;
        Ok(Some(best))
    }
}

/// UCB1 arg-max over visited children. Ties go to the earliest child in move
/// order.
fn best_child<'a, S: GameState>(
    children: &'a [Arc<Node<S>>],
    parent_trials: u32,
    exploration: f64,
) -> &'a Arc<Node<S>> {
    let mut best = &children[0];
    let mut best_score = f64::NEG_INFINITY;
    for child in children {
        let score = child.ucb1(parent_trials, exploration);
        if score > best_score {
            best_score = score;
            best = child;
        }
    }
    best
}
