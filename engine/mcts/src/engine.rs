//! The public façade: one engine per game.
//!
//! The engine owns the root of the tree for the whole game and keeps a weak
//! cursor on the node it currently intends to play into. Searching spends a
//! wall-clock budget rather than an iteration count, so strength is even
//! across machines. The tree is never pruned: answered moves just walk the
//! cursor deeper while ancestors stay reachable from the root.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use engine_core::GameState;
use thiserror::Error;
use tracing::debug;

use crate::config::SearchConfig;
use crate::node::{Node, TreeStats};
use crate::pool::PoolError;
use crate::search::Searcher;

/// Errors surfaced at the engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("move {0} is not available from the current position")]
    IllegalMove(String),

    #[error("the game is already decided")]
    TerminalPosition,

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// MCTS engine for one game.
pub struct Engine<S: GameState> {
    root: Arc<Node<S>>,
    /// The node whose move the engine currently answers with. Weak: the tree
    /// owns downward, the cursor only points.
    cursor: Weak<Node<S>>,
    searcher: Searcher,
    config: SearchConfig,
}

impl<S: GameState> Engine<S> {
    /// Build the tree for `initial` and spend the first-move budget on it.
    /// Afterwards [`Engine::ai_move`] answers with the chosen opening.
    pub fn new(initial: S, config: SearchConfig) -> Result<Self, EngineError> {
        let root = Node::new_root(initial);
        let mut engine = Self {
            cursor: Arc::downgrade(&root),
            searcher: Searcher::new(&config),
            root,
            config,
        };
        let root = Arc::clone(&engine.root);
        let budget = engine.config.first_move_budget;
        engine.search(&root, budget)?;
        Ok(engine)
    }

    /// Answer the opponent's move: follow it down the tree, then search the
    /// resulting position for the per-move budget.
    pub fn opponent_move(&mut self, mv: S::Move) -> Result<(), EngineError> {
        let cursor = self.cursor_node();
        if cursor.state().status().is_settled() {
            return Err(EngineError::TerminalPosition);
        }

        // Make sure the replies are materialized before looking one up.
        self.searcher.choose_child(&cursor)?;
        let child = cursor
            .find_child(|state| state.last_move() == Some(mv))
            .ok_or_else(|| EngineError::IllegalMove(format!("{mv:?}")))?;

        debug!(trials = child.total_trials(), "following opponent move");
        let budget = self.config.move_budget;
        self.search(&child, budget)
    }

    /// The move that led into the engine's currently chosen node.
    pub fn ai_move(&self) -> Option<S::Move> {
        self.cursor_node().state().last_move()
    }

    /// A copy of the position at the cursor.
    pub fn current_state(&self) -> S {
        self.cursor_node().state().clone()
    }

    /// Shape of the tree built so far.
    pub fn tree_stats(&self) -> TreeStats {
        Node::stats(&self.root)
    }

    /// Run iterations from `node` until `budget` is spent, then leave the
    /// cursor on the child the final iteration selected.
    fn search(&mut self, node: &Arc<Node<S>>, budget: Duration) -> Result<(), EngineError> {
        let deadline = Instant::now() + budget;
        let mut iterations: u64 = 0;
        let mut chosen: Option<Arc<Node<S>>> = None;

        loop {
            if let Some(child) = self.searcher.choose_child(node)? {
                chosen = Some(child);
            }
            iterations += 1;
            if Instant::now() >= deadline {
                break;
            }
        }

        debug!(
            iterations,
            trials = node.total_trials(),
            "search budget spent"
        );
        self.cursor = Arc::downgrade(chosen.as_ref().unwrap_or(node));
        Ok(())
    }

    fn cursor_node(&self) -> Arc<Node<S>> {
        // Parents own their children and the engine owns the root, so every
        // node the cursor ever pointed at stays alive with the engine.
        self.cursor
            .upgrade()
            .expect("cursor points into the live tree")
    }
}
