//! Search-tree nodes.
//!
//! The tree owns downward: a node holds strong references to its children
//! and only a weak back-reference to its parent, so there is no ownership
//! cycle and dropping the root releases the whole tree. Children are
//! materialized once, on the search thread, before any worker can reach
//! them; the visit counters are atomics because back-propagation runs on the
//! worker threads as playouts complete.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use engine_core::{GameState, Outcome};
use once_cell::sync::OnceCell;

/// One node of the search tree.
pub struct Node<S: GameState> {
    state: S,
    parent: Weak<Node<S>>,
    /// Set exactly once; an empty list means the position is terminal.
    children: OnceCell<Vec<Arc<Node<S>>>>,
    hits: AtomicU32,
    misses: AtomicU32,
    total_trials: AtomicU32,
}

impl<S: GameState> Node<S> {
    /// Create the root of a new tree.
    pub fn new_root(state: S) -> Arc<Self> {
        Arc::new(Self {
            state,
            parent: Weak::new(),
            children: OnceCell::new(),
            hits: AtomicU32::new(0),
            misses: AtomicU32::new(0),
            total_trials: AtomicU32::new(0),
        })
    }

    /// The position this node holds.
    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    #[inline]
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u32 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_trials(&self) -> u32 {
        self.total_trials.load(Ordering::Relaxed)
    }

    /// Whether the children list has been materialized. Distinguishes "not
    /// visited yet" from "expanded and terminal".
    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.children.get().is_some()
    }

    /// The children, if already materialized.
    pub fn children(&self) -> Option<&[Arc<Node<S>>]> {
        self.children.get().map(Vec::as_slice)
    }

    /// Materialize the children on first call (one per legal move, in move
    /// order) and return them. A terminal position yields an empty list.
    pub fn expanded_children(node: &Arc<Self>) -> &[Arc<Self>] {
        node.children.get_or_init(|| {
            node.state
                .legal_moves()
                .into_iter()
                .map(|mv| {
                    let mut state = node.state.clone();
                    state.apply(mv);
                    Arc::new(Self {
                        state,
                        parent: Arc::downgrade(node),
                        children: OnceCell::new(),
                        hits: AtomicU32::new(0),
                        misses: AtomicU32::new(0),
                        total_trials: AtomicU32::new(0),
                    })
                })
                .collect()
        })
    }

    /// First materialized child whose state matches `predicate`.
    pub fn find_child(&self, predicate: impl Fn(&S) -> bool) -> Option<Arc<Self>> {
        self.children
            .get()?
            .iter()
            .find(|child| predicate(&child.state))
            .cloned()
    }

    /// Credit one playout outcome to this node and every ancestor. The same
    /// outcome is recorded at every level: counters are framed from our side
    /// throughout the tree.
    pub fn back_propagate(&self, outcome: Outcome) {
        self.record(outcome);
        let mut parent = self.parent.upgrade();
        while let Some(node) = parent {
            node.record(outcome);
            parent = node.parent.upgrade();
        }
    }

    fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Hit => {
                self.hits.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Miss => {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
            // Draws bump only the trial count.
            Outcome::Draw | Outcome::NotFinished => {}
        }
        self.total_trials.fetch_add(1, Ordering::Relaxed);
    }

    /// UCB1 score of this node as a child of a parent with `parent_trials`
    /// visits. Callers must ensure this node has been visited at least once.
    #[inline]
    pub fn ucb1(&self, parent_trials: u32, exploration: f64) -> f64 {
        let w = self.hits() as f64;
        let n = self.total_trials() as f64;
        let t = parent_trials as f64;
        w / n + exploration * (t.ln() / n).sqrt()
    }

    /// Aggregate statistics over the materialized tree below `node`.
    pub fn stats(node: &Arc<Self>) -> TreeStats {
        fn walk<S: GameState>(node: &Node<S>, depth: u32, stats: &mut TreeStats) {
            stats.total_nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if let Some(children) = node.children() {
                for child in children {
                    walk(child, depth + 1, stats);
                }
            }
        }

        let mut stats = TreeStats {
            total_nodes: 0,
            root_trials: node.total_trials(),
            max_depth: 0,
        };
        walk(node, 0, &mut stats);
        stats
    }
}

/// Snapshot of tree shape for logging and debugging.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_trials: u32,
    pub max_depth: u32,
}
