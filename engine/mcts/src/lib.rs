//! Monte Carlo Tree Search for two-player perfect-information games.
//!
//! This crate is game-agnostic: it searches any state implementing the
//! `engine-core` `GameState` trait.
//!
//! # Overview
//!
//! Each search iteration walks the four MCTS phases:
//!
//! 1. **Selection**: descend from the root picking children by UCB1, which
//!    trades exploitation (`hits / trials`) against exploration
//!    (`√(ln parent_trials / trials)`)
//! 2. **Expansion**: materialize one child per legal move the first time a
//!    node is visited
//! 3. **Simulation**: run a batch of uniformly random playouts from the new
//!    node on the worker pool
//! 4. **Backpropagation**: credit every playout outcome to the node and all
//!    of its ancestors
//!
//! The [`Engine`] façade owns the tree across a whole game: it spends a
//! wall-clock budget per move, follows the opponent's replies down the tree
//! and reports the move that led into its chosen node.
//!
//! # Usage
//!
//! ```rust,ignore
//! use games_uttt::{Cell, State};
//! use mcts::{Engine, SearchConfig};
//!
//! let config = SearchConfig::default().with_seed(42);
//! let mut engine = Engine::new(State::with_opening(Cell::new(4, 4)), config)?;
//! println!("reply: {:?}", engine.ai_move());
//!
//! engine.opponent_move(Cell::new(3, 3).to_move())?;
//! println!("reply: {:?}", engine.ai_move());
//! ```
//!
//! # Concurrency
//!
//! A single search thread drives selection and expansion; playout batches
//! fan out to a fixed-size worker pool and back-propagate on the worker
//! threads as they finish. Node counters are atomics, so UCB1 reads may see
//! a slightly stale snapshot — selection is a heuristic and tolerates that.

pub mod config;
pub mod engine;
pub mod node;
pub mod pool;
pub mod search;
pub mod simulator;

// Re-export main types
pub use config::SearchConfig;
pub use engine::{Engine, EngineError};
pub use node::{Node, TreeStats};
pub use pool::{JobHandle, PoolError, WorkerPool};
pub use search::Searcher;
pub use simulator::Simulator;
