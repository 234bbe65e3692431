//! Core traits and types for the MCTS game engine
//!
//! This crate provides the fundamental abstractions the search engine
//! consumes:
//! - `GameState`: typed trait a concrete game implements (move enumeration,
//!   move application, terminal detection, random playouts)
//! - `Outcome`: the terminal alphabet, always framed from the engine's side
//! - `Side`: whose turn it is

pub mod game;
pub mod outcome;

// Re-export main types for convenience
pub use game::GameState;
pub use outcome::{Outcome, Side};
