//! Ultimate Tic-Tac-Toe for the MCTS engine
//!
//! The 9×9 board decomposes into nine 3×3 small boards. A move in cell
//! `(r % 3, c % 3)` of its small board forces the opponent into the small
//! board at those super-coordinates; once that board is settled, any open
//! board is playable. Winning three small boards in a row wins the game.
//!
//! The position is bit-packed: each small board is nine 2-bit cells in a
//! `u32` (18 bits used), and the settled states of the nine small boards are
//! projected into one more 18-bit word, so the whole position is eleven
//! words. Terminal detection of any 3×3 configuration is a single lookup in
//! a precomputed `2^18`-entry table, which is what keeps random playouts
//! cheap.
//!
//! # Usage
//!
//! ```rust
//! use games_uttt::{Cell, State};
//! use engine_core::GameState;
//!
//! let state = State::with_opening(Cell::new(4, 4));
//! // The opponent opened in the centre of the centre board, so every legal
//! // reply lands in that board.
//! assert!(state.legal_moves().iter().all(|mv| mv / 9 == 4));
//! ```

pub mod cell;
pub mod state;
pub mod table;

// Re-export main types for convenience
pub use cell::{Cell, Move, NO_MOVE};
pub use state::State;
pub use table::{terminal_table, TerminalTable};
