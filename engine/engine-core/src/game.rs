//! Typed `GameState` trait the search engine is generic over.
//!
//! A game exposes exactly the capability set the tree search needs: legal
//! move enumeration, move application, terminal detection and a random
//! playout. States are cloned freely (nodes own one each, playouts run on
//! throwaway copies), so implementations should keep them a fixed handful of
//! words.

use rand_chacha::ChaCha20Rng;

use crate::outcome::{Outcome, Side};

/// A two-player perfect-information game position.
///
/// # Contract
///
/// * `apply` may only be called with a move previously returned by
///   `legal_moves` on the same state; applying a move to a settled position
///   is a programming error.
/// * `legal_moves` returns a deterministic order, and returns an empty list
///   once `status()` is settled.
/// * `simulate` never mutates `self`; it plays uniformly random legal moves
///   on a clone until the game settles, and is bounded by the board size.
/// * Outcomes are always framed from "us" (the engine's side), regardless of
///   whose turn it is at `self`.
pub trait GameState: Clone + Send + Sync + 'static {
    /// Compact move identifier. Should be `Copy` and cheap to compare.
    type Move: Copy + Eq + Send + Sync + std::fmt::Debug + 'static;

    /// All moves playable from this position, in a deterministic order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Play `mv` in place: set the mark, update terminal bookkeeping, flip
    /// the turn and record `mv` as the last move.
    fn apply(&mut self, mv: Self::Move);

    /// Terminal classification of this position.
    fn status(&self) -> Outcome;

    /// Run one uniformly random playout from this position and return how it
    /// ended. The caller's state is left untouched.
    fn simulate(&self, rng: &mut ChaCha20Rng) -> Outcome;

    /// The move that produced this position, if any.
    fn last_move(&self) -> Option<Self::Move>;

    /// The side to move.
    fn turn(&self) -> Side;
}
