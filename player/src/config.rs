//! Command-line configuration for the player binary.

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "player", about = "Ultimate Tic-Tac-Toe MCTS player")]
pub struct Config {
    /// RNG seed; drawn from entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Budget for the opening search, in milliseconds.
    #[arg(long, default_value_t = 995)]
    pub first_budget_ms: u64,

    /// Budget for every later move, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub move_budget_ms: u64,

    /// Playouts per simulation batch.
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Read the opponent's opening move before searching.
    #[arg(long)]
    pub opponent_first: bool,

    /// Log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.first_budget_ms == 0 || self.move_budget_ms == 0 {
            bail!("search budgets must be positive");
        }
        if self.batch_size == 0 {
            bail!("batch size must be positive");
        }
        Ok(())
    }
}
