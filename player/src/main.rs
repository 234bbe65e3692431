//! Player - interactive harness for the Ultimate Tic-Tac-Toe engine
//!
//! Each turn the process prints its move as `row col` on stdout, then reads
//! the opponent's reply as two whitespace-separated integers from stdin.
//! The loop ends when the game settles or stdin closes.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use engine_core::GameState;
use games_uttt::{Cell, State};
use mcts::{Engine, SearchConfig};
use tracing::{debug, info};

mod config;

use crate::config::Config;

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// Next opponent cell from stdin, or `None` on end of input.
fn read_cell(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<Cell>> {
    for line in lines {
        let line = line.context("reading the opponent's move")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let row: u8 = parts
            .next()
            .context("missing row")?
            .parse()
            .context("row is not a number")?;
        let col: u8 = parts
            .next()
            .context("missing column")?
            .parse()
            .context("column is not a number")?;
        if row > 8 || col > 8 {
            bail!("cell ({row}, {col}) is off the board");
        }
        return Ok(Some(Cell::new(row, col)));
    }
    Ok(None)
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    init_tracing(&config.log_level);

    let seed = config.seed.unwrap_or_else(rand::random);
    let search = SearchConfig::default()
        .with_first_move_budget(Duration::from_millis(config.first_budget_ms))
        .with_move_budget(Duration::from_millis(config.move_budget_ms))
        .with_batch_size(config.batch_size)
        .with_seed(seed);
    info!(seed, opponent_first = config.opponent_first, "starting engine");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let initial = if config.opponent_first {
        match read_cell(&mut lines)? {
            Some(cell) => State::with_opening(cell),
            None => return Ok(()),
        }
    } else {
        State::new()
    };

    let mut board = initial;
    let mut engine = Engine::new(initial, search)?;
    let mut stdout = io::stdout();

    loop {
        let mv = engine.ai_move().context("engine produced no move")?;
        board.apply(mv);
        writeln!(stdout, "{}", Cell::from_move(mv))?;
        stdout.flush()?;

        let stats = engine.tree_stats();
        debug!(
            nodes = stats.total_nodes,
            trials = stats.root_trials,
            depth = stats.max_depth,
            "played\n{board}"
        );
        if board.status().is_settled() {
            info!(outcome = ?board.status(), "game over");
            return Ok(());
        }

        let Some(cell) = read_cell(&mut lines)? else {
            return Ok(());
        };
        let reply = cell.to_move();
        if !board.legal_moves().contains(&reply) {
            bail!("opponent move {cell} is not legal");
        }
        engine.opponent_move(reply)?;
        board.apply(reply);

        if board.status().is_settled() {
            info!(outcome = ?board.status(), "game over");
            return Ok(());
        }
    }
}
