//! Precomputed terminal classification of 3×3 boards.
//!
//! A small board is nine 2-bit cells packed into the low 18 bits of a word
//! (0 empty, 1 opponent, 2 us, 3 common). The table maps every one of the
//! `2^18` words to its classification once, at first use, so terminal checks
//! inside playouts are a single index instead of a line scan. Words
//! unreachable by legal play still get a well-defined entry; they are simply
//! never queried.

use engine_core::Outcome;
use once_cell::sync::Lazy;

/// Number of distinct 18-bit small-board words.
pub const WORDS: usize = 1 << 18;

/// Low 18 bits of a board word.
pub const WORD_MASK: u32 = (1 << 18) - 1;

// Row fields are 6 bits wide; a row of three opponent (us) marks reads
// 0b010101 (0b101010).
const ROW_OPPONENT: u32 = 0b01_01_01;
const ROW_US: u32 = 0b10_10_10;

// Column i shift-aligns to bits {0, 6, 12} under this mask.
const COL_MASK: u32 = 0x30C3;
const COL_OPPONENT: u32 = 0x1041;
const COL_US: u32 = 0x2082;

// Main diagonal is cells 0, 4, 8; anti-diagonal cells 2, 4, 6.
const DIAG_MASK: u32 = 0x30303;
const DIAG_OPPONENT: u32 = 0x10101;
const DIAG_US: u32 = 0x20202;
const ANTI_MASK: u32 = 0x3330;
const ANTI_OPPONENT: u32 = 0x1110;
const ANTI_US: u32 = 0x2220;

/// One entry per 18-bit word: the small-board result, and what the board
/// contributes to the big-board projection. The two differ only for full
/// boards with no three-in-a-row, where the small board is drawn but the
/// projection tie-break counts cells.
#[derive(Debug)]
pub struct TerminalTable {
    entries: Box<[(Outcome, Outcome)]>,
}

static TABLE: Lazy<TerminalTable> = Lazy::new(TerminalTable::build);

/// The process-wide table, built on first use.
pub fn terminal_table() -> &'static TerminalTable {
    &TABLE
}

impl TerminalTable {
    fn build() -> Self {
        let entries = (0..WORDS).map(|word| classify(word as u32)).collect();
        Self { entries }
    }

    /// Result of `word` read as a small board.
    #[inline]
    pub fn small(&self, word: u32) -> Outcome {
        self.entries[(word & WORD_MASK) as usize].0
    }

    /// Result of `word` read as the big-board projection: the overall game
    /// status. Common marks (drawn boards) never form a winning line and
    /// count for neither side in the tie-break.
    #[inline]
    pub fn big(&self, word: u32) -> Outcome {
        self.entries[(word & WORD_MASK) as usize].1
    }
}

/// Ground-truth classification of one word. Only runs at table build time.
fn classify(word: u32) -> (Outcome, Outcome) {
    for i in 0..3 {
        match (word >> (6 * i)) & 0x3F {
            ROW_OPPONENT => return (Outcome::Miss, Outcome::Miss),
            ROW_US => return (Outcome::Hit, Outcome::Hit),
            _ => {}
        }
        match (word >> (2 * i)) & COL_MASK {
            COL_OPPONENT => return (Outcome::Miss, Outcome::Miss),
            COL_US => return (Outcome::Hit, Outcome::Hit),
            _ => {}
        }
    }
    match word & DIAG_MASK {
        DIAG_OPPONENT => return (Outcome::Miss, Outcome::Miss),
        DIAG_US => return (Outcome::Hit, Outcome::Hit),
        _ => {}
    }
    match word & ANTI_MASK {
        ANTI_OPPONENT => return (Outcome::Miss, Outcome::Miss),
        ANTI_US => return (Outcome::Hit, Outcome::Hit),
        _ => {}
    }

    let (mut empty, mut us, mut opponent) = (0u32, 0u32, 0u32);
    for i in 0..9 {
        match (word >> (2 * i)) & 0b11 {
            0 => empty += 1,
            1 => opponent += 1,
            2 => us += 1,
            _ => {} // common: neither side's
        }
    }
    if empty > 0 {
        return (Outcome::NotFinished, Outcome::NotFinished);
    }
    let projection = match us.cmp(&opponent) {
        std::cmp::Ordering::Greater => Outcome::Hit,
        std::cmp::Ordering::Less => Outcome::Miss,
        std::cmp::Ordering::Equal => Outcome::Draw,
    };
    (Outcome::Draw, projection)
}
