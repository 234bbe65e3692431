//! The bit-packed Ultimate Tic-Tac-Toe position.

use engine_core::{GameState, Outcome, Side};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::cell::{Cell, Move, NO_MOVE};
use crate::table::terminal_table;

const MARK_OPPONENT: u32 = 1;
const MARK_US: u32 = 2;
const MARK_COMMON: u32 = 3;

/// A complete position: nine small-board words, the big-board projection,
/// the side to move and the last move played. Eleven words in all, so
/// cloning one per node and per playout stays cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// Nine 2-bit cells per small board, low 18 bits of each word.
    boards: [u32; 9],
    /// Settled state of each small board as a 2-bit field: 0 open,
    /// 1 opponent, 2 us, 3 drawn.
    big: u32,
    turn: Side,
    last_move: Move,
}

impl State {
    /// Empty board, us to move.
    pub fn new() -> Self {
        Self {
            boards: [0; 9],
            big: 0,
            turn: Side::Us,
            last_move: NO_MOVE,
        }
    }

    /// Board with the opponent's opening mark already placed, us to move.
    pub fn with_opening(cell: Cell) -> Self {
        let mut state = Self {
            turn: Side::Opponent,
            ..Self::new()
        };
        state.apply(cell.to_move());
        state
    }

    /// Rebuild a position from raw small-board words. The big-board
    /// projection is derived from the words; `last_move` decides the forced
    /// board. Used to set up mid-game positions in tests and analysis.
    pub fn from_boards(boards: [u32; 9], turn: Side, last_move: Option<Move>) -> Self {
        let table = terminal_table();
        let mut big = 0u32;
        for (i, &word) in boards.iter().enumerate() {
            let projection = match table.small(word) {
                Outcome::NotFinished => 0,
                Outcome::Hit => MARK_US,
                Outcome::Miss => MARK_OPPONENT,
                Outcome::Draw => MARK_COMMON,
            };
            big |= projection << (2 * i);
        }
        Self {
            boards,
            big,
            turn,
            last_move: last_move.unwrap_or(NO_MOVE),
        }
    }

    /// 2-bit mark at a grid square (0 empty, 1 opponent, 2 us).
    pub fn cell_at(&self, row: u8, col: u8) -> u32 {
        let mv = Cell::new(row, col).to_move();
        (self.boards[(mv / 9) as usize] >> (2 * (mv % 9))) & 0b11
    }

    /// The big-board projection word.
    pub fn projection(&self) -> u32 {
        self.big
    }

    #[inline]
    fn board_settled(&self, board: usize) -> bool {
        (self.big >> (2 * board)) & 0b11 != 0
    }

    #[inline]
    fn mark_to_place(&self) -> u32 {
        match self.turn {
            Side::Us => MARK_US,
            Side::Opponent => MARK_OPPONENT,
        }
    }

    /// Append every empty cell of `board`, in cell order.
    fn push_board_moves(&self, moves: &mut Vec<Move>, board: usize) {
        let word = self.boards[board];
        for cell in 0..9 {
            if (word >> (2 * cell)) & 0b11 == 0 {
                moves.push((board * 9 + cell) as Move);
            }
        }
    }

    /// The small board the next move is forced into, if any.
    fn forced_board(&self) -> Option<usize> {
        if self.last_move == NO_MOVE {
            return None;
        }
        let board = (self.last_move % 9) as usize;
        (!self.board_settled(board)).then_some(board)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for State {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        if terminal_table().big(self.big).is_settled() {
            return Vec::new();
        }
        let mut moves = Vec::with_capacity(16);
        match self.forced_board() {
            Some(board) => self.push_board_moves(&mut moves, board),
            None => {
                for board in 0..9 {
                    if !self.board_settled(board) {
                        self.push_board_moves(&mut moves, board);
                    }
                }
            }
        }
        moves
    }

    fn apply(&mut self, mv: Move) {
        debug_assert!(mv < 81, "move {mv} out of range");
        debug_assert!(
            !terminal_table().big(self.big).is_settled(),
            "move on a settled game"
        );
        let (board, cell) = ((mv / 9) as usize, (mv % 9) as u32);
        debug_assert_eq!(
            (self.boards[board] >> (2 * cell)) & 0b11,
            0,
            "square {mv} already marked"
        );

        self.boards[board] |= self.mark_to_place() << (2 * cell);
        let settled = match terminal_table().small(self.boards[board]) {
            Outcome::NotFinished => 0,
            Outcome::Hit => MARK_US,
            Outcome::Miss => MARK_OPPONENT,
            Outcome::Draw => MARK_COMMON,
        };
        self.big |= settled << (2 * board);

        self.turn = self.turn.other();
        self.last_move = mv;
    }

    fn status(&self) -> Outcome {
        terminal_table().big(self.big)
    }

    fn simulate(&self, rng: &mut ChaCha20Rng) -> Outcome {
        let mut playout = *self;
        loop {
            let status = playout.status();
            if status.is_settled() {
                return status;
            }
            let moves = playout.legal_moves();
            playout.apply(moves[rng.gen_range(0..moves.len())]);
        }
    }

    fn last_move(&self) -> Option<Move> {
        (self.last_move != NO_MOVE).then_some(self.last_move)
    }

    fn turn(&self) -> Side {
        self.turn
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..9 {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..9 {
                if col > 0 {
                    write!(f, "{}", if col % 3 == 0 { " | " } else { " " })?;
                }
                let glyph = match self.cell_at(row, col) {
                    MARK_US => 'X',
                    MARK_OPPONENT => 'O',
                    _ => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Word with our marks in `us` cells and opponent marks in `opp` cells.
    fn word(us: &[u32], opp: &[u32]) -> u32 {
        let mut w = 0;
        for &c in us {
            w |= MARK_US << (2 * c);
        }
        for &c in opp {
            w |= MARK_OPPONENT << (2 * c);
        }
        w
    }

    #[test]
    fn test_initial_position() {
        let state = State::new();
        assert_eq!(state.turn(), Side::Us);
        assert_eq!(state.last_move(), None);
        assert_eq!(state.status(), Outcome::NotFinished);
        // Every square of every board is open.
        assert_eq!(state.legal_moves().len(), 81);
    }

    #[test]
    fn test_opening_forces_centre_board() {
        let state = State::with_opening(Cell::new(4, 4));
        assert_eq!(state.turn(), Side::Us);
        assert_eq!(state.cell_at(4, 4), MARK_OPPONENT);

        let moves = state.legal_moves();
        // Forced into small board 4, which has eight empty squares left.
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|mv| mv / 9 == 4));
        assert!(!moves.contains(&40));
    }

    #[test]
    fn test_moves_are_ordered() {
        let state = State::new();
        let moves = state.legal_moves();
        assert!(moves.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_settled_forced_board_opens_the_rest() {
        // Board 0 is already drawn; a move pointing at cell 0 may then go
        // anywhere open.
        let drawn = word(&[0, 1, 5, 6, 7], &[2, 3, 4, 8]);
        let mut boards = [0u32; 9];
        boards[0] = drawn;
        // Opponent just played cell 0 of board 1.
        boards[1] = word(&[], &[0]);
        let state = State::from_boards(boards, Side::Us, Some(9));

        let moves = state.legal_moves();
        // All of boards 1..9 minus the one occupied square.
        assert_eq!(moves.len(), 8 * 9 - 1);
        assert!(moves.iter().all(|&mv| mv >= 9));
    }

    #[test]
    fn test_apply_projects_won_board() {
        let mut boards = [0u32; 9];
        boards[2] = word(&[0, 1], &[3, 4]);
        // Opponent played cell 2 of board 6, forcing us into board 2.
        boards[6] = word(&[], &[2]);
        let mut state = State::from_boards(boards, Side::Us, Some(6 * 9 + 2));
        assert_eq!(state.projection() & 0b11 << 4, 0);

        // Completing the top row settles board 2 for us.
        state.apply(2 * 9 + 2);
        assert_eq!((state.projection() >> 4) & 0b11, MARK_US);
        assert_eq!(state.turn(), Side::Opponent);
        assert_eq!(state.last_move(), Some(2 * 9 + 2));
        // One won board is nowhere near a finished game.
        assert_eq!(state.status(), Outcome::NotFinished);
    }

    #[test]
    fn test_drawn_board_projects_common_and_wins_nothing() {
        let mut boards = [0u32; 9];
        // X X O / O O X / X O _, the last square drawing the board.
        boards[4] = word(&[0, 1, 5, 6], &[2, 3, 4, 7]);
        boards[3] = word(&[], &[4]);
        let mut state = State::from_boards(boards, Side::Us, Some(3 * 9 + 4));

        state.apply(4 * 9 + 8);
        assert_eq!((state.projection() >> 8) & 0b11, MARK_COMMON);
        assert_eq!(state.status(), Outcome::NotFinished);
    }

    #[test]
    fn test_three_boards_in_a_row_win_the_game() {
        let us_row = word(&[0, 1, 2], &[3, 7]);
        let mut boards = [0u32; 9];
        boards[0] = us_row;
        boards[1] = us_row;
        boards[2] = word(&[0, 1], &[3, 4]);
        boards[5] = word(&[], &[2]);
        let mut state = State::from_boards(boards, Side::Us, Some(5 * 9 + 2));
        assert_eq!(state.status(), Outcome::NotFinished);

        state.apply(2 * 9 + 2);
        assert_eq!(state.status(), Outcome::Hit);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_simulation_terminates_and_leaves_state_alone() {
        let state = State::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..50 {
            let outcome = state.simulate(&mut rng);
            assert!(outcome.is_settled());
        }
        // The caller's position never moved.
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_simulation_from_settled_state_reports_it() {
        let us_row = word(&[0, 1, 2], &[3, 7]);
        let mut boards = [0u32; 9];
        boards[0] = us_row;
        boards[1] = us_row;
        boards[2] = us_row;
        let state = State::from_boards(boards, Side::Opponent, Some(2 * 9 + 2));
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        assert_eq!(state.simulate(&mut rng), Outcome::Hit);
    }

    /// Play random games move by move and hold the rule invariants at every
    /// ply: each chosen move is accepted, changes exactly one square, and
    /// touches at most one projection slot.
    #[test]
    fn test_random_games_respect_the_rules() {
        use rand::Rng;

        for seed in 0..40 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut state = State::new();
            let mut plies = 0;

            while !state.status().is_settled() {
                let moves = state.legal_moves();
                assert!(!moves.is_empty(), "open game without moves (seed {seed})");

                // Forced-board rule: either everything is in one open board,
                // or the pointed-at board is settled.
                if let Some(prev) = state.last_move() {
                    let pointed = (prev % 9) as usize;
                    if (state.projection() >> (2 * pointed)) & 0b11 == 0 {
                        assert!(
                            moves.iter().all(|&mv| mv / 9 == prev % 9),
                            "escaped the forced board (seed {seed})"
                        );
                    }
                }

                let mv = moves[rng.gen_range(0..moves.len())];
                let before = state;
                state.apply(mv);
                plies += 1;

                let changed: Vec<usize> = (0..9)
                    .filter(|&b| state.boards[b] != before.boards[b])
                    .collect();
                assert_eq!(changed, vec![(mv / 9) as usize]);

                let projection_delta = state.projection() ^ before.projection();
                assert_eq!(
                    projection_delta & !(0b11 << (2 * (mv / 9))),
                    0,
                    "projection touched a foreign slot (seed {seed})"
                );
                assert!(plies <= 81, "game overran the board (seed {seed})");
            }
        }
    }

    #[test]
    fn test_display_shows_marks() {
        let state = State::with_opening(Cell::new(4, 4));
        let text = state.to_string();
        assert_eq!(text.matches('O').count(), 1);
        assert_eq!(text.matches('X').count(), 0);
        assert_eq!(text.lines().count(), 11);
    }
}
