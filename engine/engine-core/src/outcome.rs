//! Terminal outcome and turn alphabets shared by the engine and the games.

/// Result of a finished (or still running) game, always seen from the
/// engine's own side: `Hit` means the engine won, `Miss` means the opponent
/// did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The game is still in progress.
    NotFinished,
    /// Won by us.
    Hit,
    /// Won by the opponent.
    Miss,
    /// Neither side won.
    Draw,
}

impl Outcome {
    /// Whether the game is over, regardless of who won.
    #[inline]
    pub fn is_settled(self) -> bool {
        !matches!(self, Outcome::NotFinished)
    }
}

/// The player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Us,
    Opponent,
}

impl Side {
    /// The side that moves next.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Us => Side::Opponent,
            Side::Opponent => Side::Us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled() {
        assert!(!Outcome::NotFinished.is_settled());
        assert!(Outcome::Hit.is_settled());
        assert!(Outcome::Miss.is_settled());
        assert!(Outcome::Draw.is_settled());
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Us.other(), Side::Opponent);
        assert_eq!(Side::Opponent.other(), Side::Us);
        assert_eq!(Side::Us.other().other(), Side::Us);
    }
}
