use serde::{Deserialize, Serialize};

/// Per-position state shared by the visible and hidden boards.
///
/// `Label` only ever occupies column 0. `Mine` only ever appears on the
/// hidden board, and `CorrectFlag` only after end-of-game reconciliation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Label(char),
    Unrevealed,
    Flagged,
    Mine,
    RevealedCount(u8),
    RevealedBlank,
    Detonated,
    CorrectFlag,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::RevealedCount(_) | Self::RevealedBlank)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Unrevealed
    }
}
