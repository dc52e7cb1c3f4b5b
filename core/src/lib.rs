use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use scatter::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod scatter;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    /// Smallest board with at least one playable cell per row.
    pub const MIN_SIZE: Coord = 2;
    /// Largest board the `A`..`Z` row labels can address.
    pub const MAX_SIZE: Coord = 26;

    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps both dimensions into the playable range: the mine count always
    /// leaves at least one safe cell, which keeps scattering terminating and
    /// the game winnable.
    pub fn new(size: Coord, mines: CellCount) -> Self {
        let size = size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
        let mines = mines.clamp(1, mult(size, size - 1) - 1);
        Self::new_unchecked(size, mines)
    }

    /// Cells outside the label column.
    pub const fn playable_cells(&self) -> CellCount {
        mult(self.size, self.size - 1)
    }

    /// Cells the player must reveal to win.
    pub const fn safe_cells(&self) -> CellCount {
        self.playable_cells() - self.mines
    }
}

/// The three moves a player can make on a turn, selected by number at the
/// prompt.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Discover,
    Flag,
    Unflag,
}

impl Action {
    pub const fn from_selector(selector: u8) -> Result<Action> {
        match selector {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Flag),
            3 => Ok(Self::Unflag),
            _ => Err(GameError::InvalidActionSelector),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Result of a resolved turn, tagged by the kind of action that produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    Reveal(RevealOutcome),
    Mark(MarkOutcome),
}

impl TurnOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Mark(outcome) => outcome.has_update(),
        }
    }
}
