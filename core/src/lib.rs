#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use difficulty::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use session::*;
pub use settings::*;
pub use store::*;
pub use types::*;

mod cell;
mod difficulty;
mod engine;
mod error;
mod generator;
mod grid;
mod session;
mod settings;
mod store;
mod tip;
mod types;

/// Board dimensions `(rows, cols)` and the number of mines to place.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        let mines = mines.clamp(1, mult(rows, cols));
        Self::new_unchecked((rows, cols), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Outcome of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Change to apply to a running flag counter.
    pub const fn delta(self) -> i16 {
        match self {
            Self::NoChange => 0,
            Self::Flagged => 1,
            Self::Unflagged => -1,
        }
    }
}

/// Outcome of a reveal or chord reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
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

    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::HitMine)
    }

    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Merges outcomes of several reveals, a hit mine taking priority over a win.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_config_clamps_to_valid_board() {
        assert_eq!(GameConfig::new((0, 4), 0), GameConfig::new_unchecked((1, 4), 1));
        assert_eq!(GameConfig::new((2, 2), 10).mines, 4);
    }

    #[test]
    fn hit_mine_dominates_merged_outcomes() {
        use RevealOutcome::*;

        assert_eq!(Won | HitMine, HitMine);
        assert_eq!(Revealed | Won, Won);
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
    }
}
