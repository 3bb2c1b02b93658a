use serde::{Deserialize, Serialize};

/// One square of the board.
///
/// Mine placement and the adjacent-mine count are fixed once the board is generated; only the
/// revealed and flagged bits change during play. A revealed cell never goes back to hidden and a
/// flag can only sit on a cell that is still hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    is_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub(crate) const fn mine() -> Self {
        Self {
            is_mine: true,
            is_revealed: false,
            is_flagged: false,
            adjacent_mines: 0,
        }
    }

    pub(crate) const fn safe(adjacent_mines: u8) -> Self {
        Self {
            is_mine: false,
            is_revealed: false,
            is_flagged: false,
            adjacent_mines,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    /// Number of mines around this cell. Always zero on mine cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// Not revealed and not flagged, i.e. something a reveal would act on.
    pub const fn is_hidden(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub(crate) fn reveal(&mut self) {
        self.is_revealed = true;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        debug_assert!(!self.is_revealed || !flagged);
        self.is_flagged = flagged;
    }
}
