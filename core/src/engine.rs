use alloc::collections::VecDeque;

use crate::*;

/// Player actions on a [`Minefield`].
///
/// Every operation takes the board by reference and returns the resulting board next to its
/// outcome; the input is never modified. When nothing changes the returned board shares storage
/// with the input.
impl Minefield {
    /// Opens the cell at `coords`.
    ///
    /// Revealed and flagged cells are left alone. Opening a zero cell also opens the whole
    /// connected zero region together with its numbered border, skipping flagged cells.
    pub fn reveal(&self, coords: Coord2) -> Result<(Minefield, RevealOutcome)> {
        let coords = self.validate_coords(coords)?;

        let mut next = self.clone();
        let outcome = next.reveal_in_place(coords);
        Ok((next, outcome))
    }

    /// Flips the flag on a hidden cell; revealed cells cannot be flagged.
    pub fn toggle_flag(&self, coords: Coord2) -> Result<(Minefield, FlagOutcome)> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];

        if cell.is_revealed() {
            return Ok((self.clone(), FlagOutcome::NoChange));
        }

        let mut next = self.clone();
        let flagged = !cell.is_flagged();
        next.cell_mut(coords).set_flagged(flagged);
        log::trace!("flag at {:?}: {}", coords, flagged);

        let outcome = if flagged {
            FlagOutcome::Flagged
        } else {
            FlagOutcome::Unflagged
        };
        Ok((next, outcome))
    }

    /// Opens every hidden neighbor of a revealed numbered cell.
    ///
    /// Only fires when the number of flagged neighbors equals the cell's count; otherwise nothing
    /// happens at all.
    pub fn chord_reveal(&self, coords: Coord2) -> Result<(Minefield, RevealOutcome)> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];

        if !cell.is_revealed() || cell.adjacent_mines() == 0 {
            return Ok((self.clone(), RevealOutcome::NoChange));
        }

        if self.count_flagged_neighbors(coords) != cell.adjacent_mines() {
            log::trace!("chord at {:?} ignored, flag count mismatch", coords);
            return Ok((self.clone(), RevealOutcome::NoChange));
        }

        let mut next = self.clone();
        let outcome = self
            .iter_neighbors(coords)
            .map(|pos| next.reveal_in_place(pos))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor);
        Ok((next, outcome))
    }

    /// Whether every safe cell has been revealed. Flags play no part in this.
    pub fn check_win(&self) -> bool {
        self.cells().all(|cell| cell.is_mine() || cell.is_revealed())
    }

    /// Uncovers all mines for the end-of-game display, leaving everything else untouched.
    pub fn reveal_all_mines(&self) -> Minefield {
        let mut next = self.clone();
        for coords in self.iter_coords() {
            let cell = self[coords];
            if cell.is_mine() && !cell.is_revealed() {
                next.cell_mut(coords).reveal();
            }
        }
        next
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged())
            .count() as u8
    }

    fn reveal_in_place(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self[coords];
        if !cell.is_hidden() {
            return RevealOutcome::NoChange;
        }

        self.cell_mut(coords).reveal();

        if cell.is_mine() {
            log::debug!("mine hit at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        if cell.adjacent_mines() == 0 {
            self.flood_fill(coords);
        }

        if self.check_win() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    /// Breadth-first spread from an already revealed zero cell.
    fn flood_fill(&mut self, start: Coord2) {
        let mut frontier = VecDeque::from([start]);
        let mut opened = 0usize;

        while let Some(current) = frontier.pop_front() {
            for pos in self.iter_neighbors(current) {
                let neighbor = self[pos];
                if !neighbor.is_hidden() {
                    continue;
                }

                self.cell_mut(pos).reveal();
                opened += 1;

                if neighbor.adjacent_mines() == 0 {
                    frontier.push_back(pos);
                }
            }
        }

        log::trace!("flood fill from {:?} opened {} cells", start, opened);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: Coord2, mines: &[Coord2]) -> Minefield {
        Minefield::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let board = field((2, 2), &[(0, 0)]);

        let (next, outcome) = board.reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(next[(1, 1)].is_revealed());
        assert_eq!(next.revealed_count(), 1);
        assert!(!next.check_win());
    }

    #[test]
    fn win_needs_every_safe_cell() {
        let board = field((2, 2), &[(0, 0)]);

        let (board, _) = board.reveal((1, 1)).unwrap();
        let (board, outcome) = board.reveal((0, 1)).unwrap();
        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(!board.check_win());

        let (board, outcome) = board.reveal((1, 0)).unwrap();
        assert_eq!(outcome, RevealOutcome::Won);
        assert!(board.check_win());
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn empty_board_opens_completely_in_one_reveal() {
        let board = field((3, 3), &[]);

        let (next, outcome) = board.reveal((2, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(next.revealed_count(), 9);
        assert!(next.check_win());
    }

    #[test]
    fn reveal_leaves_input_untouched() {
        let board = field((3, 3), &[]);

        let (next, _) = board.reveal((1, 1)).unwrap();

        assert_eq!(board.revealed_count(), 0);
        assert_eq!(next.revealed_count(), 9);
        assert!(!next.shares_storage_with(&board));
    }

    #[test]
    fn hitting_a_mine_only_reveals_the_mine() {
        let board = field((2, 2), &[(0, 0)]);

        let (next, outcome) = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert!(outcome.is_game_over());
        assert!(!outcome.is_win());
        assert!(next[(0, 0)].is_revealed());
        assert_eq!(next.revealed_count(), 1);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // mine in the right column; the left two columns form a zero region bordered by ones
        let board = field((3, 4), &[(1, 3)]);

        let (next, outcome) = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        for row in 0..3 {
            assert!(next[(row, 0)].is_revealed());
            assert!(next[(row, 1)].is_revealed());
            assert!(next[(row, 2)].is_revealed());
            assert!(!next[(row, 3)].is_revealed());
        }
        assert_eq!(next[(0, 2)].adjacent_mines(), 1);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let board = field((3, 3), &[]);
        let (board, flag) = board.toggle_flag((2, 2)).unwrap();
        assert_eq!(flag, FlagOutcome::Flagged);

        let (next, outcome) = board.reveal((0, 0)).unwrap();

        // the flagged cell is safe and still closed, so the board is not won yet
        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(!next.check_win());
        assert!(!next[(2, 2)].is_revealed());
        assert!(next[(2, 2)].is_flagged());
        assert_eq!(next.revealed_count(), 8);
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let board = field((2, 2), &[(0, 0)]);
        let (board, _) = board.toggle_flag((0, 0)).unwrap();

        let (next, outcome) = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::NoChange);
        assert!(!next[(0, 0)].is_revealed());
        assert!(next.shares_storage_with(&board));
    }

    #[test]
    fn revealed_cell_reveal_is_a_no_op() {
        let board = field((2, 2), &[(0, 0)]);
        let (board, _) = board.reveal((1, 1)).unwrap();

        let (next, outcome) = board.reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::NoChange);
        assert!(!outcome.is_win());
        assert_eq!(next, board);
    }

    #[test]
    fn toggle_flag_reports_delta() {
        let board = field((2, 2), &[(0, 0)]);

        let (board, outcome) = board.toggle_flag((0, 0)).unwrap();
        assert_eq!(outcome.delta(), 1);
        assert!(board[(0, 0)].is_flagged());

        let (board, outcome) = board.toggle_flag((0, 0)).unwrap();
        assert_eq!(outcome, FlagOutcome::Unflagged);
        assert_eq!(outcome.delta(), -1);
        assert!(!board[(0, 0)].is_flagged());
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let board = field((2, 2), &[(0, 0)]);
        let (board, _) = board.reveal((1, 1)).unwrap();

        let (next, outcome) = board.toggle_flag((1, 1)).unwrap();

        assert_eq!(outcome, FlagOutcome::NoChange);
        assert_eq!(outcome.delta(), 0);
        assert!(!next[(1, 1)].is_flagged());
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let board = field((2, 2), &[]);

        assert_eq!(board.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 2)), Err(GameError::InvalidCoords));
        assert_eq!(board.chord_reveal((9, 9)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn chord_reveal_opens_neighbors_when_flags_match() {
        let board = field((3, 3), &[(0, 1), (2, 1)]);
        let (board, _) = board.reveal((1, 1)).unwrap();
        let (board, _) = board.toggle_flag((0, 1)).unwrap();
        let (board, _) = board.toggle_flag((2, 1)).unwrap();

        let (next, outcome) = board.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(next[(1, 0)].adjacent_mines(), 2);
        assert!(next[(1, 0)].is_revealed());
        assert!(next[(1, 2)].is_revealed());
        assert!(next[(0, 0)].is_revealed());
        assert!(!next[(0, 1)].is_revealed());
    }

    #[test]
    fn chord_reveal_is_gated_on_flag_count() {
        let board = field((3, 3), &[(0, 1), (2, 1)]);
        let (board, _) = board.reveal((1, 1)).unwrap();
        let (board, _) = board.toggle_flag((0, 1)).unwrap();

        let (next, outcome) = board.chord_reveal((1, 1)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(next.revealed_count(), 1);

        // too many flags does not fire either
        let (board, _) = board.toggle_flag((2, 1)).unwrap();
        let (board, _) = board.toggle_flag((0, 0)).unwrap();
        let (_, outcome) = board.chord_reveal((1, 1)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
    }

    #[test]
    fn chord_reveal_with_wrong_flag_hits_mine() {
        let board = field((3, 3), &[(0, 0)]);
        let (board, _) = board.reveal((1, 1)).unwrap();
        let (board, _) = board.toggle_flag((2, 2)).unwrap();

        let (next, outcome) = board.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert!(next[(0, 0)].is_revealed());
        assert!(!next[(2, 2)].is_revealed());
    }

    #[test]
    fn chord_reveal_ignores_hidden_and_zero_cells() {
        let board = field((3, 3), &[(0, 0)]);

        let (_, outcome) = board.chord_reveal((1, 1)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);

        let board = field((3, 4), &[(0, 0)]);
        let (board, _) = board.reveal((2, 3)).unwrap();
        assert_eq!(board[(2, 3)].adjacent_mines(), 0);
        let (_, outcome) = board.chord_reveal((2, 3)).unwrap();
        assert_eq!(outcome, RevealOutcome::NoChange);
    }

    #[test]
    fn reveal_all_mines_only_touches_mines() {
        let board = field((2, 3), &[(0, 0), (1, 2)]);
        let (board, _) = board.toggle_flag((0, 1)).unwrap();

        let next = board.reveal_all_mines();

        assert!(next[(0, 0)].is_revealed());
        assert!(next[(1, 2)].is_revealed());
        assert!(!next[(0, 1)].is_revealed());
        assert!(next[(0, 1)].is_flagged());
        assert_eq!(next.revealed_count(), 2);
        assert_eq!(board.revealed_count(), 0);
    }
}
