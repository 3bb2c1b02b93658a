use crate::*;

impl Minefield {
    /// Suggests a cell to open next.
    ///
    /// Among the hidden cells that are not mines, picks the one with the most revealed neighbors,
    /// preferring the first in row-major order on ties. This looks at the hidden layout only to
    /// skip mines and is no solver: the pick is not necessarily deducible from what the player
    /// can see.
    pub fn find_tip_cell(&self) -> Option<Coord2> {
        let mut best: Option<(Coord2, usize)> = None;

        for coords in self.iter_coords() {
            let cell = self[coords];
            if !cell.is_hidden() || cell.is_mine() {
                continue;
            }

            let score = self
                .iter_neighbors(coords)
                .filter(|&pos| self[pos].is_revealed())
                .count();

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((coords, score));
            }
        }

        best.map(|(coords, _)| coords)
    }
}
