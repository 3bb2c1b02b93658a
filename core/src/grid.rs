use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The board: a fixed `rows × cols` grid of [`Cell`]s.
///
/// Cells live behind an [`Arc`], so cloning a `Minefield` is cheap and the engine operations can
/// hand back a new board without touching the one they were given. Storage is only duplicated
/// when an operation actually writes to a board that is still shared.
///
/// Serializes as a list of rows, each a list of cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Minefield {
    cells: Arc<Array2<Cell>>,
}

impl Minefield {
    /// Builds a board from a mine mask, filling in the adjacent-mine count of every safe cell.
    ///
    /// Fails with [`GameError::InvalidBoardShape`] when the mask is empty or a side exceeds
    /// [`Coord::MAX`].
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        check_shape(rows, cols)?;

        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                Cell::mine()
            } else {
                let coords = (row as Coord, col as Coord);
                let count = mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count();
                Cell::safe(count as u8)
            }
        });

        Ok(Self {
            cells: Arc::new(cells),
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.cells)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_mine())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged())
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_revealed())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        self.cells.iter_neighbors(coords)
    }

    /// All coordinates in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = impl Iterator<Item = Cell> + '_> + '_ {
        self.cells.rows().into_iter().map(|row| row.into_iter().copied())
    }

    /// Checks that every safe cell carries the right adjacent-mine count.
    pub fn check_layout(&self) -> Result<()> {
        let consistent = self.iter_coords().all(|coords| {
            let cell = self[coords];
            if cell.is_mine() {
                return cell.adjacent_mines() == 0;
            }
            let expected = self
                .iter_neighbors(coords)
                .filter(|&pos| self[pos].is_mine())
                .count();
            usize::from(cell.adjacent_mines()) == expected
        });

        if consistent {
            Ok(())
        } else {
            Err(GameError::CorruptLayout)
        }
    }

    /// Whether two boards share the same storage, i.e. neither has been written since cloning.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Copies the flags of `other` onto the still-hidden cells of this board.
    pub(crate) fn with_flags_from(mut self, other: &Self) -> Self {
        for coords in other.iter_coords() {
            let flagged = other[coords].is_flagged();
            if flagged && self.get(coords).is_some_and(Cell::is_hidden) {
                self.cell_mut(coords).set_flagged(true);
            }
        }
        self
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut Arc::make_mut(&mut self.cells)[coords.to_nd_index()]
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| predicate(cell))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

fn check_shape(rows: usize, cols: usize) -> Result<()> {
    let max = usize::from(Coord::MAX);
    if rows == 0 || cols == 0 || rows > max || cols > max {
        Err(GameError::InvalidBoardShape)
    } else {
        Ok(())
    }
}

impl Index<Coord2> for Minefield {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Minefield {
    type Error = GameError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);

        check_shape(row_count, col_count)?;
        if rows.iter().any(|row| row.len() != col_count) {
            return Err(GameError::InvalidBoardShape);
        }

        let flat: Vec<Cell> = rows.into_iter().flatten().collect();
        let cells = Array2::from_shape_vec((row_count, col_count), flat)
            .map_err(|_| GameError::InvalidBoardShape)?;

        Ok(Self {
            cells: Arc::new(cells),
        })
    }
}

impl From<Minefield> for Vec<Vec<Cell>> {
    fn from(field: Minefield) -> Self {
        let rows = field.rows_iter().map(|row| row.collect()).collect();
        rows
    }
}
