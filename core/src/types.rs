use ndarray::Array2;

/// Single coordinate axis, used for row/column indices and board dimensions.
pub type Coord = u8;

/// Count type used for mine counts, flag counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Board size of an array, saturated to the coordinate range.
pub(crate) fn array_size<T>(array: &Array2<T>) -> Coord2 {
    let (rows, cols) = array.dim();
    (
        Coord::try_from(rows).unwrap_or(Coord::MAX),
        Coord::try_from(cols).unwrap_or(Coord::MAX),
    )
}

/// Whether `a` and `b` are the same cell or touch each other, diagonals included.
pub const fn is_within_one(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coord2) -> Neighbors;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> Neighbors {
        Neighbors::new(center, array_size(self))
    }
}

/// Walks the 3×3 window around `center` in row-major order, skipping the center itself.
///
/// The window is clamped to the board: edge and corner cells simply have fewer neighbors,
/// nothing wraps around.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    first_col: Coord,
    last: Coord2,
    next: Option<Coord2>,
}

impl Neighbors {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        let (row, col) = center;
        let (rows, cols) = size;

        let first = (row.saturating_sub(1), col.saturating_sub(1));
        let last = (
            row.saturating_add(1).min(rows.saturating_sub(1)),
            col.saturating_add(1).min(cols.saturating_sub(1)),
        );
        let in_bounds = row < rows && col < cols;

        Self {
            center,
            first_col: first.1,
            last,
            next: in_bounds.then_some(first),
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.next?;
            let (row, col) = current;

            self.next = if col < self.last.1 {
                Some((row, col + 1))
            } else if row < self.last.0 {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if current != self.center {
                return Some(current);
            }
        }
    }
}
