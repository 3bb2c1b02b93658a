use ndarray::Array2;

use super::*;

/// Purely random placement, optionally keeping a 3×3 safe zone around the first click clear.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    safe_zone: Option<Coord2>,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, safe_zone: Option<Coord2>) -> Self {
        Self { seed, safe_zone }
    }

    fn is_excluded(&self, coords: Coord2) -> bool {
        self.safe_zone
            .is_some_and(|center| is_within_one(center, coords))
    }

    fn usable_cells(&self, size: Coord2) -> CellCount {
        let total = mult(size.0, size.1);
        let excluded = self.safe_zone.map_or(0, |center| {
            let neighbors = Neighbors::new(center, size).count() as CellCount;
            neighbors + 1
        });
        total.saturating_sub(excluded)
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Minefield> {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        if let Some(center) = self.safe_zone {
            if center.0 >= rows || center.1 >= cols {
                return Err(GameError::InvalidCoords);
            }
        }

        let usable = self.usable_cells(config.size);
        if config.mines > usable {
            log::warn!(
                "Cannot place {} mines, only {} cells available",
                config.mines,
                usable
            );
            return Err(GameError::TooManyMines);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        let mut collisions = 0usize;

        while mines_placed < config.mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if self.is_excluded(coords) || mine_mask[coords.to_nd_index()] {
                collisions += 1;
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Generated {}x{} minefield with {} mines ({} retries), safe zone: {:?}",
            rows,
            cols,
            mines_placed,
            collisions,
            self.safe_zone
        );
        Minefield::from_mine_mask(&mine_mask)
    }
}
