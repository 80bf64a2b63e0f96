//! The 5x5 number grid a session is played on.

use anyhow::{Result, bail};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Side length of the square grid.
pub const GRID_SIDE: usize = 5;

/// Number of cells, and therefore the highest number on the grid.
pub const TOTAL_CELLS: usize = GRID_SIDE * GRID_SIDE;

/// A row-major permutation of `1..=TOTAL_CELLS`.
///
/// Values can only be built through [`Grid::shuffled`] or the validating
/// [`Grid::from_cells`], so every `Grid` holds each number exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Grid {
    cells: [u8; TOTAL_CELLS],
}

impl Grid {
    /// Generates a uniformly random layout.
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut cells = Self::ordered_cells();
        fisher_yates(&mut cells, rng);
        Self { cells }
    }

    /// Builds a grid from stored cell values, rejecting anything that is not
    /// a permutation of `1..=TOTAL_CELLS`.
    pub fn from_cells(values: &[u8]) -> Result<Self> {
        if values.len() != TOTAL_CELLS {
            bail!(
                "grid must have {} cells, got {}",
                TOTAL_CELLS,
                values.len()
            );
        }

        let mut seen = [false; TOTAL_CELLS];
        let mut cells = [0u8; TOTAL_CELLS];
        for (slot, &value) in values.iter().enumerate() {
            let index = usize::from(value).wrapping_sub(1);
            if index >= TOTAL_CELLS {
                bail!("grid value {} out of range 1..={}", value, TOTAL_CELLS);
            }
            if seen[index] {
                bail!("grid value {} appears more than once", value);
            }
            seen[index] = true;
            cells[slot] = value;
        }

        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[u8; TOTAL_CELLS] {
        &self.cells
    }

    /// Value at `row`, `col`, or `None` outside the grid.
    pub fn value_at(&self, row: usize, col: usize) -> Option<u8> {
        if row >= GRID_SIDE || col >= GRID_SIDE {
            return None;
        }
        Some(self.cells[row * GRID_SIDE + col])
    }

    /// Iterates the grid one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(GRID_SIDE)
    }

    fn ordered_cells() -> [u8; TOTAL_CELLS] {
        let mut cells = [0u8; TOTAL_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = (i + 1) as u8;
        }
        cells
    }
}

impl TryFrom<Vec<u8>> for Grid {
    type Error = anyhow::Error;

    fn try_from(values: Vec<u8>) -> Result<Self> {
        Self::from_cells(&values)
    }
}

impl From<Grid> for Vec<u8> {
    fn from(grid: Grid) -> Self {
        grid.cells.to_vec()
    }
}

/// In-place Fisher-Yates: walk from the last index down to 1 and swap with a
/// uniformly chosen index in `[0, i]`.
fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn assert_permutation(grid: &Grid) {
        let mut sorted = grid.cells().to_vec();
        sorted.sort_unstable();
        let expected: Vec<u8> = (1..=TOTAL_CELLS as u8).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_shuffled_grids_are_permutations() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert_permutation(&Grid::shuffled(&mut rng));
        }
    }

    #[test]
    fn test_shuffle_is_not_identity() {
        let mut rng = StdRng::seed_from_u64(42);
        let ordered = Grid::from_cells(&Grid::ordered_cells()).unwrap();
        let differs = (0..10).any(|_| Grid::shuffled(&mut rng) != ordered);
        assert!(differs);
    }

    #[test]
    fn test_shuffle_is_unbiased() {
        // Every number should land in every slot about equally often.
        let mut rng = StdRng::seed_from_u64(2024);
        let rounds = 25_000;
        let mut counts = [[0u32; TOTAL_CELLS]; TOTAL_CELLS];

        for _ in 0..rounds {
            let grid = Grid::shuffled(&mut rng);
            for (slot, &value) in grid.cells().iter().enumerate() {
                counts[slot][usize::from(value) - 1] += 1;
            }
        }

        let expected = rounds as f64 / TOTAL_CELLS as f64;
        for slot in counts.iter() {
            for &count in slot.iter() {
                let deviation = (f64::from(count) - expected).abs() / expected;
                assert!(deviation < 0.25, "count {} too far from {}", count, expected);
            }
        }
    }

    #[test]
    fn test_from_cells_accepts_permutation() {
        let values: Vec<u8> = (1..=25).rev().collect();
        let grid = Grid::from_cells(&values).unwrap();
        assert_eq!(grid.cells()[0], 25);
        assert_eq!(grid.value_at(4, 4), Some(1));
        assert_eq!(grid.value_at(5, 0), None);
    }

    #[test]
    fn test_from_cells_rejects_bad_input() {
        assert!(Grid::from_cells(&[1, 2, 3]).is_err());

        let mut duplicate: Vec<u8> = (1..=25).collect();
        duplicate[3] = 1;
        assert!(Grid::from_cells(&duplicate).is_err());

        let mut zero: Vec<u8> = (1..=25).collect();
        zero[0] = 0;
        assert!(Grid::from_cells(&zero).is_err());

        let mut too_big: Vec<u8> = (1..=25).collect();
        too_big[24] = 26;
        assert!(Grid::from_cells(&too_big).is_err());
    }

    #[test]
    fn test_grid_json_validates_on_decode() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = Grid::shuffled(&mut rng);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);

        assert!(serde_json::from_str::<Grid>("[1,1,1]").is_err());
    }

    #[test]
    fn test_rows_are_row_major() {
        let values: Vec<u8> = (1..=25).collect();
        let grid = Grid::from_cells(&values).unwrap();
        let rows: Vec<&[u8]> = grid.rows().collect();
        assert_eq!(rows.len(), GRID_SIDE);
        assert_eq!(rows[1], &[6, 7, 8, 9, 10]);
    }
}
