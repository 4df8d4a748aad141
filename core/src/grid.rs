use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Sentinel the solver uses for a mine in its raw grids.
pub const MINE: i32 = -1;

/// What a cell holds once the sentinel has been resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellValue {
    Number(i32),
    Mine,
}

impl CellValue {
    pub const fn from_raw(raw: i32) -> Self {
        if raw == MINE {
            Self::Mine
        } else {
            Self::Number(raw)
        }
    }

    pub const fn to_raw(self) -> i32 {
        match self {
            Self::Number(value) => value,
            Self::Mine => MINE,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Mine => f.write_str("*"),
        }
    }
}

/// A problem grid in display orientation, addressed by solver `(x, y)` coordinates.
///
/// The solver emits grids whose vertical axis is flipped and whose axes are swapped relative to the coordinates it
/// uses in its moves. [`Grid::from_raw`] reverses the rows and then transposes, so that `grid[(x, y)]` is the cell a
/// move at `(x, y)` refers to. [`Grid::to_raw`] undoes both steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<i32>,
}

impl Grid {
    pub fn from_raw<R: AsRef<[i32]>>(raw: &[R]) -> Result<Self> {
        let raw_rows = raw.len();
        let raw_cols = raw.first().map_or(0, |row| row.as_ref().len());
        if raw_rows == 0 || raw_cols == 0 {
            return Err(GridError::Empty);
        }

        for (row, cells) in raw.iter().enumerate() {
            let found = cells.as_ref().len();
            if found != raw_cols {
                return Err(GridError::Ragged {
                    row,
                    expected: raw_cols,
                    found,
                });
            }
        }

        for dim in [raw_rows, raw_cols] {
            if Coord::try_from(dim).is_err() {
                return Err(GridError::TooLarge(dim));
            }
        }

        // reverse rows, then transpose: display (y, x) is raw row `rows - 1 - x`, column `y`
        let cells = Array2::from_shape_fn((raw_cols, raw_rows), |(y, x)| {
            raw[raw_rows - 1 - x].as_ref()[y]
        });
        Ok(Self { cells })
    }

    /// Rebuilds the grid in the solver's native orientation.
    pub fn to_raw(&self) -> Vec<Vec<i32>> {
        let (rows, cols) = self.cells.dim();
        (0..cols)
            .rev()
            .map(|x| (0..rows).map(|y| self.cells[[y, x]]).collect())
            .collect()
    }

    /// Grid size as `(cols, rows)`, the exclusive bounds of `(x, y)`.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions were checked to fit in `from_raw`
        (cols as Coord, rows as Coord)
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn raw_at(&self, coords: Coord2) -> Option<i32> {
        checked_coords(coords, self.size()).map(|coords| self.cells[coords.to_nd_index()])
    }

    pub fn value_at(&self, coords: Coord2) -> Option<CellValue> {
        self.raw_at(coords).map(CellValue::from_raw)
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|&&raw| raw == MINE).count()
    }

    pub(crate) fn cells(&self) -> &Array2<i32> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_raw_reverses_then_transposes() {
        // raw rows are listed top to bottom in solver orientation
        let raw = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let grid = Grid::from_raw(&raw).unwrap();

        assert_eq!(grid.size(), (2, 3));
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.raw_at((0, 0)), Some(4));
        assert_eq!(grid.raw_at((1, 0)), Some(1));
        assert_eq!(grid.raw_at((0, 2)), Some(6));
        assert_eq!(grid.raw_at((1, 2)), Some(3));
        assert_eq!(grid.raw_at((2, 0)), None);
    }

    #[test]
    fn to_raw_restores_solver_orientation() {
        let raws = [
            vec![vec![7]],
            vec![vec![1, -1], vec![0, 1]],
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            vec![vec![0, 1], vec![1, -1], vec![2, 2], vec![-1, 1]],
        ];

        for raw in raws {
            assert_eq!(Grid::from_raw(&raw).unwrap().to_raw(), raw);
        }
    }

    #[test]
    fn sentinel_maps_to_mine() {
        let grid = Grid::from_raw(&[[1, MINE], [0, 1]]).unwrap();

        assert_eq!(grid.mine_count(), 1);
        assert_eq!(grid.value_at((1, 1)), Some(CellValue::Mine));
        assert_eq!(grid.value_at((0, 0)), Some(CellValue::Number(0)));
    }

    #[test]
    fn rejects_empty_grids() {
        let no_rows: [[i32; 0]; 0] = [];
        assert_eq!(Grid::from_raw(&no_rows), Err(GridError::Empty));
        assert_eq!(Grid::from_raw(&[[0i32; 0]]), Err(GridError::Empty));
    }

    #[test]
    fn rejects_ragged_grids() {
        let raw = vec![vec![0, 1], vec![1], vec![0, 0]];

        assert_eq!(
            Grid::from_raw(&raw),
            Err(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }
}
