use std::ops::Range;

use crate::simulation::cell::CellState;

/// Square sheet of values stored row-major.
///
/// Cell states and both parameter maps share this type, so dimension checks
/// are a single `size()` comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

/// Grid of cell states; the tissue sheet itself
pub type CellGrid = Grid<CellState>;

impl<T: Copy> Grid<T> {
    /// Create a `size` x `size` grid with every entry set to `value`
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    /// Create a grid from a per-cell function of `(row, col)`
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(row, col));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.size + col] = value;
    }

    /// Overwrite every cell of `region` that lies inside the grid
    pub fn fill_region(&mut self, region: Region, value: T) {
        let region = region.clip(self.size);
        for row in region.rows.clone() {
            let start = row * self.size;
            self.cells[start + region.cols.start..start + region.cols.end].fill(value);
        }
    }

    /// Overwrite the whole grid, keeping its size
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Overwrite column `col` from top to bottom
    pub fn set_column(&mut self, col: usize, value: T) {
        for row in 0..self.size {
            self.set(row, col, value);
        }
    }

    pub fn last_index(&self) -> usize {
        self.size - 1
    }

    /// True for row or column 0 or `size - 1`
    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row == self.last_index() || col == self.last_index()
    }

    /// Everything except the outermost ring
    pub fn interior(&self) -> Region {
        Region::new(1..self.last_index(), 1..self.last_index())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterate `((row, col), value)` over every cell
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &value)| ((i / size, i % size), value))
    }
}

impl Grid<CellState> {
    /// Number of excited cells in the Moore neighbourhood of an interior cell.
    ///
    /// The full 3x3 block is scanned; the centre only contributes when it is
    /// itself excited, which the transition rule never asks about.
    pub fn excited_neighbors(&self, row: usize, col: usize) -> u32 {
        let mut count = 0;
        for r in row - 1..=row + 1 {
            for c in col - 1..=col + 1 {
                if (r, c) != (row, col) && self.get(r, c).is_excited() {
                    count += 1;
                }
            }
        }
        count
    }
}

/// Rectangle of cells, half-open on both axes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Region {
    pub const fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// Restrict to a `size` x `size` grid
    pub fn clip(&self, size: usize) -> Self {
        let clip = |r: &Range<usize>| r.start.min(size)..r.end.min(size).max(r.start.min(size));
        Self {
            rows: clip(&self.rows),
            cols: clip(&self.cols),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) && self.cols.contains(&col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::filled(100, CellState::RESTING);
        assert_eq!(grid.as_slice().len(), 10000);
        assert!(grid.iter().all(|c| c.is_resting()));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(3, |row, col| (row * 10 + col) as u32);
        assert_eq!(grid.get(2, 1), 21);
        assert_eq!(grid.as_slice()[5], 12);
    }

    #[test]
    fn test_fill_region_clips_to_grid() {
        let mut grid = Grid::filled(10, 0u32);
        grid.fill_region(Region::new(8..99, 5..7), 4);
        let filled: Vec<_> = grid
            .indexed_iter()
            .filter(|(_, v)| *v == 4)
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(filled, vec![(8, 5), (8, 6), (9, 5), (9, 6)]);
    }

    #[test]
    fn test_clip_outside_region_is_empty() {
        let region = Region::new(30..99, 40..45).clip(20);
        assert!(region.rows.is_empty());
        let mut grid = Grid::filled(20, 0u32);
        grid.fill_region(Region::new(30..99, 40..45), 1);
        assert!(grid.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_set_column() {
        let mut grid = Grid::filled(5, CellState::RESTING);
        grid.set_column(4, CellState::EXCITED);
        for row in 0..5 {
            assert!(grid.get(row, 4).is_excited());
            assert!(grid.get(row, 3).is_resting());
        }
    }

    #[test]
    fn test_border_and_interior() {
        let grid = Grid::filled(6, 0u8);
        assert!(grid.is_border(0, 3));
        assert!(grid.is_border(3, 5));
        assert!(!grid.is_border(1, 4));
        assert_eq!(grid.interior(), Region::new(1..5, 1..5));
    }

    #[test]
    fn test_excited_neighbors_ignores_centre() {
        let mut grid = Grid::filled(5, CellState::RESTING);
        grid.fill_region(Region::new(1..4, 1..4), CellState::EXCITED);
        assert_eq!(grid.excited_neighbors(2, 2), 8);
        grid.set(1, 1, CellState::refractory(2));
        assert_eq!(grid.excited_neighbors(2, 2), 7);
        assert_eq!(grid.excited_neighbors(1, 3), 3);
    }
}
