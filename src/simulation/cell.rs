/// State of a single tissue cell.
///
/// Layout: 4 bytes, a plain `i32`, so a grid of cells uploads to the GPU as-is.
/// - `0` = resting
/// - `1` = excited
/// - `-k` (k > 0) = refractory with `k` steps of recovery left
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CellState(i32);

/// The three categories a cell state can fall into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Resting,
    Excited,
    Refractory,
}

impl CellState {
    pub const RESTING: CellState = CellState(0);
    pub const EXCITED: CellState = CellState(1);

    /// Refractory with `remaining` steps left; zero collapses to resting.
    /// Counts past `i32::MAX` saturate there.
    pub fn refractory(remaining: u32) -> Self {
        Self(-i32::try_from(remaining).unwrap_or(i32::MAX))
    }

    pub fn category(self) -> Category {
        match self.0 {
            0 => Category::Resting,
            1 => Category::Excited,
            v if v < 0 => Category::Refractory,
            v => unreachable!("invalid cell state {v}"),
        }
    }

    /// Steps of recovery left; zero unless refractory
    pub fn remaining(self) -> u32 {
        if self.0 < 0 {
            self.0.unsigned_abs()
        } else {
            0
        }
    }

    pub fn is_resting(self) -> bool {
        self.0 == 0
    }

    pub fn is_excited(self) -> bool {
        self.0 == 1
    }

    pub fn is_refractory(self) -> bool {
        self.0 < 0
    }

    /// One step of recovery. Reaching zero is resting.
    pub fn recover(self) -> Self {
        debug_assert!(self.is_refractory());
        Self(self.0 + 1)
    }

    /// Raw encoded value, as handed to the renderer
    pub fn raw(self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<CellState>(), 4);
    }

    #[test]
    fn test_categories() {
        assert_eq!(CellState::RESTING.category(), Category::Resting);
        assert_eq!(CellState::EXCITED.category(), Category::Excited);
        assert_eq!(CellState::refractory(7).category(), Category::Refractory);
        assert_eq!(CellState::refractory(0), CellState::RESTING);
    }

    #[test]
    fn test_remaining() {
        assert_eq!(CellState::RESTING.remaining(), 0);
        assert_eq!(CellState::EXCITED.remaining(), 0);
        assert_eq!(CellState::refractory(1000).remaining(), 1000);
        assert_eq!(CellState::refractory(10).raw(), -10);
    }

    #[test]
    fn test_long_refractory_saturates() {
        let longest = CellState::refractory(i32::MAX as u32);
        assert_eq!(longest.raw(), -i32::MAX);
        for remaining in [1 << 31, 3_000_000_000, u32::MAX] {
            let cell = CellState::refractory(remaining);
            assert_eq!(cell, longest);
            assert_eq!(cell.category(), Category::Refractory);
        }
    }

    #[test]
    fn test_recovery_counts_up_to_rest() {
        let mut cell = CellState::refractory(3);
        cell = cell.recover();
        assert_eq!(cell.remaining(), 2);
        cell = cell.recover().recover();
        assert!(cell.is_resting(), "Countdown should end at resting, got {:?}", cell);
    }

    #[test]
    fn test_cast_to_raw_slice() {
        let cells = [CellState::EXCITED, CellState::RESTING, CellState::refractory(4)];
        let raw: &[i32] = bytemuck::cast_slice(&cells);
        assert_eq!(raw, &[1, 0, -4]);
    }
}
