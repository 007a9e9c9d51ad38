//! 3×3 windows sampled around a focus cell.

use std::fmt;

use crate::{CellCoord, CellSource, CellState};

const SIDE: i32 = 3;

/// Snapshot of the nine cells centered on a focus cell.
///
/// Offsets are relative to the center, so `get(0, 0)` is the focus cell and
/// `get(-1, -1)` its upper-left neighbour. The window has its own toroidal
/// coordinate space: offsets wrap modulo 3 independently of the grid the
/// window was sampled from, so `get(2, 0)` and `get(-1, 0)` name the same cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighborhood {
    cells: [[CellState; 3]; 3],
}

impl Neighborhood {
    /// Creates a window with all nine cells set to `state`.
    #[must_use]
    pub const fn uniform(state: CellState) -> Self {
        Self {
            cells: [[state; 3]; 3],
        }
    }

    /// Builds a window by evaluating `cell` for every offset in `-1..=1` × `-1..=1`.
    #[must_use]
    pub fn from_fn<F>(mut cell: F) -> Self
    where
        F: FnMut(i32, i32) -> CellState,
    {
        let mut neighborhood = Self::uniform(CellState::Empty);
        for dy in -1..=1 {
            for dx in -1..=1 {
                neighborhood.set(dx, dy, cell(dx, dy));
            }
        }
        neighborhood
    }

    /// Samples the window centered on `center` from `source`.
    ///
    /// Each of the nine reads goes through the source's own wraparound.
    #[must_use]
    pub fn from_source<S>(source: &S, center: CellCoord) -> Self
    where
        S: CellSource + ?Sized,
    {
        let x = i64::from(center.x());
        let y = i64::from(center.y());
        Self::from_fn(|dx, dy| source.cell_at(x + i64::from(dx), y + i64::from(dy)))
    }

    /// Reads the cell at the provided offset, wrapping modulo 3.
    #[must_use]
    pub fn get(&self, dx: i32, dy: i32) -> CellState {
        self.cells[local_index(dy)][local_index(dx)]
    }

    /// Writes the cell at the provided offset, wrapping modulo 3.
    pub fn set(&mut self, dx: i32, dy: i32, state: CellState) {
        self.cells[local_index(dy)][local_index(dx)] = state;
    }

    /// The focus cell.
    #[must_use]
    pub fn center(&self) -> CellState {
        self.get(0, 0)
    }

    /// Iterates the nine cells row by row, starting at the upper-left neighbour.
    pub fn iter(&self) -> impl Iterator<Item = CellState> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// Counts how many of the nine cells hold each state, center included.
    #[must_use]
    pub fn histogram(&self) -> ColorHistogram {
        let mut counts = [0; 4];
        for cell in self.iter() {
            counts[cell.index()] += 1;
        }
        ColorHistogram { counts }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.cells.iter().enumerate() {
            if row_index > 0 {
                f.write_str(" / ")?;
            }
            for (column_index, cell) in row.iter().enumerate() {
                if column_index > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell.bits())?;
            }
        }
        Ok(())
    }
}

/// Maps an offset from the center onto a storage index, wrapping modulo 3.
fn local_index(offset: i32) -> usize {
    ((offset.rem_euclid(SIDE) + 1) % SIDE) as usize
}

/// Per-state cell counts over a [`Neighborhood`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorHistogram {
    counts: [u8; 4],
}

impl ColorHistogram {
    /// Number of window cells holding `state`.
    #[must_use]
    pub const fn count(&self, state: CellState) -> u8 {
        self.counts[state.index()]
    }

    /// Sum of all counts; nine for every window.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }

    /// State held by strictly more cells than any other, if one exists.
    #[must_use]
    pub fn dominant(&self) -> Option<CellState> {
        let highest = self.counts.iter().copied().max()?;
        let mut leaders = CellState::ALL
            .into_iter()
            .filter(|state| self.count(*state) == highest);
        let leader = leaders.next()?;
        leaders.next().is_none().then_some(leader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridSize, PackedGrid};

    fn mixed() -> Neighborhood {
        Neighborhood::from_fn(|dx, dy| CellState::from_bits((dx + 3 * dy + 4) as u8))
    }

    #[test]
    fn offsets_wrap_modulo_three() {
        let neighborhood = mixed();

        for dy in -1..=1 {
            for dx in -1..=1 {
                let expected = neighborhood.get(dx, dy);
                assert_eq!(neighborhood.get(dx + 3, dy), expected);
                assert_eq!(neighborhood.get(dx, dy - 3), expected);
                assert_eq!(neighborhood.get(dx - 300, dy + 6), expected);
            }
        }
        assert_eq!(neighborhood.get(2, 0), neighborhood.get(-1, 0));
        assert_eq!(neighborhood.get(i32::MIN, 0), neighborhood.get(i32::MIN % 3, 0));
    }

    #[test]
    fn center_is_zero_offset() {
        let mut neighborhood = Neighborhood::uniform(CellState::Grass);
        neighborhood.set(0, 0, CellState::Wolf);

        assert_eq!(neighborhood.center(), CellState::Wolf);
        assert_eq!(neighborhood.get(3, -3), CellState::Wolf);
    }

    #[test]
    fn from_source_uses_grid_wraparound() {
        let size = GridSize::new(5, 5).expect("valid size");
        let mut grid = PackedGrid::new(size);
        grid.set(4, 4, CellState::Rabbit);
        grid.set(1, 0, CellState::Wolf);

        let neighborhood = Neighborhood::from_source(&grid, CellCoord::new(0, 0));

        assert_eq!(neighborhood.get(-1, -1), CellState::Rabbit);
        assert_eq!(neighborhood.get(1, 0), CellState::Wolf);
        assert_eq!(neighborhood.center(), CellState::Empty);
    }

    #[test]
    fn from_source_is_a_copy() {
        let size = GridSize::new(3, 3).expect("valid size");
        let mut grid = PackedGrid::new(size);
        let neighborhood = Neighborhood::from_source(&grid, CellCoord::new(1, 1));
        grid.set(1, 1, CellState::Wolf);

        assert_eq!(neighborhood.center(), CellState::Empty);
    }

    #[test]
    fn histogram_counts_the_center() {
        let mut neighborhood = Neighborhood::uniform(CellState::Empty);
        neighborhood.set(0, 0, CellState::Grass);
        let histogram = neighborhood.histogram();

        assert_eq!(histogram.count(CellState::Grass), 1);
        assert_eq!(histogram.count(CellState::Empty), 8);
        assert_eq!(histogram.total(), 9);
    }

    #[test]
    fn dominant_requires_a_strict_leader() {
        let mut neighborhood = Neighborhood::uniform(CellState::Rabbit);
        assert_eq!(neighborhood.histogram().dominant(), Some(CellState::Rabbit));

        for dx in -1..=1 {
            neighborhood.set(dx, -1, CellState::Wolf);
            neighborhood.set(dx, 1, CellState::Grass);
        }
        assert_eq!(neighborhood.histogram().dominant(), None);

        neighborhood.set(0, 0, CellState::Wolf);
        assert_eq!(neighborhood.histogram().dominant(), Some(CellState::Wolf));
    }

    #[test]
    fn display_lists_rows_top_to_bottom() {
        let neighborhood = mixed();
        assert_eq!(neighborhood.to_string(), "0 1 2 / 3 0 1 / 2 3 0");
    }
}
