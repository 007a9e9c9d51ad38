//! Toroidal cell storage packing four cells into every byte.

use crate::{Brush, CellCoord, CellState, GridSize, Population};

const CELLS_PER_BYTE: usize = 4;
const BITS_PER_CELL: usize = 2;
const CELL_MASK: u8 = 0b11;

/// Read access to a toroidal field of cells.
///
/// Coordinates are taken as `i64` so that a center coordinate anywhere in the
/// `i32` range can be offset without overflowing.
pub trait CellSource {
    /// Returns the state at `(x, y)`, wrapping components that fall outside the field.
    fn cell_at(&self, x: i64, y: i64) -> CellState;
}

/// Dense W×H grid of cells stored two bits per cell.
///
/// Cell `(x, y)` lives at row-major index `y * width + x`; the cell with the
/// lowest index in each byte occupies its least significant bits. Every
/// coordinate wraps modulo the grid dimensions, giving the field a toroidal
/// topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedGrid {
    size: GridSize,
    bytes: Vec<u8>,
}

impl PackedGrid {
    /// Allocates a grid with every cell [`CellState::Empty`].
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            bytes: vec![0; size.cell_count().div_ceil(CELLS_PER_BYTE)],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Reads the cell at `(x, y)` with wraparound.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> CellState {
        self.cell_at(i64::from(x), i64::from(y))
    }

    /// Reads the cell at `coord` with wraparound.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> CellState {
        self.get(coord.x(), coord.y())
    }

    /// Writes the cell at `(x, y)` with wraparound.
    pub fn set(&mut self, x: i32, y: i32, state: CellState) {
        self.write_at(i64::from(x), i64::from(y), state);
    }

    /// Resets every cell to [`CellState::Empty`].
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Copies every cell into `target`.
    ///
    /// # Panics
    ///
    /// Panics when `target` has different dimensions.
    pub fn clone_into(&self, target: &mut PackedGrid) {
        assert_eq!(
            self.size, target.size,
            "clone_into requires grids of identical dimensions"
        );
        target.bytes.copy_from_slice(&self.bytes);
    }

    /// Overwrites every cell from a row-major slice.
    ///
    /// Entries past the end of the grid are ignored; cells past the end of
    /// the slice keep their state.
    pub fn load(&mut self, cells: &[CellState]) {
        debug_assert_eq!(cells.len(), self.size.cell_count());
        for (index, state) in cells.iter().take(self.size.cell_count()).enumerate() {
            self.write(index, *state);
        }
    }

    /// Stamps `brush` into the square centered on `center`, wrapping at the edges.
    ///
    /// A brush wider than the grid covers each column exactly once.
    pub fn paint(&mut self, center: CellCoord, brush: Brush) {
        let columns = i64::from(brush.size().min(self.size.width()));
        let rows = i64::from(brush.size().min(self.size.height()));
        let left = i64::from(center.x()) + brush.leading_offset();
        let top = i64::from(center.y()) + brush.leading_offset();

        for row in top..top + rows {
            for column in left..left + columns {
                self.write_at(column, row, brush.color());
            }
        }
    }

    /// Iterates the cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellState> + '_ {
        (0..self.size.cell_count()).map(move |index| self.read(index))
    }

    /// Tallies how many cells hold each state.
    #[must_use]
    pub fn population(&self) -> Population {
        Population::from_cells(self.iter())
    }

    /// Packed storage, suitable for blitting to a two-bit framebuffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn write_at(&mut self, x: i64, y: i64, state: CellState) {
        let index = self.size.wrap_wide(x, y);
        self.write(index, state);
    }

    fn read(&self, index: usize) -> CellState {
        let shift = (index % CELLS_PER_BYTE) * BITS_PER_CELL;
        CellState::from_bits(self.bytes[index / CELLS_PER_BYTE] >> shift)
    }

    fn write(&mut self, index: usize, state: CellState) {
        let shift = (index % CELLS_PER_BYTE) * BITS_PER_CELL;
        let byte = &mut self.bytes[index / CELLS_PER_BYTE];
        *byte = (*byte & !(CELL_MASK << shift)) | (state.bits() << shift);
    }
}

impl CellSource for PackedGrid {
    fn cell_at(&self, x: i64, y: i64) -> CellState {
        self.read(self.size.wrap_wide(x, y))
    }
}
