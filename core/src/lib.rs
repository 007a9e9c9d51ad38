#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ecotorus engine.
//!
//! This crate defines the cell vocabulary and the message surface that
//! connects adapters, the authoritative world, and pure systems. Adapters
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for systems to react to deterministically.
//!
//! The grid itself is a toroidal field of four-state cells stored two bits per
//! cell in a [`PackedGrid`]. Rules observe the field exclusively through 3×3
//! [`Neighborhood`] snapshots.

mod grid;
mod neighborhood;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{CellSource, PackedGrid};
pub use neighborhood::{ColorHistogram, Neighborhood};

/// Title shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "Ecotorus";

/// One of the four states a cell of the automaton can hold.
///
/// The discriminants double as the two-bit encoding used by [`PackedGrid`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CellState {
    /// Bare ground.
    #[default]
    Empty = 0,
    /// Grass spreading over empty ground.
    Grass = 1,
    /// Rabbits grazing on grass.
    Rabbit = 2,
    /// Wolves hunting rabbits.
    Wolf = 3,
}

impl CellState {
    /// Every state in encoding order.
    pub const ALL: [CellState; 4] = [Self::Empty, Self::Grass, Self::Rabbit, Self::Wolf];

    /// Two-bit encoding of the state.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes a state from the two least significant bits of `bits`.
    ///
    /// Higher bits are ignored, so every input decodes to a legal state.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Empty,
            1 => Self::Grass,
            2 => Self::Rabbit,
            _ => Self::Wolf,
        }
    }

    /// Position of the state inside [`CellState::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Location of a cell on the toroidal grid.
///
/// Coordinates are unbounded: any value, negative or past the grid edge, is
/// resolved by floor-modulo against the grid dimensions when it is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Dimensions of the grid measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// The 160×160 field of the reference configuration.
    pub const REFERENCE: GridSize = GridSize {
        width: 160,
        height: 160,
    };

    /// Largest accepted number of cells (an 8192×8192 field).
    ///
    /// Keeps a packed generation at 16 MiB and bounds both axes well below
    /// `i32::MAX`, so every cell has an `i32` coordinate.
    pub const MAX_CELLS: usize = 1 << 26;

    /// Creates a grid size, rejecting empty grids and grids above [`Self::MAX_CELLS`].
    pub const fn new(width: u32, height: u32) -> Result<Self, GridSizeError> {
        if width == 0 || height == 0 {
            return Err(GridSizeError::Empty { width, height });
        }
        match (width as usize).checked_mul(height as usize) {
            Some(cells) if cells <= Self::MAX_CELLS => Ok(Self { width, height }),
            _ => Err(GridSizeError::TooLarge { width, height }),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterates every in-bounds coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| CellCoord::new(x, y)))
    }

    /// Resolves an unbounded coordinate to its row-major cell index.
    #[must_use]
    pub fn wrap(&self, coord: CellCoord) -> usize {
        self.wrap_wide(i64::from(coord.x()), i64::from(coord.y()))
    }

    pub(crate) fn wrap_wide(&self, x: i64, y: i64) -> usize {
        let column = x.rem_euclid(i64::from(self.width)) as usize;
        let row = y.rem_euclid(i64::from(self.height)) as usize;
        row * self.width as usize + column
    }
}

impl TryFrom<(u32, u32)> for GridSize {
    type Error = GridSizeError;

    fn try_from((width, height): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}

impl From<GridSize> for (u32, u32) {
    fn from(size: GridSize) -> Self {
        (size.width, size.height)
    }
}

/// Reasons a [`GridSize`] cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridSizeError {
    /// At least one dimension was zero.
    #[error("grid must contain at least one cell (received {width}x{height})")]
    Empty {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The grid would hold more than [`GridSize::MAX_CELLS`] cells.
    #[error("grid dimensions {width}x{height} exceed the supported maximum")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Square stamp that overwrites cells with a single state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Brush {
    color: CellState,
    size: u32,
}

impl Brush {
    /// The 21×21 rabbit stamp bound to the primary pointer button.
    pub const RABBIT_STAMP: Brush = Brush::new(CellState::Rabbit, 21);

    /// The single-cell wolf stamp of the simpler interaction variant.
    pub const WOLF_DOT: Brush = Brush::new(CellState::Wolf, 1);

    /// Creates a brush painting `color` into a `size`×`size` square.
    #[must_use]
    pub const fn new(color: CellState, size: u32) -> Self {
        Self { color, size }
    }

    /// State written by the brush.
    #[must_use]
    pub const fn color(&self) -> CellState {
        self.color
    }

    /// Side length of the stamped square.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Offset of the first stamped row or column relative to the center.
    ///
    /// Odd sizes are symmetric; even sizes extend one cell further towards
    /// negative offsets.
    #[must_use]
    pub const fn leading_offset(&self) -> i64 {
        -((self.size / 2) as i64)
    }
}

/// Number of cells holding each state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Population {
    counts: [usize; 4],
}

impl Population {
    /// Tallies the provided cells.
    #[must_use]
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = CellState>,
    {
        let mut counts = [0; 4];
        for cell in cells {
            counts[cell.index()] += 1;
        }
        Self { counts }
    }

    /// Number of cells holding `state`.
    #[must_use]
    pub const fn count(&self, state: CellState) -> usize {
        self.counts[state.index()]
    }

    /// Total number of tallied cells.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Reallocates both generation buffers with the provided size, all empty.
    Initialize {
        /// Dimensions of the new grid.
        size: GridSize,
    },
    /// Replaces every cell of the current generation.
    ReplaceGeneration {
        /// Row-major cell states; must hold exactly one entry per cell.
        cells: Vec<CellState>,
    },
    /// Stamps a brush into the current generation.
    PaintBrush {
        /// Cell at the center of the stamp.
        center: CellCoord,
        /// Brush applied at the center.
        brush: Brush,
    },
    /// Resets every cell of the current generation to [`CellState::Empty`].
    Clear,
    /// Computes the next generation from the current one and commits it.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that fresh, empty buffers were allocated.
    GridInitialized {
        /// Dimensions of the allocated grid.
        size: GridSize,
    },
    /// Confirms that the current generation was replaced wholesale.
    GenerationReplaced,
    /// Reports that a replacement was rejected because its length was wrong.
    GenerationRejected {
        /// Number of cells the grid holds.
        expected: usize,
        /// Number of cells supplied by the command.
        received: usize,
    },
    /// Confirms that a brush was stamped into the current generation.
    BrushPainted {
        /// Cell at the center of the stamp.
        center: CellCoord,
        /// Brush that was applied.
        brush: Brush,
    },
    /// Confirms that the current generation was cleared.
    Cleared,
    /// Announces that a new generation was committed.
    GenerationAdvanced {
        /// Number of generations computed since initialization.
        generation: u64,
        /// Number of cells whose state differs from the previous generation.
        changed_cells: usize,
    },
}
