#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Ecotorus adapters.

use anyhow::Result as AnyResult;
use ecotorus_core::{CellCoord, CellState, GridSize, PackedGrid, Population};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// One display color per cell state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    colors: [Color; 4],
}

impl Palette {
    /// Light background, green grass, orange rabbits and charcoal wolves.
    pub const CLASSIC: Self = Self::new([
        Color::from_hex(0xf8_f9_fa),
        Color::from_hex(0xc0_eb_75),
        Color::from_hex(0xff_a9_4d),
        Color::from_hex(0x49_50_57),
    ]);

    /// Creates a palette from colors ordered `Empty`, `Grass`, `Rabbit`, `Wolf`.
    #[must_use]
    pub const fn new(colors: [Color; 4]) -> Self {
        Self { colors }
    }

    /// Color used to draw cells holding `state`.
    #[must_use]
    pub const fn color(&self, state: CellState) -> Color {
        self.colors[state.index()]
    }

    /// Color of empty cells, which doubles as the frame clear color.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.color(CellState::Empty)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Describes how the cell grid is laid out on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Dimensions of the grid in cells.
    pub size: GridSize,
    /// Side length of a single cell expressed in screen units.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Cell side length used when the host does not pick one.
    pub const DEFAULT_CELL_LENGTH: f32 = 4.0;

    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(size: GridSize, cell_length: f32) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self { size, cell_length })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.size.width() as f32 * self.cell_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.size.height() as f32 * self.cell_length
    }

    /// Top-left corner of `cell` in grid-local screen units.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.x() as f32, cell.y() as f32) * self.cell_length
    }

    /// Maps a grid-local screen position to the cell drawn underneath it.
    ///
    /// Returns `None` when the position lies outside the drawn grid.
    #[must_use]
    pub fn screen_to_cell(&self, position: Vec2) -> Option<CellCoord> {
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let scaled = position / self.cell_length;
        let column = scaled.x.floor();
        let row = scaled.y.floor();
        if column >= self.size.width() as f32 || row >= self.size.height() as f32 {
            return None;
        }

        Some(CellCoord::new(column as i32, row as i32))
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Cell under the pointer, if the pointer hovers the grid.
    pub hovered_cell: Option<CellCoord>,
    /// Whether the primary paint button is held on this frame.
    pub primary_paint: bool,
    /// Whether the secondary paint button is held on this frame.
    pub secondary_paint: bool,
    /// Whether the adapter detected a pause toggle on this frame.
    pub toggle_pause: bool,
    /// Whether the adapter detected a single-step request on this frame.
    pub step: bool,
    /// Whether the adapter detected a reseed request on this frame.
    pub reseed: bool,
    /// Whether the adapter detected a clear request on this frame.
    pub clear: bool,
}

/// Scene description combining the framebuffer and its status line.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid layout used when drawing the framebuffer.
    pub grid: GridPresentation,
    /// Host-owned copy of the committed generation.
    pub framebuffer: PackedGrid,
    /// Colors used for each cell state.
    pub palette: Palette,
    /// Number of generations computed so far.
    pub generation: u64,
    /// Per-state cell counts of the framebuffer.
    pub population: Population,
    /// Whether the simulation is currently paused.
    pub paused: bool,
}

impl Scene {
    /// Creates a new scene with an empty framebuffer sized to `grid`.
    #[must_use]
    pub fn new(grid: GridPresentation, palette: Palette) -> Self {
        let framebuffer = PackedGrid::new(grid.size);
        let population = framebuffer.population();
        Self {
            grid,
            framebuffer,
            palette,
            generation: 0,
            population,
            paused: false,
        }
    }

    /// Single-line status summary shown alongside the grid.
    #[must_use]
    pub fn status_line(&self) -> String {
        let paused = if self.paused { " (paused)" } else { "" };
        format!(
            "generation {}{paused} | grass {} | rabbits {} | wolves {}",
            self.generation,
            self.population.count(CellState::Grass),
            self.population.count(CellState::Rabbit),
            self.population.count(CellState::Wolf),
        )
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Ecotorus scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive, finite side length.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be positive and finite (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32, cell_length: f32) -> GridPresentation {
        GridPresentation::new(
            GridSize::new(width, height).expect("valid size"),
            cell_length,
        )
        .expect("valid grid")
    }

    #[test]
    fn hex_colors_expand_to_channels() {
        let color = Color::from_hex(0xff_00_80);

        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 128.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn classic_palette_uses_empty_color_as_background() {
        let palette = Palette::CLASSIC;

        assert_eq!(palette.background(), Color::from_rgb_u8(0xf8, 0xf9, 0xfa));
        assert_eq!(
            palette.color(CellState::Wolf),
            Color::from_rgb_u8(0x49, 0x50, 0x57)
        );
    }

    #[test]
    fn grid_creation_rejects_non_positive_cell_length() {
        let size = GridSize::new(4, 4).expect("valid size");

        for cell_length in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let error = GridPresentation::new(size, cell_length)
                .expect_err("invalid cell length must be rejected");
            assert!(matches!(error, RenderingError::InvalidCellLength { .. }));
        }
    }

    #[test]
    fn screen_positions_map_to_cells() {
        let grid = grid(10, 5, 4.0);

        assert_eq!(
            grid.screen_to_cell(Vec2::new(0.0, 0.0)),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            grid.screen_to_cell(Vec2::new(7.9, 4.0)),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(
            grid.screen_to_cell(Vec2::new(39.9, 19.9)),
            Some(CellCoord::new(9, 4))
        );
    }

    #[test]
    fn positions_outside_the_grid_map_to_nothing() {
        let grid = grid(10, 5, 4.0);

        assert_eq!(grid.screen_to_cell(Vec2::new(-0.1, 3.0)), None);
        assert_eq!(grid.screen_to_cell(Vec2::new(40.0, 3.0)), None);
        assert_eq!(grid.screen_to_cell(Vec2::new(3.0, 20.0)), None);
        assert_eq!(grid.screen_to_cell(Vec2::new(f32::NAN, 3.0)), None);
    }

    #[test]
    fn cell_origin_inverts_screen_mapping() {
        let grid = grid(8, 8, 3.0);
        let cell = CellCoord::new(5, 2);

        let origin = grid.cell_origin(cell);

        assert_eq!(origin, Vec2::new(15.0, 6.0));
        assert_eq!(grid.screen_to_cell(origin + Vec2::splat(1.5)), Some(cell));
    }

    #[test]
    fn new_scene_starts_empty_and_running() {
        let grid = grid(6, 4, 2.0);
        let scene = Scene::new(grid, Palette::default());

        assert_eq!(scene.framebuffer.size(), grid.size);
        assert_eq!(scene.population.count(CellState::Empty), 24);
        assert!(!scene.paused);
        assert_eq!(
            scene.status_line(),
            "generation 0 | grass 0 | rabbits 0 | wolves 0"
        );
    }
}
