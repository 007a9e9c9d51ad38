#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure painting system translating pointer input into brush commands.

use ecotorus_core::{Brush, CellCoord, Command};

/// Configuration parameters required to construct the painting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    primary: Brush,
    secondary: Brush,
}

impl Config {
    /// Creates a configuration binding one brush to each pointer button.
    #[must_use]
    pub const fn new(primary: Brush, secondary: Brush) -> Self {
        Self { primary, secondary }
    }

    /// Brush applied while the primary button is held.
    #[must_use]
    pub const fn primary(&self) -> Brush {
        self.primary
    }

    /// Brush applied while the secondary button is held.
    #[must_use]
    pub const fn secondary(&self) -> Brush {
        self.secondary
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Brush::RABBIT_STAMP, Brush::WOLF_DOT)
    }
}

/// Pointer state distilled from adapter-provided frame input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintInput {
    /// Cell currently under the pointer, `None` when the pointer is off the grid.
    pub cursor_cell: Option<CellCoord>,
    /// Whether the primary button is held on this frame.
    pub primary_pressed: bool,
    /// Whether the secondary button is held on this frame.
    pub secondary_pressed: bool,
}

impl PaintInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        cursor_cell: Option<CellCoord>,
        primary_pressed: bool,
        secondary_pressed: bool,
    ) -> Self {
        Self {
            cursor_cell,
            primary_pressed,
            secondary_pressed,
        }
    }
}

/// System that emits [`Command::PaintBrush`] values while a pointer button is held.
///
/// A held button re-stamps every frame, even when the pointer rests on one
/// cell. Consecutive frames of one stroke are joined by intermediate stamps
/// spaced half a brush apart, so fast pointer motion still leaves a
/// continuous trail.
#[derive(Debug)]
pub struct Painting {
    config: Config,
    last_stamp: Option<CellCoord>,
}

impl Painting {
    /// Creates a new painting system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            last_stamp: None,
        }
    }

    /// Consumes one frame of pointer input and emits the stamps it produces.
    pub fn handle(&mut self, input: PaintInput, out: &mut Vec<Command>) {
        let brush = if input.primary_pressed {
            self.config.primary
        } else if input.secondary_pressed {
            self.config.secondary
        } else {
            self.last_stamp = None;
            return;
        };

        let Some(cursor) = input.cursor_cell else {
            self.last_stamp = None;
            return;
        };

        match self.last_stamp {
            Some(previous) if previous != cursor => {
                for center in stroke_between(previous, cursor, stamp_spacing(brush)) {
                    out.push(Command::PaintBrush { center, brush });
                }
            }
            _ => out.push(Command::PaintBrush {
                center: cursor,
                brush,
            }),
        }
        self.last_stamp = Some(cursor);
    }
}

fn stamp_spacing(brush: Brush) -> i64 {
    i64::from((brush.size() / 2).max(1))
}

/// Stamp centers after `from` up to and including `to`, at most `spacing` apart.
fn stroke_between(from: CellCoord, to: CellCoord, spacing: i64) -> Vec<CellCoord> {
    let dx = i64::from(to.x()) - i64::from(from.x());
    let dy = i64::from(to.y()) - i64::from(from.y());
    let distance = dx.abs().max(dy.abs());
    let steps = (distance + spacing - 1) / spacing;

    (1..=steps)
        .map(|step| {
            let x = i64::from(from.x()) + dx * step / steps;
            let y = i64::from(from.y()) + dy * step / steps;
            CellCoord::new(
                i32::try_from(x).unwrap_or(to.x()),
                i32::try_from(y).unwrap_or(to.y()),
            )
        })
        .collect()
}
