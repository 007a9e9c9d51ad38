#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Ecotorus.
//!
//! The world exclusively owns both generation buffers. Adapters and systems
//! mutate it only through [`apply`], which runs a command to completion
//! before returning, and observe it only through the read-only [`query`]
//! functions. A generation pass therefore can never be observed half done,
//! and edits always land between passes.

mod generation;

use ecotorus_core::{Command, Event, GridSize};
use ecotorus_system_rules::RuleEngine;

use self::generation::GenerationBuffers;

/// Represents the authoritative Ecotorus world state.
#[derive(Debug)]
pub struct World {
    size: GridSize,
    buffers: GenerationBuffers,
    rules: RuleEngine,
    generation: u64,
}

impl World {
    /// Creates an empty world of the provided size evolving under `rules`.
    #[must_use]
    pub fn new(size: GridSize, rules: RuleEngine) -> Self {
        Self {
            size,
            buffers: GenerationBuffers::new(size),
            rules,
            generation: 0,
        }
    }

    fn reset(&mut self, size: GridSize) {
        self.size = size;
        self.buffers = GenerationBuffers::new(size);
        self.generation = 0;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GridSize::REFERENCE, RuleEngine::predator_prey())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Initialize { size } => {
            world.reset(size);
            out_events.push(Event::GridInitialized { size });
        }
        Command::ReplaceGeneration { cells } => {
            let expected = world.size.cell_count();
            if cells.len() != expected {
                out_events.push(Event::GenerationRejected {
                    expected,
                    received: cells.len(),
                });
                return;
            }

            world.buffers.current_mut().load(&cells);
            out_events.push(Event::GenerationReplaced);
        }
        Command::PaintBrush { center, brush } => {
            world.buffers.current_mut().paint(center, brush);
            out_events.push(Event::BrushPainted { center, brush });
        }
        Command::Clear => {
            world.buffers.current_mut().clear();
            out_events.push(Event::Cleared);
        }
        Command::Tick => {
            let changed_cells = world.buffers.advance(&world.rules);
            world.generation = world.generation.saturating_add(1);
            out_events.push(Event::GenerationAdvanced {
                generation: world.generation,
                changed_cells,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use ecotorus_core::{CellCoord, CellState, GridSize, Neighborhood, PackedGrid, Population};

    use super::World;

    /// Dimensions of the grid.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.size
    }

    /// Number of generations computed since the grid was last initialized.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Read-only view of the committed generation.
    #[must_use]
    pub fn current_generation(world: &World) -> &PackedGrid {
        world.buffers.current()
    }

    /// Copies the committed generation into a host-owned framebuffer.
    ///
    /// # Panics
    ///
    /// Panics when `target` does not match the world's grid size.
    pub fn copy_current_into(world: &World, target: &mut PackedGrid) {
        world.buffers.current().clone_into(target);
    }

    /// State of a single cell, with wraparound.
    #[must_use]
    pub fn cell(world: &World, coord: CellCoord) -> CellState {
        world.buffers.current().cell(coord)
    }

    /// Window of nine cells centered on `center` in the committed generation.
    #[must_use]
    pub fn neighborhood(world: &World, center: CellCoord) -> Neighborhood {
        Neighborhood::from_source(world.buffers.current(), center)
    }

    /// Number of cells holding each state.
    #[must_use]
    pub fn population(world: &World) -> Population {
        world.buffers.current().population()
    }

    /// Names of the active rules in evaluation order.
    pub fn rule_names(world: &World) -> impl Iterator<Item = &str> {
        world.rules.rule_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotorus_core::{Brush, CellCoord, CellState};

    #[test]
    fn initialize_resets_cells_and_generation() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PaintBrush {
                center: CellCoord::new(5, 5),
                brush: Brush::RABBIT_STAMP,
            },
            &mut events,
        );
        apply(&mut world, Command::Tick, &mut events);

        let size = GridSize::new(12, 9).expect("valid size");
        events.clear();
        apply(&mut world, Command::Initialize { size }, &mut events);

        assert_eq!(events, vec![Event::GridInitialized { size }]);
        assert_eq!(query::grid_size(&world), size);
        assert_eq!(query::generation(&world), 0);
        assert_eq!(query::population(&world).count(CellState::Empty), 108);
    }

    #[test]
    fn replacement_with_wrong_length_is_rejected() {
        let size = GridSize::new(2, 2).expect("valid size");
        let mut world = World::new(size, RuleEngine::predator_prey());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceGeneration {
                cells: vec![CellState::Wolf; 3],
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::GenerationRejected {
                expected: 4,
                received: 3
            }]
        );
        assert_eq!(query::population(&world).count(CellState::Wolf), 0);
    }

    #[test]
    fn clear_empties_the_current_generation() {
        let size = GridSize::new(5, 5).expect("valid size");
        let mut world = World::new(size, RuleEngine::dominant_color());
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceGeneration {
                cells: vec![CellState::Grass; 25],
            },
            &mut events,
        );
        apply(&mut world, Command::Clear, &mut events);

        assert_eq!(events, vec![Event::GenerationReplaced, Event::Cleared]);
        assert_eq!(query::population(&world).count(CellState::Empty), 25);
    }

    #[test]
    fn tick_reports_generation_and_changes() {
        let size = GridSize::new(6, 6).expect("valid size");
        let mut world = World::new(size, RuleEngine::predator_prey());
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![Event::GenerationAdvanced {
                generation: 1,
                changed_cells: 0
            }]
        );
    }
}
