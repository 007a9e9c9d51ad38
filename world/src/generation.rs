//! Double-buffered generation storage and the per-generation pass.

use ecotorus_core::{GridSize, Neighborhood, PackedGrid};
use ecotorus_system_rules::RuleEngine;

/// Pair of grids holding the committed generation and the one being computed.
#[derive(Debug)]
pub(crate) struct GenerationBuffers {
    current: PackedGrid,
    next: PackedGrid,
}

impl GenerationBuffers {
    /// Allocates both buffers with every cell empty.
    pub(crate) fn new(size: GridSize) -> Self {
        Self {
            current: PackedGrid::new(size),
            next: PackedGrid::new(size),
        }
    }

    /// Committed generation.
    pub(crate) fn current(&self) -> &PackedGrid {
        &self.current
    }

    /// Committed generation, for edits applied between passes.
    pub(crate) fn current_mut(&mut self) -> &mut PackedGrid {
        &mut self.current
    }

    /// Computes the next generation and commits it, returning how many cells changed.
    ///
    /// Every read comes from the committed buffer and every write goes to the
    /// scratch buffer, so the order cells are visited in does not matter.
    pub(crate) fn advance(&mut self, rules: &RuleEngine) -> usize {
        let changed_cells = compute_next(&self.current, &mut self.next, rules);
        std::mem::swap(&mut self.current, &mut self.next);
        changed_cells
    }
}

/// Writes the successor of `current` into `next`, overwriting every cell.
fn compute_next(current: &PackedGrid, next: &mut PackedGrid, rules: &RuleEngine) -> usize {
    debug_assert_eq!(current.size(), next.size());

    let mut changed_cells = 0;
    for coord in current.size().coords() {
        let neighborhood = Neighborhood::from_source(current, coord);
        let state = rules.next_state(&neighborhood);
        if state != neighborhood.center() {
            changed_cells += 1;
        }
        next.set(coord.x(), coord.y(), state);
    }
    changed_cells
}
