#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic seeding system that fills freshly initialized grids with noise.

use ecotorus_core::{CellState, Command, Event, GridSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the seeding system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration drawing noise from the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed the random stream starts from.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Pure system that emits a random replacement generation for new grids.
///
/// Every cell is drawn independently and uniformly from the four states, so
/// the automaton never starts from a uniform field.
#[derive(Debug)]
pub struct Seeding {
    rng: ChaCha8Rng,
}

impl Seeding {
    /// Creates a new seeding system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits one replacement for every grid initialization among `events`.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::GridInitialized { size } = event {
                out.push(self.reseed(*size));
            }
        }
    }

    /// Draws a fresh random generation for a grid of the provided size.
    #[must_use]
    pub fn reseed(&mut self, size: GridSize) -> Command {
        let cells = (0..size.cell_count())
            .map(|_| CellState::from_bits(self.rng.gen_range(0..4)))
            .collect();
        Command::ReplaceGeneration { cells }
    }
}
