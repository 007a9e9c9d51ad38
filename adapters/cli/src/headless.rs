use ecotorus_core::{CellState, Population};
use tracing::{debug, info};

use crate::simulation::Simulation;

/// Computes `generations` generations without opening a window.
pub(crate) fn run(simulation: &mut Simulation, generations: u64) -> Population {
    for _ in 0..generations {
        simulation.tick();
        let population = simulation.population();
        debug!(
            generation = simulation.generation(),
            grass = population.count(CellState::Grass),
            rabbits = population.count(CellState::Rabbit),
            wolves = population.count(CellState::Wolf),
            "generation computed"
        );
    }

    let population = simulation.population();
    info!(
        generations,
        empty = population.count(CellState::Empty),
        grass = population.count(CellState::Grass),
        rabbits = population.count(CellState::Rabbit),
        wolves = population.count(CellState::Wolf),
        "headless run finished"
    );
    population
}

/// Formats a population as `state=count` pairs in encoding order.
pub(crate) fn summary(population: &Population) -> String {
    CellState::ALL
        .iter()
        .map(|state| format!("{state:?}={}", population.count(*state)).to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
