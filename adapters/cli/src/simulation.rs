use ecotorus_core::{Brush, Command, Event, Population};
use ecotorus_rendering::Scene;
use ecotorus_system_painting::{Config as PaintingConfig, PaintInput, Painting};
use ecotorus_system_seeding::{Config as SeedingConfig, Seeding};
use ecotorus_world::{self as world, query, World};
use tracing::warn;

use crate::config::Settings;

/// Owns the world together with the systems that feed it commands.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    seeding: Seeding,
    painting: Painting,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    /// Creates a world sized from `settings` and fills it with seeded noise.
    pub(crate) fn new(settings: &Settings, seed: u64) -> Self {
        let mut simulation = Self {
            world: World::new(settings.size, settings.rules.engine()),
            seeding: Seeding::new(SeedingConfig::new(seed)),
            painting: Painting::new(PaintingConfig::new(settings.brush, Brush::WOLF_DOT)),
            commands: Vec::new(),
            events: Vec::new(),
        };

        simulation.commands.push(Command::Initialize {
            size: settings.size,
        });
        simulation.flush();
        let events = std::mem::take(&mut simulation.events);
        simulation.seeding.handle(&events, &mut simulation.commands);
        simulation.flush();
        simulation
    }

    pub(crate) fn paint(&mut self, input: PaintInput) {
        self.painting.handle(input, &mut self.commands);
        self.flush();
    }

    pub(crate) fn reseed(&mut self) {
        let command = self.seeding.reseed(query::grid_size(&self.world));
        self.commands.push(command);
        self.flush();
    }

    pub(crate) fn clear(&mut self) {
        self.commands.push(Command::Clear);
        self.flush();
    }

    pub(crate) fn tick(&mut self) {
        self.commands.push(Command::Tick);
        self.flush();
    }

    pub(crate) fn generation(&self) -> u64 {
        query::generation(&self.world)
    }

    pub(crate) fn population(&self) -> Population {
        query::population(&self.world)
    }

    /// Copies the committed generation and its statistics into `scene`.
    pub(crate) fn refresh(&self, scene: &mut Scene) {
        query::copy_current_into(&self.world, &mut scene.framebuffer);
        scene.generation = self.generation();
        scene.population = scene.framebuffer.population();
    }

    fn flush(&mut self) {
        self.events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        for event in &self.events {
            if let Event::GenerationRejected { expected, received } = event {
                warn!(expected, received, "generation replacement rejected");
            }
        }
    }
}
