#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Ecotorus automaton in a window or headless.

mod cadence;
mod config;
mod headless;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ecotorus_core::WINDOW_TITLE;
use ecotorus_rendering::{GridPresentation, Palette, Presentation, RenderingBackend, Scene};
use ecotorus_rendering_macroquad::MacroquadBackend;
use ecotorus_system_painting::PaintInput;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    cadence::TickClock,
    config::{BrushColor, FileConfig, RulesChoice, Settings},
    simulation::Simulation,
};

/// Predator-prey cellular automaton on a toroidal grid.
#[derive(Debug, Parser)]
#[command(name = "ecotorus", version)]
struct CliArgs {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u32>,
    /// Grid height in cells.
    #[arg(long)]
    height: Option<u32>,
    /// Seed for the initial noise; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Rule table driving the automaton.
    #[arg(long, value_enum)]
    rules: Option<RulesChoice>,
    /// Side length of the primary brush in cells.
    #[arg(long)]
    brush_size: Option<u32>,
    /// State painted by the primary brush.
    #[arg(long, value_enum)]
    brush_color: Option<BrushColor>,
    /// Generations computed per second while running.
    #[arg(long)]
    generations_per_second: Option<u32>,
    /// Compute this many generations without a window, then print the population.
    #[arg(long, value_name = "GENERATIONS")]
    headless: Option<u64>,
    /// TOML file supplying defaults for any flag.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

impl CliArgs {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            width: self.width,
            height: self.height,
            seed: self.seed,
            rules: self.rules,
            brush_size: self.brush_size,
            brush_color: self.brush_color,
            generations_per_second: self.generations_per_second,
            vsync: self.vsync.then_some(true),
            show_fps: self.show_fps.then_some(true),
        }
    }
}

/// Entry point for the Ecotorus command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(args.overrides(), file).context("invalid configuration")?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        width = settings.size.width(),
        height = settings.size.height(),
        rules = settings.rules.label(),
        "starting simulation"
    );

    let mut simulation = Simulation::new(&settings, seed);
    if let Some(generations) = args.headless {
        let population = headless::run(&mut simulation, generations);
        println!(
            "generation {}: {}",
            simulation.generation(),
            headless::summary(&population)
        );
        return Ok(());
    }

    run_windowed(&settings, simulation)
}

fn run_windowed(settings: &Settings, mut simulation: Simulation) -> Result<()> {
    let grid = GridPresentation::new(settings.size, GridPresentation::DEFAULT_CELL_LENGTH)
        .context("failed to lay out grid")?;
    let palette = Palette::CLASSIC;
    let mut scene = Scene::new(grid, palette);
    simulation.refresh(&mut scene);
    let presentation = Presentation::new(WINDOW_TITLE, palette.background(), scene);

    let mut clock = TickClock::new(settings.generations_per_second);
    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps)
        .run(presentation, move |frame, input, scene| {
            if input.toggle_pause {
                clock.toggle_pause();
                info!(paused = clock.is_paused(), "pause toggled");
            }
            if input.clear {
                simulation.clear();
            }
            if input.reseed {
                simulation.reseed();
            }
            simulation.paint(PaintInput::new(
                input.hovered_cell,
                input.primary_paint,
                input.secondary_paint,
            ));
            for _ in 0..clock.advance(frame, input.step) {
                simulation.tick();
            }

            simulation.refresh(scene);
            scene.paused = clock.is_paused();
        })
}
