#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Ecotorus.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter uses Macroquad's immediate-mode UI module for the control
//! panel. All UI-specific calls live inside the local `ui` module to avoid
//! leaking Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use ecotorus_core::{CellState, PackedGrid};
use ecotorus_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, mouse_position, KeyCode, MouseButton,
};
use macroquad::math::Vec2 as MacroquadVec2;
use std::{
    collections::VecDeque,
    fmt,
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Width of the control panel drawn to the right of the grid.
const CONTROL_PANEL_WIDTH: f32 = 220.0;

/// Tracks panel button presses so they can be merged with keyboard input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    pause_latched: bool,
    step_latched: bool,
    reseed_latched: bool,
    clear_latched: bool,
}

impl ControlPanelInputState {
    /// Records the buttons pressed on the panel this frame.
    pub fn register(&mut self, pause: bool, step: bool, reseed: bool, clear: bool) {
        self.pause_latched |= pause;
        self.step_latched |= step;
        self.reseed_latched |= reseed;
        self.clear_latched |= clear;
    }

    /// Merges the latched presses into `input` and clears the latches so each
    /// press fires only once.
    pub fn drain_into(&mut self, input: &mut FrameInput) {
        let latched = std::mem::take(self);
        input.toggle_pause |= latched.pause_latched;
        input.step |= latched.step_latched;
        input.reseed |= latched.reseed_latched;
        input.clear |= latched.clear_latched;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `Space` pauses or resumes generation.
    toggle_pause: bool,
    /// `N` computes exactly one generation.
    step: bool,
    /// `R` refills the grid with noise.
    reseed: bool,
    /// `C` empties the grid.
    clear: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_pause: is_key_pressed(KeyCode::Space),
            step: is_key_pressed(KeyCode::N),
            reseed: is_key_pressed(KeyCode::R),
            clear: is_key_pressed(KeyCode::C),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Span the trailing frame rate is averaged over.
const TRAILING_WINDOW: Duration = Duration::from_secs(10);

/// Time spent on one frame, split into its simulation and drawing parts.
#[derive(Clone, Copy, Debug, Default)]
struct FrameTiming {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Accumulates frame timings and reports them once per second of frame time.
#[derive(Debug, Default)]
struct FrameStats {
    second_elapsed: Duration,
    second_frames: u32,
    second_update: Duration,
    second_render: Duration,
    window: VecDeque<Duration>,
    window_total: Duration,
}

/// One second of frame statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    trailing_fps: f32,
    mean_update: Duration,
    mean_render: Duration,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} fps ({:.2} over {}s) | update {:.2}ms render {:.2}ms",
            self.fps,
            self.trailing_fps,
            TRAILING_WINDOW.as_secs(),
            self.mean_update.as_secs_f64() * 1_000.0,
            self.mean_render.as_secs_f64() * 1_000.0,
        )
    }
}

impl FrameStats {
    /// Adds a frame, returning a report when a full second has accumulated.
    fn record(&mut self, timing: FrameTiming) -> Option<FrameReport> {
        self.second_elapsed += timing.frame;
        self.second_frames = self.second_frames.saturating_add(1);
        self.second_update += timing.update;
        self.second_render += timing.render;

        self.window.push_back(timing.frame);
        self.window_total += timing.frame;
        while self.window_total > TRAILING_WINDOW {
            let Some(oldest) = self.window.pop_front() else {
                break;
            };
            self.window_total = self.window_total.saturating_sub(oldest);
        }

        if self.second_elapsed < Duration::from_secs(1) {
            return None;
        }

        let fps = self.second_frames as f32 / self.second_elapsed.as_secs_f32();
        let window_seconds = self.window_total.as_secs_f32();
        let trailing_fps = if window_seconds > f32::EPSILON {
            self.window.len() as f32 / window_seconds
        } else {
            fps
        };
        let frames = self.second_frames.max(1);
        let report = FrameReport {
            fps,
            trailing_fps,
            mean_update: self.second_update / frames,
            mean_render: self.second_render / frames,
        };

        self.second_elapsed = Duration::ZERO;
        self.second_frames = 0;
        self.second_update = Duration::ZERO;
        self.second_render = Duration::ZERO;
        Some(report)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 740,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        info!(
            width = scene.grid.size.width(),
            height = scene.grid.size.height(),
            "opening window"
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut frame_stats = FrameStats::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    debug!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let mut frame_input = gather_frame_input_from_observations(
                    &scene,
                    &metrics,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_down(MouseButton::Left),
                    is_mouse_button_down(MouseButton::Right),
                    keyboard,
                );
                control_panel_input.drain_into(&mut frame_input);

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                draw_cells(&scene, &metrics, clear_color);
                let panel_context = ControlPanelUiContext {
                    origin: MacroquadVec2::new(metrics.panel_left, 0.0),
                    size: MacroquadVec2::new(CONTROL_PANEL_WIDTH, screen_height),
                    background: to_macroquad_color(scene.palette.color(CellState::Wolf)),
                };
                macroquad::shapes::draw_rectangle(
                    metrics.panel_left,
                    0.0,
                    CONTROL_PANEL_WIDTH,
                    screen_height,
                    panel_context.background,
                );
                let ControlPanelUiResult {
                    pause_pressed,
                    step_pressed,
                    reseed_pressed,
                    clear_pressed,
                } = draw_control_panel_ui(
                    &mut macroquad::ui::root_ui(),
                    panel_context,
                    &scene,
                );
                control_panel_input.register(
                    pause_pressed,
                    step_pressed,
                    reseed_pressed,
                    clear_pressed,
                );
                let render_duration = render_start.elapsed();

                let report = frame_stats.record(FrameTiming {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if let Some(report) = report.filter(|_| show_fps) {
                    info!("{report} | {}", scene.status_line());
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space placement of the grid for the current window size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    grid_offset_x: f32,
    grid_offset_y: f32,
    cell_step: f32,
    panel_left: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let grid = scene.grid;
        let available_width = (screen_width - CONTROL_PANEL_WIDTH).max(0.0);
        let scale = (available_width / grid.width())
            .min(screen_height / grid.height())
            .max(0.0);
        let grid_width_scaled = grid.width() * scale;
        let grid_height_scaled = grid.height() * scale;

        Self {
            scale,
            grid_offset_x: (available_width - grid_width_scaled) * 0.5,
            grid_offset_y: (screen_height - grid_height_scaled) * 0.5,
            cell_step: grid.cell_length * scale,
            panel_left: available_width,
        }
    }
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    primary_down: bool,
    secondary_down: bool,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let mut input = FrameInput {
        toggle_pause: keyboard.toggle_pause,
        step: keyboard.step,
        reseed: keyboard.reseed,
        clear: keyboard.clear,
        ..FrameInput::default()
    };

    if metrics.scale <= f32::EPSILON {
        return input;
    }

    let grid_position = Vec2::new(
        (cursor_position.x - metrics.grid_offset_x) / metrics.scale,
        (cursor_position.y - metrics.grid_offset_y) / metrics.scale,
    );
    input.hovered_cell = scene.grid.screen_to_cell(grid_position);
    if input.hovered_cell.is_some() {
        input.primary_paint = primary_down;
        input.secondary_paint = secondary_down;
    }

    input
}

/// Horizontal span of equal cells drawn as one rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRun {
    start: u32,
    length: u32,
    state: CellState,
}

fn row_runs(grid: &PackedGrid, row: u32) -> Vec<CellRun> {
    let width = grid.size().width();
    let mut runs: Vec<CellRun> = Vec::new();
    let row_start = row as usize * width as usize;

    for (column, state) in grid
        .iter()
        .skip(row_start)
        .take(width as usize)
        .enumerate()
    {
        match runs.last_mut() {
            Some(run) if run.state == state => run.length += 1,
            _ => runs.push(CellRun {
                start: column as u32,
                length: 1,
                state,
            }),
        }
    }

    runs
}

fn draw_cells(scene: &Scene, metrics: &SceneMetrics, background: Color) {
    let step = metrics.cell_step;
    for row in 0..scene.framebuffer.size().height() {
        let y = metrics.grid_offset_y + row as f32 * step;
        for run in row_runs(&scene.framebuffer, row) {
            let color = scene.palette.color(run.state);
            if color == background {
                continue;
            }

            macroquad::shapes::draw_rectangle(
                metrics.grid_offset_x + run.start as f32 * step,
                y,
                run.length as f32 * step,
                step,
                to_macroquad_color(color),
            );
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
