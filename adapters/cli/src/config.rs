//! Layered run configuration: command-line flags over an optional TOML file
//! over built-in defaults.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use ecotorus_core::{Brush, CellState, GridSize, GridSizeError};
use ecotorus_system_rules::RuleSet;
use serde::Deserialize;
use thiserror::Error;

/// Generations computed per second when nothing else is configured.
pub(crate) const DEFAULT_GENERATIONS_PER_SECOND: u32 = 60;

/// Rule table names accepted on the command line and in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum RulesChoice {
    /// Grass, rabbits and wolves.
    PredatorPrey,
    /// Majority spreading.
    DominantColor,
}

impl From<RulesChoice> for RuleSet {
    fn from(choice: RulesChoice) -> Self {
        match choice {
            RulesChoice::PredatorPrey => RuleSet::PredatorPrey,
            RulesChoice::DominantColor => RuleSet::DominantColor,
        }
    }
}

/// Cell states the primary brush may paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum BrushColor {
    /// Erases cells.
    Empty,
    /// Paints grass.
    Grass,
    /// Paints rabbits.
    Rabbit,
    /// Paints wolves.
    Wolf,
}

impl From<BrushColor> for CellState {
    fn from(color: BrushColor) -> Self {
        match color {
            BrushColor::Empty => CellState::Empty,
            BrushColor::Grass => CellState::Grass,
            BrushColor::Rabbit => CellState::Rabbit,
            BrushColor::Wolf => CellState::Wolf,
        }
    }
}

/// One configuration layer. Every field is optional so layers can be stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) rules: Option<RulesChoice>,
    pub(crate) brush_size: Option<u32>,
    pub(crate) brush_color: Option<BrushColor>,
    pub(crate) generations_per_second: Option<u32>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: Option<bool>,
}

impl FileConfig {
    /// Reads and parses a TOML configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Fills every field missing from `self` with the value from `fallback`.
    #[must_use]
    pub(crate) fn or(self, fallback: Self) -> Self {
        Self {
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
            seed: self.seed.or(fallback.seed),
            rules: self.rules.or(fallback.rules),
            brush_size: self.brush_size.or(fallback.brush_size),
            brush_color: self.brush_color.or(fallback.brush_color),
            generations_per_second: self
                .generations_per_second
                .or(fallback.generations_per_second),
            vsync: self.vsync.or(fallback.vsync),
            show_fps: self.show_fps.or(fallback.show_fps),
        }
    }
}

/// Fully resolved, validated run settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) size: GridSize,
    pub(crate) seed: Option<u64>,
    pub(crate) rules: RuleSet,
    pub(crate) brush: Brush,
    pub(crate) generations_per_second: u32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Resolves settings with `overrides` taking precedence over `file`.
    pub(crate) fn resolve(overrides: FileConfig, file: FileConfig) -> Result<Self, ConfigError> {
        let merged = overrides.or(file);
        let size = GridSize::new(
            merged.width.unwrap_or(GridSize::REFERENCE.width()),
            merged.height.unwrap_or(GridSize::REFERENCE.height()),
        )?;
        let generations_per_second = merged
            .generations_per_second
            .unwrap_or(DEFAULT_GENERATIONS_PER_SECOND);
        if generations_per_second == 0 {
            return Err(ConfigError::ZeroCadence);
        }

        let brush = Brush::new(
            merged
                .brush_color
                .map_or(Brush::RABBIT_STAMP.color(), CellState::from),
            merged.brush_size.unwrap_or(Brush::RABBIT_STAMP.size()),
        );

        Ok(Self {
            size,
            seed: merged.seed,
            rules: merged.rules.map(RuleSet::from).unwrap_or_default(),
            brush,
            generations_per_second,
            vsync: merged.vsync.unwrap_or(false),
            show_fps: merged.show_fps.unwrap_or(false),
        })
    }
}

/// Errors raised while assembling run settings.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML for [`FileConfig`].
    #[error("failed to parse configuration file {}", path.display())]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// Width or height cannot form a grid.
    #[error("invalid grid size")]
    GridSize(#[from] GridSizeError),
    /// The simulation would never advance.
    #[error("generations per second must be positive")]
    ZeroCadence,
}
