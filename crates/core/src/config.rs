//! Engine configuration
//!
//! Board dimensions, difficulty and randomizer seed for one game instance.
//! Can be built directly, from defaults, or from environment variables:
//!
//! - `TETRIS_BOARD_WIDTH`: columns (default 10)
//! - `TETRIS_BOARD_HEIGHT`: rows (default 20)
//! - `TETRIS_DIFFICULTY`: easy | normal | hard | expert | master (default normal)
//! - `TETRIS_SEED`: u64 randomizer seed (default: random)

use std::env;
use std::fmt;

use crate::types::{Difficulty, BOARD_HEIGHT, BOARD_WIDTH};

/// Smallest board side that can host every piece's spawn box
pub const MIN_BOARD_SIDE: u8 = 4;

/// Largest board side (keeps every coordinate well inside `i8`)
pub const MAX_BOARD_SIDE: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub difficulty: Difficulty,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            difficulty: Difficulty::default(),
            seed: rand::random(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    WidthOutOfRange(u8),
    HeightOutOfRange(u8),
    InvalidNumber { var: &'static str, value: String },
    UnknownDifficulty(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::WidthOutOfRange(_) | ConfigError::HeightOutOfRange(_) => {
                "invalid_dimensions"
            }
            ConfigError::InvalidNumber { .. } => "invalid_number",
            ConfigError::UnknownDifficulty(_) => "unknown_difficulty",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfigError::WidthOutOfRange(w) => format!(
                "board width {} outside {}..={}",
                w, MIN_BOARD_SIDE, MAX_BOARD_SIDE
            ),
            ConfigError::HeightOutOfRange(h) => format!(
                "board height {} outside {}..={}",
                h, MIN_BOARD_SIDE, MAX_BOARD_SIDE
            ),
            ConfigError::InvalidNumber { var, value } => {
                format!("{} is not a valid number: {:?}", var, value)
            }
            ConfigError::UnknownDifficulty(name) => format!("unknown difficulty: {:?}", name),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Standard 10x20 board with the given difficulty and seed
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            difficulty,
            seed,
        }
    }

    pub fn with_dimensions(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Reject boards too small to spawn on or too large for piece coordinates
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !range.contains(&self.width) {
            return Err(ConfigError::WidthOutOfRange(self.width));
        }
        if !range.contains(&self.height) {
            return Err(ConfigError::HeightOutOfRange(self.height));
        }
        Ok(())
    }

    /// Create from environment variables; unset variables keep their defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(width) = parse_var(&lookup, "TETRIS_BOARD_WIDTH")? {
            config.width = width;
        }
        if let Some(height) = parse_var(&lookup, "TETRIS_BOARD_HEIGHT")? {
            config.height = height;
        }
        if let Some(seed) = parse_var(&lookup, "TETRIS_SEED")? {
            config.seed = seed;
        }
        if let Some(name) = non_empty(&lookup, "TETRIS_DIFFICULTY") {
            config.difficulty =
                Difficulty::from_str(&name).ok_or(ConfigError::UnknownDifficulty(name))?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    lookup(var)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match non_empty(lookup, var) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
