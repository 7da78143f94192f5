//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no logic beyond parsing and formatting, so they
//! can be shared between the rules engine, the session layer and any presentation
//! adapter that consumes snapshots.
//!
//! # Board Dimensions
//!
//! Standard Tetris playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! Other sizes are allowed through the engine configuration.
//!
//! # Gravity
//!
//! The engine has no clock. Callers schedule `moveDown` using the drop speed:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Gravity at level 1 |
//! | `DROP_STEP_MS` | 50 | Speed-up per level |
//! | `DROP_INTERVAL_MIN_MS` | 100 | Floor before the difficulty multiplier |
//! | `DROP_INTERVAL_FLOOR_MS` | 50 | Absolute floor after the multiplier |
//!
//! # Examples
//!
//! ```
//! use tetris_engine_types::{Command, Difficulty, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color_index(), 3);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(
//!     Command::from_str("setDifficulty:hard"),
//!     Some(Command::SetDifficulty(Difficulty::Hard))
//! );
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity speed-up per level above 1
pub const DROP_STEP_MS: u32 = 50;

/// Minimum level-derived interval before the difficulty multiplier (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Absolute minimum drop interval after the difficulty multiplier (50ms)
pub const DROP_INTERVAL_FLOOR_MS: u32 = 50;

/// Level cap
pub const MAX_LEVEL: u32 = 20;

/// Lines required per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Number of upcoming pieces exposed in snapshots
pub const PREVIEW_LEN: usize = 5;

/// Empty board cell
pub const EMPTY_CELL: u8 = 0;

/// A cell on the game board
///
/// - `0`: empty
/// - `1..=7`: filled, holding the color index of the piece that locked there
pub type Cell = u8;

/// Line clear points at level 1, indexed by line count.
///
/// Points are multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Full T-spin points at level 1, indexed by line count.
pub const TSPIN_SCORES: [u32; 4] = [400, 800, 1200, 1600];

/// Mini T-spin points at level 1, indexed by line count.
pub const MINI_TSPIN_SCORES: [u32; 3] = [100, 200, 400];

/// Perfect clear bonus at level 1, indexed by line count.
pub const PERFECT_CLEAR_SCORES: [u32; 5] = [0, 800, 1200, 1800, 3500];

/// Combo scoring base value (50 points per combo step, times level)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Soft drop points per cell
pub const SOFT_DROP_POINTS: u32 = 1;

/// Hard drop points per cell
pub const HARD_DROP_POINTS: u32 = 2;


/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color index (declaration order + 1):
/// - **I**: 1, horizontal bar
/// - **O**: 2, 2x2 square
/// - **T**: 3, T-shaped
/// - **S**: 4, S-shaped
/// - **Z**: 5, Z-shaped (mirror of S)
/// - **J**: 6, J-shaped
/// - **L**: 7, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in declaration order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Board color index written on lock (ordinal + 1, never 0)
    pub fn color_index(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`PieceKind::color_index`]
    pub fn from_color_index(index: u8) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Numeric rotation state (0=spawn, 1=CW, 2=180, 3=CCW)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rotation state from an index, taken modulo 4
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// T-Spin detection result
///
/// T-Spins are detected based on corner occupancy around the T piece.
/// - **None**: Not a T-spin
/// - **Mini**: 3+ corners filled but the two front corners are not both filled
/// - **Full**: 3+ corners filled and both front corners filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Display label, empty for `None`
    pub fn label(&self) -> &'static str {
        match self {
            TSpinKind::None => "",
            TSpinKind::Mini => "Mini T-Spin",
            TSpinKind::Full => "T-Spin",
        }
    }
}

/// Lifecycle status of a game.
///
/// `Menu` and `GameOver` only leave through an explicit start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Menu => "menu",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "game_over",
        }
    }
}

/// Outcome of a one-row downward step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveResult {
    /// The piece moved down one row
    Moved,
    /// The piece could not move and was locked into the board
    Locked,
    /// No active piece, or the game is not being played
    Blocked,
}

/// Difficulty presets
///
/// Static table: display name, description, starting level, gravity speed
/// multiplier (lower is faster) and score multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Master => "Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Slower gravity for learning the basics",
            Difficulty::Normal => "The standard experience",
            Difficulty::Hard => "Starts at level 5 with faster gravity",
            Difficulty::Expert => "Starts at level 10, double speed",
            Difficulty::Master => "Starts at level 15 at top speed",
        }
    }

    pub fn start_level(&self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 1,
            Difficulty::Hard => 5,
            Difficulty::Expert => 10,
            Difficulty::Master => 15,
        }
    }

    /// Multiplier applied to the level drop interval
    pub fn speed_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.8,
            Difficulty::Expert => 0.6,
            Difficulty::Master => 0.4,
        }
    }

    /// Multiplier applied to every line clear total
    pub fn score_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Expert => 2.0,
            Difficulty::Master => 3.0,
        }
    }

    /// Parse from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            "master" => Some(Difficulty::Master),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        }
    }
}

/// Commands that can be applied to a game
///
/// These are the only inbound channel from presentation layers.
/// Each command maps to a specific game mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Reset and begin a new game
    Start,
    /// Suspend play (only while playing)
    Pause,
    /// Continue play (only while paused)
    Resume,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Gravity step: move down one row or lock
    MoveDown,
    /// Player soft drop: like `MoveDown`, scoring 1 point per row
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock
    HardDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hold current piece (if available)
    Hold,
    /// Restart the game from any state
    Restart,
    /// Select the difficulty used by the next start
    SetDifficulty(Difficulty),
}

impl Command {
    /// Parse a command from its camelCase name
    ///
    /// `setDifficulty` takes its argument after a colon.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::{Command, Difficulty};
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("rotate"), Some(Command::Rotate));
    /// assert_eq!(
    ///     Command::from_str("setDifficulty:easy"),
    ///     Some(Command::SetDifficulty(Difficulty::Easy))
    /// );
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((name, arg)) = s.split_once(':') {
            return match name.to_lowercase().as_str() {
                "setdifficulty" => Difficulty::from_str(arg.trim()).map(Command::SetDifficulty),
                _ => None,
            };
        }
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "movedown" => Some(Command::MoveDown),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotate" | "rotatecw" => Some(Command::Rotate),
            "rotateccw" => Some(Command::RotateCcw),
            "hold" => Some(Command::Hold),
            "restart" => Some(Command::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase name (without the difficulty argument)
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::MoveDown => "moveDown",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::Rotate => "rotate",
            Command::RotateCcw => "rotateCcw",
            Command::Hold => "hold",
            Command::Restart => "restart",
            Command::SetDifficulty(_) => "setDifficulty",
        }
    }
}

impl Command {
    /// Parse a command, reporting why the input was rejected
    pub fn parse(input: &str) -> Result<Self, CommandParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CommandParseError::Empty);
        }
        if let Some((name, arg)) = trimmed.split_once(':') {
            if name.eq_ignore_ascii_case("setDifficulty") {
                return Difficulty::from_str(arg.trim())
                    .map(Command::SetDifficulty)
                    .ok_or_else(|| CommandParseError::UnknownDifficulty(arg.trim().to_string()));
            }
        }
        Command::from_str(trimmed)
            .ok_or_else(|| CommandParseError::UnknownCommand(trimmed.to_string()))
    }
}

/// Rejected command text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    UnknownCommand(String),
    UnknownDifficulty(String),
}

impl CommandParseError {
    pub fn code(&self) -> &'static str {
        match self {
            CommandParseError::Empty => "empty_command",
            CommandParseError::UnknownCommand(_) => "unknown_command",
            CommandParseError::UnknownDifficulty(_) => "unknown_difficulty",
        }
    }

    pub fn message(&self) -> String {
        match self {
            CommandParseError::Empty => "no command given".to_string(),
            CommandParseError::UnknownCommand(name) => format!("unknown command: {:?}", name),
            CommandParseError::UnknownDifficulty(name) => {
                format!("unknown difficulty: {:?}", name)
            }
        }
    }
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for CommandParseError {}
