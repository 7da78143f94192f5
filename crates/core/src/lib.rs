//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state management.
//! It has **no dependencies** on UI, timers, or I/O, making it:
//!
//! - **Deterministic**: Same seed and command sequence produce identical games
//! - **Testable**: Every rule is reachable through plain method calls
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: Configurable game board with collision detection and line clearing
//! - [`config`]: Board size, difficulty and seed, optionally read from the environment
//! - [`game_state`]: Complete game state machine: active piece, hold, scoring, lifecycle
//! - [`pieces`]: Tetromino shape definitions and spawn placement
//! - [`rng`]: Seeded 7-bag random piece generation
//! - [`scoring`]: Score calculation with T-spins, combos, back-to-back and perfect clears
//! - [`snapshot`]: Immutable views for presentation layers
//! - [`srs`]: SRS wall kick tables, kicked rotation and T-spin detection
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: Every run of seven pieces contains each kind once
//! - **SRS Rotation**: Super Rotation System with five kick tests per rotation
//! - **Hold**: Store one piece for later use (once per lock)
//! - **T-Spin Detection**: Three-corner rule with mini/full distinction
//! - **Scoring**: Guideline line values, back-to-back x1.5, combos and perfect clears
//!
//! # Example
//!
//! ```
//! use tetris_engine_core::GameState;
//! use tetris_engine_core::types::{Command, GameStatus};
//!
//! // Create and start a game
//! let mut game = GameState::with_seed(12345);
//! game.apply(Command::Start);
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::Rotate);
//! game.apply(Command::HardDrop);
//!
//! assert_eq!(game.status(), GameStatus::Playing);
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! There is no internal clock. Issue [`Command::MoveDown`](types::Command::MoveDown)
//! every [`GameState::drop_speed_ms`](game_state::GameState::drop_speed_ms) milliseconds
//! to apply gravity.

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod srs;

pub use tetris_engine_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use game_state::{GameState, Tetromino};
pub use pieces::{get_shape, PieceShape};
pub use rng::PieceQueue;
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult};
pub use snapshot::{ActiveSnapshot, ClearEvent, GameSnapshot};
pub use srs::{detect_tspin, try_rotate, RotationOutcome};
