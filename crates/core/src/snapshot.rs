//! Immutable game snapshots
//!
//! A snapshot is rebuilt from the engine fields after each command, never patched,
//! so presentation layers always see a settled state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::game_state::Tetromino;
use crate::scoring::ScoreResult;
use crate::types::{Cell, Difficulty, GameStatus, PieceKind, Rotation, TSpinKind, PREVIEW_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute board cells covered by the piece
    pub cells: [(i8, i8); 4],
    pub color: Cell,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
            color: value.kind.color_index(),
        }
    }
}

/// The line clear produced by the most recent command, if any
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClearEvent {
    pub lines: u32,
    pub tspin: TSpinKind,
    pub perfect_clear: bool,
    /// Combo counter value the clear was scored with
    pub combo: u32,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub width: u8,
    pub height: u8,
    /// Row-major color indices, top row first
    pub board: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub next_queue: [PieceKind; PREVIEW_LEN],
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    /// Rows removed by the most recent command (pre-removal indices, top to bottom)
    pub cleared_rows: Vec<usize>,
    pub last_clear: Option<ClearEvent>,
    pub combo: u32,
    pub back_to_back: bool,
    pub difficulty: Difficulty,
    pub drop_speed_ms: u32,
    pub piece_id: u32,
}

impl GameSnapshot {
    /// Cell at (x, y), None outside the board
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        self.board.get(y * self.width as usize + x).copied()
    }

    /// Iterate board rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.board.chunks(self.width.max(1) as usize)
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing
    }
}
