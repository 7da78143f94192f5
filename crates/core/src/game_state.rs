//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, SRS, RNG, and scoring.
//! It handles piece movement, rotation, locking, line clears, hold and the game lifecycle.
//!
//! There is no clock here. Gravity is the caller issuing [`GameState::move_down`] every
//! [`GameState::drop_speed_ms`] milliseconds. Every command runs to completion (including
//! lock, clear, scoring and respawn) before returning.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::pieces::{get_shape, spawn_position, PieceShape};
use crate::rng::PieceQueue;
use crate::scoring::{calculate_drop_score, calculate_level, calculate_score, get_drop_interval_ms};
use crate::snapshot::{ActiveSnapshot, ClearEvent, GameSnapshot};
use crate::srs::{detect_tspin, try_rotate};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at the spawn position of a board `board_width` wide
    pub fn new(kind: PieceKind, board_width: u8) -> Self {
        let (x, y) = spawn_position(kind, board_width);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells of the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check whether the piece overlaps walls, floor or filled cells
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape(), self.x, self.y)
    }

    /// Same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Check if the piece is grounded (resting on something)
    pub fn is_grounded(&self, board: &Board) -> bool {
        self.shifted(0, 1).collides(board)
    }

    /// Topmost and bottommost rows covered by the piece
    fn row_span(&self) -> (i8, i8) {
        let shape = self.shape();
        let top = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
        let bottom = shape.iter().map(|&(_, dy)| dy).max().unwrap_or(0);
        (self.y + top, self.y + bottom)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    width: u8,
    height: u8,
    difficulty: Difficulty,
    status: GameStatus,
    active: Option<Tetromino>,
    next: PieceKind,
    hold: Option<PieceKind>,
    piece_queue: PieceQueue,
    /// Monotonic id for spawned pieces (increments on every spawn, including hold swaps).
    piece_id: u32,
    score: u32,
    level: u32,
    lines: u32,
    /// Consecutive clearing locks before the next one
    combo: u32,
    /// Whether the previous clear was difficult
    back_to_back: bool,
    can_hold: bool,
    last_action_was_rotate: bool,
    /// Rows removed by the current command
    cleared_rows: ArrayVec<usize, 4>,
    last_clear: Option<ClearEvent>,
}

impl GameState {
    /// Create a new game in the menu state.
    ///
    /// The configuration must be valid; see [`GameState::try_new`] for a checked version.
    pub fn new(config: EngineConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid engine configuration: {}x{}",
            config.width,
            config.height
        );
        let mut piece_queue = PieceQueue::new(config.seed);
        let next = piece_queue.draw();

        Self {
            board: Board::new(config.width, config.height),
            width: config.width,
            height: config.height,
            difficulty: config.difficulty,
            status: GameStatus::Menu,
            active: None,
            next,
            hold: None,
            piece_queue,
            piece_id: 0,
            score: 0,
            level: config.difficulty.start_level(),
            lines: 0,
            combo: 0,
            back_to_back: false,
            can_hold: true,
            last_action_was_rotate: false,
            cleared_rows: ArrayVec::new(),
            last_clear: None,
        }
    }

    /// Create a new game after validating the configuration
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Standard 10x20 game with the given seed and normal difficulty
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig::new(Difficulty::Normal, seed))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.back_to_back
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    /// Next piece followed by the randomizer preview
    pub fn next_queue(&self) -> [PieceKind; PREVIEW_LEN] {
        let upcoming = self.piece_queue.peek_n();
        let mut out = [self.next; PREVIEW_LEN];
        out[1..].copy_from_slice(&upcoming[..PREVIEW_LEN - 1]);
        out
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up scenarios
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn cleared_rows(&self) -> &[usize] {
        &self.cleared_rows
    }

    pub fn last_clear(&self) -> Option<&ClearEvent> {
        self.last_clear.as_ref()
    }

    /// Current gravity interval for the caller's game loop
    pub fn drop_speed_ms(&self) -> u32 {
        get_drop_interval_ms(self.level, self.difficulty.speed_multiplier())
    }

    /// Build a fresh snapshot from the current fields
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.score,
            level: self.level,
            lines: self.lines,
            width: self.width,
            height: self.height,
            board: self.board.cells().to_vec(),
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: self.ghost_y(),
            next: self.next,
            next_queue: self.next_queue(),
            hold: self.hold,
            can_hold: self.can_hold,
            cleared_rows: self.cleared_rows.to_vec(),
            last_clear: self.last_clear.clone(),
            combo: self.combo,
            back_to_back: self.back_to_back,
            difficulty: self.difficulty,
            drop_speed_ms: self.drop_speed_ms(),
            piece_id: self.piece_id,
        }
    }

    /// Per-command transient state is only visible for the command that produced it
    fn begin_command(&mut self) {
        self.cleared_rows.clear();
        self.last_clear = None;
    }

    /// Start a new game from the menu or after game over
    pub fn start(&mut self) -> bool {
        if matches!(self.status, GameStatus::Playing | GameStatus::Paused) {
            return false;
        }
        self.reset_and_spawn();
        true
    }

    /// Start a new game from any state
    pub fn restart(&mut self) -> bool {
        self.reset_and_spawn();
        true
    }

    fn reset_and_spawn(&mut self) {
        self.begin_command();
        self.board = Board::new(self.width, self.height);
        self.score = 0;
        self.lines = 0;
        self.level = calculate_level(0, self.difficulty.start_level());
        self.combo = 0;
        self.back_to_back = false;
        self.hold = None;
        self.can_hold = true;
        self.active = None;
        self.status = GameStatus::Playing;

        info!(
            "game started: {}x{} board, difficulty {}, level {}",
            self.width,
            self.height,
            self.difficulty.as_str(),
            self.level
        );

        self.spawn_piece();
    }

    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.begin_command();
        self.status = GameStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.begin_command();
        self.status = GameStatus::Playing;
        true
    }

    /// Select the difficulty for the next start (rejected while a game is running)
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if matches!(self.status, GameStatus::Playing | GameStatus::Paused) {
            return false;
        }
        self.difficulty = difficulty;
        if self.status == GameStatus::Menu {
            self.level = difficulty.start_level();
        }
        true
    }

    fn end_game(&mut self, reason: &str) {
        self.active = None;
        self.status = GameStatus::GameOver;
        info!(
            "game over ({}): score {}, lines {}, level {}",
            reason, self.score, self.lines, self.level
        );
    }

    /// Place `kind` at the spawn position, ending the game if it does not fit
    fn place_new_piece(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::new(kind, self.width);
        if piece.collides(&self.board) {
            self.end_game("spawn blocked");
            return false;
        }

        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        self.last_action_was_rotate = false;
        debug!("spawned {:?} at ({}, {})", kind, piece.x, piece.y);
        true
    }

    /// Spawn the next piece and refill the next slot from the randomizer
    fn spawn_piece(&mut self) -> bool {
        let kind = self.next;
        self.next = self.piece_queue.draw();
        self.place_new_piece(kind)
    }

    /// The active piece, only while a game is being played
    fn playable_piece(&self) -> Option<Tetromino> {
        if self.status != GameStatus::Playing {
            return None;
        }
        self.active
    }

    /// Try to move the active piece horizontally
    fn try_shift(&mut self, dx: i8) -> bool {
        self.begin_command();
        let Some(active) = self.playable_piece() else {
            return false;
        };

        let moved = active.shifted(dx, 0);
        if moved.collides(&self.board) {
            return false;
        }

        self.active = Some(moved);
        self.last_action_was_rotate = false;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1)
    }

    /// Gravity step: move down one row, or lock if the piece is resting
    pub fn move_down(&mut self) -> MoveResult {
        self.begin_command();
        let Some(active) = self.playable_piece() else {
            return MoveResult::Blocked;
        };

        let moved = active.shifted(0, 1);
        if moved.collides(&self.board) {
            self.lock_piece();
            return MoveResult::Locked;
        }

        self.active = Some(moved);
        self.last_action_was_rotate = false;
        MoveResult::Moved
    }

    /// Player soft drop: a gravity step worth 1 point when the piece moves
    pub fn soft_drop(&mut self) -> MoveResult {
        let result = self.move_down();
        if result == MoveResult::Moved {
            self.score = self.score.saturating_add(calculate_drop_score(1, false));
        }
        result
    }

    /// Hard drop the active piece to the bottom and lock it.
    ///
    /// Returns the number of rows dropped.
    pub fn hard_drop(&mut self) -> u32 {
        self.begin_command();
        let Some(active) = self.playable_piece() else {
            return 0;
        };

        let landing_y = self.ghost_y().unwrap_or(active.y);
        let distance = (landing_y - active.y).max(0) as u32;

        if distance > 0 {
            self.active = Some(active.shifted(0, distance as i8));
            self.last_action_was_rotate = false;
        }
        self.score = self.score.saturating_add(calculate_drop_score(distance, true));

        self.lock_piece();
        distance
    }

    /// Rotate the active piece with SRS wall kicks
    fn try_rotate(&mut self, clockwise: bool) -> bool {
        self.begin_command();
        let Some(active) = self.playable_piece() else {
            return false;
        };

        let board = &self.board;
        let Some(outcome) = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            clockwise,
            |shape, x, y| board.collides(shape, x, y),
        ) else {
            return false;
        };

        self.active = Some(Tetromino {
            rotation: outcome.rotation,
            x: outcome.x,
            y: outcome.y,
            ..active
        });
        self.last_action_was_rotate = true;
        true
    }

    /// Rotate clockwise
    pub fn rotate(&mut self) -> bool {
        self.try_rotate(true)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(false)
    }

    /// Swap active piece with hold piece, at most once between locks
    pub fn hold(&mut self) -> bool {
        self.begin_command();
        if !self.can_hold {
            return false;
        }
        let Some(active) = self.playable_piece() else {
            return false;
        };

        self.can_hold = false;
        self.active = None;

        match self.hold.replace(active.kind) {
            Some(held) => self.place_new_piece(held),
            None => self.spawn_piece(),
        }
    }

    /// Lock the active piece onto the board and handle line clears
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board
            .commit(&active.shape(), active.x, active.y, active.kind.color_index());

        let tspin = detect_tspin(
            &self.board,
            active.kind,
            active.rotation,
            active.x,
            active.y,
            self.last_action_was_rotate,
        );

        let (top, bottom) = active.row_span();
        let full_rows = self.board.full_rows_in_span(top, bottom);
        let lines_cleared = full_rows.len();

        if lines_cleared > 0 {
            let cleared_board = self.board.without_rows(&full_rows);
            let perfect_clear = cleared_board.is_empty();

            let result = calculate_score(
                lines_cleared,
                self.level,
                tspin,
                self.back_to_back,
                self.combo,
                self.difficulty.score_multiplier(),
                perfect_clear,
            );

            debug!(
                "{:?} locked, cleared {:?} for {} points ({})",
                active.kind, full_rows, result.points, result.label
            );

            self.score = self.score.saturating_add(result.points);
            self.lines += lines_cleared as u32;
            self.level = calculate_level(self.lines, self.difficulty.start_level());
            self.board = cleared_board;
            self.back_to_back = result.is_difficult_clear;
            self.last_clear = Some(ClearEvent {
                lines: lines_cleared as u32,
                tspin,
                perfect_clear,
                combo: self.combo,
                score: result,
            });
            self.combo += 1;
            self.cleared_rows = full_rows;
        } else {
            debug!("{:?} locked at ({}, {})", active.kind, active.x, active.y);
            self.combo = 0;
        }

        self.can_hold = true;
        self.spawn_piece();
    }

    /// Check if the active piece is on the ground
    pub fn is_grounded(&self) -> bool {
        self.active
            .is_some_and(|piece| piece.is_grounded(&self.board))
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let mut ghost = self.active?;
        while !ghost.is_grounded(&self.board) {
            ghost = ghost.shifted(0, 1);
        }
        Some(ghost.y)
    }

    /// Apply a command.
    ///
    /// Returns whether the command did anything.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Restart => self.restart(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::MoveDown => self.move_down() != MoveResult::Blocked,
            Command::SoftDrop => self.soft_drop() != MoveResult::Blocked,
            Command::HardDrop => {
                let was_playable = self.playable_piece().is_some();
                self.hard_drop();
                was_playable
            }
            Command::Rotate => self.rotate(),
            Command::RotateCcw => self.rotate_ccw(),
            Command::Hold => self.hold(),
            Command::SetDifficulty(difficulty) => self.set_difficulty(difficulty),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_seed(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::with_seed(seed);
        assert!(state.start());
        state
    }

    /// Replace the active piece with a fresh `kind` at (x, y)
    fn force_active(state: &mut GameState, kind: PieceKind, rotation: Rotation, x: i8, y: i8) {
        state.active = Some(Tetromino {
            kind,
            rotation,
            x,
            y,
        });
        state.last_action_was_rotate = false;
    }

    fn fill_row_except(state: &mut GameState, y: i8, holes: &[i8]) {
        for x in 0..state.width as i8 {
            if !holes.contains(&x) {
                state.board.set(x, y, 1);
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::with_seed(12345);

        assert_eq!(state.status, GameStatus::Menu);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines, 0);
        assert_eq!(state.combo, 0);
        assert!(!state.back_to_back);
        assert!(state.active.is_none());
        assert!(state.hold.is_none());
    }

    #[test]
    fn test_game_start() {
        let state = started(12345);
        assert_eq!(state.status, GameStatus::Playing);
        assert!(state.active.is_some());
        assert_eq!(state.piece_id, 1);
    }

    #[test]
    fn test_start_is_rejected_while_playing() {
        let mut state = started(12345);
        state.score = 77;
        assert!(!state.start());
        assert_eq!(state.score, 77);
        assert!(state.restart());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_spawn_takes_next_and_refills() {
        let mut state = started(12345);
        let next_kind = state.next;
        let upcoming = state.next_queue();
        assert_eq!(upcoming[0], next_kind);

        state.hard_drop();
        assert_eq!(state.active.unwrap().kind, next_kind);
        assert_eq!(state.next, upcoming[1]);
        assert_eq!(state.piece_id, 2);
    }

    #[test]
    fn test_commands_are_noops_outside_play() {
        let mut state = GameState::with_seed(1);
        assert!(!state.move_left());
        assert!(!state.rotate());
        assert_eq!(state.move_down(), MoveResult::Blocked);
        assert_eq!(state.hard_drop(), 0);
        assert!(!state.hold());
        assert!(!state.pause());
        assert!(!state.resume());

        state.start();
        assert!(state.pause());
        let before = state.active;
        assert!(!state.move_right());
        assert_eq!(state.move_down(), MoveResult::Blocked);
        assert_eq!(state.active, before);
        assert!(state.resume());
        assert!(state.move_right());
    }

    #[test]
    fn test_move_down_then_lock() {
        let mut state = started(3);
        force_active(&mut state, PieceKind::O, Rotation::North, 3, 17);
        assert!(!state.is_grounded());
        assert_eq!(state.move_down(), MoveResult::Moved);
        assert_eq!(state.active.unwrap().y, 18);
        assert!(state.is_grounded());
        assert_eq!(state.move_down(), MoveResult::Locked);
        assert_eq!(state.board.occupied_count(), 4);
        assert_eq!(state.board.get(4, 19), Some(PieceKind::O.color_index()));
    }

    #[test]
    fn test_soft_drop_scoring() {
        let mut state = started(3);
        force_active(&mut state, PieceKind::T, Rotation::North, 3, 0);
        assert_eq!(state.soft_drop(), MoveResult::Moved);
        assert_eq!(state.soft_drop(), MoveResult::Moved);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_drop_points_saturate() {
        let mut state = started(3);
        force_active(&mut state, PieceKind::T, Rotation::North, 3, 0);
        state.score = u32::MAX - 1;
        state.soft_drop();
        state.soft_drop();
        assert_eq!(state.score, u32::MAX);

        state.hard_drop();
        assert_eq!(state.score, u32::MAX);
    }

    #[test]
    fn test_try_new_rejects_oversized_board() {
        let config = EngineConfig::new(Difficulty::Normal, 1).with_dimensions(200, 20);
        assert_eq!(
            GameState::try_new(config).err(),
            Some(ConfigError::WidthOutOfRange(200))
        );

        let config = EngineConfig::new(Difficulty::Normal, 1).with_dimensions(12, 24);
        let mut state = GameState::try_new(config).unwrap();
        assert!(state.start());
        assert_eq!(state.active.unwrap().x, 4);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid engine configuration")]
    fn test_new_panics_on_invalid_config_in_debug() {
        GameState::new(EngineConfig::new(Difficulty::Normal, 1).with_dimensions(200, 20));
    }

    #[test]
    fn test_hard_drop_distance_and_score() {
        let mut state = started(3);
        force_active(&mut state, PieceKind::T, Rotation::North, 3, 0);
        assert_eq!(state.ghost_y(), Some(18));

        let distance = state.hard_drop();
        assert_eq!(distance, 18);
        assert_eq!(state.score, 36);
        assert_eq!(state.board.occupied_count(), 4);
        assert_eq!(state.piece_id, 2);
    }

    #[test]
    fn test_rotate_against_wall_kicks() {
        let mut state = started(3);
        force_active(&mut state, PieceKind::T, Rotation::West, 8, 5);
        assert!(state.rotate());
        let piece = state.active.unwrap();
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.x, 7);
        assert!(state.last_action_was_rotate);

        assert!(state.move_left());
        assert!(!state.last_action_was_rotate);
    }

    #[test]
    fn test_rotate_fails_in_a_shaft() {
        let mut state = started(3);
        // Vertical I in a one-wide shaft cannot turn horizontal.
        for y in 10..20 {
            fill_row_except(&mut state, y, &[4]);
        }
        force_active(&mut state, PieceKind::I, Rotation::East, 2, 14);
        let before = state.active;
        assert!(!state.rotate());
        assert!(!state.rotate_ccw());
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_o_rotation_keeps_cells() {
        let mut state = started(3);
        force_active(&mut state, PieceKind::O, Rotation::North, 3, 5);
        let cells = state.active.unwrap().cells();
        assert!(state.rotate());
        assert_eq!(state.active.unwrap().rotation, Rotation::East);
        assert_eq!(state.active.unwrap().cells(), cells);
    }

    #[test]
    fn test_hold_spawns_new_when_empty_then_swaps() {
        let mut state = started(12345);
        let first = state.active.unwrap().kind;
        let next = state.next;

        assert!(state.hold());
        assert_eq!(state.hold, Some(first));
        assert_eq!(state.active.unwrap().kind, next);
        assert!(!state.can_hold);

        // Second hold before a lock is rejected.
        assert!(!state.hold());
        assert_eq!(state.hold, Some(first));

        state.hard_drop();
        assert!(state.can_hold);
        let current = state.active.unwrap().kind;
        assert!(state.hold());
        assert_eq!(state.active.unwrap().kind, first);
        assert_eq!(state.active.unwrap().rotation, Rotation::North);
        assert_eq!(state.hold, Some(current));
    }

    #[test]
    fn test_single_line_clear() {
        let mut state = started(3);
        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        state.board.set(0, 18, 2);
        force_active(&mut state, PieceKind::I, Rotation::North, 3, 0);

        let distance = state.hard_drop();
        assert_eq!(distance, 18);
        assert_eq!(state.lines, 1);
        assert_eq!(state.score, 36 + 100);
        assert_eq!(state.cleared_rows(), &[19]);
        assert_eq!(state.board.get(0, 19), Some(2));
        assert_eq!(state.board.occupied_count(), 1);
        assert_eq!(state.combo, 1);
        assert!(!state.back_to_back);
        assert_eq!(state.last_clear().unwrap().score.label, "Single");

        // The clear is only reported for the command that produced it.
        state.move_left();
        assert!(state.cleared_rows().is_empty());
        assert!(state.last_clear().is_none());
    }

    #[test]
    fn test_combo_and_b2b_tracking() {
        let mut state = started(3);
        state.back_to_back = true;
        state.combo = 2;

        // Tetris with an I in the right-most column.
        for y in 16..20 {
            fill_row_except(&mut state, y, &[9]);
        }
        state.board.set(0, 15, 1);
        force_active(&mut state, PieceKind::I, Rotation::East, 7, 0);
        state.hard_drop();

        let event = state.last_clear().unwrap().clone();
        assert_eq!(event.lines, 4);
        assert_eq!(event.combo, 2);
        assert!(event.score.b2b_applied);
        assert_eq!(event.score.points, 1200 + 100);
        assert_eq!(event.score.label, "B2B Tetris! 2x Combo");
        assert!(state.back_to_back);
        assert_eq!(state.combo, 3);

        // A lock without a clear breaks the combo, not B2B.
        force_active(&mut state, PieceKind::O, Rotation::North, 3, 0);
        state.hard_drop();
        assert_eq!(state.combo, 0);
        assert!(state.back_to_back);
    }

    #[test]
    fn test_single_after_tetris_resets_b2b() {
        let mut state = started(3);
        state.back_to_back = true;
        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        state.board.set(0, 18, 1);
        force_active(&mut state, PieceKind::I, Rotation::North, 3, 0);
        state.hard_drop();

        let event = state.last_clear().unwrap();
        assert!(!event.score.b2b_applied);
        assert!(!state.back_to_back);
    }

    #[test]
    fn test_perfect_clear() {
        let mut state = started(3);
        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        force_active(&mut state, PieceKind::I, Rotation::North, 3, 0);
        state.hard_drop();

        let event = state.last_clear().unwrap();
        assert!(event.perfect_clear);
        assert_eq!(event.score.points, 100 + 800);
        assert_eq!(event.score.label, "PERFECT CLEAR Single");
        assert!(state.back_to_back);
        assert!(state.board.is_empty());
    }

    /// T-spin double slot: rows 18 and 19 full except a T-shaped hole, with an overhang.
    fn tsd_setup(state: &mut GameState) {
        fill_row_except(state, 19, &[4]);
        fill_row_except(state, 18, &[3, 4, 5]);
        state.board.set(3, 17, 1);
    }

    #[test]
    fn test_t_spin_double_detection() {
        let mut state = started(3);
        tsd_setup(&mut state);

        // East-facing T dropped beside the slot, then rotated clockwise into it.
        force_active(&mut state, PieceKind::T, Rotation::East, 3, 17);
        assert!(state.rotate());
        let piece = state.active.unwrap();
        assert_eq!(piece.rotation, Rotation::South);
        assert_eq!((piece.x, piece.y), (3, 17));

        assert_eq!(state.move_down(), MoveResult::Locked);
        let event = state.last_clear().unwrap();
        assert_eq!(event.tspin, TSpinKind::Full);
        assert_eq!(event.lines, 2);
        assert_eq!(event.score.points, 1200);
        assert_eq!(event.score.label, "T-Spin Double");
        assert!(state.back_to_back);
    }

    #[test]
    fn test_t_spin_no_rotation() {
        let mut state = started(3);
        tsd_setup(&mut state);

        // Same final position reached without rotating.
        force_active(&mut state, PieceKind::T, Rotation::South, 3, 17);
        assert_eq!(state.move_down(), MoveResult::Locked);
        let event = state.last_clear().unwrap();
        assert_eq!(event.tspin, TSpinKind::None);
        assert_eq!(event.score.points, 300);
        assert_eq!(event.score.label, "Double");
    }

    #[test]
    fn test_level_progression() {
        let mut state = started(3);
        state.lines = 9;
        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        state.board.set(0, 18, 1);
        force_active(&mut state, PieceKind::I, Rotation::North, 3, 0);
        state.hard_drop();
        assert_eq!(state.lines, 10);
        assert_eq!(state.level, 2);
        assert_eq!(state.drop_speed_ms(), 950);
    }

    #[test]
    fn test_difficulty_affects_start_and_score() {
        let mut state = GameState::new(EngineConfig::new(Difficulty::Hard, 3));
        state.start();
        assert_eq!(state.level, 5);
        assert_eq!(state.drop_speed_ms(), 640);

        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        state.board.set(0, 18, 1);
        force_active(&mut state, PieceKind::I, Rotation::North, 3, 0);
        let distance = state.hard_drop();
        // Single at level 5 with a 1.5x multiplier.
        assert_eq!(state.score, distance * 2 + 750);
        assert_eq!(state.level, 5);
    }

    #[test]
    fn test_set_difficulty_only_outside_play() {
        let mut state = GameState::with_seed(3);
        assert!(state.set_difficulty(Difficulty::Master));
        assert_eq!(state.level, 15);
        state.start();
        assert!(!state.set_difficulty(Difficulty::Easy));
        assert_eq!(state.difficulty, Difficulty::Master);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut state = started(3);
        for y in 0..3 {
            fill_row_except(&mut state, y, &[0]);
        }
        force_active(&mut state, PieceKind::O, Rotation::North, -1, 5);
        assert_eq!(state.hard_drop(), 13);
        assert_eq!(state.status, GameStatus::GameOver);
        assert!(state.active.is_none());

        // Terminal until an explicit start.
        assert!(!state.resume());
        assert!(!state.move_left());
        assert!(state.start());
        assert_eq!(state.status, GameStatus::Playing);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_lock_above_top_clears_and_continues() {
        let mut state = started(3);
        for y in 0..3 {
            fill_row_except(&mut state, y, &[4]);
        }
        state.board.set(4, 3, 1);
        // Vertical I poking one cell above the board, resting on (4, 3).
        force_active(&mut state, PieceKind::I, Rotation::East, 2, -1);
        assert_eq!(state.move_down(), MoveResult::Locked);

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.lines, 3);
        assert_eq!(state.score, 500);
        assert_eq!(state.cleared_rows(), &[0, 1, 2]);
        // The cell above the top was dropped; only the support remains.
        assert_eq!(state.board.occupied_count(), 1);
        assert_eq!(state.board.get(4, 3), Some(1));
        assert!(state.active.is_some());
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let mut state = started(12345);
        let snap = state.snapshot();
        assert_eq!(snap.status, GameStatus::Playing);
        assert_eq!(snap.board.len(), 200);
        assert_eq!(snap.active.unwrap().kind, state.active.unwrap().kind);
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.drop_speed_ms, 1000);
        assert_eq!(snap.next, state.next);

        state.hard_drop();
        let after = state.snapshot();
        assert_ne!(after, snap);
        assert_eq!(after.board.iter().filter(|&&c| c != EMPTY_CELL).count(), 4);
    }

    #[test]
    fn test_apply_dispatch() {
        let mut state = GameState::with_seed(5);
        assert!(state.apply(Command::SetDifficulty(Difficulty::Easy)));
        assert!(state.apply(Command::Start));
        assert!(state.apply(Command::MoveDown));
        assert!(state.apply(Command::Pause));
        assert!(!state.apply(Command::HardDrop));
        assert!(state.apply(Command::Resume));
        assert!(state.apply(Command::HardDrop));
        assert!(state.apply(Command::Restart));
        assert_eq!(state.score, 0);
    }
}
