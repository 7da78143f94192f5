//! SRS module - wall kick tables, kicked rotation and T-spin detection
//!
//! Offsets are (dx, dy) with y growing downward, so the usual published tables
//! (y up) appear here with dy negated.
//! Reference: https://tetris.wiki/SRS

use crate::board::Board;
use crate::pieces::{get_shape, PieceShape};
use crate::types::{PieceKind, Rotation, TSpinKind};

/// Ordered kick offsets for one rotation transition
pub type Kicks = &'static [(i8, i8)];

/// Kick table indexed by `from * 4 + to`
pub type KickTable = [Kicks; 16];

/// Single no-op offset, used by O and by transitions not in the tables
const NO_KICK: [(i8, i8); 1] = [(0, 0)];

const JLSTZ_01: [(i8, i8); 5] = [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_10: [(i8, i8); 5] = [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];
const JLSTZ_12: [(i8, i8); 5] = [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];
const JLSTZ_21: [(i8, i8); 5] = [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_23: [(i8, i8); 5] = [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];
const JLSTZ_32: [(i8, i8); 5] = [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];
const JLSTZ_30: [(i8, i8); 5] = [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];
const JLSTZ_03: [(i8, i8); 5] = [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];

const I_01: [(i8, i8); 5] = [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)];
const I_10: [(i8, i8); 5] = [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)];
const I_12: [(i8, i8); 5] = [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)];
const I_21: [(i8, i8); 5] = [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)];
const I_23: [(i8, i8); 5] = [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)];
const I_32: [(i8, i8); 5] = [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)];
const I_30: [(i8, i8); 5] = [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)];
const I_03: [(i8, i8); 5] = [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)];

/// JLSTZ kick table (shared by J, L, S, T, Z)
#[rustfmt::skip]
const JLSTZ_KICKS: KickTable = [
    &NO_KICK, &JLSTZ_01, &NO_KICK, &JLSTZ_03,
    &JLSTZ_10, &NO_KICK, &JLSTZ_12, &NO_KICK,
    &NO_KICK, &JLSTZ_21, &NO_KICK, &JLSTZ_23,
    &JLSTZ_30, &NO_KICK, &JLSTZ_32, &NO_KICK,
];

/// I piece kick table (different from JLSTZ)
#[rustfmt::skip]
const I_KICKS: KickTable = [
    &NO_KICK, &I_01, &NO_KICK, &I_03,
    &I_10, &NO_KICK, &I_12, &NO_KICK,
    &NO_KICK, &I_21, &NO_KICK, &I_23,
    &I_30, &NO_KICK, &I_32, &NO_KICK,
];

/// O piece never needs a kick
const O_KICKS: KickTable = [&NO_KICK; 16];

/// Get kick table for a piece kind
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Ordered offsets to try for `from -> to`; the first is always (0, 0).
///
/// Transitions that are not single-step rotations fall back to the no-op offset.
pub fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> Kicks {
    get_kick_table(kind)[from.index() * 4 + to.index()]
}

/// Result of a successful kicked rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    pub shape: PieceShape,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Position of the accepted offset in the kick list (0 = unkicked)
    pub kick_index: usize,
}

/// Try to rotate a piece with wall kicks
///
/// `collides(shape, x, y)` reports whether the shape may not occupy (x, y).
/// Returns None if every offset collides.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    collides: impl Fn(&PieceShape, i8, i8) -> bool,
) -> Option<RotationOutcome> {
    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_rotation);

    kick_offsets(kind, rotation, new_rotation)
        .iter()
        .enumerate()
        .find(|&(_, &(dx, dy))| !collides(&new_shape, x + dx, y + dy))
        .map(|(kick_index, &(dx, dy))| RotationOutcome {
            shape: new_shape,
            rotation: new_rotation,
            x: x + dx,
            y: y + dy,
            kick_index,
        })
}

/// Corners of the T's 3x3 box, relative to the box origin
const T_CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// The two corners on the side the T points toward
fn front_corners(rotation: Rotation) -> [(i8, i8); 2] {
    match rotation {
        Rotation::North => [(0, 0), (2, 0)],
        Rotation::East => [(2, 0), (2, 2)],
        Rotation::South => [(0, 2), (2, 2)],
        Rotation::West => [(0, 0), (0, 2)],
    }
}

/// Detect T-spin type based on corner occupancy
///
/// Applies only to a T whose last successful action was a rotation.
/// Corners outside the board count as occupied.
pub fn detect_tspin(
    board: &Board,
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    last_action_was_rotate: bool,
) -> TSpinKind {
    if kind != PieceKind::T || !last_action_was_rotate {
        return TSpinKind::None;
    }

    let filled = |(cx, cy): (i8, i8)| {
        let (px, py) = (x + cx, y + cy);
        board.is_out_of_bounds(px, py) || board.is_occupied(px, py)
    };

    if T_CORNERS.iter().filter(|&&c| filled(c)).count() < 3 {
        return TSpinKind::None;
    }

    let front_filled = front_corners(rotation).iter().filter(|&&c| filled(c)).count();
    if front_filled == 2 {
        TSpinKind::Full
    } else {
        TSpinKind::Mini
    }
}
