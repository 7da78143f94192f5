//! Scoring module - Guideline scoring rules
//!
//! - Line clears and T-spins use separate base tables, multiplied by level.
//! - A perfect clear adds a bonus on top of the base points.
//! - Back-to-back "difficult" clears multiply the running total by 3/2.
//! - Combo bonus is `combo_base * combo * level`, outside the B2B multiplier.
//! - The difficulty score multiplier applies last; every step truncates.

use crate::types::{
    TSpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, BASE_DROP_MS, COMBO_BASE, DROP_INTERVAL_FLOOR_MS,
    DROP_INTERVAL_MIN_MS, DROP_STEP_MS, HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL,
    MINI_TSPIN_SCORES, PERFECT_CLEAR_SCORES, SOFT_DROP_POINTS, TSPIN_SCORES,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Score calculation result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreResult {
    /// Points awarded for the clear, after every multiplier
    pub points: u32,
    /// 4 lines, a T-spin with lines, or a perfect clear
    pub is_difficult_clear: bool,
    /// Whether the B2B multiplier was applied to this clear
    pub b2b_applied: bool,
    /// Display label, empty when nothing was cleared
    pub label: String,
}

/// Calculate line clear score
/// lines: number of lines cleared (1-4)
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0) * level
}

/// Calculate T-spin score
///
/// Falls back to the line table for line counts the spin tables do not cover.
pub fn calculate_tspin_score(tspin: TSpinKind, lines: usize, level: u32) -> u32 {
    let base = match tspin {
        TSpinKind::Full => TSPIN_SCORES.get(lines),
        TSpinKind::Mini => MINI_TSPIN_SCORES.get(lines),
        TSpinKind::None => None,
    };
    match base {
        Some(&points) => points * level,
        None => calculate_line_score(lines, level),
    }
}

/// Perfect clear bonus for a clear of `lines` that empties the board
pub fn calculate_perfect_clear_bonus(lines: usize, level: u32) -> u32 {
    PERFECT_CLEAR_SCORES.get(lines).copied().unwrap_or(0) * level
}

/// Calculate combo bonus
///
/// `combo` counts the consecutive clearing locks before this one; 0 means no bonus.
pub fn calculate_combo_bonus(combo: u32, level: u32) -> u32 {
    COMBO_BASE.saturating_mul(combo).saturating_mul(level)
}

/// Check if this clear is "difficult" (eligible for back-to-back)
pub fn is_difficult_clear(lines: usize, tspin: TSpinKind, perfect_clear: bool) -> bool {
    lines == 4 || (tspin != TSpinKind::None && lines >= 1) || (perfect_clear && lines > 0)
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points
        .saturating_mul(B2B_NUMERATOR)
        .saturating_div(B2B_DENOMINATOR)
}

/// Apply a difficulty score multiplier, truncating toward zero
pub fn apply_score_multiplier(points: u32, multiplier: f64) -> u32 {
    (points as f64 * multiplier) as u32
}

/// Label for a line count
pub fn line_clear_label(lines: usize) -> &'static str {
    match lines {
        1 => "Single",
        2 => "Double",
        3 => "Triple",
        4 => "Tetris!",
        _ => "",
    }
}

/// Build the display label for a clear
///
/// Order: perfect clear, B2B, spin, line count, combo.
pub fn clear_label(
    lines: usize,
    tspin: TSpinKind,
    b2b_applied: bool,
    combo: u32,
    perfect_clear: bool,
) -> String {
    if lines == 0 {
        return String::new();
    }

    let combo_label = (combo > 1).then(|| format!("{}x Combo", combo));
    let parts = [
        perfect_clear.then_some("PERFECT CLEAR"),
        b2b_applied.then_some("B2B"),
        Some(tspin.label()),
        Some(line_clear_label(lines)),
        combo_label.as_deref(),
    ];

    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Calculate the complete score for a line clear.
///
/// Returns an empty result when no line was cleared.
pub fn calculate_score(
    lines: usize,
    level: u32,
    tspin: TSpinKind,
    back_to_back: bool,
    combo: u32,
    score_multiplier: f64,
    perfect_clear: bool,
) -> ScoreResult {
    if lines == 0 {
        return ScoreResult::default();
    }

    let mut total = match tspin {
        TSpinKind::Full | TSpinKind::Mini => calculate_tspin_score(tspin, lines, level),
        TSpinKind::None => calculate_line_score(lines, level),
    };

    if perfect_clear {
        total = total.saturating_add(calculate_perfect_clear_bonus(lines, level));
    }

    let is_difficult = is_difficult_clear(lines, tspin, perfect_clear);
    let b2b_applied = back_to_back && is_difficult;
    if b2b_applied {
        total = apply_b2b_multiplier(total);
    }

    if combo > 0 {
        total = total.saturating_add(calculate_combo_bonus(combo, level));
    }

    ScoreResult {
        points: apply_score_multiplier(total, score_multiplier),
        is_difficult_clear: is_difficult,
        b2b_applied,
        label: clear_label(lines, tspin, b2b_applied, combo, perfect_clear),
    }
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * HARD_DROP_POINTS
    } else {
        cells * SOFT_DROP_POINTS
    }
}

/// Level management
/// Level is one more than every 10 lines cleared, never below the start level, capped at 20
pub fn calculate_level(total_lines: u32, start_level: u32) -> u32 {
    (total_lines / LINES_PER_LEVEL + 1)
        .max(start_level)
        .min(MAX_LEVEL)
}

/// Get drop interval for a level (in milliseconds)
///
/// `max(100, 1000 - (level - 1) * 50) * speed_multiplier`, never below 50ms.
pub fn get_drop_interval_ms(level: u32, speed_multiplier: f64) -> u32 {
    let steps = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    let base = BASE_DROP_MS
        .saturating_sub(steps)
        .max(DROP_INTERVAL_MIN_MS);
    ((base as f64 * speed_multiplier) as u32).max(DROP_INTERVAL_FLOOR_MS)
}
