//! Move Simulation
//!
//! Classic 2048 shift-and-merge, applied line by line along the move axis.
//! No randomness here; the spawn is chosen separately by the spawn oracle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::board::{Board, CellSet, BOARD_SIDE};
use crate::core::error::BoardError;

/// A direction to shift tiles.
///
/// The discriminant is the wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Move {
    /// Toward row 0.
    Up = 0,
    /// Toward row 3.
    Down = 1,
    /// Toward column 0.
    Left = 2,
    /// Toward column 3.
    Right = 3,
}

impl Move {
    /// Every move in wire order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Wire encoding.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode from the wire encoding.
    pub fn from_u8(value: u8) -> Option<Move> {
        match value {
            0 => Some(Move::Up),
            1 => Some(Move::Down),
            2 => Some(Move::Left),
            3 => Some(Move::Right),
            _ => None,
        }
    }

    /// Cell indices of line `line` (0..4), leading edge first.
    ///
    /// Lines are rows for Left/Right and columns for Up/Down.
    #[inline]
    pub fn line_cells(self, line: usize) -> [usize; BOARD_SIDE] {
        match self {
            Move::Left => [4 * line, 4 * line + 1, 4 * line + 2, 4 * line + 3],
            Move::Right => [4 * line + 3, 4 * line + 2, 4 * line + 1, 4 * line],
            Move::Up => [line, line + 4, line + 8, line + 12],
            Move::Down => [line + 12, line + 8, line + 4, line],
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Move::from_u8(value).ok_or(value)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Result of shifting a board, before any spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Board after shift and merge.
    pub board: Board,
    /// Did any cell change? A move that changes nothing is illegal.
    pub changed: bool,
    /// Number of merges performed.
    pub merges: u32,
    /// Empty cells of the shifted board, ascending.
    pub empty_cells: CellSet,
}

/// Shift and merge `board` in direction `mv`.
///
/// Fails with `ExponentOutOfRange` if the board carries an out-of-range
/// exponent, or if two `MAX_EXPONENT` tiles would merge. The validator
/// reports the latter as an illegal move.
pub fn simulate_move(board: Board, mv: Move) -> Result<MoveOutcome, BoardError> {
    board.validate()?;

    let mut result = Board::EMPTY;
    let mut merges = 0;

    for line in 0..BOARD_SIDE {
        let cells = mv.line_cells(line);
        let (shifted, line_merges) = shift_line(cells.map(|i| board.field(i)));
        merges += line_merges;

        for (&cell, &exponent) in cells.iter().zip(shifted.iter()) {
            if exponent != 0 {
                result = result.set_tile(cell, exponent)?;
            }
        }
    }

    Ok(MoveOutcome {
        board: result,
        changed: result != board,
        merges,
        empty_cells: result.empty_cells(),
    })
}

/// Shift one line toward index 0, merging equal neighbours once.
///
/// Returns the new line and the number of merges. Exponents may exceed the
/// board limit here; the caller's `set_tile` rejects them.
fn shift_line(line: [u8; BOARD_SIDE]) -> ([u8; BOARD_SIDE], u32) {
    let mut out = [0u8; BOARD_SIDE];
    let mut len = 0;
    let mut merges = 0;
    // A tile produced by a merge is not eligible again this move.
    let mut can_merge = false;

    for exponent in line.into_iter().filter(|&e| e != 0) {
        if can_merge && out[len - 1] == exponent {
            out[len - 1] = exponent.saturating_add(1);
            merges += 1;
            can_merge = false;
        } else {
            out[len] = exponent;
            len += 1;
            can_merge = true;
        }
    }

    (out, merges)
}

/// Moves that change `board`.
pub fn legal_moves(board: Board) -> Vec<Move> {
    Move::ALL
        .into_iter()
        .filter(|&mv| simulate_move(board, mv).map(|o| o.changed).unwrap_or(false))
        .collect()
}

/// True if no move in any direction changes the board.
pub fn is_game_over(board: Board) -> bool {
    legal_moves(board).is_empty()
}

// =============================================================================
// TESTS
// =============================================================================
