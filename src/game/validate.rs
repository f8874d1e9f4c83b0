//! Transition Validation
//!
//! Recomputes the canonical outcome of a move and compares it bit-for-bit
//! with what the player claims. Nothing the player submits is trusted
//! beyond that equality.

use thiserror::Error;

use crate::core::board::Board;
use crate::core::error::BoardError;
use crate::core::seed::Seed;
use crate::game::moves::{simulate_move, Move};
use crate::game::spawn::{choose_spawn, SpawnError};

/// Number of tiles on a fresh board.
pub const START_TILES: usize = 2;

/// Why a transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Malformed board value.
    #[error(transparent)]
    Codec(#[from] BoardError),

    /// The move changes nothing, or the board shape is invalid.
    #[error("invalid move")]
    InvalidMove,

    /// No empty cell remained for the spawn.
    #[error("no empty cell after move")]
    NoEmptyCell,

    /// Claimed board disagrees with the canonical result.
    #[error("claimed board does not match canonical result")]
    MismatchedResult {
        /// Canonical board.
        expected: Board,
        /// Board submitted by the caller.
        claimed: Board,
    },
}

impl From<SpawnError> for TransitionError {
    fn from(err: SpawnError) -> Self {
        match err {
            SpawnError::NoEmptyCell => TransitionError::NoEmptyCell,
        }
    }
}

/// The unique board that follows `prev` after `mv` under `seed`.
pub fn canonical_result(prev: Board, mv: Move, seed: &Seed) -> Result<Board, TransitionError> {
    prev.validate()?;
    // On a valid board the only simulation failure is a merge past MAX_EXPONENT
    let outcome = simulate_move(prev, mv).map_err(|_| TransitionError::InvalidMove)?;
    if !outcome.changed {
        return Err(TransitionError::InvalidMove);
    }

    let spawn = choose_spawn(outcome.board, seed)?;
    Ok(spawn.apply(outcome.board)?)
}

/// Check a claimed transition, reporting why it fails.
///
/// Returns the canonical board on success.
pub fn check_transition(
    prev: Board,
    mv: Move,
    claimed: Board,
    seed: &Seed,
) -> Result<Board, TransitionError> {
    let expected = canonical_result(prev, mv, seed)?;
    if claimed != expected {
        return Err(TransitionError::MismatchedResult { expected, claimed });
    }
    Ok(expected)
}

/// Is `claimed` the canonical result of `mv` on `prev` under `seed`?
pub fn validate_transition(prev: Board, mv: Move, claimed: Board, seed: &Seed) -> bool {
    check_transition(prev, mv, claimed, seed).is_ok()
}

/// Is `board` a legal fresh board?
///
/// Exactly two tiles, each a 2 or a 4, everything else empty.
pub fn validate_start_position(board: Board) -> bool {
    if board.validate().is_err() {
        return false;
    }

    let tiles = board.tiles();
    let occupied = tiles.iter().filter(|&&e| e != 0).count();
    occupied == START_TILES && tiles.iter().all(|&e| e <= 2)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::MAX_EXPONENT;

    fn board(tiles: [u8; 16]) -> Board {
        Board::from_tiles(tiles).unwrap()
    }

    #[test]
    fn test_pair_merges_and_spawns() {
        // 2 2 . .  --left-->  4 . . .  plus spawn
        let prev = board([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        // 15 empty cells after the merge: 1..=15. seed 1 -> second empty cell (2).
        let seed = Seed::from_u64(1);
        let expected = board([2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        assert_eq!(canonical_result(prev, Move::Left, &seed).unwrap(), expected);
        assert!(validate_transition(prev, Move::Left, expected, &seed));

        // Same board with the spawn elsewhere is a forgery
        let forged = board([2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!validate_transition(prev, Move::Left, forged, &seed));
        assert!(matches!(
            check_transition(prev, Move::Left, forged, &seed),
            Err(TransitionError::MismatchedResult { .. })
        ));
    }

    #[test]
    fn test_corner_tiles_slide_left() {
        // 2 at cell 0 and cell 15: Left only slides the bottom tile
        let mut tiles = [0u8; 16];
        tiles[0] = 1;
        tiles[15] = 1;
        let prev = board(tiles);

        // Shifted board has tiles at 0 and 12; empties: 1..=11, 13, 14, 15.
        // seed 0 -> cell 1.
        let seed = Seed::from_u64(0);
        let mut expected = [0u8; 16];
        expected[0] = 1;
        expected[1] = 1;
        expected[12] = 1;

        assert!(validate_transition(prev, Move::Left, board(expected), &seed));
    }

    #[test]
    fn test_blocked_move_rejects_everything() {
        let prev = board([1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let seed = Seed::from_u64(3);

        assert_eq!(
            canonical_result(prev, Move::Left, &seed),
            Err(TransitionError::InvalidMove)
        );
        assert!(!validate_transition(prev, Move::Left, prev, &seed));
        assert!(!validate_transition(prev, Move::Left, Board::EMPTY, &seed));
    }

    #[test]
    fn test_full_after_move() {
        // Row 0 merges, freeing exactly one cell; other rows are full and frozen.
        let prev = board([1, 1, 2, 3, 2, 3, 4, 5, 3, 4, 5, 6, 4, 5, 6, 7]);
        let seed = Seed::from_u64(0);
        let next = canonical_result(prev, Move::Left, &seed).unwrap();
        assert_eq!(next.tiles()[..4], [2, 2, 3, 1]);

        // A full, frozen board in that direction: invalid, not NoEmptyCell
        let frozen = board([1, 2, 3, 4, 2, 3, 4, 5, 3, 4, 5, 6, 4, 5, 6, 7]);
        assert_eq!(
            canonical_result(frozen, Move::Left, &seed),
            Err(TransitionError::InvalidMove)
        );
    }

    #[test]
    fn test_spawn_error_maps_to_no_empty_cell() {
        assert_eq!(
            TransitionError::from(SpawnError::NoEmptyCell),
            TransitionError::NoEmptyCell
        );
    }

    #[test]
    fn test_forged_prev_board_rejected() {
        let forged = Board::from_raw(0x40);
        assert!(matches!(
            check_transition(forged, Move::Right, Board::EMPTY, &Seed::default()),
            Err(TransitionError::Codec(BoardError::ExponentOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_merge_past_max_exponent_is_invalid_move() {
        let mut tiles = [0u8; 16];
        tiles[0] = MAX_EXPONENT;
        tiles[1] = MAX_EXPONENT;
        let prev = board(tiles);
        let seed = Seed::from_u64(0);

        assert_eq!(
            canonical_result(prev, Move::Left, &seed),
            Err(TransitionError::InvalidMove)
        );
        assert!(!validate_transition(prev, Move::Left, prev, &seed));

        // Moves that do not merge the pair stay legal
        assert!(canonical_result(prev, Move::Down, &seed).is_ok());
    }

    #[test]
    fn test_start_position() {
        let mut tiles = [0u8; 16];
        tiles[2] = 1;
        tiles[9] = 2;
        assert!(validate_start_position(board(tiles)));

        // Zero tiles
        assert!(!validate_start_position(Board::EMPTY));

        // One tile
        let mut one = [0u8; 16];
        one[0] = 1;
        assert!(!validate_start_position(board(one)));

        // Three tiles
        let mut three = tiles;
        three[15] = 1;
        assert!(!validate_start_position(board(three)));

        // An 8 is not a starting tile
        let mut eight = tiles;
        eight[9] = 3;
        assert!(!validate_start_position(board(eight)));

        // Out-of-range field
        let forged = Board::from_raw(board(tiles).raw() | (0xFFu128 << 120));
        assert!(!validate_start_position(forged));
    }
}
