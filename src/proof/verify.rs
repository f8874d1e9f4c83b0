//! Verification API
//!
//! Verify a whole game by deterministic replay, using exactly the checks and
//! seeds the ledger applies on-chain.

use thiserror::Error;

use crate::core::board::Board;
use crate::core::hash::Hash256;
use crate::core::seed::seed_for;
use crate::game::validate::{check_transition, validate_start_position, TransitionError};
use crate::proof::transcript::{GameTranscript, TRANSCRIPT_VERSION};

/// Verification result.
#[derive(Debug)]
pub struct VerificationResult {
    /// Did verification pass?
    pub valid: bool,

    /// Moves replayed successfully (opening included).
    pub moves_verified: u64,

    /// Last board reached by the replay.
    pub final_board: Board,

    /// History commitment of the transcript.
    pub history_hash: Hash256,

    /// Detailed error if verification failed.
    pub error: Option<VerificationError>,
}

/// Errors that can occur during verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Transcript version mismatch.
    #[error("version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Expected version.
        expected: u8,
        /// Actual version.
        got: u8,
    },

    /// Start board is not a legal fresh board.
    #[error("invalid start position")]
    InvalidStartPosition,

    /// Move numbers are not consecutive.
    #[error("move number out of order: expected {expected}, got {got}")]
    OutOfOrder {
        /// Expected move number.
        expected: u64,
        /// Recorded move number.
        got: u64,
    },

    /// A transition failed validation.
    #[error("move {move_number} invalid: {source}")]
    InvalidTransition {
        /// Move number that failed.
        move_number: u64,
        /// Why it failed.
        source: TransitionError,
    },
}

/// Verify a game transcript by full replay.
///
/// Stops at the first failing step.
pub fn verify_transcript(transcript: &GameTranscript) -> VerificationResult {
    let history_hash = transcript.history_hash();
    let mut board = transcript.opening_boards[0];
    let mut verified = 0u64;

    let outcome = replay(transcript, &mut board, &mut verified);

    VerificationResult {
        valid: outcome.is_ok(),
        moves_verified: verified,
        final_board: board,
        history_hash,
        error: outcome.err(),
    }
}

fn replay(
    transcript: &GameTranscript,
    board: &mut Board,
    verified: &mut u64,
) -> Result<(), VerificationError> {
    if transcript.version != TRANSCRIPT_VERSION {
        return Err(VerificationError::VersionMismatch {
            expected: TRANSCRIPT_VERSION,
            got: transcript.version,
        });
    }

    if !validate_start_position(*board) {
        return Err(VerificationError::InvalidStartPosition);
    }

    let id = &transcript.game_id;
    let opening = transcript
        .opening_moves
        .iter()
        .zip(&transcript.opening_boards[1..])
        .enumerate()
        .map(|(k, (mv, next))| (k as u64 + 1, *mv, *next));
    let rest = transcript
        .moves
        .iter()
        .map(|r| (r.move_number, r.mv, r.board));

    let mut expected_number = 1u64;
    for (move_number, mv, next) in opening.chain(rest) {
        if move_number != expected_number {
            return Err(VerificationError::OutOfOrder {
                expected: expected_number,
                got: move_number,
            });
        }

        let seed = seed_for(id, move_number);
        check_transition(*board, mv, next, &seed).map_err(|source| {
            VerificationError::InvalidTransition {
                move_number,
                source,
            }
        })?;

        *board = next;
        *verified += 1;
        expected_number += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::{Address, GameId};
    use crate::game::moves::Move;
    use crate::game::validate::canonical_result;

    fn play_out(id: GameId, extra: usize) -> GameTranscript {
        let mut tiles = [0u8; 16];
        tiles[5] = 1;
        tiles[10] = 2;
        let start = Board::from_tiles(tiles).unwrap();

        let mut boards = [start; 4];
        let mut moves = [Move::Up; 3];
        for k in 0..3 {
            let seed = seed_for(&id, k as u64 + 1);
            let (mv, next) = first_legal(boards[k], &seed);
            moves[k] = mv;
            boards[k + 1] = next;
        }

        let mut transcript = GameTranscript::new(id, boards, moves);
        for _ in 0..extra {
            let seed = seed_for(&id, transcript.next_move_number());
            let (mv, next) = first_legal(transcript.final_board(), &seed);
            transcript.push(mv, next);
        }
        transcript
    }

    fn first_legal(board: Board, seed: &crate::core::seed::Seed) -> (Move, Board) {
        Move::ALL
            .into_iter()
            .find_map(|mv| canonical_result(board, mv, seed).ok().map(|b| (mv, b)))
            .unwrap()
    }

    fn id() -> GameId {
        GameId::new(Address::new([8; 20]), 3)
    }

    #[test]
    fn test_valid_game_verifies() {
        let transcript = play_out(id(), 10);
        let result = verify_transcript(&transcript);

        assert!(result.valid, "{:?}", result.error);
        assert_eq!(result.moves_verified, 13);
        assert_eq!(result.final_board, transcript.final_board());
        assert_eq!(result.history_hash, transcript.history_hash());
    }

    #[test]
    fn test_tampered_board_fails_at_that_move() {
        let mut transcript = play_out(id(), 5);
        let board = transcript.moves[2].board;
        transcript.moves[2].board = board.set_tile(0, 16).unwrap();

        let result = verify_transcript(&transcript);
        assert!(!result.valid);
        assert_eq!(result.moves_verified, 5);
        assert!(matches!(
            result.error,
            Some(VerificationError::InvalidTransition { move_number: 6, .. })
        ));
    }

    #[test]
    fn test_transcript_bound_to_game_id() {
        // Same history under another id uses other seeds
        let mut transcript = play_out(id(), 3);
        transcript.game_id = GameId::new(Address::new([8; 20]), 4);

        let result = verify_transcript(&transcript);
        assert!(!result.valid);
    }

    #[test]
    fn test_out_of_order_move_numbers() {
        let mut transcript = play_out(id(), 2);
        transcript.moves[1].move_number = 9;

        let result = verify_transcript(&transcript);
        assert_eq!(
            result.error,
            Some(VerificationError::OutOfOrder { expected: 5, got: 9 })
        );
    }

    #[test]
    fn test_version_mismatch() {
        let mut transcript = play_out(id(), 0);
        transcript.version = 99;

        let result = verify_transcript(&transcript);
        assert!(matches!(
            result.error,
            Some(VerificationError::VersionMismatch { got: 99, .. })
        ));
    }
}
