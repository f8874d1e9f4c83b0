//! Game Ledger
//!
//! The stateful protocol layer. Owns every game record and enforces:
//! - Identity binding (only the owner encoded in a game id may drive it)
//! - Opening deduplication (no silently re-rolled openings)
//! - Move-number monotonicity and per-move confirmations
//!
//! ## Atomicity
//!
//! Every call validates everything first and only then writes. A rejected
//! call leaves the store and the event sink untouched.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::board::Board;
use crate::core::hash::{opening_hash, Hash256};
use crate::core::identity::{correct_caller, Address, GameId};
use crate::core::seed::seed_for;
use crate::game::events::LedgerEvent;
use crate::game::moves::Move;
use crate::game::validate::{check_transition, validate_start_position, TransitionError};
use crate::ledger::store::{EventSink, GameRecord, GameStore, MemoryEventSink, MemoryStore};
use crate::{FIRST_PLAYABLE_MOVE, OPENING_MOVES};

/// Ledger call errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Caller is not the principal encoded in the game id.
    #[error("caller {caller} does not own game (owner {owner})")]
    WrongPlayer {
        /// Calling principal.
        caller: Address,
        /// Owner encoded in the id.
        owner: Address,
    },

    /// A game already exists under this id.
    #[error("game id already used")]
    GameIdUsed,

    /// This exact opening was already played.
    #[error("opening already played")]
    GamePlayed,

    /// No game exists under this id.
    #[error("unknown game")]
    UnknownGame,

    /// A transition failed validation.
    ///
    /// Move number 0 is the start board itself, rejected as `InvalidMove`
    /// when it is not two 2/4 tiles on an otherwise empty board.
    #[error("move {move_number} rejected: {source}")]
    Rejected {
        /// Move number that failed (0 for the start board).
        move_number: u64,
        /// Why it failed.
        source: TransitionError,
    },
}

impl LedgerError {
    /// Underlying transition error, if this was a rejected move.
    pub fn transition_error(&self) -> Option<&TransitionError> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Board snapshot returned by [`GameLedger::get_board`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardView {
    /// Tile exponents, row-major.
    pub tiles: [u8; 16],
    /// Next expected move number.
    pub next_move: u64,
}

/// The protocol state machine over a [`GameStore`].
pub struct GameLedger<S = MemoryStore, E = MemoryEventSink> {
    store: S,
    sink: E,
}

impl GameLedger<MemoryStore, MemoryEventSink> {
    /// Ledger over fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), MemoryEventSink::new())
    }
}

impl<S: GameStore, E: EventSink> GameLedger<S, E> {
    /// Create a ledger over `store`, emitting into `sink`.
    pub fn new(store: S, sink: E) -> Self {
        Self { store, sink }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Underlying event sink.
    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Mutable event sink (for draining).
    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    /// Open a new game from its seeded opening sequence.
    ///
    /// `opening_boards[0]` is the start board; `opening_boards[k]` must be
    /// the canonical result of `opening_moves[k - 1]` under `seed_for(id, k)`.
    pub fn start_game(
        &mut self,
        caller: Address,
        id: GameId,
        opening_boards: [Board; OPENING_MOVES + 1],
        opening_moves: [Move; OPENING_MOVES],
    ) -> Result<(), LedgerError> {
        let result = self.check_start(caller, &id, &opening_boards, &opening_moves);
        if let Err(err) = &result {
            warn!(game = %id.short(), error = %err, "start_game rejected");
        }
        let opening = result?;

        let final_board = opening_boards[OPENING_MOVES];
        self.store.put_record(
            id,
            GameRecord {
                move_count: FIRST_PLAYABLE_MOVE,
                last_move: opening_moves[OPENING_MOVES - 1],
                board: final_board,
            },
        );
        self.store.mark_opening(opening);
        for move_number in 1..FIRST_PLAYABLE_MOVE {
            self.store.confirm(id, move_number);
        }

        self.sink.emit(LedgerEvent::game_started(caller, id, final_board));
        for (position, move_number) in (1..FIRST_PLAYABLE_MOVE).enumerate() {
            self.sink.emit(LedgerEvent::move_confirmed(
                caller,
                id,
                move_number,
                position as u8 + 1,
            ));
        }

        info!(game = %id.short(), "game started");
        Ok(())
    }

    /// Apply the next move of game `id`.
    ///
    /// Returns the move number that was confirmed.
    pub fn play(
        &mut self,
        caller: Address,
        id: GameId,
        mv: Move,
        claimed: Board,
    ) -> Result<u64, LedgerError> {
        let result = self.check_play(caller, &id, mv, claimed);
        if let Err(err) = &result {
            warn!(game = %id.short(), %mv, error = %err, "play rejected");
        }
        let record = result?;

        let move_number = record.move_count;
        self.store.put_record(
            id,
            GameRecord {
                move_count: move_number + 1,
                last_move: mv,
                board: claimed,
            },
        );
        self.store.confirm(id, move_number);

        self.sink.emit(LedgerEvent::move_applied(caller, id, mv, claimed));
        self.sink.emit(LedgerEvent::move_confirmed(caller, id, move_number, 1));

        debug!(game = %id.short(), move_number, %mv, "move applied");
        Ok(move_number)
    }

    fn check_start(
        &self,
        caller: Address,
        id: &GameId,
        boards: &[Board; OPENING_MOVES + 1],
        moves: &[Move; OPENING_MOVES],
    ) -> Result<Hash256, LedgerError> {
        check_owner(id, caller)?;

        if self.store.contains(id) {
            return Err(LedgerError::GameIdUsed);
        }

        let opening = opening_hash(boards);
        if self.store.opening_used(&opening) {
            return Err(LedgerError::GamePlayed);
        }

        if !validate_start_position(boards[0]) {
            return Err(LedgerError::Rejected {
                move_number: 0,
                source: TransitionError::InvalidMove,
            });
        }

        for (k, mv) in moves.iter().enumerate() {
            let move_number = k as u64 + 1;
            let seed = seed_for(id, move_number);
            check_transition(boards[k], *mv, boards[k + 1], &seed)
                .map_err(|source| LedgerError::Rejected {
                    move_number,
                    source,
                })?;
        }

        Ok(opening)
    }

    fn check_play(
        &self,
        caller: Address,
        id: &GameId,
        mv: Move,
        claimed: Board,
    ) -> Result<GameRecord, LedgerError> {
        check_owner(id, caller)?;

        let record = self.store.record(id).ok_or(LedgerError::UnknownGame)?;
        let seed = seed_for(id, record.move_count);
        check_transition(record.board, mv, claimed, &seed).map_err(|source| {
            LedgerError::Rejected {
                move_number: record.move_count,
                source,
            }
        })?;

        Ok(record)
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    /// Does a game exist under `id`?
    pub fn exists(&self, id: &GameId) -> bool {
        self.store.contains(id)
    }

    /// Full record for `id`.
    pub fn record(&self, id: &GameId) -> Option<GameRecord> {
        self.store.record(id)
    }

    /// Tiles and next move number for `id`.
    pub fn get_board(&self, id: &GameId) -> Option<BoardView> {
        self.store.record(id).map(|r| BoardView {
            tiles: r.board.tiles(),
            next_move: r.move_count,
        })
    }

    /// Is move `move_number` of `id` confirmed?
    pub fn is_move_confirmed(&self, id: &GameId, move_number: u64) -> bool {
        self.store.is_confirmed(id, move_number)
    }

    /// Current board of `id`.
    pub fn latest_board(&self, id: &GameId) -> Option<Board> {
        self.store.record(id).map(|r| r.board)
    }

    /// Next expected move number of `id`.
    pub fn next_move(&self, id: &GameId) -> Option<u64> {
        self.store.record(id).map(|r| r.move_count)
    }
}

fn check_owner(id: &GameId, caller: Address) -> Result<(), LedgerError> {
    if !correct_caller(id, &caller) {
        return Err(LedgerError::WrongPlayer {
            caller,
            owner: id.principal(),
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
