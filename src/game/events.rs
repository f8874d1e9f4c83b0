//! Ledger Events
//!
//! Events emitted to the external append-only sink after a call commits.

use serde::{Deserialize, Serialize};

use crate::core::board::Board;
use crate::core::identity::{Address, GameId};
use crate::game::moves::Move;

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventData {
    /// A game was opened; carries the last board of the opening.
    GameStarted {
        /// Board after the third opening move.
        final_opening_board: Board,
    },

    /// A move was applied.
    MoveApplied {
        /// Direction played.
        mv: Move,
        /// Board after the move and spawn.
        result_board: Board,
    },

    /// A move number was durably committed.
    MoveConfirmed {
        /// Confirmed move number.
        move_number: u64,
        /// 1-based position of this confirmation within the emitting call.
        sequence_position: u8,
    },
}

/// An event with the caller and game it concerns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Principal that made the call.
    pub caller: Address,

    /// Game the event belongs to.
    pub game_id: GameId,

    /// Event data
    pub data: LedgerEventData,
}

impl LedgerEvent {
    /// Create a new event.
    pub fn new(caller: Address, game_id: GameId, data: LedgerEventData) -> Self {
        Self {
            caller,
            game_id,
            data,
        }
    }

    /// Create game started event.
    pub fn game_started(caller: Address, game_id: GameId, final_opening_board: Board) -> Self {
        Self::new(
            caller,
            game_id,
            LedgerEventData::GameStarted { final_opening_board },
        )
    }

    /// Create move applied event.
    pub fn move_applied(caller: Address, game_id: GameId, mv: Move, result_board: Board) -> Self {
        Self::new(
            caller,
            game_id,
            LedgerEventData::MoveApplied { mv, result_board },
        )
    }

    /// Create move confirmed event.
    pub fn move_confirmed(
        caller: Address,
        game_id: GameId,
        move_number: u64,
        sequence_position: u8,
    ) -> Self {
        Self::new(
            caller,
            game_id,
            LedgerEventData::MoveConfirmed {
                move_number,
                sequence_position,
            },
        )
    }

    /// Move number carried by a confirmation, if this is one.
    pub fn confirmed_move(&self) -> Option<u64> {
        match self.data {
            LedgerEventData::MoveConfirmed { move_number, .. } => Some(move_number),
            _ => None,
        }
    }
}
