//! Game Transcript Recording
//!
//! Records everything needed to re-verify a game offline: the opening, and
//! every later move with the board it produced.
//!
//! ## History chain
//!
//! ```text
//! h_0 = H(HISTORY || game_id || opening_hash || m1 || m2 || m3)
//! h_n = H(HISTORY || h_(n-1) || move_number || move || board)
//! ```
//!
//! Editing, dropping or reordering any step changes every later link.

use serde::{Deserialize, Serialize};

use crate::core::board::Board;
use crate::core::hash::{opening_hash, Hash256, ProtocolHasher};
use crate::core::identity::GameId;
use crate::game::events::{LedgerEvent, LedgerEventData};
use crate::game::moves::Move;
use crate::{FIRST_PLAYABLE_MOVE, OPENING_MOVES};

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// A single move after the opening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Move number (first is [`FIRST_PLAYABLE_MOVE`]).
    pub move_number: u64,
    /// Direction played.
    pub mv: Move,
    /// Board after the move and spawn.
    pub board: Board,
}

/// Complete game history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// Game identifier (seeds derive from it).
    pub game_id: GameId,

    /// Start board followed by the three opening results.
    pub opening_boards: [Board; OPENING_MOVES + 1],

    /// The three opening moves.
    pub opening_moves: [Move; OPENING_MOVES],

    /// Moves after the opening, in order.
    pub moves: Vec<MoveRecord>,
}

impl GameTranscript {
    /// Create a transcript holding only the opening.
    pub fn new(
        game_id: GameId,
        opening_boards: [Board; OPENING_MOVES + 1],
        opening_moves: [Move; OPENING_MOVES],
    ) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            game_id,
            opening_boards,
            opening_moves,
            moves: Vec::new(),
        }
    }

    /// Move number the next recorded move will carry.
    pub fn next_move_number(&self) -> u64 {
        FIRST_PLAYABLE_MOVE + self.moves.len() as u64
    }

    /// Append a move.
    pub fn push(&mut self, mv: Move, board: Board) {
        let move_number = self.next_move_number();
        self.moves.push(MoveRecord {
            move_number,
            mv,
            board,
        });
    }

    /// Append every `MoveApplied` event for this game, in order.
    ///
    /// Returns the number of moves appended.
    pub fn extend_from_events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a LedgerEvent>,
    ) -> usize {
        let mut appended = 0;
        for event in events {
            if event.game_id != self.game_id {
                continue;
            }
            if let LedgerEventData::MoveApplied { mv, result_board } = event.data {
                self.push(mv, result_board);
                appended += 1;
            }
        }
        appended
    }

    /// Board after the last recorded move.
    pub fn final_board(&self) -> Board {
        self.moves
            .last()
            .map(|m| m.board)
            .unwrap_or(self.opening_boards[OPENING_MOVES])
    }

    /// Total moves including the opening.
    pub fn total_moves(&self) -> u64 {
        OPENING_MOVES as u64 + self.moves.len() as u64
    }

    /// Every link of the history chain: `h_0` then one per recorded move.
    pub fn history_chain(&self) -> Vec<Hash256> {
        let mut chain = Vec::with_capacity(self.moves.len() + 1);

        let mut hasher = ProtocolHasher::for_history();
        hasher.update_game_id(&self.game_id);
        hasher.update_bytes(&opening_hash(&self.opening_boards));
        for mv in &self.opening_moves {
            hasher.update_u8(mv.as_u8());
        }
        let mut link = hasher.finalize();
        chain.push(link);

        for record in &self.moves {
            let mut hasher = ProtocolHasher::for_history();
            hasher.update_bytes(&link);
            hasher.update_u64(record.move_number);
            hasher.update_u8(record.mv.as_u8());
            hasher.update_board(record.board);
            link = hasher.finalize();
            chain.push(link);
        }

        chain
    }

    /// Commitment to the whole history (last link of the chain).
    pub fn history_hash(&self) -> Hash256 {
        // The chain always holds h_0
        self.history_chain().last().copied().unwrap_or_default()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from bincode.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
