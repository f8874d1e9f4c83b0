//! Ledger Storage
//!
//! The ledger's persistent state sits behind [`GameStore`] so it can live in
//! whatever key-value store the execution substrate provides. Events go to an
//! [`EventSink`]. In-memory implementations are provided for tests and local
//! simulation; they use `BTreeMap`/`BTreeSet` for deterministic iteration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::board::Board;
use crate::core::hash::Hash256;
use crate::core::identity::GameId;
use crate::game::events::LedgerEvent;
use crate::game::moves::Move;

/// Per-game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Next expected move number.
    pub move_count: u64,
    /// Most recently applied move.
    pub last_move: Move,
    /// Current board.
    pub board: Board,
}

/// Key-value storage for ledger state.
///
/// Records are never deleted. Confirmations and opening hashes are
/// write-once.
pub trait GameStore {
    /// Record for `id`, if the game exists.
    fn record(&self, id: &GameId) -> Option<GameRecord>;

    /// Insert or overwrite the record for `id`.
    fn put_record(&mut self, id: GameId, record: GameRecord);

    /// Has this opening been used by any game?
    fn opening_used(&self, hash: &Hash256) -> bool;

    /// Mark an opening as used.
    fn mark_opening(&mut self, hash: Hash256);

    /// Is move `move_number` of `id` confirmed?
    fn is_confirmed(&self, id: &GameId, move_number: u64) -> bool;

    /// Confirm move `move_number` of `id`.
    fn confirm(&mut self, id: GameId, move_number: u64);

    /// Does a record exist for `id`?
    fn contains(&self, id: &GameId) -> bool {
        self.record(id).is_some()
    }
}

/// Append-only event destination.
pub trait EventSink {
    /// Append an event.
    fn emit(&mut self, event: LedgerEvent);
}

/// In-memory [`GameStore`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    records: BTreeMap<GameId, GameRecord>,
    openings: BTreeSet<Hash256>,
    confirmations: BTreeSet<(GameId, u64)>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of games.
    pub fn game_count(&self) -> usize {
        self.records.len()
    }

    /// Snapshot as bincode bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restore from bincode bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl GameStore for MemoryStore {
    fn record(&self, id: &GameId) -> Option<GameRecord> {
        self.records.get(id).copied()
    }

    fn put_record(&mut self, id: GameId, record: GameRecord) {
        self.records.insert(id, record);
    }

    fn opening_used(&self, hash: &Hash256) -> bool {
        self.openings.contains(hash)
    }

    fn mark_opening(&mut self, hash: Hash256) {
        self.openings.insert(hash);
    }

    fn is_confirmed(&self, id: &GameId, move_number: u64) -> bool {
        self.confirmations.contains(&(*id, move_number))
    }

    fn confirm(&mut self, id: GameId, move_number: u64) {
        self.confirmations.insert((id, move_number));
    }
}

/// In-memory [`EventSink`] that keeps every event in order.
#[derive(Clone, Debug, Default)]
pub struct MemoryEventSink {
    events: Vec<LedgerEvent>,
}

impl MemoryEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take all events, leaving the sink empty.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}
