//! Ledger Module
//!
//! Stateful protocol layer: game records, identity binding, opening
//! deduplication and move confirmations.
//!
//! All state lives in a [`GameStore`]; all events go to an [`EventSink`].
//! Concurrent calls on the same game must be serialized by the caller.

pub mod engine;
pub mod store;

pub use engine::{BoardView, GameLedger, LedgerError};
pub use store::{EventSink, GameRecord, GameStore, MemoryEventSink, MemoryStore};
