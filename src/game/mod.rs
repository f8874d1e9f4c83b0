//! Game Logic Module
//!
//! The 2048 rules. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `moves`: Move directions and shift/merge simulation
//! - `spawn`: Seeded tile spawn selection
//! - `validate`: Transition and start-position validation
//! - `events`: Events emitted by the ledger

pub mod events;
pub mod moves;
pub mod spawn;
pub mod validate;

// Re-export key types
pub use events::{LedgerEvent, LedgerEventData};
pub use moves::{is_game_over, legal_moves, simulate_move, Move, MoveOutcome};
pub use spawn::{choose_spawn, start_position, Spawn, SpawnError};
pub use validate::{
    canonical_result, check_transition, validate_start_position, validate_transition,
    TransitionError,
};
