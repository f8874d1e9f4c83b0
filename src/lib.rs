//! # Twenty48 Chain
//!
//! Deterministic 2048 move validation, designed to run inside a metered
//! ledger that must not trust the player's client.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TWENTY48 CHAIN                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives               │
//! │  ├── board.rs      - Packed u128 board codec                │
//! │  ├── identity.rs   - Addresses and game identifiers         │
//! │  ├── seed.rs       - Per-move seed derivation               │
//! │  └── hash.rs       - Opening and history hashing            │
//! │                                                             │
//! │  game/             - Game rules (deterministic)             │
//! │  ├── moves.rs      - Shift and merge                        │
//! │  ├── spawn.rs      - Seeded tile spawn                      │
//! │  ├── validate.rs   - Transition validation                  │
//! │  └── events.rs     - Ledger events                          │
//! │                                                             │
//! │  ledger/           - Protocol state machine                 │
//! │  ├── engine.rs     - start_game / play / reads              │
//! │  └── store.rs      - Storage and event sink seams           │
//! │                                                             │
//! │  proof/            - Offline verification                   │
//! │  ├── transcript.rs - Game history and commitment chain      │
//! │  └── verify.rs     - Verification by replay                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/`, `game/` and `proof/` modules are **100% deterministic**:
//! - Integer arithmetic only
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from SHA-256 seeds over public inputs
//!
//! Any verifier with the game id and the move history reaches the same
//! verdict, bit for bit.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod ledger;
pub mod proof;

// Re-export commonly used types
pub use crate::core::board::{Board, MAX_EXPONENT};
pub use crate::core::identity::{Address, GameId};
pub use crate::core::seed::{seed_for, Seed};
pub use crate::game::moves::Move;
pub use crate::game::validate::{validate_start_position, validate_transition};
pub use crate::ledger::{GameLedger, LedgerError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Moves in the seeded opening sequence.
pub const OPENING_MOVES: usize = 3;

/// First move number played after the opening.
pub const FIRST_PLAYABLE_MOVE: u64 = OPENING_MOVES as u64 + 1;
