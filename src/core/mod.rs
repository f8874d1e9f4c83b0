//! Core deterministic primitives.
//!
//! All types in this module are designed for bit-exact reproduction by any
//! verifier. They form the wire format of the protocol.

pub mod board;
pub mod error;
pub mod hash;
pub mod identity;
pub mod seed;

// Re-export core types
pub use board::{Board, CellSet, BOARD_CELLS, BOARD_SIDE, MAX_EXPONENT};
pub use error::BoardError;
pub use hash::{opening_hash, Hash256, ProtocolHasher};
pub use identity::{correct_caller, Address, GameId, IdentityError};
pub use seed::{seed_for, Seed};
