//! Protocol Hashing
//!
//! Deterministic SHA-256 hashing for:
//! - Opening deduplication (anti-grinding)
//! - Tamper-evident game history chains
//!
//! Field order, widths and endianness below are part of the protocol.

use sha2::{Digest, Sha256};

use super::board::Board;
use super::identity::GameId;

/// Hash output type (256 bits / 32 bytes)
pub type Hash256 = [u8; 32];

/// Domain separator for opening hashes.
pub const OPENING_DOMAIN: &[u8] = b"TWENTY48_OPENING_V1";

/// Domain separator for game history chains.
pub const HISTORY_DOMAIN: &[u8] = b"TWENTY48_HISTORY_V1";

/// Deterministic hasher for protocol values.
///
/// Wraps SHA-256 with helpers for boards and identifiers.
/// Order of updates is critical for determinism.
pub struct ProtocolHasher {
    hasher: Sha256,
}

impl ProtocolHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for opening sequences.
    pub fn for_opening() -> Self {
        Self::new(OPENING_DOMAIN)
    }

    /// Create hasher for history chains.
    pub fn for_history() -> Self {
        Self::new(HISTORY_DOMAIN)
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u64 value (big-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_be_bytes());
    }

    /// Update with a board (16-byte wire form).
    #[inline]
    pub fn update_board(&mut self, board: Board) {
        self.hasher.update(board.to_bytes());
    }

    /// Update with a game identifier (32 bytes).
    #[inline]
    pub fn update_game_id(&mut self, id: &GameId) {
        self.hasher.update(id.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> Hash256 {
        self.hasher.finalize().into()
    }
}

/// Digest of an opening sequence: start board followed by the three
/// post-move boards, in order.
///
/// Independent of the game identifier, so the same opening is caught even
/// when replayed under a fresh identifier.
pub fn opening_hash(boards: &[Board; 4]) -> Hash256 {
    let mut hasher = ProtocolHasher::for_opening();
    for board in boards {
        hasher.update_board(*board);
    }
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
