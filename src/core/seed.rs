//! Per-Move Seeds
//!
//! The only source of spawn randomness. A seed is re-derivable by anyone
//! from public inputs, so there is nothing for the player to choose.
//!
//! ```text
//! seed_for(id, n) = SHA-256( id[32 bytes] || n as 32-byte big-endian word )
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::identity::GameId;

/// 256-bit deterministic seed, stored big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    /// Create from raw big-endian bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Seed whose 256-bit value equals `value`.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `seed mod modulus` over the full 256-bit big-endian value.
    ///
    /// Returns 0 when `modulus` is 0.
    pub fn mod_small(&self, modulus: u32) -> u32 {
        if modulus == 0 {
            return 0;
        }
        let m = modulus as u64;
        self.0
            .iter()
            .fold(0u64, |rem, &byte| ((rem << 8) | byte as u64) % m) as u32
    }

    /// Upper 128 bits as a big-endian integer.
    pub fn high_u128(&self) -> u128 {
        let mut high = [0u8; 16];
        high.copy_from_slice(&self.0[..16]);
        u128::from_be_bytes(high)
    }

    /// Lower 128 bits as a big-endian integer.
    pub fn low_u128(&self) -> u128 {
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[16..]);
        u128::from_be_bytes(low)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed(0x{})", hex::encode(self.0))
    }
}

/// Derive the seed for move number `move_number` of game `id`.
pub fn seed_for(id: &GameId, move_number: u64) -> Seed {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&move_number.to_be_bytes());

    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(word);
    Seed(hasher.finalize().into())
}
