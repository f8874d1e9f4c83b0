//! Principals and Game Identifiers
//!
//! A game identifier embeds the owning principal, so a game can only ever be
//! driven by the account that created it.
//!
//! ```text
//!  byte 0               byte 20              byte 32
//!  ┌────────────────────┬────────────────────┐
//!  │ owner address (20) │ disambiguator (12) │
//!  └────────────────────┴────────────────────┘
//! ```
//!
//! Read as a big-endian 256-bit integer, the address occupies the high-order
//! 160 bits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Game identifier length in bytes.
pub const GAME_ID_LEN: usize = 32;

/// Disambiguator length in bytes.
pub const DISAMBIGUATOR_LEN: usize = GAME_ID_LEN - ADDRESS_LEN;

/// Errors parsing identifiers from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    /// Decoded to the wrong number of bytes.
    #[error("expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Decoded length.
        got: usize,
    },
}

/// A 20-byte account address (the calling principal).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

/// Opaque 32-byte game identifier: owner address + disambiguator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GameId(pub [u8; GAME_ID_LEN]);

impl GameId {
    /// Build an identifier for `owner` with an arbitrary disambiguator.
    pub fn from_parts(owner: Address, disambiguator: [u8; DISAMBIGUATOR_LEN]) -> Self {
        let mut bytes = [0u8; GAME_ID_LEN];
        bytes[..ADDRESS_LEN].copy_from_slice(owner.as_bytes());
        bytes[ADDRESS_LEN..].copy_from_slice(&disambiguator);
        Self(bytes)
    }

    /// Build an identifier for `owner` with a numeric nonce in the low bytes.
    pub fn new(owner: Address, nonce: u64) -> Self {
        let mut disambiguator = [0u8; DISAMBIGUATOR_LEN];
        disambiguator[DISAMBIGUATOR_LEN - 8..].copy_from_slice(&nonce.to_be_bytes());
        Self::from_parts(owner, disambiguator)
    }

    /// The principal encoded in the high-order bytes.
    pub fn principal(&self) -> Address {
        let mut owner = [0u8; ADDRESS_LEN];
        owner.copy_from_slice(&self.0[..ADDRESS_LEN]);
        Address(owner)
    }

    /// The low-order disambiguator.
    pub fn disambiguator(&self) -> [u8; DISAMBIGUATOR_LEN] {
        let mut out = [0u8; DISAMBIGUATOR_LEN];
        out.copy_from_slice(&self.0[ADDRESS_LEN..]);
        out
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; GAME_ID_LEN] {
        &self.0
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

/// Does `caller` own the game `id`?
#[inline]
pub fn correct_caller(id: &GameId, caller: &Address) -> bool {
    id.principal() == *caller
}

fn parse_hex<const N: usize>(s: &str) -> Result<[u8; N], IdentityError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| IdentityError::InvalidHex(e.to_string()))?;
    let got = bytes.len();
    bytes
        .try_into()
        .map_err(|_| IdentityError::InvalidLength { expected: N, got })
}

impl FromStr for Address {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex::<ADDRESS_LEN>(s).map(Address)
    }
}

impl FromStr for GameId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex::<GAME_ID_LEN>(s).map(GameId)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_roundtrip() {
        let owner = Address::new([0xAB; 20]);
        let id = GameId::new(owner, 42);

        assert_eq!(id.principal(), owner);
        assert_eq!(&id.as_bytes()[24..], &42u64.to_be_bytes());
        assert!(correct_caller(&id, &owner));
        assert!(!correct_caller(&id, &Address::new([0xAC; 20])));
    }

    #[test]
    fn test_disambiguator_does_not_touch_owner() {
        let owner = Address::new([1; 20]);
        let a = GameId::from_parts(owner, [0xFF; 12]);
        let b = GameId::from_parts(owner, [0x00; 12]);

        assert_ne!(a, b);
        assert_eq!(a.principal(), b.principal());
        assert_eq!(a.disambiguator(), [0xFF; 12]);
    }

    #[test]
    fn test_hex_parse_and_display() {
        let owner: Address = "0x0102030405060708090a0b0c0d0e0f1011121314".parse().unwrap();
        assert_eq!(owner.0[0], 1);
        assert_eq!(owner.0[19], 0x14);
        assert_eq!(owner.to_string(), "0x0102030405060708090a0b0c0d0e0f1011121314");

        let id = GameId::new(owner, 7);
        let parsed: GameId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_hex_parse_errors() {
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(IdentityError::InvalidHex(_))
        ));
        assert_eq!(
            "0x0102".parse::<Address>(),
            Err(IdentityError::InvalidLength { expected: 20, got: 2 })
        );
    }
}
