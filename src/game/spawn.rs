//! Spawn Oracle
//!
//! Picks the tile that appears after every legal move, using only the move
//! seed and the shifted board.
//!
//! ## Canonical policy
//!
//! - Empty cells are enumerated in ascending index order.
//! - `cell = empty[seed mod n]`, seed read as a 256-bit big-endian integer.
//! - `roll = (upper 128 bits of seed) mod 10`; exponent 1 if `roll < 9`,
//!   otherwise exponent 2. That is a 2 with 90% and a 4 with 10% probability.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::board::Board;
use crate::core::error::BoardError;
use crate::core::seed::Seed;

/// Rolls (out of [`SPAWN_ROLL_RANGE`]) that produce a 2-tile.
pub const SPAWN_TWO_ROLLS: u128 = 9;

/// Roll range for the spawn value.
pub const SPAWN_ROLL_RANGE: u128 = 10;

/// A chosen spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    /// Cell index.
    pub index: usize,
    /// Tile exponent (1 or 2).
    pub exponent: u8,
}

impl Spawn {
    /// Place this spawn on `board`.
    pub fn apply(self, board: Board) -> Result<Board, BoardError> {
        board.set_tile(self.index, self.exponent)
    }
}

/// Spawn errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Board is full; nowhere to place a tile.
    #[error("no empty cell to spawn into")]
    NoEmptyCell,
}

/// Choose the spawn for `board` (already shifted) under `seed`.
pub fn choose_spawn(board: Board, seed: &Seed) -> Result<Spawn, SpawnError> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return Err(SpawnError::NoEmptyCell);
    }

    let pick = seed.mod_small(empty.len() as u32) as usize;
    let index = empty.nth(pick).ok_or(SpawnError::NoEmptyCell)?;

    Ok(Spawn {
        index,
        exponent: spawn_exponent(seed),
    })
}

/// Exponent of the spawned tile under `seed`.
#[inline]
pub fn spawn_exponent(seed: &Seed) -> u8 {
    roll_exponent(seed.high_u128())
}

#[inline]
fn roll_exponent(bits: u128) -> u8 {
    if bits % SPAWN_ROLL_RANGE < SPAWN_TWO_ROLLS {
        1
    } else {
        2
    }
}

/// Deterministic fresh board: two spawns on an empty board under `seed`.
///
/// The first tile rolls on the high 128 bits, the second on the low 128
/// bits, so the two values are independent.
///
/// Any start board passing `validate_start_position` is accepted by the
/// ledger; this is just one canonical way for a client to pick one.
pub fn start_position(seed: &Seed) -> Result<Board, SpawnError> {
    let first = choose_spawn(Board::EMPTY, seed)?;
    let board = Board::EMPTY.with_field(first.index, first.exponent);
    let second = choose_spawn(board, seed)?;
    Ok(board.with_field(second.index, roll_exponent(seed.low_u128())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::GameId;
    use crate::core::seed::seed_for;

    fn seed_with(high: u128, low: u64) -> Seed {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&high.to_be_bytes());
        bytes[24..].copy_from_slice(&low.to_be_bytes());
        Seed::from_bytes(bytes)
    }

    #[test]
    fn test_index_is_seed_mod_empty_count() {
        // Only cells 3, 7, 11 empty
        let mut tiles = [1u8; 16];
        tiles[3] = 0;
        tiles[7] = 0;
        tiles[11] = 0;
        let board = Board::from_tiles(tiles).unwrap();

        assert_eq!(choose_spawn(board, &seed_with(0, 0)).unwrap().index, 3);
        assert_eq!(choose_spawn(board, &seed_with(0, 1)).unwrap().index, 7);
        assert_eq!(choose_spawn(board, &seed_with(0, 5)).unwrap().index, 11);
        assert_eq!(choose_spawn(board, &seed_with(0, 6)).unwrap().index, 3);
    }

    #[test]
    fn test_exponent_bias() {
        for roll in 0..9u128 {
            assert_eq!(spawn_exponent(&seed_with(roll, 0)), 1);
        }
        assert_eq!(spawn_exponent(&seed_with(9, 0)), 2);
        assert_eq!(spawn_exponent(&seed_with(19, 0)), 2);
        assert_eq!(spawn_exponent(&seed_with(20, 0)), 1);
    }

    #[test]
    fn test_exponent_distribution() {
        // Over consecutive high words the 90/10 split is exact per 10
        let fours = (0..1000u128)
            .filter(|&h| spawn_exponent(&seed_with(h, 0)) == 2)
            .count();
        assert_eq!(fours, 100);
    }

    #[test]
    fn test_full_board() {
        let full = Board::from_tiles([1u8; 16]).unwrap();
        assert_eq!(
            choose_spawn(full, &seed_with(0, 0)),
            Err(SpawnError::NoEmptyCell)
        );
    }

    #[test]
    fn test_start_position_has_two_tiles() {
        for low in 0..50 {
            let board = start_position(&seed_with(low as u128, low)).unwrap();
            assert!(crate::game::validate::validate_start_position(board));
        }
    }

    #[test]
    fn test_start_position_rolls_tiles_independently() {
        // High roll 0 gives a 2, low roll 9 gives a 4
        let mixed = start_position(&seed_with(0, 9)).unwrap();
        let mut values: Vec<u8> = mixed.tiles().into_iter().filter(|&e| e != 0).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);

        let id = GameId([7; 32]);
        let mixed_count = (0..2000u64)
            .map(|n| start_position(&seed_for(&id, n)).unwrap())
            .filter(|board| {
                let tiles = board.tiles();
                let mut occupied = tiles.iter().filter(|&&e| e != 0);
                occupied.next() != occupied.next()
            })
            .count();
        assert!(mixed_count > 0);
    }

    #[test]
    fn test_apply() {
        let spawn = Spawn { index: 4, exponent: 2 };
        let board = spawn.apply(Board::EMPTY).unwrap();
        assert_eq!(board.get_tile(4).unwrap(), 2);
    }
}
