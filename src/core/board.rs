//! Packed Board Codec
//!
//! A 4x4 board packed into a single `u128`, one byte per tile.
//!
//! ## Layout
//!
//! ```text
//!  bit 127                                                   bit 0
//!  ┌────────┬────────┬─────┬────────┬────────┐
//!  │ tile15 │ tile14 │ ... │ tile 1 │ tile 0 │   8 bits each
//!  └────────┴────────┴─────┴────────┴────────┘
//! ```
//!
//! Tile `i` lives at bits `[8*i, 8*i + 8)`. The canonical wire form is
//! `u128::to_le_bytes`, so byte `i` of the wire form is tile `i`.
//! Tiles are row-major: index `4*row + col`.
//!
//! This layout is part of the protocol. Every verifier must reproduce it
//! exactly; changing it invalidates every recorded game.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::BoardError;

/// Number of tiles on the board.
pub const BOARD_CELLS: usize = 16;

/// Tiles per row / column.
pub const BOARD_SIDE: usize = 4;

/// Bits per packed tile field.
pub const FIELD_BITS: u32 = 8;

/// Largest tile exponent accepted (2^18 = 262144).
///
/// This is the highest tile reachable on a 4x4 board when 4-tiles spawn.
pub const MAX_EXPONENT: u8 = 18;

const FIELD_MASK: u128 = 0xFF;

/// Packed 4x4 board of tile exponents.
///
/// `0` is an empty cell; `e >= 1` is the tile `2^e`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[u8; 16]", into = "[u8; 16]")]
pub struct Board(u128);

impl Board {
    /// Board with every cell empty.
    pub const EMPTY: Board = Board(0);

    /// Wrap a raw packed value.
    ///
    /// The value is not checked; call [`Board::validate`] before simulating
    /// anything that came from outside.
    #[inline]
    pub const fn from_raw(raw: u128) -> Self {
        Board(raw)
    }

    /// Raw packed value.
    #[inline]
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Build a board from 16 exponents in row-major order.
    pub fn from_tiles(tiles: [u8; BOARD_CELLS]) -> Result<Self, BoardError> {
        for &exponent in &tiles {
            check_exponent(exponent)?;
        }
        Ok(Board(u128::from_le_bytes(tiles)))
    }

    /// All 16 exponents in row-major order.
    #[inline]
    pub const fn tiles(self) -> [u8; BOARD_CELLS] {
        self.0.to_le_bytes()
    }

    /// Canonical 16-byte wire encoding.
    #[inline]
    pub const fn to_bytes(self) -> [u8; BOARD_CELLS] {
        self.tiles()
    }

    /// Exponent at `index`.
    pub fn get_tile(self, index: usize) -> Result<u8, BoardError> {
        check_index(index)?;
        Ok(self.field(index))
    }

    /// Copy of this board with the tile at `index` replaced.
    pub fn set_tile(self, index: usize, exponent: u8) -> Result<Self, BoardError> {
        check_index(index)?;
        check_exponent(exponent)?;
        Ok(self.with_field(index, exponent))
    }

    /// Is the cell at `index` empty?
    pub fn is_empty(self, index: usize) -> Result<bool, BoardError> {
        Ok(self.get_tile(index)? == 0)
    }

    /// Reject boards carrying any exponent above [`MAX_EXPONENT`].
    pub fn validate(self) -> Result<(), BoardError> {
        for exponent in self.tiles() {
            check_exponent(exponent)?;
        }
        Ok(())
    }

    /// Number of occupied cells.
    pub fn count_occupied(self) -> usize {
        self.tiles().iter().filter(|&&e| e != 0).count()
    }

    /// Number of empty cells.
    pub fn count_empty(self) -> usize {
        BOARD_CELLS - self.count_occupied()
    }

    /// Set of empty cells.
    pub fn empty_cells(self) -> CellSet {
        let mut set = CellSet::EMPTY;
        for (index, &exponent) in self.tiles().iter().enumerate() {
            if exponent == 0 {
                set.insert(index);
            }
        }
        set
    }

    /// Largest exponent on the board (0 when empty).
    pub fn highest_exponent(self) -> u8 {
        self.tiles().into_iter().max().unwrap_or(0)
    }

    /// Unchecked field read. `index` must be below 16.
    #[inline]
    pub(crate) fn field(self, index: usize) -> u8 {
        ((self.0 >> (index as u32 * FIELD_BITS)) & FIELD_MASK) as u8
    }

    /// Unchecked field write. `index` must be below 16.
    #[inline]
    pub(crate) fn with_field(self, index: usize, exponent: u8) -> Self {
        let shift = index as u32 * FIELD_BITS;
        let cleared = self.0 & !(FIELD_MASK << shift);
        Board(cleared | ((exponent as u128) << shift))
    }
}

#[inline]
fn check_index(index: usize) -> Result<(), BoardError> {
    if index >= BOARD_CELLS {
        return Err(BoardError::IndexOutOfRange { index });
    }
    Ok(())
}

#[inline]
fn check_exponent(exponent: u8) -> Result<(), BoardError> {
    if exponent > MAX_EXPONENT {
        return Err(BoardError::ExponentOutOfRange {
            exponent,
            max: MAX_EXPONENT,
        });
    }
    Ok(())
}

impl TryFrom<[u8; BOARD_CELLS]> for Board {
    type Error = BoardError;

    fn try_from(tiles: [u8; BOARD_CELLS]) -> Result<Self, Self::Error> {
        Board::from_tiles(tiles)
    }
}

impl From<Board> for [u8; BOARD_CELLS] {
    fn from(board: Board) -> Self {
        board.tiles()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.tiles())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles().chunks(BOARD_SIDE) {
            for &exponent in row {
                if exponent == 0 {
                    write!(f, "{:>7}", ".")?;
                } else {
                    write!(f, "{:>7}", 1u32 << exponent)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// =============================================================================
// CELL SET
// =============================================================================

/// Set of board cells as a 16-bit mask. Iterates in ascending index order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSet(u16);

impl CellSet {
    /// No cells.
    pub const EMPTY: CellSet = CellSet(0);

    /// Add a cell. Indices `>= 16` are ignored.
    #[inline]
    pub fn insert(&mut self, index: usize) {
        if index < BOARD_CELLS {
            self.0 |= 1 << index;
        }
    }

    /// Is `index` in the set?
    #[inline]
    pub fn contains(self, index: usize) -> bool {
        index < BOARD_CELLS && self.0 & (1 << index) != 0
    }

    /// Number of cells.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Is the set empty?
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The `n`-th cell in ascending order.
    pub fn nth(self, n: usize) -> Option<usize> {
        self.iter().nth(n)
    }

    /// Cells in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..BOARD_CELLS).filter(move |&i| self.0 & (1 << i) != 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_little_endian_by_index() {
        let board = Board::EMPTY.set_tile(0, 1).unwrap().set_tile(15, 3).unwrap();
        assert_eq!(board.raw(), 1 | (3u128 << 120));
        assert_eq!(board.to_bytes()[0], 1);
        assert_eq!(board.to_bytes()[15], 3);
    }

    #[test]
    fn test_get_set_tile() {
        let board = Board::EMPTY.set_tile(5, 11).unwrap();
        assert_eq!(board.get_tile(5).unwrap(), 11);
        assert_eq!(board.get_tile(4).unwrap(), 0);
        assert!(board.is_empty(4).unwrap());
        assert!(!board.is_empty(5).unwrap());

        // Overwrite clears the old field
        let board = board.set_tile(5, 2).unwrap();
        assert_eq!(board.get_tile(5).unwrap(), 2);
    }

    #[test]
    fn test_index_out_of_range() {
        assert_eq!(
            Board::EMPTY.get_tile(16),
            Err(BoardError::IndexOutOfRange { index: 16 })
        );
        assert!(matches!(
            Board::EMPTY.set_tile(99, 1),
            Err(BoardError::IndexOutOfRange { index: 99 })
        ));
    }

    #[test]
    fn test_exponent_out_of_range() {
        assert!(Board::EMPTY.set_tile(0, MAX_EXPONENT).is_ok());
        assert!(matches!(
            Board::EMPTY.set_tile(0, MAX_EXPONENT + 1),
            Err(BoardError::ExponentOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_raw_garbage() {
        let forged = Board::from_raw(0xFFu128 << 64);
        assert!(forged.validate().is_err());
        assert!(Board::EMPTY.validate().is_ok());
    }

    #[test]
    fn test_from_tiles() {
        let mut tiles = [0u8; 16];
        tiles[3] = 4;
        tiles[12] = 1;
        let board = Board::from_tiles(tiles).unwrap();
        assert_eq!(board.tiles(), tiles);
        assert_eq!(board.count_occupied(), 2);
        assert_eq!(board.count_empty(), 14);
        assert_eq!(board.highest_exponent(), 4);

        tiles[0] = 200;
        assert!(Board::from_tiles(tiles).is_err());
    }

    #[test]
    fn test_empty_cells_ascending() {
        let mut tiles = [1u8; 16];
        tiles[2] = 0;
        tiles[9] = 0;
        tiles[14] = 0;
        let cells = Board::from_tiles(tiles).unwrap().empty_cells();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells.iter().collect::<Vec<_>>(), vec![2, 9, 14]);
        assert_eq!(cells.nth(1), Some(9));
        assert_eq!(cells.nth(3), None);
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let board = Board::EMPTY.set_tile(7, 6).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);

        let mut bad = [0u8; 16];
        bad[0] = 40;
        let json = serde_json::to_string(&bad).unwrap();
        assert!(serde_json::from_str::<Board>(&json).is_err());
    }

    #[test]
    fn test_display_grid() {
        let board = Board::EMPTY.set_tile(0, 1).unwrap().set_tile(5, 11).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains('2'));
        assert!(lines[1].contains("2048"));
    }
}
