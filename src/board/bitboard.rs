/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::Square;

/// A [`Bitboard`] represents a set of squares as the bits of a 64-bit number.
///
/// Bit `i` is the [`Square`] with index `i`, so the least-significant bit is a8 and the
/// most-significant bit is h1. The eighth rank therefore lives in the low byte:
/// ```text
/// 11111111
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// 00000000
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const FILE_A: Self = Self(0x0101010101010101);
    pub const FILE_B: Self = Self(0x0202020202020202);
    pub const FILE_C: Self = Self(0x0404040404040404);
    pub const FILE_D: Self = Self(0x0808080808080808);
    pub const FILE_E: Self = Self(0x1010101010101010);
    pub const FILE_F: Self = Self(0x2020202020202020);
    pub const FILE_G: Self = Self(0x4040404040404040);
    pub const FILE_H: Self = Self(0x8080808080808080);
    pub const NOT_FILE_A: Self = Self(0xFEFEFEFEFEFEFEFE);
    pub const NOT_FILE_H: Self = Self(0x7F7F7F7F7F7F7F7F);
    pub const RANK_8: Self = Self(0x00000000000000FF);
    pub const RANK_7: Self = Self(0x000000000000FF00);
    pub const RANK_6: Self = Self(0x0000000000FF0000);
    pub const RANK_5: Self = Self(0x00000000FF000000);
    pub const RANK_4: Self = Self(0x000000FF00000000);
    pub const RANK_3: Self = Self(0x0000FF0000000000);
    pub const RANK_2: Self = Self(0x00FF000000000000);
    pub const RANK_1: Self = Self(0xFF00000000000000);
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const FULL_BOARD: Self = Self(0xFFFFFFFFFFFFFFFF);

    /// Constructs a new [`Bitboard`] from the provided bit pattern.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Bitboard;
    /// let board = Bitboard::new(255);
    /// assert_eq!(board, Bitboard::RANK_8);
    /// ```
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Constructs a new [`Bitboard`] with only the bit of `square` set.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H1);
    /// assert_eq!(board.to_hex_string(), "0x8000000000000000");
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.0)
    }

    /// Returns the inner `u64` of this [`Bitboard`].
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Checks if this [`Bitboard`] is empty, meaning all bits are set to `0`.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Checks if this [`Bitboard`] contains at least one set bit.
    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if the bit of `square` is set.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// assert!(Bitboard::RANK_1.contains(Square::E1));
    /// assert!(!Bitboard::RANK_1.contains(Square::E2));
    /// ```
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1 << square.0) != 0
    }

    /// Returns `true` if `self` contains *any* of the bits set in `other`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// assert!(Bitboard::FILE_A.intersects(Square::A3));
    /// assert!(Bitboard::RANK_1.intersects(Bitboard::FILE_A));
    /// assert!(!Bitboard::RANK_1.intersects(Bitboard::RANK_5));
    /// ```
    #[inline(always)]
    pub fn intersects(&self, other: impl Into<Self>) -> bool {
        (*self & other.into()).is_nonempty()
    }

    /// Sets the bit(s) specified by `other` to `1` (on).
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// let mut board = Bitboard::EMPTY_BOARD;
    /// board.set(Square::B8);
    /// assert_eq!(board.to_hex_string(), "0x0000000000000002");
    /// ```
    #[inline(always)]
    pub fn set(&mut self, other: impl Into<Self>) {
        *self |= other.into()
    }

    /// Toggles (inverts) the bit(s) specified by `other`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// let mut board = Bitboard::RANK_8;
    /// board.toggle(Square::C8);
    /// assert_eq!(board.to_hex_string(), "0x00000000000000FB");
    /// board.toggle(Square::C8);
    /// assert_eq!(board, Bitboard::RANK_8);
    /// ```
    #[inline(always)]
    pub fn toggle(&mut self, other: impl Into<Self>) {
        *self ^= other.into()
    }

    /// Clears the bit(s) specified by `other` to `0` (off).
    ///
    /// Clearing a bit that is already off does nothing.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// let mut board = Bitboard::RANK_8;
    /// board.clear(Square::C8);
    /// board.clear(Square::C1);
    /// assert_eq!(board.to_hex_string(), "0x00000000000000FB");
    /// ```
    #[inline(always)]
    pub fn clear(&mut self, other: impl Into<Self>) {
        *self &= !other.into()
    }

    /// Returns every bit of `self` that is not in `other` (AND-NOT).
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// let rank = Bitboard::RANK_4.without(Square::E4);
    /// assert_eq!(rank.population(), 7);
    /// assert!(!rank.contains(Square::E4));
    /// ```
    #[inline(always)]
    pub fn without(self, other: impl Into<Self>) -> Self {
        Self(self.0 & !other.into().0)
    }

    /// Returns the lowest-index set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// If `self` is empty, this yields `None`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// assert_eq!(Bitboard::RANK_1.lsb(), Some(Square::A1));
    /// assert_eq!(Bitboard::EMPTY_BOARD.lsb(), None);
    /// ```
    #[inline(always)]
    pub const fn lsb(&self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Some(Square(self.0.trailing_zeros() as u8))
        }
    }

    /// Returns the highest-index set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// If `self` is empty, this yields `None`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Bitboard, Square};
    /// assert_eq!(Bitboard::RANK_1.msb(), Some(Square::H1));
    /// assert_eq!(Bitboard::EMPTY_BOARD.msb(), None);
    /// ```
    #[inline(always)]
    pub const fn msb(&self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Some(Square(63 - self.0.leading_zeros() as u8))
        }
    }

    /// Returns the lowest-index set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// # Panics
    ///
    /// If `self` is empty.
    #[inline(always)]
    pub const fn lsb_unchecked(&self) -> Square {
        assert!(self.is_nonempty(), "lsb_unchecked called on an empty Bitboard");
        Square(self.0.trailing_zeros() as u8)
    }

    /// Returns the highest-index set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// # Panics
    ///
    /// If `self` is empty.
    #[inline(always)]
    pub const fn msb_unchecked(&self) -> Square {
        assert!(self.is_nonempty(), "msb_unchecked called on an empty Bitboard");
        Square(63 - self.0.leading_zeros() as u8)
    }

    /// Pops and returns the lowest-index set bit of this [`Bitboard`], as a [`Square`].
    ///
    /// If `self` is empty, this yields `None`.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        lsb
    }

    /// Returns a [`BitboardIter`] to iterate over all of the set bits as [`Square`]s, lowest index first.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }

    /// Yields the total number of `1`s in this [`Bitboard`].
    ///
    /// # Example
    /// ```
    /// # use rayfish::Bitboard;
    /// assert_eq!(Bitboard::RANK_1.population(), 8);
    /// ```
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Shifts this [`Bitboard`] one rank towards the eighth rank.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Bitboard;
    /// assert_eq!(Bitboard::RANK_4.north(), Bitboard::RANK_5);
    /// assert_eq!(Bitboard::RANK_8.north(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn north(self) -> Self {
        Self(self.0 >> 8)
    }

    /// Shifts this [`Bitboard`] one rank towards the first rank.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Bitboard;
    /// assert_eq!(Bitboard::RANK_4.south(), Bitboard::RANK_3);
    /// assert_eq!(Bitboard::RANK_1.south(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn south(self) -> Self {
        Self(self.0 << 8)
    }

    /// Shifts this [`Bitboard`] one file towards the h-file, dropping anything that wraps.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Bitboard;
    /// assert_eq!(Bitboard::FILE_C.east(), Bitboard::FILE_D);
    /// assert_eq!(Bitboard::FILE_H.east(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn east(self) -> Self {
        Self((self.0 << 1) & Self::NOT_FILE_A.0)
    }

    /// Shifts this [`Bitboard`] one file towards the a-file, dropping anything that wraps.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Bitboard;
    /// assert_eq!(Bitboard::FILE_C.west(), Bitboard::FILE_B);
    /// assert_eq!(Bitboard::FILE_A.west(), Bitboard::EMPTY_BOARD);
    /// ```
    #[inline(always)]
    pub const fn west(self) -> Self {
        Self((self.0 >> 1) & Self::NOT_FILE_H.0)
    }

    /// Combination of [`Bitboard::north`] and [`Bitboard::east`].
    #[inline(always)]
    pub const fn northeast(self) -> Self {
        Self((self.0 >> 7) & Self::NOT_FILE_A.0)
    }

    /// Combination of [`Bitboard::north`] and [`Bitboard::west`].
    #[inline(always)]
    pub const fn northwest(self) -> Self {
        Self((self.0 >> 9) & Self::NOT_FILE_H.0)
    }

    /// Combination of [`Bitboard::south`] and [`Bitboard::east`].
    #[inline(always)]
    pub const fn southeast(self) -> Self {
        Self((self.0 << 9) & Self::NOT_FILE_A.0)
    }

    /// Combination of [`Bitboard::south`] and [`Bitboard::west`].
    #[inline(always)]
    pub const fn southwest(self) -> Self {
        Self((self.0 << 7) & Self::NOT_FILE_H.0)
    }

    /// `const` analog of [`std::ops::BitAnd::bitand`].
    #[inline(always)]
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// `const` analog of [`std::ops::BitOr::bitor`].
    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `const` analog of [`std::ops::BitXor::bitxor`].
    #[inline(always)]
    pub const fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// `const` analog of [`Not::not`].
    #[inline(always)]
    pub const fn not(self) -> Self {
        Self(!self.0)
    }

    /// Formats this [`Bitboard`] as a hexadecimal string.
    #[inline(always)]
    pub fn to_hex_string(&self) -> String {
        format!("0x{:0>16X}", self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    /// A [`Bitboard`] can be created from an iterator over [`Square`]s.
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |bb, sq| bb | sq)
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(self.0.$func(Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                self.0.$func_assign(Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);
impl_bitwise_op!(BitXor, BitXorAssign, bitxor, bitxor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    /// Wrapper for [`Bitboard::from_square`].
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl From<Option<Square>> for Bitboard {
    /// An absent square is an empty board.
    #[inline(always)]
    fn from(value: Option<Square>) -> Self {
        value.map(Self::from_square).unwrap_or_default()
    }
}

impl From<u64> for Bitboard {
    /// Wrapper for [`Bitboard::new`].
    #[inline(always)]
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl Default for Bitboard {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY_BOARD
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(136);

        for square in Square::iter() {
            board.push(if self.contains(square) { 'X' } else { '.' });
            board.push(' ');
            if square.file() == 7 {
                board.push('\n');
            }
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = String::with_capacity(198);

        for square in Square::iter() {
            if square.file() == 0 {
                board += &format!("{}| ", square.rank());
            }
            board.push(if self.contains(square) { 'X' } else { '.' });
            board.push(' ');
            if square.file() == 7 {
                board.push('\n');
            }
        }
        board += " +----------------\n   a b c d e f g h";

        write!(f, "{board}")
    }
}

/// An iterator over all set bits in a [`Bitboard`].
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: *self }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bitboard_to_string() {
        let expected = "X . . . . . . . \n\
                        . X . . . . . . \n\
                        . . X . . . . . \n\
                        . . . X . . . . \n\
                        . . . . X . . . \n\
                        . . . . . X . . \n\
                        . . . . . . X . \n\
                        . . . . . . . X \n";
        let diagonal = Bitboard::new(0x8040201008040201);
        assert_eq!(diagonal.to_string(), expected);

        let board = Bitboard::RANK_2 | Bitboard::FILE_C;
        let expected = ". . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        . . X . . . . . \n\
                        X X X X X X X X \n\
                        . . X . . . . . \n";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_bitboard_masking() {
        assert_eq!(Bitboard::FILE_A ^ Bitboard::FULL_BOARD, Bitboard::NOT_FILE_A);
        assert_eq!(Bitboard::FILE_H ^ Bitboard::FULL_BOARD, Bitboard::NOT_FILE_H);
    }

    #[test]
    fn test_lsb_msb() {
        let board: Bitboard = [Square::C5, Square::F2, Square::B7].into_iter().collect();
        assert_eq!(board.lsb(), Some(Square::B7));
        assert_eq!(board.msb(), Some(Square::F2));
        assert_eq!(board.lsb_unchecked(), Square::B7);
        assert_eq!(board.msb_unchecked(), Square::F2);
    }

    #[test]
    #[should_panic(expected = "empty Bitboard")]
    fn test_lsb_unchecked_empty_panics() {
        Bitboard::EMPTY_BOARD.lsb_unchecked();
    }

    #[test]
    #[should_panic(expected = "empty Bitboard")]
    fn test_msb_unchecked_empty_panics() {
        Bitboard::EMPTY_BOARD.msb_unchecked();
    }

    #[test]
    fn test_iteration_is_ascending() {
        let squares = Bitboard::FILE_E.iter().collect::<Vec<_>>();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares[0], Square::E8);
        assert_eq!(squares[7], Square::E1);
        assert!(squares.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_diagonal_shifts_do_not_wrap() {
        assert_eq!(Bitboard::FILE_H.northeast(), Bitboard::EMPTY_BOARD);
        assert_eq!(Bitboard::FILE_A.northwest(), Bitboard::EMPTY_BOARD);
        assert_eq!(
            Bitboard::from_square(Square::E4).northeast(),
            Square::F5.bitboard()
        );
        assert_eq!(
            Bitboard::from_square(Square::E4).southwest(),
            Square::D3.bitboard()
        );
    }
}
