/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::{Bitboard, Color};

/// Represents a single square on an `8x8` chess board.
///
/// Squares are numbered row by row, starting from the top-left corner of the board as White sees it,
/// so `square = file + row * 8` where row `0` is the eighth rank:
/// ```text
/// 8|  0  1  2  3  4  5  6  7
/// 7|  8  9 10 11 12 13 14 15
/// 6| 16 17 18 19 20 21 22 23
/// 5| 24 25 26 27 28 29 30 31
/// 4| 32 33 34 35 36 37 38 39
/// 3| 40 41 42 43 44 45 46 47
/// 2| 48 49 50 51 52 53 54 55
/// 1| 56 57 58 59 60 61 62 63
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
///
/// The absence of a square (such as an empty en passant target) is written as `Option<Square>`.
/// At text and index boundaries, that absence is the index [`Square::NONE_INDEX`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

#[rustfmt::skip]
impl Square {
    pub const A8: Self = Self(0);  pub const B8: Self = Self(1);  pub const C8: Self = Self(2);  pub const D8: Self = Self(3);
    pub const E8: Self = Self(4);  pub const F8: Self = Self(5);  pub const G8: Self = Self(6);  pub const H8: Self = Self(7);
    pub const A7: Self = Self(8);  pub const B7: Self = Self(9);  pub const C7: Self = Self(10); pub const D7: Self = Self(11);
    pub const E7: Self = Self(12); pub const F7: Self = Self(13); pub const G7: Self = Self(14); pub const H7: Self = Self(15);
    pub const A6: Self = Self(16); pub const B6: Self = Self(17); pub const C6: Self = Self(18); pub const D6: Self = Self(19);
    pub const E6: Self = Self(20); pub const F6: Self = Self(21); pub const G6: Self = Self(22); pub const H6: Self = Self(23);
    pub const A5: Self = Self(24); pub const B5: Self = Self(25); pub const C5: Self = Self(26); pub const D5: Self = Self(27);
    pub const E5: Self = Self(28); pub const F5: Self = Self(29); pub const G5: Self = Self(30); pub const H5: Self = Self(31);
    pub const A4: Self = Self(32); pub const B4: Self = Self(33); pub const C4: Self = Self(34); pub const D4: Self = Self(35);
    pub const E4: Self = Self(36); pub const F4: Self = Self(37); pub const G4: Self = Self(38); pub const H4: Self = Self(39);
    pub const A3: Self = Self(40); pub const B3: Self = Self(41); pub const C3: Self = Self(42); pub const D3: Self = Self(43);
    pub const E3: Self = Self(44); pub const F3: Self = Self(45); pub const G3: Self = Self(46); pub const H3: Self = Self(47);
    pub const A2: Self = Self(48); pub const B2: Self = Self(49); pub const C2: Self = Self(50); pub const D2: Self = Self(51);
    pub const E2: Self = Self(52); pub const F2: Self = Self(53); pub const G2: Self = Self(54); pub const H2: Self = Self(55);
    pub const A1: Self = Self(56); pub const B1: Self = Self(57); pub const C1: Self = Self(58); pub const D1: Self = Self(59);
    pub const E1: Self = Self(60); pub const F1: Self = Self(61); pub const G1: Self = Self(62); pub const H1: Self = Self(63);
}

impl Square {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 63;
    pub const COUNT: usize = 64;

    /// Index used to encode "no square" when a square must be written as a plain number.
    pub const NONE_INDEX: usize = 64;

    /// Returns an iterator over all squares, from a8 to h1.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A8);
    /// assert_eq!(iter.last().unwrap(), Square::H1);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// Creates a new [`Square`] from a file (`0 = a`) and a row (`0 = eighth rank`).
    ///
    /// Neither value is bounds-checked beyond a debug assertion.
    #[inline(always)]
    pub const fn new(file: u8, row: u8) -> Self {
        debug_assert!(file < 8 && row < 8, "File and row must be between [0,8)");
        Self(row * 8 + file)
    }

    /// Creates a new [`Square`] from the provided index value.
    ///
    /// Index `64` is the "no square" sentinel and yields `Ok(None)`.
    /// Anything larger is an error.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// assert_eq!(Square::from_index(36).unwrap(), Some(Square::E4));
    /// assert_eq!(Square::from_index(Square::NONE_INDEX).unwrap(), None);
    /// assert!(Square::from_index(65).is_err());
    /// ```
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Option<Self>> {
        match index {
            0..=63 => Ok(Some(Self(index as u8))),
            Self::NONE_INDEX => Ok(None),
            _ => bail!(
                "Invalid index for Square: Must be between [{}, {}]. Got {index}",
                Self::MIN,
                Self::NONE_INDEX
            ),
        }
    }

    /// Creates a new [`Square`] from the provided index value, without error checking.
    ///
    /// # Panics
    ///
    /// If `index` is greater than `63` and debug assertions are enabled.
    #[inline(always)]
    pub const fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < 64, "Index must be between [0,64)");
        Self(index as u8)
    }

    /// Converts an optional square to its index, mapping `None` to [`Square::NONE_INDEX`].
    #[inline(always)]
    pub const fn index_of(square: Option<Self>) -> usize {
        match square {
            Some(square) => square.index(),
            None => Self::NONE_INDEX,
        }
    }

    /// Fetches the inner index of this [`Square`] as a `usize`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// The file of this [`Square`], where `0` is the a-file and `7` is the h-file.
    #[inline(always)]
    pub const fn file(&self) -> u8 {
        self.0 % 8
    }

    /// The row of this [`Square`] counted from the top of the board, so the eighth rank is row `0`.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / 8
    }

    /// The rank of this [`Square`] as printed on a board, `1..=8`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// assert_eq!(Square::E4.rank(), 4);
    /// assert_eq!(Square::A8.rank(), 8);
    /// ```
    #[inline(always)]
    pub const fn rank(&self) -> u8 {
        8 - self.row()
    }

    /// Attempt to offset this [`Square`] by a file and row delta.
    ///
    /// A positive `row_delta` moves towards the first rank (south).
    /// Returns `None` if the result would fall off the board.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// assert_eq!(Square::C4.offset(1, -1), Some(Square::D5));
    /// assert_eq!(Square::C4.offset(-1, 1), Some(Square::B3));
    /// assert_eq!(Square::A1.offset(-1, 0), None);
    /// assert_eq!(Square::H8.offset(0, -1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, file_delta: i8, row_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let row = self.row() as i8 + row_delta;

        if file < 0 || file > 7 || row < 0 || row > 7 {
            None
        } else {
            Some(Self::new(file as u8, row as u8))
        }
    }

    /// The square a pawn of `color` passes over when it double-pushes from `self`.
    ///
    /// Only meaningful when `self` is on that color's second rank.
    #[inline(always)]
    pub const fn passed_over(&self, color: Color) -> Self {
        match color {
            Color::White => Self(self.0 - 8),
            Color::Black => Self(self.0 + 8),
        }
    }

    /// Creates a [`Square`] from a string in algebraic notation, such as `e4`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// let c4 = Square::from_algebraic("c4");
    /// assert!(c4.is_ok());
    /// assert_eq!(c4.unwrap(), Square::C4);
    ///
    /// let err = Square::from_algebraic("z0");
    /// assert!(err.is_err());
    /// ```
    pub fn from_algebraic(square: &str) -> Result<Self> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}")
        }

        let file = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            _ => bail!("Invalid file for Square: Must be between [a, h]. Got {square:?}"),
        };

        let rank = match bytes[1] {
            b @ b'1'..=b'8' => b - b'0',
            _ => bail!("Invalid rank for Square: Must be between [1, 8]. Got {square:?}"),
        };

        Ok(Self::new(file, 8 - rank))
    }

    /// Parses an optional square, where `-` means "no square".
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// assert_eq!(Square::parse_optional("-").unwrap(), None);
    /// assert_eq!(Square::parse_optional("e3").unwrap(), Some(Square::E3));
    /// assert!(Square::parse_optional("e9").is_err());
    /// ```
    pub fn parse_optional(square: &str) -> Result<Option<Self>> {
        if square == "-" {
            Ok(None)
        } else {
            Self::from_algebraic(square).map(Some)
        }
    }

    /// Converts this [`Square`] to a string in algebraic notation.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Square;
    /// assert_eq!("c4", Square::C4.to_algebraic());
    /// assert_eq!("h1", Square::H1.to_algebraic());
    /// ```
    #[inline(always)]
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file()) as char, self.rank())
    }

    /// Alias for [`Bitboard::from_square`].
    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_square(*self)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Wrapper for [`Square::from_algebraic`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_algebraic(s)
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    /// A [`Square`] can be used to index into an array of 64 elements.
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    /// A [`Square`] can be used to mutably index into an array of 64 elements.
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_algebraic().fmt(f)
    }
}

impl fmt::Debug for Square {
    /// Displays the algebraic name along with the internal index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_algebraic(), self.0)
    }
}
