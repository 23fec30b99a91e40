/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{value_of, Color, Piece, PieceKind, Square};

/// Piece-Square tables from the [Simplified Evaluation Function](https://www.chessprogramming.org/Simplified_Evaluation_Function).
///
/// Each table is written from White's perspective, with a8 in the top-left, which is also how squares are indexed.
#[rustfmt::skip]
const PAWN: Psqt = Psqt::new(PieceKind::Pawn, [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
]);

#[rustfmt::skip]
const KNIGHT: Psqt = Psqt::new(PieceKind::Knight, [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
]);

#[rustfmt::skip]
const BISHOP: Psqt = Psqt::new(PieceKind::Bishop, [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
]);

/// Rooks and Queens are valued by material alone.
const ROOK: Psqt = Psqt::new(PieceKind::Rook, [0; Square::COUNT]);

const QUEEN: Psqt = Psqt::new(PieceKind::Queen, [0; Square::COUNT]);

#[rustfmt::skip]
const KING: Psqt = Psqt::new(PieceKind::King, [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
]);

/// A Piece-Square Table: the material value of a piece plus a bonus for the square it stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Psqt([i32; Square::COUNT]);

impl Psqt {
    /// Fetch the table for `kind`.
    #[inline(always)]
    pub const fn of(kind: PieceKind) -> &'static Self {
        match kind {
            PieceKind::Pawn => &PAWN,
            PieceKind::Knight => &KNIGHT,
            PieceKind::Bishop => &BISHOP,
            PieceKind::Rook => &ROOK,
            PieceKind::Queen => &QUEEN,
            PieceKind::King => &KING,
        }
    }

    /// Value of `piece` standing on `square`, always positive.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Piece, Psqt, Square};
    /// let white = Psqt::value(Piece::from_char('N').unwrap(), Square::F3);
    /// let black = Psqt::value(Piece::from_char('n').unwrap(), Square::F6);
    /// assert_eq!(white, black);
    /// assert_eq!(white, 320 + 10);
    /// ```
    #[inline(always)]
    pub const fn value(piece: Piece, square: Square) -> i32 {
        Self::of(piece.kind()).get_relative(square, piece.color())
    }

    /// Creates a new [`Psqt`] for the provided [`PieceKind`] and array of bonuses, folding in the value of the piece.
    const fn new(kind: PieceKind, psqt: [i32; Square::COUNT]) -> Self {
        let mut values = psqt;

        let mut i = 0;
        while i < psqt.len() {
            values[i] = psqt[i] + value_of(kind);
            i += 1;
        }

        Self(values)
    }

    /// Get the value of this PSQT at the provided square, from White's perspective.
    #[inline(always)]
    pub const fn get(&self, square: Square) -> i32 {
        self.0[square.index()]
    }

    /// Get the value of this PSQT at the provided square, relative to `color`.
    ///
    /// Black's tables are White's with the rows flipped.
    #[inline(always)]
    pub const fn get_relative(&self, square: Square, color: Color) -> i32 {
        match color {
            Color::White => self.get(square),
            Color::Black => self.0[square.index() ^ 56],
        }
    }
}

impl fmt::Display for Psqt {
    /// Printing a [`Psqt`] will display it in the same way it is written in the code (White's perspective).
    ///
    /// If the alternate formatter is used (`#`), it will print as if from Black's perspective.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = if f.alternate() {
            Color::Black
        } else {
            Color::White
        };

        for square in Square::iter() {
            if square.file() == 0 {
                write!(f, "{}| ", square.rank())?;
            }
            write!(f, "{:5} ", self.get_relative(square, color))?;
            if square.file() == 7 {
                writeln!(f)?;
            }
        }

        write!(f, " +")?;
        for _ in 0..8 {
            write!(f, "------")?;
        }
        write!(f, "\n   ")?;
        for file in 'a'..='h' {
            write!(f, "  {file}   ")?;
        }

        Ok(())
    }
}
