/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::{PieceKind, Square, MAX_NUM_MOVES};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// A piece a Pawn may promote to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Every promotion, in the order the move generator emits them.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// The [`PieceKind`] the Pawn becomes.
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        match self {
            Self::Queen => PieceKind::Queen,
            Self::Rook => PieceKind::Rook,
            Self::Bishop => PieceKind::Bishop,
            Self::Knight => PieceKind::Knight,
        }
    }

    /// Parses a promotion letter, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Promotion;
    /// assert_eq!(Promotion::from_char('Q').unwrap(), Promotion::Queen);
    /// assert_eq!(Promotion::from_char('n').unwrap(), Promotion::Knight);
    /// assert!(Promotion::from_char('k').is_err());
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("Invalid promotion {c:?}: Must be one of q, r, b, n"),
        }
    }

    /// The lowercase letter of this promotion.
    #[inline(always)]
    pub const fn char(&self) -> char {
        self.kind().char()
    }
}

impl fmt::Debug for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind().name())
    }
}

/// A move from one [`Square`] to another, with an optional [`Promotion`].
///
/// Castling is a King move of two files, and en passant is a Pawn capture onto the en passant target.
/// The [`crate::Position`] the move is played on works out the rest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
}

impl Move {
    /// Creates a new, non-promoting [`Move`].
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Move, Square};
    /// let e2e4 = Move::new(Square::E2, Square::E4);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new promoting [`Move`].
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Move, Promotion, Square};
    /// let white = Move::with_promotion(Square::E7, Square::E8, Promotion::Knight);
    /// assert_eq!(white.to_string(), "e7e8N");
    ///
    /// let black = Move::with_promotion(Square::B2, Square::A1, Promotion::Queen);
    /// assert_eq!(black.to_string(), "b2a1q");
    /// ```
    #[inline(always)]
    pub const fn with_promotion(from: Square, to: Square, promotion: Promotion) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// The origin [`Square`] of this move.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// The destination [`Square`] of this move.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The [`Promotion`] of this move, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// Returns `true` if this move promotes a Pawn.
    #[inline(always)]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Parses a move written as origin, destination and an optional promotion letter, such as `e7e8q`.
    ///
    /// The promotion letter may be in either case.
    /// This only checks the text. See [`crate::Position::find_legal_move`] to check it against a position.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Move, Promotion, Square};
    /// assert_eq!(Move::from_text("g1f3").unwrap(), Move::new(Square::G1, Square::F3));
    /// assert_eq!(
    ///     Move::from_text("a7a8Q").unwrap(),
    ///     Move::with_promotion(Square::A7, Square::A8, Promotion::Queen)
    /// );
    /// assert!(Move::from_text("a7a8x").is_err());
    /// assert!(Move::from_text("e2").is_err());
    /// ```
    pub fn from_text(text: &str) -> Result<Self> {
        let text = text.trim();
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            bail!("Invalid move {text:?}: Expected an origin, a destination and an optional promotion, such as \"e7e8q\"");
        }

        let from = Square::from_algebraic(&text[0..2])?;
        let to = Square::from_algebraic(&text[2..4])?;

        let promotion = text
            .chars()
            .nth(4)
            .map(Promotion::from_char)
            .transpose()?;

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    /// Wrapper for [`Move::from_text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl fmt::Display for Move {
    /// Promotions onto the eighth rank print an uppercase letter, and onto the first rank a lowercase one.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            let c = promotion.char();
            if self.to.rank() == 8 {
                write!(f, "{}", c.to_ascii_uppercase())
            } else {
                write!(f, "{c}")
            }
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    /// A [`Move`] equals its text, ignoring the case of a promotion letter.
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_string().eq_ignore_ascii_case(other.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_move_text_round_trip() {
        for text in ["e2e4", "g8f6", "e1g1", "a7a8Q", "h2h1n", "b7c8R"] {
            assert_eq!(Move::from_text(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_move_text_accepts_either_case() {
        let upper = Move::from_text("d7d8B").unwrap();
        let lower = Move::from_text("d7d8b").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.promotion(), Some(Promotion::Bishop));
    }

    #[test]
    fn test_move_text_rejects_garbage() {
        for text in ["", "e2", "e2e", "e2e9", "z2e4", "e2e4qq", "e7e8k"] {
            assert!(Move::from_text(text).is_err(), "{text:?}");
        }
    }

    #[test]
    fn test_move_eq_str() {
        let mv = Move::with_promotion(Square::A2, Square::A1, Promotion::Rook);
        assert_eq!(mv, "a2a1r");
        assert_eq!(mv, "a2a1R");
        assert!(mv != "a2a1q");
    }
}
