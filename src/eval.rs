/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Color, PieceKind, Position, Psqt, Score, Square};

/// Bonus for a side that still owns both of its Bishops.
pub const BISHOP_PAIR_BONUS: i32 = 15;

/// Encapsulates the logic of scoring a chess position.
///
/// A high score is good for White, and a low score is good for Black, regardless of whose turn it is.
pub trait Evaluator {
    /// Static evaluation of `position`, from White's perspective.
    fn evaluate(&self, position: &Position) -> Score;
}

/// Material plus piece-square bonuses, with a small bonus for the bishop pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PsqtEvaluator;

impl PsqtEvaluator {
    /// Sum of every `color` piece's [`Psqt`] value, plus the bishop pair bonus.
    fn side_total(position: &Position, color: Color) -> i32 {
        let pieces = PieceKind::all().into_iter().fold(0, |total, kind| {
            let table = Psqt::of(kind);
            position
                .pieces(color, kind)
                .into_iter()
                .fold(total, |total, square| {
                    total + table.get_relative(square, color)
                })
        });

        if position.pieces(color, PieceKind::Bishop).population() > 1 {
            pieces + BISHOP_PAIR_BONUS
        } else {
            pieces
        }
    }

    /// A printable table of what every piece in `position` contributes to the evaluation.
    pub fn breakdown(self, position: &Position) -> EvalBreakdown<'_> {
        EvalBreakdown {
            evaluator: self,
            position,
        }
    }
}

impl Evaluator for PsqtEvaluator {
    /// # Example
    /// ```
    /// # use rayfish::{Evaluator, Position, PsqtEvaluator, Score};
    /// assert_eq!(PsqtEvaluator.evaluate(&Position::default()), Score::DRAW);
    ///
    /// let balanced = Position::from_fen("3qk3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
    /// assert_eq!(PsqtEvaluator.evaluate(&balanced), Score::DRAW);
    ///
    /// let no_black_queen = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
    /// assert!(PsqtEvaluator.evaluate(&no_black_queen) > Score::new(800));
    /// ```
    fn evaluate(&self, position: &Position) -> Score {
        Score::new(
            Self::side_total(position, Color::White) - Self::side_total(position, Color::Black),
        )
    }
}

/// Display adapter returned by [`PsqtEvaluator::breakdown`].
pub struct EvalBreakdown<'a> {
    evaluator: PsqtEvaluator,
    position: &'a Position,
}

impl fmt::Display for EvalBreakdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divider = |f: &mut fmt::Formatter<'_>| {
            write!(f, "  +")?;
            for _ in 0..8 {
                write!(f, "-----+")?;
            }
            writeln!(f)
        };

        divider(f)?;
        for row in 0..8u8 {
            write!(f, "{} |", 8 - row)?;

            // Step 1: Write the piece char
            for file in 0..8 {
                let piece = self.position.piece_at(Square::new(file, row));
                let piece_char = piece.map(|p| p.char()).unwrap_or(' ');
                write!(f, "  {piece_char}  |")?;
            }
            writeln!(f)?;
            write!(f, "  |")?;

            // Step 2: Write the contribution of that piece, in pawns
            for file in 0..8 {
                let cell = match self.position.piece_at(Square::new(file, row)) {
                    Some(piece) => {
                        let value = Psqt::value(piece, Square::new(file, row));
                        let signed = match piece.color() {
                            Color::White => Score::new(value),
                            Color::Black => Score::new(-value),
                        };
                        format!("{:^+5.1}", signed.normalize())
                    }
                    None => String::from("     "),
                };
                write!(f, "{cell}|")?;
            }
            writeln!(f)?;
            divider(f)?;
        }
        for file in 'a'..='h' {
            write!(f, "     {file}")?;
        }

        let score = self.evaluator.evaluate(self.position);
        let winning_side = if score > Score::DRAW {
            Color::White.name()
        } else if score < Score::DRAW {
            Color::Black.name()
        } else {
            "N/A"
        };

        writeln!(f, "\n\nWinning side: {winning_side}")?;
        write!(f, "Score: {score}")
    }
}

/// Returns a value of the provided `PieceKind`.
///
/// The King's value dwarfs everything else, so losing it outweighs any amount of material.
#[inline(always)]
pub const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 510,
        PieceKind::Queen => 890,
        PieceKind::King => 20_000,
    }
}
