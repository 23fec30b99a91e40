/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

use super::{
    king_home, legal_moves, AttackTables, Bitboard, CastlingSide, Color, Move, Piece, PieceKind,
    Square, FEN_STARTPOS,
};

/// Every piece of a single color, one [`Bitboard`] per [`PieceKind`].
///
/// `occupied` is the union of the six piece boards and is rebuilt by [`PieceSet::recompute`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceSet {
    occupied: Bitboard,
    pieces: [Bitboard; PieceKind::COUNT],
}

impl PieceSet {
    /// Every square holding one of these pieces.
    #[inline(always)]
    pub const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Every square holding a piece of `kind`.
    #[inline(always)]
    pub const fn kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind as usize]
    }

    /// The [`PieceKind`] on `square`, if any.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        if !self.occupied.contains(square) {
            return None;
        }

        PieceKind::all()
            .into_iter()
            .find(|&kind| self.pieces[kind].contains(square))
    }

    #[inline(always)]
    fn place(&mut self, kind: PieceKind, square: Square) {
        self.pieces[kind].set(square);
    }

    #[inline(always)]
    fn remove(&mut self, kind: PieceKind, square: Square) {
        self.pieces[kind].clear(square);
    }

    /// Rebuilds `occupied` from the six piece boards.
    #[inline(always)]
    fn recompute(&mut self) {
        self.occupied = self
            .pieces
            .iter()
            .fold(Bitboard::EMPTY_BOARD, |occupied, &pieces| occupied | pieces);
    }
}

/// Represents the full state of a game: pieces, castling rights, side to move, en passant and move counters.
///
/// Moves are applied in place with [`Position::make`] and reverted with [`Position::unmake`].
/// Each call to `make` pushes the prior state onto an owned chain of snapshots.
#[derive(Clone)]
pub struct Position {
    /// Pieces of each color.
    sides: [PieceSet; Color::COUNT],

    /// Revoked castling rights for each color.
    ///
    /// A set bit on a castling destination (g1/c1 for White, g8/c8 for Black) means that right is gone.
    castling: [Bitboard; Color::COUNT],

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Square passed over by a Pawn that just pushed two squares.
    ep_target: Option<Square>,

    /// Used to enforce the fifty-move rule.
    ///
    /// - Incremented after each move.
    /// - Reset after a capture or a pawn moves.
    halfmove: usize,

    /// Number of moves since the beginning of the game.
    ///
    /// A fullmove is a complete turn by white and then by black.
    fullmove: usize,

    /// The state before the last move was made.
    previous: Option<Box<Position>>,
}

impl Position {
    /// Creates a new, empty [`Position`] with the following properties:
    /// * No pieces on the board
    /// * White moves first
    /// * No castling rights
    /// * No en passant square available
    /// * Halfmove counter set to 0
    /// * Fullmove counter set to 1
    ///
    /// # Example
    /// ```
    /// # use rayfish::Position;
    /// let state = Position::new();
    /// assert_eq!(state.to_fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    /// ```
    pub fn new() -> Self {
        let revoked = |color: Color| {
            CastlingSide::ALL
                .into_iter()
                .map(|side| side.king_destination(color))
                .collect::<Bitboard>()
        };

        Self {
            sides: [PieceSet::default(); Color::COUNT],
            castling: [revoked(Color::White), revoked(Color::Black)],
            side_to_move: Color::White,
            ep_target: None,
            halfmove: 0,
            fullmove: 1,
            previous: None,
        }
    }

    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// The half-move clock and full-move number may be omitted, in which case they default to `0` and `1`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Color, Position, Square};
    /// let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3").unwrap();
    /// assert_eq!(pos.side_to_move(), Color::Black);
    /// assert_eq!(pos.ep_target(), Some(Square::E3));
    /// assert_eq!(pos.fullmove(), 1);
    ///
    /// assert!(Position::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let fields = fen.split_whitespace().collect::<Vec<_>>();
        if !(4..=6).contains(&fields.len()) {
            bail!(
                "FEN string must have between 4 and 6 fields. Got {} in {fen:?}",
                fields.len()
            );
        }

        let mut pos = Self::new();
        pos.parse_placements(fields[0])?;

        pos.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            side => bail!("FEN side to move must be either \"w\" or \"b\". Got {side:?}"),
        };

        pos.parse_castling(fields[2])?;

        pos.ep_target = Square::parse_optional(fields[3])
            .with_context(|| format!("FEN en passant target is not a square: {:?}", fields[3]))?;

        if let Some(halfmove) = fields.get(4) {
            pos.halfmove = halfmove.parse().map_err(|_| {
                anyhow!("FEN string must have valid halfmove counter. Got {halfmove:?}")
            })?;
        }

        if let Some(fullmove) = fields.get(5) {
            pos.fullmove = fullmove.parse().map_err(|_| {
                anyhow!("FEN string must have valid fullmove counter. Got {fullmove:?}")
            })?;
        }

        Ok(pos)
    }

    fn parse_placements(&mut self, placements: &str) -> Result<()> {
        let rows = placements.split('/').collect::<Vec<_>>();
        if rows.len() != 8 {
            bail!(
                "FEN must have piece placements for all 8 ranks. Got {} in {placements:?}",
                rows.len()
            );
        }

        // The first row of a FEN string is the eighth rank, which is also row 0 here
        for (row, text) in rows.into_iter().enumerate() {
            let mut file = 0usize;

            for c in text.chars() {
                if let Some(empty) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    file += empty as usize;
                } else {
                    let piece = Piece::from_char(c).with_context(|| {
                        format!("FEN placements must contain piece chars or digits. Got {c:?}")
                    })?;
                    if file >= 8 {
                        bail!("FEN rank {:?} describes more than 8 files", text);
                    }

                    let square = Square::new(file as u8, row as u8);
                    self.sides[piece.color()].place(piece.kind(), square);
                    file += 1;
                }
            }

            if file != 8 {
                bail!("FEN rank {text:?} must describe exactly 8 files. Got {file}");
            }
        }

        for side in self.sides.iter_mut() {
            side.recompute();
        }

        Ok(())
    }

    fn parse_castling(&mut self, castling: &str) -> Result<()> {
        if castling == "-" {
            return Ok(());
        }

        if castling.is_empty() {
            bail!("FEN castling rights must be \"-\" or a subset of \"KQkq\"");
        }

        for c in castling.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastlingSide::KingSide),
                'Q' => (Color::White, CastlingSide::QueenSide),
                'k' => (Color::Black, CastlingSide::KingSide),
                'q' => (Color::Black, CastlingSide::QueenSide),
                _ => bail!("FEN castling rights must be \"-\" or a subset of \"KQkq\". Got {castling:?}"),
            };

            let destination = side.king_destination(color);
            if !self.castling[color].contains(destination) {
                bail!("FEN castling rights contain {c:?} more than once. Got {castling:?}");
            }
            self.castling[color].clear(destination);
        }

        Ok(())
    }

    /// Generates a FEN string of this [`Position`].
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Position, FEN_KIWIPETE};
    /// let pos = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(pos.to_fen(), FEN_KIWIPETE);
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(64);

        for row in 0..8 {
            let mut empty = 0;
            for file in 0..8 {
                if let Some(piece) = self.piece_at(Square::new(file, row)) {
                    if empty != 0 {
                        placements += &empty.to_string();
                        empty = 0;
                    }
                    placements.push(piece.char());
                } else {
                    empty += 1;
                }
            }

            if empty != 0 {
                placements += &empty.to_string();
            }
            if row != 7 {
                placements.push('/');
            }
        }

        let ep = self
            .ep_target
            .map(|square| square.to_string())
            .unwrap_or(String::from("-"));

        format!(
            "{placements} {} {} {ep} {} {}",
            self.side_to_move.char(),
            self.castling_rights_fen(),
            self.halfmove,
            self.fullmove
        )
    }

    /// The castling field of this position's FEN string.
    pub fn castling_rights_fen(&self) -> String {
        let rights = Color::all()
            .into_iter()
            .flat_map(|color| CastlingSide::ALL.map(|side| (color, side)))
            .filter(|&(color, side)| self.has_castling_right(color, side))
            .map(|(color, side)| side.char(color))
            .collect::<String>();

        if rights.is_empty() {
            String::from("-")
        } else {
            rights
        }
    }

    /// The [`Color`] of the current player.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The en passant target square, if the last move was a two-square Pawn push.
    #[inline(always)]
    pub const fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }

    /// The half-move clock.
    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    /// The full-move number.
    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// The pieces of `color`.
    #[inline(always)]
    pub const fn side(&self, color: Color) -> &PieceSet {
        &self.sides[color as usize]
    }

    /// Squares holding a piece of `color` and `kind`.
    #[inline(always)]
    pub const fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.side(color).kind(kind)
    }

    /// Every occupied square, of either color.
    #[inline(always)]
    pub const fn occupied(&self) -> Bitboard {
        self.sides[0].occupied().or(self.sides[1].occupied())
    }

    /// The square of `color`'s King, if it has one.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).lsb()
    }

    /// The [`Piece`] on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Color::all().into_iter().find_map(|color| {
            self.sides[color]
                .kind_at(square)
                .map(|kind| Piece::new(color, kind))
        })
    }

    /// Revoked castling rights of `color`, as a [`Bitboard`] of castling destinations.
    #[inline(always)]
    pub const fn castling_revoked(&self, color: Color) -> Bitboard {
        self.castling[color as usize]
    }

    /// Returns `true` if `color` may still castle towards `side`.
    #[inline(always)]
    pub const fn has_castling_right(&self, color: Color, side: CastlingSide) -> bool {
        !self.castling_revoked(color).contains(side.king_destination(color))
    }

    /// Returns `true` if there is a prior state to return to with [`Position::unmake`].
    #[inline(always)]
    pub const fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// If `mv` is a castling move for the side to move, returns the side it castles towards.
    pub fn castling_side(&self, mv: Move) -> Option<CastlingSide> {
        let us = self.side_to_move;
        if mv.from() != king_home(us) || !self.pieces(us, PieceKind::King).contains(mv.from()) {
            return None;
        }

        CastlingSide::ALL
            .into_iter()
            .find(|side| side.king_destination(us) == mv.to())
    }

    /// A copy of this position with no undo history.
    pub fn detached(&self) -> Self {
        Self {
            previous: None,
            ..self.snapshot_fields()
        }
    }

    #[inline(always)]
    fn snapshot_fields(&self) -> Self {
        Self {
            sides: self.sides,
            castling: self.castling,
            side_to_move: self.side_to_move,
            ep_target: self.ep_target,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            previous: None,
        }
    }

    /// Applies `mv` to this position, remembering the prior state so that [`Position::unmake`] can restore it.
    ///
    /// `mv` must be pseudo-legal. Whether it leaves the mover's King in check is not examined here.
    ///
    /// # Panics
    ///
    /// If the side to move has no piece on the origin square of `mv`.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{Move, Position, Square};
    /// let mut pos = Position::default();
    /// pos.make(Move::new(Square::E2, Square::E4));
    /// assert_eq!(pos.ep_target(), Some(Square::E3));
    /// pos.unmake();
    /// assert_eq!(pos, Position::default());
    /// ```
    pub fn make(&mut self, mv: Move) {
        let mut snapshot = self.snapshot_fields();
        snapshot.previous = self.previous.take();
        self.previous = Some(Box::new(snapshot));

        let (from, to) = (mv.from(), mv.to());
        let us = self.side_to_move;
        let them = us.opponent();

        let Some(kind) = self.sides[us].kind_at(from) else {
            panic!("Cannot make {mv}: {} has no piece on {from}", us.name());
        };
        let captured = self.sides[them].kind_at(to);
        let ep_target = self.ep_target.take();

        self.sides[us].remove(kind, from);
        let landed = mv.promotion().map(|p| p.kind()).unwrap_or(kind);
        self.sides[us].place(landed, to);

        match kind {
            PieceKind::King => {
                if let Some(side) = self.castling_side_of(us, from, to) {
                    let rook_from = side.rook_origin(us);
                    let rook_to = side.king_transit(us);
                    self.sides[us].remove(PieceKind::Rook, rook_from);
                    self.sides[us].place(PieceKind::Rook, rook_to);
                }

                for side in CastlingSide::ALL {
                    self.castling[us].set(side.king_destination(us));
                }
            }

            PieceKind::Rook => {
                for side in CastlingSide::ALL {
                    if from == side.rook_origin(us) {
                        self.castling[us].set(side.king_destination(us));
                    }
                }
            }

            PieceKind::Pawn => {
                if from.row().abs_diff(to.row()) == 2 {
                    self.ep_target = Some(from.passed_over(us));
                } else if Some(to) == ep_target && from.file() != to.file() {
                    // The captured Pawn sits one row behind the target, from the mover's view
                    let victim = to.passed_over(them);
                    self.sides[them].remove(PieceKind::Pawn, victim);
                }
            }

            _ => {}
        }

        if let Some(captured) = captured {
            self.sides[them].remove(captured, to);

            if captured == PieceKind::Rook {
                for side in CastlingSide::ALL {
                    if to == side.rook_origin(them) {
                        self.castling[them].set(side.king_destination(them));
                    }
                }
            }
        }

        if kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove = self.halfmove.saturating_add(1);
        }

        if us == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }

        self.sides[us].recompute();
        self.sides[them].recompute();
        self.side_to_move = them;
    }

    /// Castling side of a King move by `color` from `from` to `to`, if it is a two-file move from the home square.
    fn castling_side_of(&self, color: Color, from: Square, to: Square) -> Option<CastlingSide> {
        if from != king_home(color) || from.file().abs_diff(to.file()) != 2 {
            return None;
        }

        CastlingSide::from_destination(to)
    }

    /// Restores the state from before the last [`Position::make`].
    ///
    /// # Panics
    ///
    /// If no move has been made. See [`Position::try_unmake`] for a fallible version.
    pub fn unmake(&mut self) {
        match self.previous.take() {
            Some(previous) => *self = *previous,
            None => panic!("Cannot unmake: no move has been made on this position"),
        }
    }

    /// Restores the state from before the last [`Position::make`], or returns an error if there is none.
    ///
    /// # Example
    /// ```
    /// # use rayfish::Position;
    /// let mut pos = Position::default();
    /// assert!(pos.try_unmake().is_err());
    /// ```
    pub fn try_unmake(&mut self) -> Result<()> {
        let previous = self
            .previous
            .take()
            .ok_or(anyhow!("There is no move to undo"))?;
        *self = *previous;
        Ok(())
    }

    /// Resolves move text (such as `e2e4` or `e7e8q`) against the legal moves of this position.
    ///
    /// The position is left untouched either way.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{AttackTables, Position};
    /// let tables = AttackTables::new();
    /// let pos = Position::default();
    /// assert!(pos.find_legal_move(&tables, "g1f3").is_ok());
    /// assert!(pos.find_legal_move(&tables, "e2e5").is_err());
    /// ```
    pub fn find_legal_move(&self, tables: &AttackTables, text: &str) -> Result<Move> {
        let not_legal = || anyhow!("{:?} is not a legal move in this position", text.trim());

        let mv = Move::from_text(text).map_err(|_| not_legal())?;

        let mut scratch = self.detached();
        legal_moves(tables, &mut scratch)
            .into_iter()
            .find(|legal| *legal == mv)
            .ok_or_else(not_legal)
    }
}

impl PartialEq for Position {
    /// Positions are equal when their game state is, regardless of how they were reached.
    fn eq(&self, other: &Self) -> bool {
        self.sides == other.sides
            && self.castling == other.castling
            && self.side_to_move == other.side_to_move
            && self.ep_target == other.ep_target
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
    }
}

impl Eq for Position {}

impl FromStr for Position {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Position {
    /// The standard starting position.
    #[inline(always)]
    fn default() -> Self {
        // Safety: The FEN for startpos is always valid
        unsafe { Self::from_fen(FEN_STARTPOS).unwrap_unchecked() }
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{}|", 8 - row)?;
            for file in 0..8 {
                let piece = self.piece_at(Square::new(file, row));
                write!(f, " {}", piece.map(|p| p.char()).unwrap_or('.'))?;
            }

            match row {
                1 => write!(f, "           FEN: {}", self.to_fen())?,
                2 => write!(f, "          Side: {}", self.side_to_move.name())?,
                3 => write!(f, "      Castling: {}", self.castling_rights_fen())?,
                4 => {
                    let ep = self
                        .ep_target
                        .map(|t| t.to_string())
                        .unwrap_or(String::from("-"));
                    write!(f, "            EP: {ep}")?
                }
                5 => write!(f, "     Half-move: {}", self.halfmove)?,
                6 => write!(f, "     Full-move: {}", self.fullmove)?,
                _ => {}
            }
            writeln!(f)?;
        }
        write!(f, " +----------------\n   a b c d e f g h")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FEN_KIWIPETE;

    #[test]
    fn test_fen_round_trip() {
        let fens = [
            FEN_STARTPOS,
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 12 40",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
            assert_eq!(Position::from_fen(&pos.to_fen()).unwrap(), pos);
        }
    }

    #[test]
    fn test_fen_rejects_garbage() {
        let fens = [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 y",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
        ];
        for fen in fens {
            assert!(Position::from_fen(fen).is_err(), "{fen:?}");
        }
    }

    #[test]
    fn test_fen_counters_default() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(pos.halfmove(), 0);
        assert_eq!(pos.fullmove(), 1);
    }

    #[test]
    fn test_occupied_is_union() {
        let pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        for color in Color::all() {
            let union = PieceKind::all()
                .into_iter()
                .fold(Bitboard::EMPTY_BOARD, |bb, kind| bb | pos.pieces(color, kind));
            assert_eq!(pos.side(color).occupied(), union);
        }
    }

    #[test]
    fn test_castling_moves_rook_and_revokes_rights() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make(Move::new(Square::E1, Square::G1));
        assert!(pos.pieces(Color::White, PieceKind::Rook).contains(Square::F1));
        assert!(!pos.pieces(Color::White, PieceKind::Rook).contains(Square::H1));
        assert_eq!(pos.castling_rights_fen(), "kq");

        pos.make(Move::new(Square::E8, Square::C8));
        assert!(pos.pieces(Color::Black, PieceKind::Rook).contains(Square::D8));
        assert!(!pos.pieces(Color::Black, PieceKind::Rook).contains(Square::A8));
        assert_eq!(pos.castling_rights_fen(), "-");
        assert_eq!(pos.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn test_rook_move_revokes_one_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make(Move::new(Square::A1, Square::A2));
        assert_eq!(pos.castling_rights_fen(), "Kkq");
        pos.make(Move::new(Square::H8, Square::H7));
        assert_eq!(pos.castling_rights_fen(), "Kq");
    }

    #[test]
    fn test_rook_capture_revokes_victims_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make(Move::new(Square::A1, Square::A8));
        assert_eq!(pos.castling_rights_fen(), "Kk");
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2")
                .unwrap();
        pos.make(Move::new(Square::F7, Square::F5));
        assert_eq!(pos.ep_target(), Some(Square::F6));

        pos.make(Move::new(Square::E5, Square::F6));
        assert_eq!(pos.ep_target(), None);
        assert!(!pos.occupied().contains(Square::F5));
        assert_eq!(pos.piece_at(Square::F6).unwrap().char(), 'P');
        assert_eq!(pos.halfmove(), 0);
    }

    #[test]
    fn test_promotion_replaces_pawn() {
        let mut pos = Position::from_fen("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1").unwrap();
        pos.make(Move::with_promotion(
            Square::G2,
            Square::H1,
            crate::Promotion::Knight,
        ));
        assert_eq!(pos.piece_at(Square::H1).unwrap().char(), 'n');
        assert!(pos.pieces(Color::Black, PieceKind::Pawn).population() == 2);
        assert!(pos.pieces(Color::White, PieceKind::Knight).population() == 1);
    }

    #[test]
    fn test_make_unmake_restores_everything() {
        let original = Position::from_fen(FEN_KIWIPETE).unwrap();
        let mut pos = original.clone();
        pos.make(Move::new(Square::E1, Square::C1));
        pos.make(Move::new(Square::H3, Square::G2));
        pos.make(Move::new(Square::D5, Square::E6));
        assert_ne!(pos, original);

        pos.unmake();
        pos.unmake();
        pos.unmake();
        assert_eq!(pos, original);
        assert_eq!(pos.to_fen(), FEN_KIWIPETE);
        assert!(!pos.has_previous());
    }

    #[test]
    fn test_counters_saturate() {
        let fen = format!("4k3/8/8/8/8/8/8/4K3 b - - {} {}", usize::MAX, usize::MAX);
        let mut pos = Position::from_fen(&fen).unwrap();
        pos.make(Move::new(Square::E8, Square::D8));
        assert_eq!(pos.halfmove(), usize::MAX);
        assert_eq!(pos.fullmove(), usize::MAX);

        pos.unmake();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    #[should_panic(expected = "no move has been made")]
    fn test_unmake_without_history_panics() {
        Position::default().unmake();
    }

    #[test]
    fn test_counters() {
        let mut pos = Position::default();
        pos.make(Move::new(Square::G1, Square::F3));
        assert_eq!((pos.halfmove(), pos.fullmove()), (1, 1));
        pos.make(Move::new(Square::G8, Square::F6));
        assert_eq!((pos.halfmove(), pos.fullmove()), (2, 2));
        pos.make(Move::new(Square::E2, Square::E4));
        assert_eq!((pos.halfmove(), pos.fullmove()), (0, 2));
    }
}
