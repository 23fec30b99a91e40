/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    king_home, AttackTables, Bitboard, CastlingSide, Color, Move, MoveList, PieceKind, Position,
    Promotion, Square,
};

/// Generates every pseudo-legal move for the side to move in `position`.
///
/// Moves obey each piece's movement rules, but may leave the mover's King in check.
/// Castling is only emitted when the right is intact and every square between King and Rook is empty.
///
/// Moves are grouped as Pawns (left captures, right captures, single pushes, double pushes),
/// then the King, Queens, Rooks, Knights and Bishops. Within a group, origins and destinations
/// appear in ascending square order.
///
/// # Example
/// ```
/// # use rayfish::{pseudo_legal_moves, AttackTables, Position};
/// let tables = AttackTables::new();
/// let moves = pseudo_legal_moves(&tables, &Position::default());
/// assert_eq!(moves.len(), 20);
/// ```
pub fn pseudo_legal_moves(tables: &AttackTables, position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move();
    let them = us.opponent();
    let own = position.side(us).occupied();
    let occupied = position.occupied();

    // Pawns
    let pawns = position.pieces(us, PieceKind::Pawn);
    let targets = position.side(them).occupied() | position.ep_target();
    let empty = !occupied;

    // Each shift is the index delta from origin to destination
    let (left, left_shift, right, right_shift, single, forward, double_rank) = match us {
        Color::White => (
            pawns.northwest(),
            -9,
            pawns.northeast(),
            -7,
            pawns.north() & empty,
            -8,
            tables.rank(4),
        ),
        Color::Black => (
            pawns.southwest(),
            7,
            pawns.southeast(),
            9,
            pawns.south() & empty,
            8,
            tables.rank(5),
        ),
    };
    let double = match us {
        Color::White => single.north(),
        Color::Black => single.south(),
    } & double_rank
        & empty;

    push_pawn_moves(&mut moves, left & targets, left_shift);
    push_pawn_moves(&mut moves, right & targets, right_shift);
    push_pawn_moves(&mut moves, single, forward);
    push_pawn_moves(&mut moves, double, forward * 2);

    // King
    for from in position.pieces(us, PieceKind::King) {
        for to in tables.king_steps(from).without(own) {
            moves.push(Move::new(from, to));
        }

        let castles = (tables.king_moves(us, from) ^ tables.king_steps(from))
            .without(position.castling_revoked(us));

        for to in castles {
            let Some(side) = CastlingSide::from_destination(to) else {
                continue;
            };

            let rook = side.rook_origin(us);
            let path_clear = (occupied & tables.castling_path(us, side)).is_empty();
            if path_clear && position.pieces(us, PieceKind::Rook).contains(rook) {
                moves.push(Move::new(from, to));
            }
        }
    }

    // Sliders and Knights
    let kinds = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
    ];
    for kind in kinds {
        for from in position.pieces(us, kind) {
            let reach = match kind {
                PieceKind::Queen => tables.queen_attacks(from, occupied),
                PieceKind::Rook => tables.rook_attacks(from, occupied),
                PieceKind::Bishop => tables.bishop_attacks(from, occupied),
                _ => tables.knight_attacks(from),
            };

            for to in reach.without(own) {
                moves.push(Move::new(from, to));
            }
        }
    }

    moves
}

/// Adds a move for every destination in `destinations`, where each origin is `shift` squares behind its destination.
///
/// Destinations on either back rank become four promotions.
fn push_pawn_moves(moves: &mut MoveList, destinations: Bitboard, shift: i8) {
    let back_ranks = Bitboard::RANK_8 | Bitboard::RANK_1;

    for to in destinations {
        let from = Square::from_index_unchecked((to.index() as i8 - shift) as usize);

        if back_ranks.contains(to) {
            for promotion in Promotion::ALL {
                moves.push(Move::with_promotion(from, to, promotion));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    }
}

/// Every square `color` attacks in `position`.
///
/// Pawns attack their forward diagonals whether or not anything stands there,
/// and sliders stop at the first occupied square (which they do attack).
///
/// # Example
/// ```
/// # use rayfish::{attacked_squares, AttackTables, Color, Position, Square};
/// let tables = AttackTables::new();
/// let attacked = attacked_squares(&tables, &Position::default(), Color::White);
/// assert!(attacked.contains(Square::E3));
/// assert!(attacked.contains(Square::F3));
/// assert!(!attacked.contains(Square::E4));
/// ```
pub fn attacked_squares(tables: &AttackTables, position: &Position, color: Color) -> Bitboard {
    let occupied = position.occupied();
    let pawns = position.pieces(color, PieceKind::Pawn);

    let mut attacked = Bitboard::EMPTY_BOARD;
    for square in pawns {
        attacked |= tables.pawn_captures(color, square);
    }

    for square in position.pieces(color, PieceKind::Knight) {
        attacked |= tables.knight_attacks(square);
    }

    for square in position.pieces(color, PieceKind::King) {
        attacked |= tables.king_steps(square);
    }

    let diagonal = position.pieces(color, PieceKind::Bishop) | position.pieces(color, PieceKind::Queen);
    for square in diagonal {
        attacked |= tables.bishop_attacks(square, occupied);
    }

    let orthogonal = position.pieces(color, PieceKind::Rook) | position.pieces(color, PieceKind::Queen);
    for square in orthogonal {
        attacked |= tables.rook_attacks(square, occupied);
    }

    attacked
}

/// Returns `true` if `color`'s King is attacked in `position`.
///
/// A side with no King is never in check.
pub fn is_in_check(tables: &AttackTables, position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| attacked_squares(tables, position, color.opponent()).contains(king))
}

/// Makes `mv` on `position` if it does not leave the mover's King attacked.
///
/// A castling move is also refused when the King is in check or would pass over an attacked square.
/// Returns `true` if the move was made, in which case the caller must [`Position::unmake`] it.
/// On `false`, `position` is left as it was.
pub fn make_if_legal(tables: &AttackTables, position: &mut Position, mv: Move) -> bool {
    let us = position.side_to_move();

    if let Some(side) = position.castling_side(mv) {
        let attacked = attacked_squares(tables, position, us.opponent());
        if attacked.contains(king_home(us)) || attacked.contains(side.king_transit(us)) {
            return false;
        }
    }

    position.make(mv);
    if is_in_check(tables, position, us) {
        position.unmake();
        return false;
    }

    true
}

/// Generates every legal move for the side to move in `position`.
///
/// `position` is borrowed mutably to try each move, and is restored before this returns.
///
/// # Example
/// ```
/// # use rayfish::{legal_moves, AttackTables, Position, FEN_KIWIPETE};
/// let tables = AttackTables::new();
/// let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
/// assert_eq!(legal_moves(&tables, &mut pos).len(), 48);
/// ```
pub fn legal_moves(tables: &AttackTables, position: &mut Position) -> MoveList {
    pseudo_legal_moves(tables, position)
        .into_iter()
        .filter(|&mv| {
            let legal = make_if_legal(tables, position, mv);
            if legal {
                position.unmake();
            }
            legal
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FEN_KIWIPETE;

    fn moves_from(fen: &str) -> Vec<String> {
        let tables = AttackTables::new();
        let pos = Position::from_fen(fen).unwrap();
        pseudo_legal_moves(&tables, &pos)
            .into_iter()
            .map(|mv| mv.to_string())
            .collect()
    }

    #[test]
    fn test_pseudo_legal_promotion_position() {
        let moves = moves_from("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1");
        assert_eq!(moves.len(), 25);
    }

    #[test]
    fn test_promotions_come_in_fours() {
        let moves = moves_from("8/4P3/8/8/8/8/8/k6K w - - 0 1");
        let promotions = moves
            .iter()
            .filter(|mv| mv.starts_with("e7e8"))
            .collect::<Vec<_>>();
        assert_eq!(promotions, ["e7e8Q", "e7e8R", "e7e8B", "e7e8N"]);
    }

    #[test]
    fn test_en_passant_adds_one_destination() {
        let with = moves_from("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let without = moves_from("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        assert_eq!(with.len(), without.len() + 1);
        assert!(with.contains(&String::from("e5d6")));
    }

    #[test]
    fn test_pawn_moves_do_not_wrap() {
        let moves = moves_from("4k3/8/8/8/8/1p4p1/P6P/4K3 w - - 0 1");
        assert!(moves.contains(&String::from("a2b3")));
        assert!(moves.contains(&String::from("h2g3")));
        assert!(!moves.iter().any(|mv| mv.starts_with("a2h") || mv.starts_with("h2a")));
    }

    #[test]
    fn test_castling_needs_empty_path() {
        let moves = moves_from("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
        assert!(!moves.contains(&String::from("e1c1")));

        let moves = moves_from("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(moves.contains(&String::from("e1g1")));
        assert!(moves.contains(&String::from("e1c1")));
    }

    #[test]
    fn test_castling_blocked_by_any_path_square() {
        for (fen, castle) in [
            ("4k3/8/8/8/8/8/8/RB2K3 w Q - 0 1", "e1c1"),
            ("4k3/8/8/8/8/8/8/R1b1K3 w Q - 0 1", "e1c1"),
            ("4k3/8/8/8/8/8/8/R2QK3 w Q - 0 1", "e1c1"),
            ("4k3/8/8/8/8/8/8/4Kn1R w K - 0 1", "e1g1"),
            ("4k3/8/8/8/8/8/8/4K1NR w K - 0 1", "e1g1"),
            ("r2bk3/8/8/8/8/8/8/4K3 b q - 0 1", "e8c8"),
            ("4k1nr/8/8/8/8/8/8/4K3 b k - 0 1", "e8g8"),
        ] {
            assert!(!moves_from(fen).contains(&String::from(castle)), "{fen}");
        }
    }

    #[test]
    fn test_castling_needs_rights_and_rook() {
        let moves = moves_from("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));

        let moves = moves_from("4k3/8/8/8/8/8/8/R3K2B w K - 0 1");
        assert!(!moves.contains(&String::from("e1g1")));
    }

    #[test]
    fn test_attacked_squares_counts_empty_pawn_diagonals() {
        let tables = AttackTables::new();
        let pos = Position::from_fen("4k3/8/8/8/8/8/4p3/4K3 w - - 0 1").unwrap();
        let attacked = attacked_squares(&tables, &pos, Color::Black);
        assert!(attacked.contains(Square::D1));
        assert!(attacked.contains(Square::F1));
        assert!(!attacked.contains(Square::E1));

        // Edge pawns attack one square, without wrapping
        let pos = Position::from_fen("4k3/8/8/8/8/8/p6p/4K3 w - - 0 1").unwrap();
        let attacked = attacked_squares(&tables, &pos, Color::Black);
        assert!(attacked.contains(Square::B1));
        assert!(attacked.contains(Square::G1));
        assert!(!attacked.contains(Square::H1));
        assert!(!attacked.contains(Square::A1));
    }

    #[test]
    fn test_kiwipete_counts() {
        let tables = AttackTables::new();
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        assert_eq!(pseudo_legal_moves(&tables, &pos).len(), 48);
        assert_eq!(legal_moves(&tables, &mut pos).len(), 48);
        assert_eq!(pos.to_fen(), FEN_KIWIPETE);
    }
}
