/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{legal_moves, AttackTables, Move, Position};

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of legal moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// `position` is restored before this returns.
///
/// # Example
/// ```
/// # use rayfish::{perft, AttackTables, Position};
/// let tables = AttackTables::new();
/// let mut pos = Position::default();
/// assert_eq!(perft(&tables, &mut pos, 0), 1);
/// assert_eq!(perft(&tables, &mut pos, 2), 400);
/// ```
pub fn perft(tables: &AttackTables, position: &mut Position, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(tables, position);

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        position.make(mv);
        let new_nodes = perft(tables, position, depth - 1);
        position.unmake();
        nodes + new_nodes
    })
}

/// Perform a perft at the specified depth, returning the number of nodes reachable after each move available at the root node.
///
/// Moves are listed in generation order, and their counts sum to [`perft`] at the same depth.
/// At depth `0` there are no root moves to split on, so the list is empty.
///
/// # Example
/// ```
/// # use rayfish::{divide, perft, AttackTables, Position};
/// let tables = AttackTables::new();
/// let mut pos = Position::default();
/// let split = divide(&tables, &mut pos, 3);
/// assert_eq!(split.len(), 20);
/// assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), perft(&tables, &mut pos, 3));
/// ```
pub fn divide(tables: &AttackTables, position: &mut Position, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    legal_moves(tables, position)
        .into_iter()
        .map(|mv| {
            position.make(mv);
            let nodes = perft(tables, position, depth - 1);
            position.unmake();
            (mv, nodes)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Square, FEN_KIWIPETE};

    #[test]
    fn test_perft_startpos_shallow() {
        let tables = AttackTables::new();
        let mut pos = Position::default();
        assert_eq!(perft(&tables, &mut pos, 1), 20);
        assert_eq!(perft(&tables, &mut pos, 3), 8_902);
        assert_eq!(pos, Position::default());
        assert!(!pos.has_previous());
    }

    #[test]
    fn test_divide_kiwipete() {
        let tables = AttackTables::new();
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let split = divide(&tables, &mut pos, 2);

        assert_eq!(split.len(), 48);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2_039);

        let castle = split
            .iter()
            .find(|(mv, _)| *mv == Move::new(Square::E1, Square::G1))
            .unwrap();
        assert_eq!(castle.1, 43);
    }

    #[test]
    fn test_divide_depth_zero_is_empty() {
        let tables = AttackTables::new();
        let mut pos = Position::default();
        assert!(divide(&tables, &mut pos, 0).is_empty());
    }
}
