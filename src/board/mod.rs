/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// A 64-bit set of squares.
mod bitboard;

/// Pseudo-legal and legal move generation, and attacked squares.
mod movegen;

/// Moves, promotions and the fixed-capacity move list.
mod moves;

/// Node counting over the legal move tree.
mod perft;

/// Colors, kinds of pieces, and pieces.
mod piece;

/// The full game state, with make/unmake.
mod position;

/// Squares of the board, from a8 to h1.
mod square;

/// Precomputed attack masks and the sliding-ray lookup.
mod tables;

/// Misc constants.
mod utils;

pub use bitboard::*;
pub use movegen::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use tables::*;
pub use utils::*;
