/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Bitboard, Color, Square};

/// One of the eight directions a sliding piece can travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

/// Which end of a ray's blocker set holds the blocker closest to the slider.
///
/// Rays that walk towards lower square indices find their nearest blocker at the high end,
/// and rays that walk towards higher indices find it at the low end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockerEnd {
    FromLowEnd,
    FromHighEnd,
}

impl Direction {
    /// Number of directions.
    pub const COUNT: usize = 8;

    /// The four directions a Rook slides in.
    pub const ORTHOGONAL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The four directions a Bishop slides in.
    pub const DIAGONAL: [Self; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// All eight directions, orthogonals first.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::North,
            Self::South,
            Self::East,
            Self::West,
            Self::NorthEast,
            Self::NorthWest,
            Self::SouthEast,
            Self::SouthWest,
        ]
    }

    /// Index of this [`Direction`], useful for indexing into the ray tables.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// `(file_delta, row_delta)` of a single step in this [`Direction`].
    ///
    /// Rows grow towards the first rank, so North is a negative row delta.
    #[inline(always)]
    pub const fn delta(&self) -> (i8, i8) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::NorthEast => (1, -1),
            Self::NorthWest => (-1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),
        }
    }

    /// Where the nearest blocker on a ray in this [`Direction`] is found.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{BlockerEnd, Direction};
    /// assert_eq!(Direction::North.blocker_end(), BlockerEnd::FromHighEnd);
    /// assert_eq!(Direction::SouthEast.blocker_end(), BlockerEnd::FromLowEnd);
    /// ```
    #[inline(always)]
    pub const fn blocker_end(&self) -> BlockerEnd {
        match self {
            Self::North | Self::West | Self::NorthWest | Self::NorthEast => BlockerEnd::FromHighEnd,
            Self::South | Self::East | Self::SouthEast | Self::SouthWest => BlockerEnd::FromLowEnd,
        }
    }
}

/// The two sides of the board a King may castle towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    /// Both sides, King-side first.
    pub const ALL: [Self; 2] = [Self::KingSide, Self::QueenSide];

    /// Square the King lands on when `color` castles towards this side.
    ///
    /// A set bit on this square in a [`crate::Position`]'s castling board means the right is revoked.
    #[inline(always)]
    pub const fn king_destination(&self, color: Color) -> Square {
        match (color, self) {
            (Color::White, Self::KingSide) => Square::G1,
            (Color::White, Self::QueenSide) => Square::C1,
            (Color::Black, Self::KingSide) => Square::G8,
            (Color::Black, Self::QueenSide) => Square::C8,
        }
    }

    /// Square the King passes over on its way to [`CastlingSide::king_destination`].
    #[inline(always)]
    pub const fn king_transit(&self, color: Color) -> Square {
        match (color, self) {
            (Color::White, Self::KingSide) => Square::F1,
            (Color::White, Self::QueenSide) => Square::D1,
            (Color::Black, Self::KingSide) => Square::F8,
            (Color::Black, Self::QueenSide) => Square::D8,
        }
    }

    /// Corner square the castling Rook starts on.
    #[inline(always)]
    pub const fn rook_origin(&self, color: Color) -> Square {
        match (color, self) {
            (Color::White, Self::KingSide) => Square::H1,
            (Color::White, Self::QueenSide) => Square::A1,
            (Color::Black, Self::KingSide) => Square::H8,
            (Color::Black, Self::QueenSide) => Square::A8,
        }
    }

    /// Which castling side (if any) a King destination square belongs to.
    #[inline(always)]
    pub const fn from_destination(square: Square) -> Option<Self> {
        match square.file() {
            6 => Some(Self::KingSide),
            2 => Some(Self::QueenSide),
            _ => None,
        }
    }

    /// Direction from the King towards this side's Rook.
    #[inline(always)]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::KingSide => Direction::East,
            Self::QueenSide => Direction::West,
        }
    }

    /// The FEN character of this side's right for `color`.
    #[inline(always)]
    pub const fn char(&self, color: Color) -> char {
        match (color, self) {
            (Color::White, Self::KingSide) => 'K',
            (Color::White, Self::QueenSide) => 'Q',
            (Color::Black, Self::KingSide) => 'k',
            (Color::Black, Self::QueenSide) => 'q',
        }
    }
}

/// Home square of each side's King: e1 for White, e8 for Black.
#[inline(always)]
pub const fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

/// Deltas for the movement of the Knight, as `(file_delta, row_delta)`.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

/// Precomputed, per-square movement masks.
///
/// Build it once with [`AttackTables::new`] and share it by reference.
/// Every entry is a pure function of board geometry.
#[derive(Clone, PartialEq, Eq)]
pub struct AttackTables {
    rays: [[Bitboard; Square::COUNT]; Direction::COUNT],
    knight: [Bitboard; Square::COUNT],
    king_steps: [Bitboard; Square::COUNT],
    king: [[Bitboard; Square::COUNT]; Color::COUNT],
    pawn_pushes: [[Bitboard; Square::COUNT]; Color::COUNT],
    pawn_captures: [[Bitboard; Square::COUNT]; Color::COUNT],
    files: [Bitboard; 8],
    ranks: [Bitboard; 8],
    castling_paths: [[Bitboard; 2]; Color::COUNT],
}

impl AttackTables {
    /// Builds every table.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{AttackTables, Bitboard, Direction, Square};
    /// let tables = AttackTables::new();
    /// assert_eq!(tables.ray(Direction::North, Square::A1).population(), 7);
    /// assert_eq!(tables.knight_attacks(Square::A8).population(), 2);
    /// ```
    pub const fn new() -> Self {
        let mut rays = [[Bitboard::EMPTY_BOARD; Square::COUNT]; Direction::COUNT];
        let mut knight = [Bitboard::EMPTY_BOARD; Square::COUNT];
        let mut king_steps = [Bitboard::EMPTY_BOARD; Square::COUNT];
        let mut pawn_pushes = [[Bitboard::EMPTY_BOARD; Square::COUNT]; Color::COUNT];
        let mut pawn_captures = [[Bitboard::EMPTY_BOARD; Square::COUNT]; Color::COUNT];

        let directions = Direction::all();
        let mut i = 0;
        while i < Square::COUNT {
            let square = Square::from_index_unchecked(i);

            // Riders walk each direction until they fall off the board.
            let mut d = 0;
            while d < Direction::COUNT {
                let (df, dr) = directions[d].delta();
                let mut ray = Bitboard::EMPTY_BOARD;
                let mut to = square;
                while let Some(shifted) = to.offset(df, dr) {
                    ray = ray.or(shifted.bitboard());
                    to = shifted;
                }
                rays[d][i] = ray;

                // Leapers take a single step
                if let Some(step) = square.offset(df, dr) {
                    king_steps[i] = king_steps[i].or(step.bitboard());
                }

                d += 1;
            }

            let mut k = 0;
            while k < KNIGHT_DELTAS.len() {
                let (df, dr) = KNIGHT_DELTAS[k];
                if let Some(jump) = square.offset(df, dr) {
                    knight[i] = knight[i].or(jump.bitboard());
                }
                k += 1;
            }

            let bb = square.bitboard();

            pawn_captures[Color::White.index()][i] = bb.northeast().or(bb.northwest());
            pawn_captures[Color::Black.index()][i] = bb.southeast().or(bb.southwest());

            // Row 6 is White's second rank, row 1 is Black's.
            pawn_pushes[Color::White.index()][i] = if square.row() == 6 {
                bb.north().or(bb.north().north())
            } else {
                bb.north()
            };
            pawn_pushes[Color::Black.index()][i] = if square.row() == 1 {
                bb.south().or(bb.south().south())
            } else {
                bb.south()
            };

            i += 1;
        }

        let mut king = [king_steps; Color::COUNT];
        let mut castling_paths = [[Bitboard::EMPTY_BOARD; 2]; Color::COUNT];
        let colors = Color::all();
        let mut c = 0;
        while c < Color::COUNT {
            let color = colors[c];
            let home = king_home(color);

            let mut s = 0;
            while s < CastlingSide::ALL.len() {
                let side = CastlingSide::ALL[s];
                let destination = side.king_destination(color);
                king[c][home.index()] = king[c][home.index()].or(destination.bitboard());

                // Everything strictly between the King and its Rook
                let rook = side.rook_origin(color);
                let toward_rook = rays[side.direction().index()][home.index()];
                let beyond_rook = rays[side.direction().index()][rook.index()];
                castling_paths[c][s] = toward_rook.xor(beyond_rook).xor(rook.bitboard());

                s += 1;
            }

            c += 1;
        }

        let mut files = [Bitboard::EMPTY_BOARD; 8];
        let mut ranks = [Bitboard::EMPTY_BOARD; 8];
        let mut n = 0;
        while n < 8 {
            files[n] = Bitboard::new(Bitboard::FILE_A.inner() << n);
            // Rank 1 is the highest row
            ranks[n] = Bitboard::new(Bitboard::RANK_8.inner() << ((7 - n) * 8));
            n += 1;
        }

        Self {
            rays,
            knight,
            king_steps,
            king,
            pawn_pushes,
            pawn_captures,
            files,
            ranks,
            castling_paths,
        }
    }

    /// Every square on the ray from `square` in `direction`, up to the edge of the board.
    ///
    /// `square` itself is never included.
    #[inline(always)]
    pub const fn ray(&self, direction: Direction, square: Square) -> Bitboard {
        self.rays[direction.index()][square.index()]
    }

    /// Squares reachable by sliding from `square` in `direction` given the `occupied` squares.
    ///
    /// The first occupied square on the ray is included, since it may be a capture.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{AttackTables, Direction, Square};
    /// let tables = AttackTables::new();
    /// let reach = tables.slide(Direction::NorthEast, Square::A3, Square::C5.bitboard());
    /// assert_eq!(reach.population(), 2);
    /// assert!(reach.contains(Square::B4));
    /// assert!(reach.contains(Square::C5));
    /// ```
    #[inline(always)]
    pub const fn slide(&self, direction: Direction, square: Square, occupied: Bitboard) -> Bitboard {
        let ray = self.ray(direction, square);
        let blockers = ray.and(occupied);

        let nearest = match direction.blocker_end() {
            BlockerEnd::FromLowEnd => blockers.lsb(),
            BlockerEnd::FromHighEnd => blockers.msb(),
        };

        match nearest {
            Some(blocker) => ray.xor(self.ray(direction, blocker)),
            None => ray,
        }
    }

    /// Squares a Bishop on `square` reaches given the `occupied` squares.
    #[inline(always)]
    pub const fn bishop_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.slide(Direction::NorthEast, square, occupied)
            .or(self.slide(Direction::NorthWest, square, occupied))
            .or(self.slide(Direction::SouthEast, square, occupied))
            .or(self.slide(Direction::SouthWest, square, occupied))
    }

    /// Squares a Rook on `square` reaches given the `occupied` squares.
    #[inline(always)]
    pub const fn rook_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.slide(Direction::North, square, occupied)
            .or(self.slide(Direction::South, square, occupied))
            .or(self.slide(Direction::East, square, occupied))
            .or(self.slide(Direction::West, square, occupied))
    }

    /// Squares a Queen on `square` reaches given the `occupied` squares.
    #[inline(always)]
    pub const fn queen_attacks(&self, square: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(square, occupied)
            .or(self.bishop_attacks(square, occupied))
    }

    /// Fetch the raw attacks for a Knight on the provided square.
    #[inline(always)]
    pub const fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight[square.index()]
    }

    /// Fetch the eight (or fewer) neighbours of the provided square.
    #[inline(always)]
    pub const fn king_steps(&self, square: Square) -> Bitboard {
        self.king_steps[square.index()]
    }

    /// Fetch the King mask of `color` on `square`.
    ///
    /// On that color's home square this includes both castling destinations.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{AttackTables, Color, Square};
    /// let tables = AttackTables::new();
    /// let castles = tables.king_moves(Color::White, Square::E1) ^ tables.king_steps(Square::E1);
    /// assert_eq!(castles, Square::G1.bitboard() | Square::C1);
    /// assert_eq!(tables.king_moves(Color::Black, Square::E1), tables.king_steps(Square::E1));
    /// ```
    #[inline(always)]
    pub const fn king_moves(&self, color: Color, square: Square) -> Bitboard {
        self.king[color.index()][square.index()]
    }

    /// Fetch the raw pushes for a Pawn of `color` on `square`, including the double push from its home rank.
    #[inline(always)]
    pub const fn pawn_pushes(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_pushes[color.index()][square.index()]
    }

    /// Fetch the two forward diagonals of a Pawn of `color` on `square`.
    #[inline(always)]
    pub const fn pawn_captures(&self, color: Color, square: Square) -> Bitboard {
        self.pawn_captures[color.index()][square.index()]
    }

    /// Mask of file `file`, where `0` is the a-file.
    #[inline(always)]
    pub const fn file(&self, file: u8) -> Bitboard {
        self.files[file as usize]
    }

    /// Mask of rank `rank`, where `1` is White's back rank.
    ///
    /// # Panics
    ///
    /// If `rank` is not in `1..=8`.
    #[inline(always)]
    pub const fn rank(&self, rank: u8) -> Bitboard {
        self.ranks[rank as usize - 1]
    }

    /// Squares that must be empty between `color`'s King and Rook to castle towards `side`.
    #[inline(always)]
    pub const fn castling_path(&self, color: Color, side: CastlingSide) -> Bitboard {
        self.castling_paths[color.index()][side as usize]
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}
