/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use clap::ValueEnum;

use crate::{
    is_in_check, make_if_legal, pseudo_legal_moves, AttackTables, Color, Evaluator, Move,
    Position, Score,
};

/// Maximum depth that can be searched
pub const MAX_DEPTH: usize = 64;

/// Default depth of a search when none is supplied.
pub const DEFAULT_DEPTH: usize = 4;

/// Which tree walk to use when searching.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    /// Visits every node to the full depth.
    Minimax,

    /// Skips branches that cannot change the result.
    #[default]
    AlphaBeta,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimax => write!(f, "minimax"),
            Self::AlphaBeta => write!(f, "alpha-beta"),
        }
    }
}

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    ///
    /// `None` if the search was at depth 0, or if there were no legal moves.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made, from White's perspective.
    pub score: Score,
}

impl Default for SearchResult {
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: Score::DRAW,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of plies to search.
    pub depth: usize,

    /// Tree walk used by [`Search::start`].
    pub algorithm: Algorithm,
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            algorithm: Algorithm::default(),
        }
    }
}

/// Executes a fixed-depth search on a position.
///
/// White is the maximizing player and Black the minimizing one.
/// Every move tried on the position is unmade before the search returns.
pub struct Search<'a, E: Evaluator> {
    /// Attack tables shared with the move generator.
    tables: &'a AttackTables,

    /// Scores the leaves of the tree.
    evaluator: &'a E,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// Nodes visited by the current call.
    nodes: u64,
}

impl<'a, E: Evaluator> Search<'a, E> {
    /// Construct a new [`Search`] instance.
    #[inline(always)]
    pub fn new(tables: &'a AttackTables, evaluator: &'a E, config: SearchConfig) -> Self {
        Self {
            tables,
            evaluator,
            config,
            nodes: 0,
        }
    }

    /// Search `position` with the configured depth and algorithm.
    ///
    /// # Example
    /// ```
    /// # use rayfish::{AttackTables, Position, PsqtEvaluator, Search, SearchConfig};
    /// let tables = AttackTables::new();
    /// let mut search = Search::new(&tables, &PsqtEvaluator, SearchConfig { depth: 2, ..Default::default() });
    ///
    /// let mut pos = Position::default();
    /// let res = search.start(&mut pos);
    /// assert!(res.bestmove.is_some());
    /// assert_eq!(pos, Position::default());
    /// ```
    pub fn start(&mut self, position: &mut Position) -> SearchResult {
        let depth = self.config.depth;
        match self.config.algorithm {
            Algorithm::Minimax => self.minimax(position, depth),
            Algorithm::AlphaBeta => self.alpha_beta(position, -Score::INF, Score::INF, depth),
        }
    }

    /// Plain [minimax](https://www.chessprogramming.org/Minimax) to `depth` plies.
    ///
    /// Every node of the tree is visited.
    pub fn minimax(&mut self, position: &mut Position, depth: usize) -> SearchResult {
        self.nodes = 0;
        let (score, bestmove) =
            self.search::<false>(position, -Score::INF, Score::INF, depth, 0);

        SearchResult {
            nodes: self.nodes,
            bestmove,
            score,
        }
    }

    /// [Alpha-beta](https://www.chessprogramming.org/Alpha-Beta) to `depth` plies, within the window `[alpha, beta]`.
    ///
    /// Pass `-Score::INF` and `Score::INF` for a full window, which gives the same score as [`Search::minimax`].
    pub fn alpha_beta(
        &mut self,
        position: &mut Position,
        alpha: Score,
        beta: Score,
        depth: usize,
    ) -> SearchResult {
        self.nodes = 0;
        let (score, bestmove) = self.search::<true>(position, alpha, beta, depth, 0);

        SearchResult {
            nodes: self.nodes,
            bestmove,
            score,
        }
    }

    /// Primary location of search logic.
    ///
    /// If `PRUNE` is set, a maximizing node stops once a child reaches `beta`,
    /// and a minimizing node stops once a child falls to `alpha`.
    fn search<const PRUNE: bool>(
        &mut self,
        position: &mut Position,
        mut alpha: Score,
        mut beta: Score,
        depth: usize,
        ply: usize,
    ) -> (Score, Option<Move>) {
        self.nodes += 1;

        // If we've reached a terminal node, evaluate the position
        if depth == 0 {
            return (self.evaluator.evaluate(position), None);
        }

        let us = position.side_to_move();
        let maximizing = us.is_white();

        let mut best = if maximizing { -Score::INF } else { Score::INF };
        let mut bestmove = None;

        for mv in pseudo_legal_moves(self.tables, position) {
            if !make_if_legal(self.tables, position, mv) {
                continue;
            }

            let (score, _) = self.search::<PRUNE>(position, alpha, beta, depth - 1, ply + 1);
            position.unmake();

            let improved = if maximizing {
                score > best
            } else {
                score < best
            };

            if improved || bestmove.is_none() {
                best = score;
                bestmove = Some(mv);
            }

            if PRUNE {
                if maximizing {
                    alpha = alpha.max(score);
                    if score >= beta {
                        break;
                    }
                } else {
                    beta = beta.min(score);
                    if score <= alpha {
                        break;
                    }
                }
            }
        }

        // If there are no legal moves, it's either mate or a draw.
        if bestmove.is_none() {
            let score = if is_in_check(self.tables, position, us) {
                // Prefer earlier mates
                match us {
                    Color::White => Score::white_mated(ply),
                    Color::Black => Score::black_mated(ply),
                }
            } else {
                Score::DRAW
            };

            return (score, None);
        }

        (best, bestmove)
    }
}
