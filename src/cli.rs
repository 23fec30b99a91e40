/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::{Algorithm, Move, DEFAULT_DEPTH, FEN_STARTPOS};

/// Command-line options of the `rayfish` binary.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Default depth of the `search` command, in plies.
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Default algorithm of the `search` command.
    #[arg(short, long, value_enum, default_value_t = Algorithm::default())]
    pub algorithm: Algorithm,

    /// Position to start from, and to return to on `new`.
    #[arg(short, long, default_value = FEN_STARTPOS)]
    pub fen: String,

    /// Enable debug logging. `RUST_LOG` takes precedence.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

/// A command to be sent to the engine, one per line of input.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND> | <MOVE>")
)]
pub enum EngineCommand {
    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "splitperft")]
    Divide { depth: usize },

    /// Print an evaluation of the current position, from White's perspective.
    Eval {
        /// If set, the contribution of every piece will be printed as well.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Apply the provided move to the position, if it is legal.
    ///
    /// A move on its own, such as `e2e4`, does the same.
    Move { mv: String },

    /// Shows all legal moves in the current position.
    Moves,

    /// Return to the starting position.
    New,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Start a game against the engine from the starting position, playing White.
    Playw,

    /// Start a game against the engine from the starting position, playing Black.
    Playb,

    /// Quit the engine.
    #[command(alias = "exit")]
    Quit,

    /// Search the current position and play the best move found.
    Search {
        /// Override the default search depth.
        #[arg(short, long)]
        depth: Option<usize>,

        /// Override the default search algorithm.
        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,
    },

    /// Set the position from a FEN string, or from `startpos` or `kiwipete`.
    #[command(alias = "position")]
    Setboard {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        fen: Vec<String>,
    },

    /// Take back the last move.
    Undo,
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a bare move.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => {
                // If parsing failed, attempt to parse as a move
                if Move::from_text(s).is_ok() {
                    Ok(Self::Move {
                        mv: s.trim().to_string(),
                    })
                } else {
                    Err(e)
                }
            }
        }
    }
}
