/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io::{self, BufRead},
    time::Instant,
};

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use log::{debug, info, warn};

use crate::{
    divide, is_in_check, legal_moves, perft, Algorithm, AttackTables, Cli, Color, EngineCommand,
    Evaluator, Move, Position, PsqtEvaluator, Search, SearchConfig, SearchResult, FEN_KIWIPETE,
    FEN_STARTPOS, MAX_DEPTH,
};

/// Settings the engine starts with, usually taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Depth of a `search` that does not supply its own.
    pub depth: usize,

    /// Algorithm of a `search` that does not supply its own.
    pub algorithm: Algorithm,

    /// Position the engine starts from, and returns to on `new`.
    pub fen: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            depth: search.depth,
            algorithm: search.algorithm,
            fen: String::from(FEN_STARTPOS),
        }
    }
}

impl From<&Cli> for EngineConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            depth: cli.depth,
            algorithm: cli.algorithm,
            fen: cli.fen.clone(),
        }
    }
}

/// The Rayfish chess engine.
pub struct Engine {
    /// Attack tables shared by move generation and search.
    tables: AttackTables,

    /// The current state of the chess board, as known to the engine.
    ///
    /// This is modified whenever moves are played or new positions are given.
    position: Position,

    /// Starting settings.
    config: EngineConfig,

    /// The side played by the user, while a game against the engine is in progress.
    human: Option<Color>,
}

impl Engine {
    /// Constructs a new [`Engine`] instance to be executed with [`Engine::run`].
    ///
    /// Fails if the starting FEN in `config` is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        if config.depth > MAX_DEPTH {
            bail!("Search depth must be at most {MAX_DEPTH}. Got {}", config.depth);
        }

        let position = Position::from_fen(&config.fen)
            .with_context(|| format!("Invalid starting position {:?}", config.fen))?;

        Ok(Self {
            tables: AttackTables::new(),
            position,
            config,
            human: None,
        })
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// The current position.
    #[inline(always)]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns `true` while a game started by `playw` or `playb` is in progress.
    #[inline(always)]
    pub fn in_game(&self) -> bool {
        self.human.is_some()
    }

    /// Execute the main loop for the engine, reading one command per line of `stdin` until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        info!("{} ready", self.name());

        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read line from stdin")?;

            // Ignore empty lines
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let cmd = match line.parse::<EngineCommand>() {
                Ok(cmd) => cmd,

                // Edge case: `help` is an "error" according to Clap
                Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                    println!("{e}");
                    continue;
                }

                Err(e) => {
                    warn!("Unrecognized input {line:?}");
                    eprintln!("{e}");
                    continue;
                }
            };

            debug!("Received {cmd:?}");

            // During a game, `quit` only leaves the game
            if cmd == EngineCommand::Quit && !self.in_game() {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.execute(cmd) {
                warn!("{e:#}");
            }
        }

        Ok(())
    }

    /// Executes a single [`EngineCommand`] against the current position.
    ///
    /// `quit` ends a game in progress. Otherwise it is handled by [`Engine::run`], and does nothing here.
    ///
    /// While a game is in progress, the engine answers every move made on the user's behalf.
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Display => println!("{:?}", self.position),

            EngineCommand::Divide { depth } => self.divide(depth),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Fen => println!("{}", self.position.to_fen()),

            EngineCommand::Move { mv } => {
                self.make_move(&mv)?;
                self.reply()?;
            }

            EngineCommand::Moves => {
                let moves = legal_moves(&self.tables, &mut self.position);

                // If there are none, print "(none)"
                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    moves
                        .into_iter()
                        .map(|mv| mv.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }

            EngineCommand::New => {
                self.end_game();
                self.position = Position::from_fen(&self.config.fen)?;
                debug!("Reset to {}", self.config.fen);
            }

            EngineCommand::Perft { depth } => self.perft(depth),

            EngineCommand::Playw => self.play(Color::White)?,

            EngineCommand::Playb => self.play(Color::Black)?,

            EngineCommand::Quit => self.end_game(),

            EngineCommand::Search { depth, algorithm } => {
                let config = SearchConfig {
                    depth: depth.unwrap_or(self.config.depth),
                    algorithm: algorithm.unwrap_or(self.config.algorithm),
                };
                self.search(config)?;
                self.reply()?;
            }

            EngineCommand::Setboard { fen } => {
                self.set_position(&fen.join(" "))?;
                self.end_game();
            }

            EngineCommand::Undo => {
                self.undo()?;

                // Take back the engine's answer along with the user's move
                let theirs = self.human.is_some_and(|h| h != self.position.side_to_move());
                if theirs && self.position.has_previous() {
                    self.undo()?;
                }
                self.reply()?;
            }
        }

        Ok(())
    }

    /// Resolves `text` against the legal moves of the current position and plays it.
    fn make_move(&mut self, text: &str) -> Result<()> {
        let mv = self.position.find_legal_move(&self.tables, text)?;
        self.position.make(mv);
        debug!("Played {mv}; now at {}", self.position);
        Ok(())
    }

    fn undo(&mut self) -> Result<()> {
        self.position
            .try_unmake()
            .context("Cannot undo: no moves have been played since the position was set")?;
        debug!("Undid last move; now at {}", self.position);
        Ok(())
    }

    /// Starts a game against the engine from the starting position, with the user playing `human`.
    fn play(&mut self, human: Color) -> Result<()> {
        self.position = Position::from_fen(&self.config.fen)?;
        self.human = Some(human);
        info!("New game: you play {}", human.name());

        println!("{:?}", self.position);
        self.reply()
    }

    /// Leaves the current game, if any. The position is kept.
    fn end_game(&mut self) {
        if let Some(human) = self.human.take() {
            info!("Game over: you played {}", human.name());
        }
    }

    /// During a game, prints the board and lets the engine move if it is its turn.
    ///
    /// Ends the game once the side to move has no legal moves.
    fn reply(&mut self) -> Result<()> {
        let Some(human) = self.human else {
            return Ok(());
        };

        println!("{:?}", self.position);
        if self.check_game_over() {
            return Ok(());
        }

        if self.position.side_to_move() != human {
            let config = SearchConfig {
                depth: self.config.depth,
                algorithm: self.config.algorithm,
            };
            self.search(config)?;

            println!("{:?}", self.position);
            self.check_game_over();
        }

        Ok(())
    }

    /// Announces and ends the game if the side to move is mated or stalemated.
    fn check_game_over(&mut self) -> bool {
        if !legal_moves(&self.tables, &mut self.position).is_empty() {
            return false;
        }

        let us = self.position.side_to_move();
        if is_in_check(&self.tables, &self.position, us) {
            println!("checkmate: {} wins", us.opponent().name());
        } else {
            println!("stalemate: draw");
        }

        self.end_game();
        true
    }

    /// Replaces the current position, discarding its history.
    fn set_position(&mut self, fen: &str) -> Result<()> {
        self.position = match fen {
            "startpos" => Position::default(),
            "kiwipete" => Position::from_fen(FEN_KIWIPETE)?,
            fen => Position::from_fen(fen)?,
        };
        debug!("Position set to {}", self.position);
        Ok(())
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        if pretty {
            println!("{}", PsqtEvaluator.breakdown(&self.position));
        } else {
            println!("{}", PsqtEvaluator.evaluate(&self.position));
        }
    }

    /// Executes the `perft` command, printing the number of nodes at `depth`.
    fn perft(&mut self, depth: usize) {
        let start = Instant::now();
        let nodes = perft(&self.tables, &mut self.position, depth);
        log_speed("perft", depth, nodes, start);

        println!("{nodes}");
    }

    /// Executes the `divide` command, printing the node count below every legal move and their total.
    fn divide(&mut self, depth: usize) {
        let start = Instant::now();
        let split = divide(&self.tables, &mut self.position, depth);
        let nodes = split.iter().map(|(_, nodes)| nodes).sum::<u64>();
        log_speed("divide", depth, nodes, start);

        print_divide(&split);
    }

    /// Executes the `search` command, printing and then playing the best move found.
    fn search(&mut self, config: SearchConfig) -> Result<SearchResult> {
        if config.depth > MAX_DEPTH {
            bail!("Search depth must be at most {MAX_DEPTH}. Got {}", config.depth);
        }

        let start = Instant::now();
        let res = Search::new(&self.tables, &PsqtEvaluator, config).start(&mut self.position);
        log_speed(&config.algorithm.to_string(), config.depth, res.nodes, start);

        match res.bestmove {
            Some(mv) => {
                println!("bestmove {mv} score {}", res.score);
                self.position.make(mv);
            }
            None => println!("bestmove (none) score {}", res.score),
        }

        Ok(res)
    }
}

/// Logs how long a tree walk over `nodes` nodes took, and its speed.
fn log_speed(name: &str, depth: usize, nodes: u64, start: Instant) {
    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64;
    info!(
        "{name} depth {depth}: {nodes} nodes in {}ms ({nps} nps)",
        elapsed.as_millis()
    );
}

/// Formats the output of [`divide`] as one `move: nodes` line per root move, followed by the total.
pub fn format_divide(split: &[(Move, u64)]) -> String {
    let mut out = split
        .iter()
        .map(|(mv, nodes)| format!("{mv}: {nodes}\n"))
        .collect::<String>();

    let total = split.iter().map(|(_, nodes)| nodes).sum::<u64>();
    out += &format!("\nTotal: {total}");
    out
}

/// Prints the output of [`divide`] to `stdout`. See [`format_divide`].
pub fn print_divide(split: &[(Move, u64)]) {
    println!("{}", format_divide(split));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    fn run(engine: &mut Engine, line: &str) -> Result<()> {
        engine.execute(line.parse().unwrap())
    }

    #[test]
    fn test_moves_and_undo() {
        let mut engine = engine();
        run(&mut engine, "e2e4").unwrap();
        run(&mut engine, "move e7e5").unwrap();
        assert_eq!(
            engine.position().to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );

        run(&mut engine, "undo").unwrap();
        run(&mut engine, "undo").unwrap();
        assert_eq!(*engine.position(), Position::default());
        assert!(run(&mut engine, "undo").is_err());
    }

    #[test]
    fn test_illegal_move_leaves_position() {
        let mut engine = engine();
        let err = run(&mut engine, "e2e5").unwrap_err();
        assert!(err.to_string().contains("is not a legal move"));
        assert_eq!(*engine.position(), Position::default());
    }

    #[test]
    fn test_setboard_and_new() {
        let mut engine = engine();
        run(&mut engine, "setboard kiwipete").unwrap();
        assert_eq!(engine.position().to_fen(), FEN_KIWIPETE);

        assert!(run(&mut engine, "setboard 8/8/8 w - - 0 1").is_err());
        assert_eq!(engine.position().to_fen(), FEN_KIWIPETE);

        run(&mut engine, "new").unwrap();
        assert_eq!(*engine.position(), Position::default());
    }

    #[test]
    fn test_search_plays_its_move() {
        let mut engine = engine();
        run(&mut engine, "setboard 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        run(&mut engine, "search --depth 2").unwrap();
        assert_eq!(
            engine.position().to_fen(),
            "R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1"
        );
    }

    fn game_engine(fen: &str) -> Engine {
        Engine::new(EngineConfig {
            depth: 2,
            fen: String::from(fen),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_play_as_white() {
        let mut engine = game_engine(FEN_STARTPOS);
        run(&mut engine, "playw").unwrap();
        assert!(engine.in_game());
        assert_eq!(*engine.position(), Position::default());

        // Every move is answered
        run(&mut engine, "e2e4").unwrap();
        assert_eq!(engine.position().side_to_move(), Color::White);
        assert_eq!(engine.position().fullmove(), 2);

        run(&mut engine, "d2d4").unwrap();
        assert_eq!(engine.position().side_to_move(), Color::White);
        assert_eq!(engine.position().fullmove(), 3);

        // Both plies are taken back
        run(&mut engine, "undo").unwrap();
        assert_eq!(engine.position().side_to_move(), Color::White);
        assert_eq!(engine.position().fullmove(), 2);

        run(&mut engine, "quit").unwrap();
        assert!(!engine.in_game());
    }

    #[test]
    fn test_play_as_black() {
        let mut engine = game_engine(FEN_STARTPOS);
        run(&mut engine, "e2e4").unwrap();
        run(&mut engine, "playb").unwrap();

        // The game restarts, and the engine opens
        assert_eq!(engine.position().side_to_move(), Color::Black);
        assert_eq!(engine.position().fullmove(), 1);
        assert!(engine.position().has_previous());

        let fen = engine.position().to_fen();
        assert!(run(&mut engine, "e2e4").is_err());
        assert_eq!(engine.position().to_fen(), fen);

        run(&mut engine, "e7e5").unwrap();
        assert_eq!(engine.position().side_to_move(), Color::Black);
        assert_eq!(engine.position().fullmove(), 2);
    }

    #[test]
    fn test_game_ends_on_mate() {
        let mut engine = game_engine("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        run(&mut engine, "playb").unwrap();
        assert_eq!(engine.position().to_fen(), "R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1");
        assert!(!engine.in_game());
    }

    #[test]
    fn test_new_ends_game() {
        let mut engine = game_engine(FEN_STARTPOS);
        run(&mut engine, "playw").unwrap();
        run(&mut engine, "new").unwrap();
        assert!(!engine.in_game());

        // Moves are no longer answered
        run(&mut engine, "e2e4").unwrap();
        assert_eq!(engine.position().side_to_move(), Color::Black);
    }

    #[test]
    fn test_depth_limit() {
        let config = EngineConfig {
            depth: MAX_DEPTH + 1,
            ..Default::default()
        };
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn test_format_divide() {
        let split = [
            (Move::new(crate::Square::A2, crate::Square::A3), 20),
            (Move::new(crate::Square::B2, crate::Square::B4), 21),
        ];
        assert_eq!(format_divide(&split), "a2a3: 20\nb2b4: 21\n\nTotal: 41");
    }
}
