/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::Parser;
use rayfish::{Cli, Engine, EngineConfig};

fn main() {
    let cli = Cli::parse();

    // `RUST_LOG` overrides the level chosen here
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    let result = Engine::new(EngineConfig::from(&cli)).and_then(|mut engine| engine.run());

    if let Err(e) = result {
        log::error!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}
