// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Questlog - a gamified habit and task tracking backend.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use questlog_config::QuestlogConfig;

/// Questlog - a gamified habit and task tracking backend.
#[derive(Parser, Debug)]
#[command(name = "questlog", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP server (default).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => questlog_config::load_and_validate_path(path),
        None => questlog_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            questlog_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Commands::Serve);
    if command == Commands::Config {
        match render_config(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("questlog: failed to render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    serve::init_tracing(&config.logging.normalized_level());

    let result = match command {
        Commands::Migrate => serve::run_migrate(config).await,
        _ => serve::run_serve(config).await,
    };
    if let Err(e) = result {
        eprintln!("questlog: {e}");
        std::process::exit(1);
    }
}

fn render_config(config: &QuestlogConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["questlog"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["questlog", "migrate", "--config", "/tmp/q.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/q.toml")));
    }

    #[test]
    fn rendered_config_round_trips() {
        let config = questlog_config::load_and_validate_str("[server]\nport = 8080\n").unwrap();
        let text = render_config(&config).unwrap();
        let reparsed = questlog_config::load_and_validate_str(&text).unwrap();
        assert_eq!(reparsed.server.port, 8080);
        assert_eq!(reparsed.progression.xp_per_completion, 10);
    }
}
