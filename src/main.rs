//! fastly - command line client for Fastly services
//!
//! Versioned resources go through the service version resolver, which
//! enforces each command's version policy and handles `--autoclone`.

mod api;
mod cli;
mod commands;
mod config;
mod output;
mod service;
mod version;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use output::{Failure, Output};

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    init_tracing(cli.globals.verbose);
    let out = Output::new(cli.globals.json, cli.globals.verbose);

    // If no command provided, show help
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            eprintln!("Error: no command provided. Use --help for usage.");
            std::process::exit(1);
        }
    };

    let op = op_name(&matches);
    if let Err(e) = commands::run(command, &cli.globals, &out).await {
        out.error(Failure::from_error(&e).with_op(&op));
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Dotted subcommand path, e.g. `backend.create`.
fn op_name(matches: &ArgMatches) -> String {
    let mut parts = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        parts.push(name);
        current = sub;
    }
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_name_joins_subcommands() {
        let matches = Cli::command()
            .try_get_matches_from(["fastly", "acl-entry", "list", "--acl-id", "x"])
            .unwrap();
        assert_eq!(op_name(&matches), "acl-entry.list");
    }
}
