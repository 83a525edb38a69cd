mod commands;
mod config;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{expand, find, inspect, refs, ExpandArgs, FindArgs, InspectArgs, RefsArgs};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docgraph CLI - inspect and edit UI document graphs
#[derive(Parser, Debug)]
#[command(name = "docgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./docgraph.config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the node tree of a document
    Inspect(InspectArgs),

    /// Look up an element by id
    Find(FindArgs),

    /// List references in a document
    Refs(RefsArgs),

    /// Inline every reference and write the result
    Expand(ExpandArgs),
}

fn init_logging(config: &Config, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;
    init_logging(&config, cli.verbose);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Inspect(args) => inspect(args),
        Command::Find(args) => find(args),
        Command::Refs(args) => refs(args),
        Command::Expand(args) => expand(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
