use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rowdb::config::DEFAULT_PROMPT;
use rowdb::{Repl, ReplConfig, Table};

/// A single-table database driven from standard input.
#[derive(Parser, Debug)]
#[command(name = "rowdb", version, about)]
struct Args {
    /// Backing file for the table. Without one the session is in-memory only.
    #[arg(env = "ROWDB_FILE")]
    filename: Option<PathBuf>,

    /// Prompt printed before each line is read
    #[arg(long, default_value = DEFAULT_PROMPT, env = "ROWDB_PROMPT")]
    prompt: String,

    /// Log storage activity to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress the startup banner
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let table = match &args.filename {
        Some(path) => Table::open(path)
            .with_context(|| format!("unable to open {}", path.display()))?,
        None => Table::memory(),
    };

    let stdin = io::stdin();
    let config = ReplConfig {
        prompt: args.prompt,
        banner: !args.quiet && stdin.is_terminal(),
    };

    Repl::new(table, stdin.lock(), io::stdout(), config)
        .run()
        .context("session aborted")
}

// Logs go to stderr; stdout carries only prompts and results.
fn init_logging(verbose: bool) {
    let default = if verbose { "rowdb=debug" } else { "rowdb=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
