mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{init, insert, replay, reparse, InitArgs, InsertArgs, ReplayArgs, ReparseArgs};

/// Clause workbench - keep template clauses in sync with their templates
#[derive(Parser, Debug)]
#[command(name = "clause")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a workbench with a sample contract
    Init(InitArgs),

    /// Insert a template clause into a contract
    Insert(InsertArgs),

    /// Validate clauses and refresh their formulas
    Reparse(ReparseArgs),

    /// Replay recorded clause edits through the debouncer
    Replay(ReplayArgs),
}

async fn run(command: Command, cwd: &str) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd),
        Command::Insert(args) => insert(args, cwd).map(|_| ()),
        Command::Reparse(args) => {
            let summary = reparse(args, cwd).await?;
            if summary.failed > 0 {
                anyhow::bail!("{} clause(s) failed to parse", summary.failed);
            }
            Ok(())
        }
        Command::Replay(args) => replay(args, cwd).await.map(|_| ()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => run(cli.command, &cwd.display().to_string()).await,
        Err(err) => Err(anyhow::anyhow!("Cannot get current directory: {}", err)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
