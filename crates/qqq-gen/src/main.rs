use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    assemble::{self, AssembleArgs},
    inspect::{self, InspectArgs},
    key::{self, DecodeArgs, HashArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "qqq-gen", about = "Baryon QQQ index assembly")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build every configured channel and write the assembly artifact.
    Assemble(AssembleArgs),
    /// Print the canonical key of an index tuple.
    Hash(HashArgs),
    /// Print the index tuple behind a canonical key.
    Decode(DecodeArgs),
    /// Summarise an assembly artifact as JSON.
    Inspect(InspectArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Assemble(args) => assemble::run(&args),
        Command::Hash(args) => key::run_hash(&args),
        Command::Decode(args) => key::run_decode(&args),
        Command::Inspect(args) => inspect::run(&args),
    }
}
