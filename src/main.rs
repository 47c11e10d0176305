use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod session;

/// The main entry point for the Atoll trading engine.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => session::run_session(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A per-tick decision engine for a simulated multi-instrument exchange.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine against a built-in synthetic market session.
    Run(session::RunArgs),
}
