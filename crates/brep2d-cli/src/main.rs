//! brep2d CLI
//!
//! Inspect, validate and build planar B-rep graphs stored as JSON.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "brep2d")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Planar B-rep topology editor", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show element counts and the boundary structure of each loop
    Info(commands::info::InfoArgs),
    /// Check a graph for topological consistency
    Validate(commands::validate::ValidateArgs),
    /// Apply a TOML edit script and write the resulting graph
    Build(commands::build::BuildArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Build(args) => commands::build::execute(args),
    }
}
