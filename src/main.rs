//! # Swap Escrow
//!
//! Predicts escrow addresses, hashlocks and timelock deadlines for cross-chain swaps.
use clap::Parser;
use swap_escrow::cli::Args;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = args.run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
