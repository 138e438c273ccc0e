//! # Swap escrow CLI
use crate::{
    clones::{predict_with_bytecode_hash, proxy_bytecode_hash},
    config::FactoryConfig,
    escrow::EscrowKind,
    factory::implementation_address,
    types::{Immutables, Stage, hashlock},
};
use alloy::primitives::{Address, B256};
use clap::{Parser, Subcommand};
use eyre::Context;
use serde::Serialize;
use std::{fmt, path::{Path, PathBuf}};
use tracing::warn;

/// Inspect cross-chain swap escrows without touching a chain.
#[derive(Debug, Parser)]
#[command(author, about = "Swap escrow tooling", long_about = None)]
pub struct Args {
    /// Print the output as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands of the CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the immutables hash and the predicted address of an escrow.
    Address {
        /// The factory configuration file.
        #[arg(long, value_name = "CONFIG", env = "ESCROW_FACTORY_CONFIG")]
        config: PathBuf,
        /// The escrow immutables file.
        #[arg(long, value_name = "IMMUTABLES")]
        immutables: PathBuf,
        /// Which escrow of the swap to predict.
        #[arg(long, value_name = "SIDE")]
        side: EscrowKind,
        /// The deployment timestamp, overriding the one in the immutables file.
        #[arg(long, value_name = "TIMESTAMP")]
        deployed_at: Option<u32>,
    },
    /// Print the hashlock of a secret.
    Hashlock {
        /// The 32 byte secret.
        #[arg(value_name = "SECRET")]
        secret: B256,
    },
    /// Print the absolute deadline of every timelock stage.
    Timelocks {
        /// The escrow immutables file, with a deployment timestamp.
        #[arg(long, value_name = "IMMUTABLES")]
        immutables: PathBuf,
    },
}

/// Result of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// A predicted escrow.
    #[serde(rename_all = "camelCase")]
    Address {
        /// Which escrow of the swap.
        side: EscrowKind,
        /// Hash of the immutables, used as salt.
        immutables_hash: B256,
        /// Predicted escrow address.
        address: Address,
    },
    /// A hashlock.
    Hashlock {
        /// Hash of the secret.
        hashlock: B256,
    },
    /// Stage deadlines.
    #[serde(rename_all = "camelCase")]
    Timelocks {
        /// Deployment timestamp.
        deployed_at: u32,
        /// Absolute deadline of each stage.
        stages: Vec<(Stage, u64)>,
    },
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address { side, immutables_hash, address } => {
                writeln!(f, "side: {side}")?;
                writeln!(f, "immutables hash: {immutables_hash}")?;
                write!(f, "address: {address}")
            }
            Self::Hashlock { hashlock } => write!(f, "{hashlock}"),
            Self::Timelocks { deployed_at, stages } => {
                write!(f, "deployed at: {deployed_at}")?;
                for (stage, deadline) in stages {
                    write!(f, "\n{stage}: {deadline}")?;
                }
                Ok(())
            }
        }
    }
}

impl Args {
    /// Runs the command and prints its output.
    pub fn run(self) -> eyre::Result<()> {
        let output = self.command.execute()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{output}");
        }
        Ok(())
    }
}

impl Command {
    /// Runs the command.
    pub fn execute(&self) -> eyre::Result<Output> {
        match self {
            Self::Address { config, immutables, side, deployed_at } => {
                let config = FactoryConfig::load_from_file(config)?;
                let mut immutables = load_immutables(immutables)?;
                if let Some(deployed_at) = deployed_at {
                    immutables = immutables.with_deployed_at(*deployed_at);
                }
                if !immutables.timelocks.is_deployed() {
                    warn!("immutables have no deployment timestamp, no escrow can be created at this address");
                }

                let implementation = implementation_address(config.factory, *side);
                let immutables_hash = immutables.hash();
                let address = predict_with_bytecode_hash(
                    proxy_bytecode_hash(implementation),
                    immutables_hash,
                    config.factory,
                );
                Ok(Output::Address { side: *side, immutables_hash, address })
            }
            Self::Hashlock { secret } => Ok(Output::Hashlock { hashlock: hashlock(secret) }),
            Self::Timelocks { immutables } => {
                let timelocks = load_immutables(immutables)?.timelocks;
                let stages = Stage::ALL
                    .into_iter()
                    .map(|stage| timelocks.get(stage).map(|deadline| (stage, deadline)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Output::Timelocks { deployed_at: timelocks.deployed_at, stages })
            }
        }
    }
}

/// Loads escrow immutables from a YAML file.
fn load_immutables(path: &Path) -> eyre::Result<Immutables> {
    let file = std::fs::File::open(path)
        .wrap_err_with(|| format!("failed to read immutables file: {}", path.display()))?;
    serde_yaml::from_reader(&file)
        .wrap_err_with(|| format!("failed to parse immutables file: {}", path.display()))
}
