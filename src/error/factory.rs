use super::{DeployError, TimelocksError, TransferError};
use alloy::primitives::{Address, ChainId, U256};
use thiserror::Error;

/// Errors returned by the escrow factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// Escrow creation is paused.
    #[error("the escrow factory is paused")]
    Paused,
    /// The caller is not a whitelisted resolver.
    #[error("resolver {0} is not whitelisted")]
    NotWhitelisted(Address),
    /// The caller is not the factory owner.
    #[error("{0} is not the factory owner")]
    NotOwner(Address),
    /// The factory configuration targets another chain.
    #[error("factory configured for chain {expected}, deployed on chain {got}")]
    ChainMismatch {
        /// Chain id from the configuration.
        expected: ChainId,
        /// Chain id of the chain it was deployed on.
        got: ChainId,
    },
    /// The escrow address was not funded before creation.
    #[error("escrow {escrow} holds {available} of {token}, needs {required}")]
    InsufficientEscrowBalance {
        /// The predicted escrow address.
        escrow: Address,
        /// The token that is missing.
        token: Address,
        /// The amount the escrow needs.
        required: U256,
        /// The amount the escrow holds.
        available: U256,
    },
    /// The native value sent with the creation call is wrong.
    #[error("invalid native value, expected {required}, got {provided}")]
    InsufficientEscrowValue {
        /// The value required.
        required: U256,
        /// The value sent.
        provided: U256,
    },
    /// The native amount and the safety deposit do not fit 256 bits together.
    #[error("amount {amount} plus safety deposit {safety_deposit} overflows")]
    AmountOverflow {
        /// The escrowed amount.
        amount: U256,
        /// The safety deposit.
        safety_deposit: U256,
    },
    /// The destination escrow would stay cancellable past the source cancellation start.
    #[error("destination cancellation at {dst_cancellation} is after source cancellation at {src_cancellation}")]
    InvalidCreationTime {
        /// Absolute destination cancellation deadline.
        dst_cancellation: u64,
        /// Absolute source cancellation deadline.
        src_cancellation: u64,
    },
    /// The escrow was deployed somewhere other than the predicted address.
    #[error("escrow deployed at {deployed}, predicted {predicted}")]
    AddressMismatch {
        /// The predicted address.
        predicted: Address,
        /// The address the clone landed at.
        deployed: Address,
    },
    /// The supplied timelocks are invalid.
    #[error(transparent)]
    Timelocks(#[from] TimelocksError),
    /// The escrow could not be deployed.
    #[error(transparent)]
    Deploy(#[from] DeployError),
    /// Funding the escrow failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl FactoryError {
    /// A short label for the error, used in metrics.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::NotWhitelisted(_) => "not_whitelisted",
            Self::NotOwner(_) => "not_owner",
            Self::ChainMismatch { .. } => "chain_mismatch",
            Self::InsufficientEscrowBalance { .. } => "insufficient_balance",
            Self::InsufficientEscrowValue { .. } => "insufficient_value",
            Self::AmountOverflow { .. } => "amount_overflow",
            Self::InvalidCreationTime { .. } => "invalid_creation_time",
            Self::AddressMismatch { .. } => "address_mismatch",
            Self::Timelocks(_) => "invalid_timelocks",
            Self::Deploy(DeployError::AlreadyDeployed(_)) => "already_deployed",
            Self::Deploy(DeployError::MissingImplementation(_)) => "missing_implementation",
            Self::Transfer(_) => "transfer_failed",
        }
    }
}
