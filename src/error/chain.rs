use alloy::primitives::{Address, U256};
use thiserror::Error;

/// Errors returned by the [`Ledger`](crate::chain::Ledger) when moving value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The sender does not hold enough of the token.
    #[error("insufficient balance of {token} for {holder}: have {balance}, need {required}")]
    InsufficientBalance {
        /// The token being moved, or the zero address for the native currency.
        token: Address,
        /// The account being debited.
        holder: Address,
        /// The balance of the account.
        balance: U256,
        /// The amount requested.
        required: U256,
    },
    /// The spender is not allowed to move that much on behalf of the owner.
    #[error("insufficient allowance of {token} from {owner} to {spender}: have {allowance}, need {required}")]
    InsufficientAllowance {
        /// The token being moved.
        token: Address,
        /// The account whose tokens are moved.
        owner: Address,
        /// The account moving them.
        spender: Address,
        /// The current allowance.
        allowance: U256,
        /// The amount requested.
        required: U256,
    },
}

/// Errors returned when placing code on the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    /// Code already exists at the target address.
    #[error("code already deployed at {0}")]
    AlreadyDeployed(Address),
    /// The clone target is not an escrow implementation.
    #[error("no escrow implementation at {0}")]
    MissingImplementation(Address),
}
