use super::{TimelocksError, TransferError};
use crate::{escrow::EscrowStatus, types::Stage};
use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

/// Errors returned by escrow calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// There is no escrow clone at the called address.
    #[error("no escrow deployed at {0}")]
    NoEscrow(Address),
    /// The caller is not the party allowed to use this path.
    #[error("invalid caller, expected {expected}, got {got}")]
    InvalidCaller {
        /// The party allowed to call.
        expected: Address,
        /// The actual caller.
        got: Address,
    },
    /// The caller is not allowed to rescue funds.
    #[error("{0} is not the rescuer of this escrow")]
    NotRescuer(Address),
    /// The supplied immutables do not hash to the ones the escrow was created with.
    #[error("invalid immutables, expected hash {expected}, got {got}")]
    InvalidImmutables {
        /// The hash the escrow is bound to.
        expected: B256,
        /// The hash of the supplied immutables.
        got: B256,
    },
    /// The secret does not hash to the hashlock.
    #[error("secret does not match the hashlock")]
    InvalidSecret,
    /// The call is outside of its time window.
    #[error(transparent)]
    InvalidTime(#[from] TimeWindowError),
    /// The escrow has already been settled or cancelled.
    #[error("escrow is no longer active: {0}")]
    NotActive(EscrowStatus),
    /// The rescue would touch funds still held in escrow.
    #[error("cannot rescue {requested}, only {available} is not held in escrow")]
    InsufficientResidue {
        /// Amount of the token not accounted for by the escrow.
        available: U256,
        /// Amount requested.
        requested: U256,
    },
    /// The escrow timelocks are unusable.
    #[error(transparent)]
    Timelocks(#[from] TimelocksError),
    /// Moving funds out of the escrow failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl EscrowError {
    /// Whether the same call can succeed later without changing its arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidTime(err) if err.is_retryable())
    }
}

/// A call made outside of the window its stage allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    /// The window has not opened yet.
    #[error("too early: window opens at {opens_at}, now is {now}")]
    TooEarly {
        /// The stage that opens the window, `None` for the rescue delay.
        stage: Option<Stage>,
        /// Timestamp at which the window opens.
        opens_at: u64,
        /// Current block timestamp.
        now: u64,
    },
    /// The window has already closed.
    #[error("too late: window closed by {stage} at {closed_at}, now is {now}")]
    TooLate {
        /// The stage that closed the window.
        stage: Stage,
        /// Timestamp at which the window closed.
        closed_at: u64,
        /// Current block timestamp.
        now: u64,
    },
}

impl TimeWindowError {
    /// Whether waiting can make the call succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TooEarly { .. })
    }
}
