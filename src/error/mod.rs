//! Escrow error types.
//!
//! Every error aborts the call that produced it; the chain model rolls back any state the call
//! touched before returning it.

mod chain;
pub use chain::{DeployError, TransferError};

mod escrow;
pub use escrow::{EscrowError, TimeWindowError};

mod factory;
pub use factory::FactoryError;

mod timelocks;
pub use timelocks::TimelocksError;
