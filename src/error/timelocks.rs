use crate::types::Stage;
use thiserror::Error;

/// Errors related to [`Timelocks`](crate::types::Timelocks).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelocksError {
    /// A stage deadline was read before the deployment timestamp was set.
    #[error("timelocks have no deployment timestamp")]
    NotDeployed,
    /// Two stages of the same leg are out of order.
    #[error("stage {earlier} must not end after stage {later}")]
    NonMonotonic {
        /// The stage expected to come first.
        earlier: Stage,
        /// The stage expected to come second.
        later: Stage,
    },
    /// A zero deployment timestamp would read as not deployed.
    #[error("deployment timestamp must not be zero")]
    ZeroTimestamp,
    /// The timestamp does not fit the 32-bit deployment field.
    #[error("timestamp {0} does not fit in 32 bits")]
    TimestampOverflow(u64),
}
