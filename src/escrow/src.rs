use super::{Escrow, EscrowKind, Roles, StageSchedule};
use crate::{constants::DEFAULT_RESCUE_DELAY, types::{Immutables, Stage}};

/// Escrow on the source chain.
///
/// Holds the maker's funds. The taker withdraws them by revealing the secret, and the maker gets
/// them back on cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowSrc {
    rescue_delay: u64,
}

impl EscrowSrc {
    /// Creates a source escrow implementation with the given rescue delay.
    pub const fn new(rescue_delay: u64) -> Self {
        Self { rescue_delay }
    }
}

impl Default for EscrowSrc {
    fn default() -> Self {
        Self::new(DEFAULT_RESCUE_DELAY)
    }
}

impl Escrow for EscrowSrc {
    fn kind(&self) -> EscrowKind {
        EscrowKind::Src
    }

    fn rescue_delay(&self) -> u64 {
        self.rescue_delay
    }

    fn schedule(&self) -> StageSchedule {
        StageSchedule {
            withdrawal: Stage::SrcWithdrawal,
            public_withdrawal: Stage::SrcPublicWithdrawal,
            cancellation: Stage::SrcCancellation,
            public_cancellation: Stage::SrcPublicCancellation,
        }
    }

    fn roles(&self, immutables: &Immutables) -> Roles {
        Roles {
            withdrawer: immutables.taker,
            recipient: immutables.taker,
            canceller: immutables.maker,
            refundee: immutables.maker,
            rescuer: immutables.taker,
        }
    }
}
