use super::{Escrow, EscrowKind, Roles, StageSchedule};
use crate::{constants::DEFAULT_RESCUE_DELAY, types::{Immutables, Stage}};

/// Escrow on the destination chain.
///
/// Holds the resolver's funds. The resolver releases them to the maker by revealing the secret, and
/// gets them back on cancellation. There is no separate public cancellation stage: anyone may cancel
/// once cancellation opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowDst {
    rescue_delay: u64,
}

impl EscrowDst {
    /// Creates a destination escrow implementation with the given rescue delay.
    pub const fn new(rescue_delay: u64) -> Self {
        Self { rescue_delay }
    }
}

impl Default for EscrowDst {
    fn default() -> Self {
        Self::new(DEFAULT_RESCUE_DELAY)
    }
}

impl Escrow for EscrowDst {
    fn kind(&self) -> EscrowKind {
        EscrowKind::Dst
    }

    fn rescue_delay(&self) -> u64 {
        self.rescue_delay
    }

    fn schedule(&self) -> StageSchedule {
        StageSchedule {
            withdrawal: Stage::DstWithdrawal,
            public_withdrawal: Stage::DstPublicWithdrawal,
            cancellation: Stage::DstCancellation,
            public_cancellation: Stage::DstCancellation,
        }
    }

    fn roles(&self, immutables: &Immutables) -> Roles {
        Roles {
            withdrawer: immutables.taker,
            recipient: immutables.maker,
            canceller: immutables.taker,
            refundee: immutables.taker,
            rescuer: immutables.taker,
        }
    }
}
