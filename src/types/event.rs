//! Events emitted by escrows and the factory.

use super::{DstImmutablesComplement, Immutables, Stage};
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// An event emitted by an escrow clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EscrowEvent {
    /// The escrow was withdrawn, revealing the secret.
    #[serde(rename_all = "camelCase")]
    Withdrawal {
        /// The revealed secret.
        secret: B256,
        /// Hash of the escrow immutables.
        immutables_hash: B256,
        /// The stage that opened the window the withdrawal used.
        stage: Stage,
    },
    /// The escrow was cancelled.
    #[serde(rename_all = "camelCase")]
    Cancelled {
        /// Hash of the escrow immutables.
        immutables_hash: B256,
        /// The stage that opened the window the cancellation used.
        stage: Stage,
    },
    /// Residual funds were rescued.
    FundsRescued {
        /// The rescued token.
        token: Address,
        /// The rescued amount.
        amount: U256,
    },
}

/// An event emitted by the escrow factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FactoryEvent {
    /// A source escrow was created.
    #[serde(rename_all = "camelCase")]
    SrcEscrowCreated {
        /// Address of the escrow.
        escrow: Address,
        /// Hash of the escrow immutables.
        immutables_hash: B256,
        /// The escrow immutables, including the deployment timestamp.
        immutables: Box<Immutables>,
        /// Terms of the matching destination leg.
        dst_complement: DstImmutablesComplement,
    },
    /// A destination escrow was created.
    #[serde(rename_all = "camelCase")]
    DstEscrowCreated {
        /// Address of the escrow.
        escrow: Address,
        /// Hash of the escrow immutables.
        immutables_hash: B256,
        /// Hashlock of the swap.
        hashlock: B256,
        /// Resolver that created the escrow.
        taker: Address,
    },
    /// A resolver was added to the whitelist.
    ResolverAdded {
        /// The resolver.
        resolver: Address,
    },
    /// A resolver was removed from the whitelist.
    ResolverRemoved {
        /// The resolver.
        resolver: Address,
    },
    /// Escrow creation was paused.
    Paused,
    /// Escrow creation was resumed.
    Unpaused,
    /// The whitelist bypass was switched.
    WhitelistBypassSet {
        /// Whether the whitelist is bypassed.
        enabled: bool,
    },
}

/// Any event emitted on the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    /// Escrow event.
    Escrow(EscrowEvent),
    /// Factory event.
    Factory(FactoryEvent),
}

impl From<EscrowEvent> for Event {
    fn from(event: EscrowEvent) -> Self {
        Self::Escrow(event)
    }
}

impl From<FactoryEvent> for Event {
    fn from(event: FactoryEvent) -> Self {
        Self::Factory(event)
    }
}

/// An event together with the address that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// The emitting contract.
    pub address: Address,
    /// The event.
    pub event: Event,
}

impl Log {
    /// Returns the escrow event, if this is one.
    pub const fn as_escrow(&self) -> Option<&EscrowEvent> {
        match &self.event {
            Event::Escrow(event) => Some(event),
            Event::Factory(_) => None,
        }
    }

    /// Returns the factory event, if this is one.
    pub const fn as_factory(&self) -> Option<&FactoryEvent> {
        match &self.event {
            Event::Factory(event) => Some(event),
            Event::Escrow(_) => None,
        }
    }
}
