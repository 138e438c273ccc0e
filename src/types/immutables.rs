//! Escrow immutables.
//!
//! The immutables of a swap leg are supplied on escrow creation and re-supplied on every call to the
//! escrow afterwards. Their hash is both the CREATE2 salt of the escrow clone and the only thing the
//! escrow stores to authenticate callers.

use super::Timelocks;
use crate::constants::NATIVE_TOKEN;
use alloy::{
    primitives::{Address, B256, ChainId, U256, keccak256},
    sol,
    sol_types::SolValue,
};
use serde::{Deserialize, Serialize};

sol! {
    /// ABI layout of the escrow immutables, used for hashing.
    #[derive(Debug, PartialEq, Eq)]
    struct EscrowImmutables {
        /// Hash of the order this leg belongs to.
        bytes32 orderHash;
        /// Hash of the secret.
        bytes32 hashlock;
        /// Maker of the swap.
        address maker;
        /// Resolver taking the swap.
        address taker;
        /// Token locked in the escrow, or the zero address for the native currency.
        address token;
        /// Amount of `token` locked in the escrow.
        uint256 amount;
        /// Native deposit paid to whoever settles the escrow.
        uint256 safetyDeposit;
        /// Packed timelocks.
        uint256 timelocks;
    }
}

/// Terms of one leg of a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Immutables {
    /// Hash of the order this leg belongs to. May be zero.
    #[serde(default)]
    pub order_hash: B256,
    /// Hash of the maker's secret.
    pub hashlock: B256,
    /// Maker of the swap.
    pub maker: Address,
    /// Resolver taking the swap.
    pub taker: Address,
    /// Token locked in the escrow, or the zero address for the native currency.
    #[serde(default)]
    pub token: Address,
    /// Amount of `token` locked in the escrow.
    pub amount: U256,
    /// Native deposit paid to whoever settles the escrow.
    #[serde(default)]
    pub safety_deposit: U256,
    /// Stage offsets and deployment timestamp.
    pub timelocks: Timelocks,
}

impl Immutables {
    /// Returns the ABI representation of the immutables.
    pub fn to_abi(&self) -> EscrowImmutables {
        EscrowImmutables {
            orderHash: self.order_hash,
            hashlock: self.hashlock,
            maker: self.maker,
            taker: self.taker,
            token: self.token,
            amount: self.amount,
            safetyDeposit: self.safety_deposit,
            timelocks: self.timelocks.pack(),
        }
    }

    /// Returns the hash identifying these immutables.
    pub fn hash(&self) -> B256 {
        keccak256(self.to_abi().abi_encode())
    }

    /// Returns a copy with the timelocks deployed at `deployed_at`.
    pub const fn with_deployed_at(mut self, deployed_at: u32) -> Self {
        self.timelocks = self.timelocks.with_deployed_at(deployed_at);
        self
    }

    /// Whether the locked token is the native currency.
    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }

    /// Whether `secret` opens the hashlock.
    pub fn is_secret(&self, secret: &B256) -> bool {
        hashlock(secret) == self.hashlock
    }

    /// Native value the escrow must hold: the safety deposit, plus the amount if the token is native.
    ///
    /// Returns `None` if the sum does not fit 256 bits.
    pub fn native_value(&self) -> Option<U256> {
        if self.is_native() {
            self.safety_deposit.checked_add(self.amount)
        } else {
            Some(self.safety_deposit)
        }
    }
}

impl From<EscrowImmutables> for Immutables {
    fn from(abi: EscrowImmutables) -> Self {
        Self {
            order_hash: abi.orderHash,
            hashlock: abi.hashlock,
            maker: abi.maker,
            taker: abi.taker,
            token: abi.token,
            amount: abi.amount,
            safety_deposit: abi.safetyDeposit,
            timelocks: Timelocks::from_packed(abi.timelocks),
        }
    }
}

/// Returns the hashlock committing to `secret`.
pub fn hashlock(secret: &B256) -> B256 {
    keccak256(secret)
}

/// The destination leg terms published alongside a source escrow.
///
/// Together with the source immutables this is everything a resolver needs to create the matching
/// destination escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DstImmutablesComplement {
    /// Address receiving the funds on the destination chain.
    pub maker: Address,
    /// Amount the maker receives on the destination chain.
    pub amount: U256,
    /// Token the maker receives on the destination chain.
    pub token: Address,
    /// Safety deposit of the destination escrow.
    pub safety_deposit: U256,
    /// Destination chain id.
    pub chain_id: ChainId,
}

impl DstImmutablesComplement {
    /// Builds the destination immutables for `src`, taken by `taker` on the destination chain.
    ///
    /// The order hash, hashlock and stage offsets carry over. The deployment timestamp is cleared
    /// since the destination escrow is deployed separately.
    pub fn into_dst_immutables(self, src: &Immutables, taker: Address) -> Immutables {
        Immutables {
            order_hash: src.order_hash,
            hashlock: src.hashlock,
            maker: self.maker,
            taker,
            token: self.token,
            amount: self.amount,
            safety_deposit: self.safety_deposit,
            timelocks: src.timelocks.with_deployed_at(0),
        }
    }
}
