//! # Swap Escrow
//!
//! Hash- and time-locked escrows for cross-chain atomic swaps.
//!
//! A maker locks funds in a source escrow on one chain, a resolver locks the counter-asset in a
//! destination escrow on another. Revealing the maker's secret on the destination chain unlocks
//! both. Escrows are minimal proxy clones deployed by an [`EscrowFactory`](factory::EscrowFactory)
//! at addresses derived from the swap terms, so they can be funded before they exist.
//!
//! Everything runs against the in-process [`Chain`](chain::Chain) model.

pub mod chain;
pub mod cli;
pub mod clones;
pub mod config;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod factory;
pub mod metrics;
pub mod types;
