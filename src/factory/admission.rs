use crate::error::FactoryError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Who may create escrows through the factory.
///
/// Pausing takes precedence over the whitelist: a paused factory rejects everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionPolicy {
    whitelist: BTreeSet<Address>,
    paused: bool,
    bypass_whitelist: bool,
}

impl AdmissionPolicy {
    /// Creates an unpaused policy admitting `resolvers`.
    pub fn new(resolvers: impl IntoIterator<Item = Address>, bypass_whitelist: bool) -> Self {
        Self { whitelist: resolvers.into_iter().collect(), paused: false, bypass_whitelist }
    }

    /// Checks whether `caller` may create an escrow.
    pub fn admit(&self, caller: Address) -> Result<(), FactoryError> {
        debug!(%caller, paused = self.paused, bypass = self.bypass_whitelist, "checking admission");
        if self.paused {
            return Err(FactoryError::Paused);
        }
        if !self.bypass_whitelist && !self.whitelist.contains(&caller) {
            return Err(FactoryError::NotWhitelisted(caller));
        }
        Ok(())
    }

    /// Whether `resolver` is whitelisted.
    pub fn is_whitelisted(&self, resolver: &Address) -> bool {
        self.whitelist.contains(resolver)
    }

    /// Returns the whitelisted resolvers.
    pub fn resolvers(&self) -> impl Iterator<Item = &Address> {
        self.whitelist.iter()
    }

    /// Returns the number of whitelisted resolvers.
    pub fn resolver_count(&self) -> usize {
        self.whitelist.len()
    }

    /// Whether escrow creation is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the whitelist is bypassed.
    pub const fn bypass_whitelist(&self) -> bool {
        self.bypass_whitelist
    }

    /// Whitelists `resolver`, returning whether it was not already.
    pub fn add(&mut self, resolver: Address) -> bool {
        self.whitelist.insert(resolver)
    }

    /// Removes `resolver` from the whitelist, returning whether it was whitelisted.
    pub fn remove(&mut self, resolver: &Address) -> bool {
        self.whitelist.remove(resolver)
    }

    /// Sets the pause flag, returning whether it changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        std::mem::replace(&mut self.paused, paused) != paused
    }

    /// Sets the whitelist bypass, returning whether it changed.
    pub fn set_bypass_whitelist(&mut self, bypass: bool) -> bool {
        std::mem::replace(&mut self.bypass_whitelist, bypass) != bypass
    }
}
