//! Escrow factory configuration.
use crate::constants::DEFAULT_RESCUE_DELAY;
use alloy::primitives::{Address, ChainId};
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployment configuration of an escrow factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryConfig {
    /// Chain the factory is deployed on.
    pub chain_id: ChainId,
    /// Owner of the factory, allowed to manage the whitelist and pause creation.
    pub owner: Address,
    /// Address of the factory.
    pub factory: Address,
    /// Rescue delay of source escrows, in seconds.
    #[serde(default = "default_rescue_delay")]
    pub rescue_delay_src: u64,
    /// Rescue delay of destination escrows, in seconds.
    #[serde(default = "default_rescue_delay")]
    pub rescue_delay_dst: u64,
    /// Whether anyone may create escrows, whitelisted or not.
    #[serde(default)]
    pub bypass_whitelist: bool,
    /// Resolvers whitelisted on deployment.
    #[serde(default)]
    pub resolvers: Vec<Address>,
}

const fn default_rescue_delay() -> u64 {
    DEFAULT_RESCUE_DELAY
}

impl FactoryConfig {
    /// Creates a configuration with default delays and an empty whitelist.
    pub const fn new(chain_id: ChainId, owner: Address, factory: Address) -> Self {
        Self {
            chain_id,
            owner,
            factory,
            rescue_delay_src: DEFAULT_RESCUE_DELAY,
            rescue_delay_dst: DEFAULT_RESCUE_DELAY,
            bypass_whitelist: false,
            resolvers: Vec::new(),
        }
    }

    /// Sets the rescue delay of source escrows.
    pub fn with_rescue_delay_src(mut self, delay: u64) -> Self {
        self.rescue_delay_src = delay;
        self
    }

    /// Sets the rescue delay of destination escrows.
    pub fn with_rescue_delay_dst(mut self, delay: u64) -> Self {
        self.rescue_delay_dst = delay;
        self
    }

    /// Sets whether the whitelist is bypassed.
    pub fn with_bypass_whitelist(mut self, bypass: bool) -> Self {
        self.bypass_whitelist = bypass;
        self
    }

    /// Extends the initial whitelist.
    pub fn with_resolvers(mut self, resolvers: impl IntoIterator<Item = Address>) -> Self {
        self.resolvers.extend(resolvers);
        self
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .wrap_err_with(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
