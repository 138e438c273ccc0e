//! The escrow factory.
//!
//! The factory deploys escrow clones at addresses derived from the immutables hash, so a counterparty
//! can compute the address of an escrow and fund it before it exists. Creation is gated by an
//! [`AdmissionPolicy`]. Escrows created by the factory do not depend on it afterwards: pausing the
//! factory only stops new escrows.

mod admission;
pub use admission::AdmissionPolicy;

use crate::{
    chain::Chain,
    clones::{predict_with_bytecode_hash, proxy_bytecode_hash},
    config::FactoryConfig,
    constants::{DST_IMPLEMENTATION_NONCE, NATIVE_TOKEN, SRC_IMPLEMENTATION_NONCE},
    error::FactoryError,
    escrow::{EscrowDst, EscrowKind, EscrowSrc},
    metrics::{EscrowMetrics, record_factory_rejection},
    types::{DstImmutablesComplement, FactoryEvent, Immutables, Msg, Stage},
};
use alloy::primitives::{Address, B256, U256};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Returns the address of the escrow implementation of `kind` deployed by `factory`.
pub fn implementation_address(factory: Address, kind: EscrowKind) -> Address {
    match kind {
        EscrowKind::Src => factory.create(SRC_IMPLEMENTATION_NONCE),
        EscrowKind::Dst => factory.create(DST_IMPLEMENTATION_NONCE),
    }
}

/// A deployed escrow factory.
#[derive(Debug, Clone)]
pub struct EscrowFactory {
    address: Address,
    owner: Address,
    src_implementation: Address,
    dst_implementation: Address,
    proxy_src_bytecode_hash: B256,
    proxy_dst_bytecode_hash: B256,
    policy: AdmissionPolicy,
}

impl EscrowFactory {
    /// Deploys a factory and both escrow implementations on `chain`.
    pub fn deploy(chain: &mut Chain, config: &FactoryConfig) -> Result<Self, FactoryError> {
        if config.chain_id != chain.chain_id() {
            return Err(FactoryError::ChainMismatch {
                expected: config.chain_id,
                got: chain.chain_id(),
            });
        }

        let address = config.factory;
        let src_implementation = implementation_address(address, EscrowKind::Src);
        let dst_implementation = implementation_address(address, EscrowKind::Dst);
        chain.transact(|chain| {
            chain.install_contract(address, "EscrowFactory")?;
            chain.install_implementation(
                src_implementation,
                Arc::new(EscrowSrc::new(config.rescue_delay_src)),
            )?;
            chain.install_implementation(
                dst_implementation,
                Arc::new(EscrowDst::new(config.rescue_delay_dst)),
            )
        })?;

        let factory = Self {
            address,
            owner: config.owner,
            src_implementation,
            dst_implementation,
            proxy_src_bytecode_hash: proxy_bytecode_hash(src_implementation),
            proxy_dst_bytecode_hash: proxy_bytecode_hash(dst_implementation),
            policy: AdmissionPolicy::new(config.resolvers.iter().copied(), config.bypass_whitelist),
        };
        info!(
            chain_id = chain.chain_id(),
            factory = %address,
            %src_implementation,
            %dst_implementation,
            resolvers = factory.policy.resolver_count(),
            "deployed escrow factory"
        );
        Ok(factory)
    }

    /// Returns the factory address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the factory owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the implementation cloned by escrows of `kind`.
    pub const fn implementation(&self, kind: EscrowKind) -> Address {
        match kind {
            EscrowKind::Src => self.src_implementation,
            EscrowKind::Dst => self.dst_implementation,
        }
    }

    /// Returns the admission policy.
    pub const fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    /// Whether `resolver` is whitelisted.
    pub fn is_whitelisted(&self, resolver: &Address) -> bool {
        self.policy.is_whitelisted(resolver)
    }

    /// Returns the number of whitelisted resolvers.
    pub fn resolver_count(&self) -> usize {
        self.policy.resolver_count()
    }

    /// Whether escrow creation is paused.
    pub const fn is_paused(&self) -> bool {
        self.policy.is_paused()
    }

    /// Whether the whitelist is bypassed.
    pub const fn bypass_whitelist(&self) -> bool {
        self.policy.bypass_whitelist()
    }

    /// Returns the address of the source escrow for `immutables`.
    ///
    /// The timelocks must carry the deployment timestamp the escrow is, or will be, created with.
    pub fn address_of_escrow_src(&self, immutables: &Immutables) -> Address {
        predict_with_bytecode_hash(self.proxy_src_bytecode_hash, immutables.hash(), self.address)
    }

    /// Returns the address of the destination escrow for `immutables`.
    ///
    /// The timelocks must carry the deployment timestamp the escrow is, or will be, created with.
    pub fn address_of_escrow_dst(&self, immutables: &Immutables) -> Address {
        predict_with_bytecode_hash(self.proxy_dst_bytecode_hash, immutables.hash(), self.address)
    }

    /// Returns the address of the escrow of `kind` for `immutables`.
    pub fn address_of_escrow(&self, kind: EscrowKind, immutables: &Immutables) -> Address {
        match kind {
            EscrowKind::Src => self.address_of_escrow_src(immutables),
            EscrowKind::Dst => self.address_of_escrow_dst(immutables),
        }
    }

    /// Creates the source escrow for `immutables`, deployed at the current block timestamp.
    ///
    /// The escrow address must already hold `amount` of the token and the safety deposit, see
    /// [`EscrowFactory::address_of_escrow_src`]. Native value sent with the call is added to the
    /// escrow before the check. Returns the escrow address and its immutables.
    #[instrument(skip_all, fields(factory = %self.address, sender = %msg.sender))]
    pub fn create_src_escrow(
        &self,
        chain: &mut Chain,
        msg: Msg,
        immutables: &Immutables,
        dst_complement: DstImmutablesComplement,
    ) -> Result<(Address, Immutables), FactoryError> {
        self.try_create_src_escrow(chain, msg, immutables, dst_complement)
            .inspect_err(|err| self.reject(EscrowKind::Src, err))
    }

    fn try_create_src_escrow(
        &self,
        chain: &mut Chain,
        msg: Msg,
        immutables: &Immutables,
        dst_complement: DstImmutablesComplement,
    ) -> Result<(Address, Immutables), FactoryError> {
        self.policy.admit(msg.sender)?;
        immutables.timelocks.validate()?;
        let required = native_value(immutables)?;

        let immutables = self.deployed_now(chain, immutables)?;
        let immutables_hash = immutables.hash();
        let escrow = self.address_of_escrow_src(&immutables);

        chain.transact(|chain| {
            chain.transfer(NATIVE_TOKEN, msg.sender, escrow, msg.value)?;
            ensure_balance(chain, escrow, NATIVE_TOKEN, required)?;
            if !immutables.is_native() {
                ensure_balance(chain, escrow, immutables.token, immutables.amount)?;
            }

            self.deploy_escrow(chain, EscrowKind::Src, immutables_hash, escrow)?;
            chain.emit(
                self.address,
                FactoryEvent::SrcEscrowCreated {
                    escrow,
                    immutables_hash,
                    immutables: Box::new(immutables.clone()),
                    dst_complement,
                },
            );
            Ok::<_, FactoryError>(())
        })?;

        EscrowMetrics::new(EscrowKind::Src.as_str()).record_created();
        info!(%escrow, %immutables_hash, maker = %immutables.maker, "created source escrow");
        Ok((escrow, immutables))
    }

    /// Creates the destination escrow for `immutables`, deployed at the current block timestamp.
    ///
    /// The call must carry the safety deposit as native value, plus the amount if the token is
    /// native. ERC20 amounts are pulled from the caller, which must have approved the factory.
    /// The destination escrow must become cancellable no later than `src_cancellation_timestamp`,
    /// the cancellation start of the matching source escrow. Returns the escrow address and its
    /// immutables.
    #[instrument(skip_all, fields(factory = %self.address, sender = %msg.sender))]
    pub fn create_dst_escrow(
        &self,
        chain: &mut Chain,
        msg: Msg,
        immutables: &Immutables,
        src_cancellation_timestamp: u64,
    ) -> Result<(Address, Immutables), FactoryError> {
        self.try_create_dst_escrow(chain, msg, immutables, src_cancellation_timestamp)
            .inspect_err(|err| self.reject(EscrowKind::Dst, err))
    }

    fn try_create_dst_escrow(
        &self,
        chain: &mut Chain,
        msg: Msg,
        immutables: &Immutables,
        src_cancellation_timestamp: u64,
    ) -> Result<(Address, Immutables), FactoryError> {
        self.policy.admit(msg.sender)?;
        immutables.timelocks.validate()?;

        let required = native_value(immutables)?;
        if msg.value != required {
            return Err(FactoryError::InsufficientEscrowValue { required, provided: msg.value });
        }

        let immutables = self.deployed_now(chain, immutables)?;
        let dst_cancellation = immutables.timelocks.get(Stage::DstCancellation)?;
        if dst_cancellation > src_cancellation_timestamp {
            return Err(FactoryError::InvalidCreationTime {
                dst_cancellation,
                src_cancellation: src_cancellation_timestamp,
            });
        }

        let immutables_hash = immutables.hash();
        let escrow = self.address_of_escrow_dst(&immutables);

        chain.transact(|chain| {
            self.deploy_escrow(chain, EscrowKind::Dst, immutables_hash, escrow)?;
            chain.transfer(NATIVE_TOKEN, msg.sender, escrow, msg.value)?;
            if !immutables.is_native() {
                chain.ledger_mut().transfer_from(
                    self.address,
                    immutables.token,
                    msg.sender,
                    escrow,
                    immutables.amount,
                )?;
            }
            chain.emit(
                self.address,
                FactoryEvent::DstEscrowCreated {
                    escrow,
                    immutables_hash,
                    hashlock: immutables.hashlock,
                    taker: immutables.taker,
                },
            );
            Ok::<_, FactoryError>(())
        })?;

        EscrowMetrics::new(EscrowKind::Dst.as_str()).record_created();
        info!(%escrow, %immutables_hash, taker = %immutables.taker, "created destination escrow");
        Ok((escrow, immutables))
    }

    /// Returns `immutables` deployed at the current block timestamp.
    fn deployed_now(&self, chain: &Chain, immutables: &Immutables) -> Result<Immutables, FactoryError> {
        let timelocks = immutables.timelocks.deployed_at_timestamp(chain.timestamp())?;
        Ok(Immutables { timelocks, ..immutables.clone() })
    }

    /// Deploys the clone and checks it landed at the predicted address.
    fn deploy_escrow(
        &self,
        chain: &mut Chain,
        kind: EscrowKind,
        salt: B256,
        predicted: Address,
    ) -> Result<(), FactoryError> {
        let deployed = chain.deploy_clone(self.address, self.implementation(kind), salt)?;
        if deployed != predicted {
            return Err(FactoryError::AddressMismatch { predicted, deployed });
        }
        Ok(())
    }

    fn reject(&self, kind: EscrowKind, err: &FactoryError) {
        record_factory_rejection(err.reason());
        warn!(factory = %self.address, %kind, %err, "rejected escrow creation");
    }

    fn only_owner(&self, sender: Address) -> Result<(), FactoryError> {
        if sender != self.owner {
            return Err(FactoryError::NotOwner(sender));
        }
        Ok(())
    }

    /// Whitelists `resolver`. Returns whether it was not whitelisted already.
    pub fn add_resolver_to_whitelist(
        &mut self,
        chain: &mut Chain,
        sender: Address,
        resolver: Address,
    ) -> Result<bool, FactoryError> {
        self.only_owner(sender)?;
        let added = self.policy.add(resolver);
        if added {
            chain.emit(self.address, FactoryEvent::ResolverAdded { resolver });
            info!(factory = %self.address, %resolver, "whitelisted resolver");
        }
        Ok(added)
    }

    /// Removes `resolver` from the whitelist. Returns whether it was whitelisted.
    pub fn remove_resolver_from_whitelist(
        &mut self,
        chain: &mut Chain,
        sender: Address,
        resolver: Address,
    ) -> Result<bool, FactoryError> {
        self.only_owner(sender)?;
        let removed = self.policy.remove(&resolver);
        if removed {
            chain.emit(self.address, FactoryEvent::ResolverRemoved { resolver });
            info!(factory = %self.address, %resolver, "removed resolver from whitelist");
        }
        Ok(removed)
    }

    /// Pauses escrow creation. Returns whether the factory was running.
    pub fn pause(&mut self, chain: &mut Chain, sender: Address) -> Result<bool, FactoryError> {
        self.only_owner(sender)?;
        let changed = self.policy.set_paused(true);
        if changed {
            chain.emit(self.address, FactoryEvent::Paused);
            info!(factory = %self.address, "paused escrow creation");
        }
        Ok(changed)
    }

    /// Resumes escrow creation. Returns whether the factory was paused.
    pub fn unpause(&mut self, chain: &mut Chain, sender: Address) -> Result<bool, FactoryError> {
        self.only_owner(sender)?;
        let changed = self.policy.set_paused(false);
        if changed {
            chain.emit(self.address, FactoryEvent::Unpaused);
            info!(factory = %self.address, "resumed escrow creation");
        }
        Ok(changed)
    }

    /// Sets whether anyone may create escrows. Returns whether the setting changed.
    pub fn set_whitelist_bypass(
        &mut self,
        chain: &mut Chain,
        sender: Address,
        enabled: bool,
    ) -> Result<bool, FactoryError> {
        self.only_owner(sender)?;
        let changed = self.policy.set_bypass_whitelist(enabled);
        if changed {
            chain.emit(self.address, FactoryEvent::WhitelistBypassSet { enabled });
            info!(factory = %self.address, enabled, "set whitelist bypass");
        }
        Ok(changed)
    }
}

/// Returns the native value `immutables` lock, rejecting amounts that overflow.
fn native_value(immutables: &Immutables) -> Result<U256, FactoryError> {
    immutables.native_value().ok_or(FactoryError::AmountOverflow {
        amount: immutables.amount,
        safety_deposit: immutables.safety_deposit,
    })
}

fn ensure_balance(
    chain: &Chain,
    escrow: Address,
    token: Address,
    required: U256,
) -> Result<(), FactoryError> {
    let available = chain.balance_of(token, escrow);
    if available < required {
        return Err(FactoryError::InsufficientEscrowBalance { escrow, token, required, available });
    }
    Ok(())
}
