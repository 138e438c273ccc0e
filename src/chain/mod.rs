//! In-process model of an EVM chain.
//!
//! A [`Chain`] holds the block environment, token balances, deployed code and the event log. Every
//! state-changing call runs through [`Chain::transact`], which discards all of the call's effects if
//! it fails.

mod ledger;
pub use ledger::Ledger;

use crate::{
    clones::predict_deterministic_address,
    error::{DeployError, TransferError},
    escrow::{Escrow, EscrowCaller, EscrowStatus},
    types::{Event, Log},
};
use alloy::primitives::{Address, B256, ChainId, U256};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, trace};

/// Code deployed at an address.
#[derive(Debug, Clone)]
pub enum Code {
    /// A contract the chain does not execute, identified by name.
    Opaque(&'static str),
    /// An escrow implementation.
    Implementation(Arc<dyn Escrow>),
    /// A minimal proxy delegating to an escrow implementation.
    Clone(CloneAccount),
}

/// Storage of an escrow clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneAccount {
    /// The implementation the clone delegates to.
    pub implementation: Address,
    /// The CREATE2 salt, which is the hash of the escrow immutables.
    pub salt: B256,
    /// Lifecycle status of the escrow.
    pub status: EscrowStatus,
}

#[derive(Debug, Default)]
struct ChainState {
    ledger: Ledger,
    code: HashMap<Address, Code>,
    logs: Vec<Log>,
}

/// A single chain.
#[derive(Debug)]
pub struct Chain {
    chain_id: ChainId,
    timestamp: u64,
    state: ChainState,
}

impl Chain {
    /// Creates an empty chain at `timestamp`.
    pub fn new(chain_id: ChainId, timestamp: u64) -> Self {
        Self { chain_id, timestamp, state: ChainState::default() }
    }

    /// Returns the chain id.
    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Returns the current block timestamp.
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Sets the block timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Advances the block timestamp by `seconds`.
    pub fn warp(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    /// Returns the ledger.
    pub const fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    /// Returns the ledger mutably.
    ///
    /// Changes made here are not rolled back unless they happen inside [`Chain::transact`].
    pub const fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.state.ledger
    }

    /// Returns the balance of `holder` in `token`.
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.state.ledger.balance_of(token, holder)
    }

    /// Credits `amount` of `token` to `to`.
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        self.state.ledger.mint(token, to, amount);
    }

    /// Moves `amount` of `token` from `from` to `to`.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        self.state.ledger.transfer(token, from, to, amount)
    }

    /// Returns the code at `address`.
    pub fn code_at(&self, address: Address) -> Option<&Code> {
        self.state.code.get(&address)
    }

    /// Whether there is code at `address`.
    pub fn has_code(&self, address: Address) -> bool {
        self.state.code.contains_key(&address)
    }

    /// Returns the escrow implementation at `address`.
    pub fn implementation_at(&self, address: Address) -> Option<Arc<dyn Escrow>> {
        match self.code_at(address)? {
            Code::Implementation(escrow) => Some(Arc::clone(escrow)),
            Code::Opaque(_) | Code::Clone(_) => None,
        }
    }

    /// Returns the clone storage at `address`.
    pub fn clone_at(&self, address: Address) -> Option<&CloneAccount> {
        match self.code_at(address)? {
            Code::Clone(account) => Some(account),
            Code::Opaque(_) | Code::Implementation(_) => None,
        }
    }

    pub(crate) fn clone_at_mut(&mut self, address: Address) -> Option<&mut CloneAccount> {
        match self.state.code.get_mut(&address)? {
            Code::Clone(account) => Some(account),
            Code::Opaque(_) | Code::Implementation(_) => None,
        }
    }

    fn install(&mut self, address: Address, code: Code) -> Result<(), DeployError> {
        if self.has_code(address) {
            return Err(DeployError::AlreadyDeployed(address));
        }
        self.state.code.insert(address, code);
        Ok(())
    }

    /// Places a contract the chain does not execute at `address`.
    pub fn install_contract(&mut self, address: Address, name: &'static str) -> Result<(), DeployError> {
        self.install(address, Code::Opaque(name))
    }

    /// Places an escrow implementation at `address`.
    pub fn install_implementation(
        &mut self,
        address: Address,
        implementation: Arc<dyn Escrow>,
    ) -> Result<(), DeployError> {
        debug!(%address, kind = %implementation.kind(), "installing escrow implementation");
        self.install(address, Code::Implementation(implementation))
    }

    /// Deploys a clone of `implementation` from `deployer` with `salt`, returning its address.
    ///
    /// Balances already held by the clone address are kept.
    pub fn deploy_clone(
        &mut self,
        deployer: Address,
        implementation: Address,
        salt: B256,
    ) -> Result<Address, DeployError> {
        if self.implementation_at(implementation).is_none() {
            return Err(DeployError::MissingImplementation(implementation));
        }
        let address = predict_deterministic_address(implementation, salt, deployer);
        self.install(
            address,
            Code::Clone(CloneAccount { implementation, salt, status: EscrowStatus::Active }),
        )?;
        Ok(address)
    }

    /// Appends an event emitted by `address` to the log.
    pub fn emit(&mut self, address: Address, event: impl Into<Event>) {
        let log = Log { address, event: event.into() };
        trace!(?log, "emitted");
        self.state.logs.push(log);
    }

    /// Returns every log emitted so far.
    pub fn logs(&self) -> &[Log] {
        &self.state.logs
    }

    /// Returns the logs emitted by `address`.
    pub fn logs_of(&self, address: Address) -> impl Iterator<Item = &Log> {
        self.state.logs.iter().filter(move |log| log.address == address)
    }

    /// Runs `f` as a transaction.
    ///
    /// If `f` fails, the ledger, code and logs are restored to their state before the call. The log
    /// is append-only, so only its length is recorded.
    pub fn transact<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let ledger = self.state.ledger.clone();
        let code = self.state.code.clone();
        let logs = self.state.logs.len();
        let result = f(self);
        if result.is_err() {
            self.state.ledger = ledger;
            self.state.code = code;
            self.state.logs.truncate(logs);
        }
        result
    }

    /// Returns a handle to call the escrow at `address`.
    pub fn escrow(&mut self, address: Address) -> EscrowCaller<'_> {
        EscrowCaller::new(self, address)
    }
}
