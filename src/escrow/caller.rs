use super::{CallContext, Escrow, EscrowStatus};
use crate::{
    chain::{Chain, CloneAccount},
    error::EscrowError,
    types::Immutables,
};
use alloy::primitives::{Address, B256, U256};
use std::sync::Arc;

/// A handle to call the escrow clone at an address.
///
/// Every state-changing call runs as its own transaction on the chain, so a failed call leaves no
/// trace.
#[derive(Debug)]
pub struct EscrowCaller<'a> {
    chain: &'a mut Chain,
    address: Address,
}

impl<'a> EscrowCaller<'a> {
    pub(crate) fn new(chain: &'a mut Chain, address: Address) -> Self {
        Self { chain, address }
    }

    /// Returns the address of the escrow.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the storage of the escrow clone.
    pub fn account(&self) -> Result<CloneAccount, EscrowError> {
        self.chain.clone_at(self.address).copied().ok_or(EscrowError::NoEscrow(self.address))
    }

    /// Returns the lifecycle status of the escrow.
    pub fn status(&self) -> Result<EscrowStatus, EscrowError> {
        self.account().map(|account| account.status)
    }

    /// Returns the hash of the immutables the escrow is bound to.
    pub fn immutables_hash(&self) -> Result<B256, EscrowError> {
        self.account().map(|account| account.salt)
    }

    /// Returns the implementation the escrow delegates to.
    pub fn implementation(&self) -> Result<Arc<dyn Escrow>, EscrowError> {
        let account = self.account()?;
        self.chain.implementation_at(account.implementation).ok_or(EscrowError::NoEscrow(self.address))
    }

    /// See [`Escrow::withdraw`].
    pub fn withdraw(
        &mut self,
        sender: Address,
        secret: B256,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        self.call(sender, |escrow, ctx| escrow.withdraw(ctx, secret, immutables))
    }

    /// See [`Escrow::public_withdraw`].
    pub fn public_withdraw(
        &mut self,
        sender: Address,
        secret: B256,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        self.call(sender, |escrow, ctx| escrow.public_withdraw(ctx, secret, immutables))
    }

    /// See [`Escrow::cancel`].
    pub fn cancel(&mut self, sender: Address, immutables: &Immutables) -> Result<(), EscrowError> {
        self.call(sender, |escrow, ctx| escrow.cancel(ctx, immutables))
    }

    /// See [`Escrow::public_cancel`].
    pub fn public_cancel(
        &mut self,
        sender: Address,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        self.call(sender, |escrow, ctx| escrow.public_cancel(ctx, immutables))
    }

    /// See [`Escrow::rescue_funds`].
    pub fn rescue_funds(
        &mut self,
        sender: Address,
        token: Address,
        amount: U256,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        self.call(sender, |escrow, ctx| escrow.rescue_funds(ctx, token, amount, immutables))
    }

    fn call<T>(
        &mut self,
        sender: Address,
        f: impl FnOnce(&dyn Escrow, &mut CallContext<'_>) -> Result<T, EscrowError>,
    ) -> Result<T, EscrowError> {
        let this = self.address;
        self.chain.transact(|chain| {
            let account = chain.clone_at(this).copied().ok_or(EscrowError::NoEscrow(this))?;
            let escrow =
                chain.implementation_at(account.implementation).ok_or(EscrowError::NoEscrow(this))?;
            let mut ctx = CallContext { chain, sender, this };
            f(escrow.as_ref(), &mut ctx)
        })
    }
}
