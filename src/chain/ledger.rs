//! Token balances and allowances.

use crate::error::TransferError;
use alloy::primitives::{Address, U256};
use std::collections::HashMap;

/// Balances and allowances of every token on a chain.
///
/// The zero address denotes the native currency. Allowances only apply to ERC20 tokens.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Balance per `(token, holder)`.
    balances: HashMap<(Address, Address), U256>,
    /// Allowance per `(token, owner, spender)`.
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl Ledger {
    /// Returns the balance of `holder` in `token`.
    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.balances.get(&(token, holder)).copied().unwrap_or_default()
    }

    /// Returns how much of `owner`'s `token` the `spender` may move.
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(token, owner, spender)).copied().unwrap_or_default()
    }

    /// Credits `amount` of `token` to `to` out of thin air.
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        let balance = self.balances.entry((token, to)).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Sets the allowance of `spender` over `owner`'s `token`.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Moves `amount` of `token` from `from` to `to`.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let balance = self.balance_of(token, from);
        let remaining = balance.checked_sub(amount).ok_or(TransferError::InsufficientBalance {
            token,
            holder: from,
            balance,
            required: amount,
        })?;
        self.balances.insert((token, from), remaining);
        self.mint(token, to, amount);
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to` on behalf of `spender`, spending its
    /// allowance.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let allowance = self.allowance(token, from, spender);
        let remaining = allowance.checked_sub(amount).ok_or(
            TransferError::InsufficientAllowance {
                token,
                owner: from,
                spender,
                allowance,
                required: amount,
            },
        )?;
        self.transfer(token, from, to, amount)?;
        if allowance != U256::MAX {
            self.approve(token, from, spender, remaining);
        }
        Ok(())
    }
}
