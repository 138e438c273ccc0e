//! Hash- and time-locked escrows.
//!
//! Both escrow variants share one state machine, implemented by the provided methods of [`Escrow`].
//! A variant only decides who plays which role and which timelock stages gate its windows.
//!
//! Escrows do not store their terms. Every call re-supplies the [`Immutables`], and the escrow
//! checks that they hash to the salt its clone was created with.

mod caller;
pub use caller::EscrowCaller;

mod dst;
pub use dst::EscrowDst;

mod src;
pub use src::EscrowSrc;

use crate::{
    chain::{Chain, CloneAccount},
    constants::NATIVE_TOKEN,
    error::{EscrowError, TimeWindowError, TransferError},
    metrics::EscrowMetrics,
    types::{EscrowEvent, Immutables, Stage, Timelocks},
};
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumString};
use tracing::info;

/// The two escrow variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EscrowKind {
    /// Escrow on the source chain, funded by the maker.
    Src,
    /// Escrow on the destination chain, funded by the resolver.
    Dst,
}

impl EscrowKind {
    /// Returns the kind as a static string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Dst => "dst",
        }
    }
}

/// Lifecycle status of an escrow clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EscrowStatus {
    /// Funds are locked.
    Active,
    /// Funds were released to the recipient.
    Withdrawn,
    /// Funds were returned to the depositor.
    Cancelled,
}

impl EscrowStatus {
    /// Whether the escrow still holds its funds.
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Whether a call went through the role-restricted or the public path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Access {
    /// Only the party holding the role may call.
    Private,
    /// Anyone may call.
    Public,
}

impl Access {
    /// Returns the access as a static string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
        }
    }
}

/// The stages opening each window of an escrow.
///
/// Withdrawal windows close when [`StageSchedule::cancellation`] opens. Cancellation windows never
/// close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSchedule {
    /// Opens the private withdrawal window.
    pub withdrawal: Stage,
    /// Opens the public withdrawal window.
    pub public_withdrawal: Stage,
    /// Opens the private cancellation window.
    pub cancellation: Stage,
    /// Opens the public cancellation window.
    pub public_cancellation: Stage,
}

/// The parties of an escrow for each of its operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roles {
    /// May call the private withdrawal.
    pub withdrawer: Address,
    /// Receives the amount on withdrawal.
    pub recipient: Address,
    /// May call the private cancellation.
    pub canceller: Address,
    /// Receives the amount on cancellation.
    pub refundee: Address,
    /// May rescue residual funds.
    pub rescuer: Address,
}

/// The environment of a call to an escrow clone.
#[derive(Debug)]
pub struct CallContext<'a> {
    /// The chain the escrow lives on.
    pub chain: &'a mut Chain,
    /// The caller.
    pub sender: Address,
    /// The escrow clone being called.
    pub this: Address,
}

impl CallContext<'_> {
    /// Returns the current block timestamp.
    pub fn now(&self) -> u64 {
        self.chain.timestamp()
    }

    /// Returns the storage of the called clone.
    pub fn account(&self) -> Result<CloneAccount, EscrowError> {
        self.chain.clone_at(self.this).copied().ok_or(EscrowError::NoEscrow(self.this))
    }

    /// Returns the balance of the escrow in `token`.
    pub fn balance(&self, token: Address) -> U256 {
        self.chain.balance_of(token, self.this)
    }

    fn only(&self, expected: Address) -> Result<(), EscrowError> {
        if self.sender != expected {
            return Err(EscrowError::InvalidCaller { expected, got: self.sender });
        }
        Ok(())
    }

    /// Checks that `immutables` hash to the salt of the clone.
    fn verify(&self, immutables: &Immutables) -> Result<CloneAccount, EscrowError> {
        let account = self.account()?;
        let got = immutables.hash();
        if got != account.salt {
            return Err(EscrowError::InvalidImmutables { expected: account.salt, got });
        }
        Ok(account)
    }

    fn set_status(&mut self, status: EscrowStatus) -> Result<(), EscrowError> {
        let account = self.chain.clone_at_mut(self.this).ok_or(EscrowError::NoEscrow(self.this))?;
        account.status = status;
        Ok(())
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), TransferError> {
        self.chain.transfer(token, self.this, to, amount)
    }

    fn emit(&mut self, event: EscrowEvent) {
        self.chain.emit(self.this, event);
    }
}

/// An escrow implementation.
///
/// Implementations are stateless. Per-escrow storage lives in the [`CloneAccount`] of each clone,
/// and calls reach an implementation through [`EscrowCaller`].
pub trait Escrow: Debug + Send + Sync {
    /// Returns the escrow variant.
    fn kind(&self) -> EscrowKind;

    /// Returns the delay after deployment from which residual funds can be rescued.
    fn rescue_delay(&self) -> u64;

    /// Returns the stages gating the windows of this variant.
    fn schedule(&self) -> StageSchedule;

    /// Returns the parties of an escrow with `immutables`.
    fn roles(&self, immutables: &Immutables) -> Roles;

    /// Returns the metrics recorder of this variant.
    fn metrics(&self) -> EscrowMetrics {
        EscrowMetrics::new(self.kind().as_str())
    }

    /// Withdraws the escrow to the recipient, revealing `secret`.
    ///
    /// Only the withdrawer may call, from the withdrawal stage until cancellation opens. The caller
    /// receives the safety deposit.
    fn withdraw(
        &self,
        ctx: &mut CallContext<'_>,
        secret: B256,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        ctx.only(self.roles(immutables).withdrawer)?;
        let schedule = self.schedule();
        settle_withdrawal(self, ctx, secret, immutables, Access::Private, schedule.withdrawal)
    }

    /// Withdraws the escrow to the recipient on behalf of the withdrawer.
    ///
    /// Anyone may call, from the public withdrawal stage until cancellation opens.
    fn public_withdraw(
        &self,
        ctx: &mut CallContext<'_>,
        secret: B256,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        let schedule = self.schedule();
        settle_withdrawal(self, ctx, secret, immutables, Access::Public, schedule.public_withdrawal)
    }

    /// Returns the escrow to its depositor.
    ///
    /// Only the canceller may call, once cancellation opens. The caller receives the safety deposit.
    fn cancel(&self, ctx: &mut CallContext<'_>, immutables: &Immutables) -> Result<(), EscrowError> {
        ctx.only(self.roles(immutables).canceller)?;
        let schedule = self.schedule();
        settle_cancellation(self, ctx, immutables, Access::Private, schedule.cancellation)
    }

    /// Returns the escrow to its depositor on behalf of the canceller.
    ///
    /// Anyone may call, once public cancellation opens.
    fn public_cancel(
        &self,
        ctx: &mut CallContext<'_>,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        let schedule = self.schedule();
        settle_cancellation(self, ctx, immutables, Access::Public, schedule.public_cancellation)
    }

    /// Sends `amount` of `token` held by the escrow to the rescuer.
    ///
    /// Only possible after the rescue delay, and only for funds the escrow does not hold for the
    /// swap while it is active.
    fn rescue_funds(
        &self,
        ctx: &mut CallContext<'_>,
        token: Address,
        amount: U256,
        immutables: &Immutables,
    ) -> Result<(), EscrowError> {
        let rescuer = self.roles(immutables).rescuer;
        if ctx.sender != rescuer {
            return Err(EscrowError::NotRescuer(ctx.sender));
        }
        let account = ctx.verify(immutables)?;

        let now = ctx.now();
        let opens_at = immutables.timelocks.rescue_start(self.rescue_delay())?;
        if now < opens_at {
            return Err(TimeWindowError::TooEarly { stage: None, opens_at, now }.into());
        }

        if account.status.is_active() {
            let available = ctx.balance(token).saturating_sub(locked(immutables, token));
            if amount > available {
                return Err(EscrowError::InsufficientResidue { available, requested: amount });
            }
        }

        ctx.transfer(token, rescuer, amount)?;
        ctx.emit(EscrowEvent::FundsRescued { token, amount });

        self.metrics().record_rescued();
        info!(escrow = %ctx.this, kind = %self.kind(), %token, %amount, "rescued escrow funds");
        Ok(())
    }
}

/// Amount of `token` an active escrow holds for the swap.
fn locked(immutables: &Immutables, token: Address) -> U256 {
    let mut locked = U256::ZERO;
    if token == immutables.token {
        locked = locked.saturating_add(immutables.amount);
    }
    if token == NATIVE_TOKEN {
        locked = locked.saturating_add(immutables.safety_deposit);
    }
    locked
}

/// Checks that `now` is at or after `open`, and before `close` if given.
fn check_window(
    timelocks: &Timelocks,
    now: u64,
    open: Stage,
    close: Option<Stage>,
) -> Result<(), EscrowError> {
    let opens_at = timelocks.get(open)?;
    if now < opens_at {
        return Err(TimeWindowError::TooEarly { stage: Some(open), opens_at, now }.into());
    }
    if let Some(close) = close {
        let closed_at = timelocks.get(close)?;
        if now >= closed_at {
            return Err(TimeWindowError::TooLate { stage: close, closed_at, now }.into());
        }
    }
    Ok(())
}

fn settle_withdrawal<E: Escrow + ?Sized>(
    escrow: &E,
    ctx: &mut CallContext<'_>,
    secret: B256,
    immutables: &Immutables,
    access: Access,
    open: Stage,
) -> Result<(), EscrowError> {
    let account = ctx.verify(immutables)?;
    if !account.status.is_active() {
        return Err(EscrowError::NotActive(account.status));
    }
    if !immutables.is_secret(&secret) {
        return Err(EscrowError::InvalidSecret);
    }
    check_window(&immutables.timelocks, ctx.now(), open, Some(escrow.schedule().cancellation))?;

    let recipient = escrow.roles(immutables).recipient;
    ctx.set_status(EscrowStatus::Withdrawn)?;
    ctx.transfer(immutables.token, recipient, immutables.amount)?;
    ctx.transfer(NATIVE_TOKEN, ctx.sender, immutables.safety_deposit)?;
    ctx.emit(EscrowEvent::Withdrawal { secret, immutables_hash: account.salt, stage: open });

    escrow.metrics().record_withdrawn(access.as_str());
    info!(
        escrow = %ctx.this,
        kind = %escrow.kind(),
        %access,
        %recipient,
        amount = %immutables.amount,
        "escrow withdrawn"
    );
    Ok(())
}

fn settle_cancellation<E: Escrow + ?Sized>(
    escrow: &E,
    ctx: &mut CallContext<'_>,
    immutables: &Immutables,
    access: Access,
    open: Stage,
) -> Result<(), EscrowError> {
    let account = ctx.verify(immutables)?;
    if !account.status.is_active() {
        return Err(EscrowError::NotActive(account.status));
    }
    check_window(&immutables.timelocks, ctx.now(), open, None)?;

    let refundee = escrow.roles(immutables).refundee;
    ctx.set_status(EscrowStatus::Cancelled)?;
    ctx.transfer(immutables.token, refundee, immutables.amount)?;
    ctx.transfer(NATIVE_TOKEN, ctx.sender, immutables.safety_deposit)?;
    ctx.emit(EscrowEvent::Cancelled { immutables_hash: account.salt, stage: open });

    escrow.metrics().record_cancelled(access.as_str());
    info!(
        escrow = %ctx.this,
        kind = %escrow.kind(),
        %access,
        %refundee,
        amount = %immutables.amount,
        "escrow cancelled"
    );
    Ok(())
}
