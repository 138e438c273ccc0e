use crate::e2e::*;
use alloy::primitives::U256;
use swap_escrow::{
    constants::NATIVE_TOKEN,
    error::{EscrowError, TimeWindowError},
    types::EscrowEvent,
};

#[test]
fn rescue_stray_tokens_after_delay() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let (escrow, immutables) = env.create_src_escrow(&Environment::src_immutables())?;
    env.src.mint(SRC_TOKEN, escrow, U256::from(5));

    env.src.set_timestamp(T0 + RESCUE_DELAY - 1);
    assert_eq!(
        env.src.escrow(escrow).rescue_funds(RESOLVER, SRC_TOKEN, U256::from(5), &immutables),
        Err(EscrowError::InvalidTime(TimeWindowError::TooEarly {
            stage: None,
            opens_at: T0 + RESCUE_DELAY,
            now: T0 + RESCUE_DELAY - 1,
        }))
    );

    env.src.set_timestamp(T0 + RESCUE_DELAY);
    assert_eq!(
        env.src.escrow(escrow).rescue_funds(MAKER, SRC_TOKEN, U256::from(5), &immutables),
        Err(EscrowError::NotRescuer(MAKER))
    );
    assert_eq!(
        env.src.escrow(escrow).rescue_funds(RESOLVER, SRC_TOKEN, U256::from(6), &immutables),
        Err(EscrowError::InsufficientResidue { available: U256::from(5), requested: U256::from(6) })
    );

    env.src.escrow(escrow).rescue_funds(RESOLVER, SRC_TOKEN, U256::from(5), &immutables)?;
    assert_eq!(env.src.balance_of(SRC_TOKEN, RESOLVER), U256::from(5));
    assert_eq!(env.src.balance_of(SRC_TOKEN, escrow), immutables.amount);
    assert_eq!(
        escrow_events(&env.src, escrow),
        [EscrowEvent::FundsRescued { token: SRC_TOKEN, amount: U256::from(5) }]
    );

    // the swap can still settle
    env.src.escrow(escrow).cancel(MAKER, &immutables)?;
    assert_eq!(env.src.balance_of(SRC_TOKEN, MAKER), U256::from(1_000));
    Ok(())
}

#[test]
fn active_escrow_keeps_its_safety_deposit() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let (escrow, immutables) =
        env.create_dst_escrow(&Environment::dst_immutables(), T0 + 1_800)?;

    env.dst.set_timestamp(T0 + RESCUE_DELAY);
    assert_eq!(
        env.dst.escrow(escrow).rescue_funds(RESOLVER, NATIVE_TOKEN, U256::from(1), &immutables),
        Err(EscrowError::InsufficientResidue { available: U256::ZERO, requested: U256::from(1) })
    );
    assert_eq!(
        env.dst.escrow(escrow).rescue_funds(RESOLVER, DST_TOKEN, U256::from(1), &immutables),
        Err(EscrowError::InsufficientResidue { available: U256::ZERO, requested: U256::from(1) })
    );
    Ok(())
}

#[test]
fn rescue_everything_after_settlement() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let (escrow, immutables) =
        env.create_dst_escrow(&Environment::dst_immutables(), T0 + 1_800)?;

    env.dst.set_timestamp(T0 + 10);
    env.dst.escrow(escrow).withdraw(RESOLVER, SECRET, &immutables)?;

    // funds sent after the escrow settled
    env.dst.transfer(NATIVE_TOKEN, STRANGER, escrow, SAFETY_DEPOSIT)?;
    env.dst.mint(DST_TOKEN, escrow, U256::from(3));

    env.dst.set_timestamp(T0 + RESCUE_DELAY);
    let resolver_native = env.dst.balance_of(NATIVE_TOKEN, RESOLVER);
    env.dst.escrow(escrow).rescue_funds(RESOLVER, NATIVE_TOKEN, SAFETY_DEPOSIT, &immutables)?;
    env.dst.escrow(escrow).rescue_funds(RESOLVER, DST_TOKEN, U256::from(3), &immutables)?;

    assert_eq!(env.dst.balance_of(NATIVE_TOKEN, RESOLVER), resolver_native + SAFETY_DEPOSIT);
    assert_eq!(env.dst.balance_of(NATIVE_TOKEN, escrow), U256::ZERO);
    assert_eq!(env.dst.balance_of(DST_TOKEN, escrow), U256::ZERO);

    // a settled escrow only holds what was sent to it
    assert!(matches!(
        env.dst.escrow(escrow).rescue_funds(RESOLVER, DST_TOKEN, U256::from(1), &immutables),
        Err(EscrowError::Transfer(_))
    ));
    Ok(())
}
