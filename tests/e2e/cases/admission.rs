use crate::e2e::*;
use alloy::primitives::U256;
use swap_escrow::{
    constants::NATIVE_TOKEN,
    error::{DeployError, FactoryError, TimelocksError, TransferError},
    types::{FactoryEvent, Immutables, Msg, Stage, Timelocks},
};

/// Destination immutables escrowing native currency, taken by `taker`.
fn native_dst_immutables(taker: alloy::primitives::Address) -> Immutables {
    Immutables { taker, token: NATIVE_TOKEN, amount: U256::from(10), ..Environment::dst_immutables() }
}

#[test]
fn only_whitelisted_resolvers_create_escrows() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let immutables = native_dst_immutables(STRANGER);
    let msg = Msg::new(STRANGER).with_value(U256::from(10) + SAFETY_DEPOSIT);

    assert_eq!(
        env.dst_factory.create_dst_escrow(&mut env.dst, msg, &immutables, T0 + 1_800),
        Err(FactoryError::NotWhitelisted(STRANGER))
    );

    assert!(env.dst_factory.add_resolver_to_whitelist(&mut env.dst, OWNER, STRANGER)?);
    assert!(!env.dst_factory.add_resolver_to_whitelist(&mut env.dst, OWNER, STRANGER)?);
    assert_eq!(env.dst_factory.resolver_count(), 2);

    let (escrow, _) =
        env.dst_factory.create_dst_escrow(&mut env.dst, msg, &immutables, T0 + 1_800)?;
    assert_eq!(env.dst.balance_of(NATIVE_TOKEN, escrow), U256::from(10) + SAFETY_DEPOSIT);

    assert!(env.dst_factory.remove_resolver_from_whitelist(&mut env.dst, OWNER, STRANGER)?);
    assert!(!env.dst_factory.remove_resolver_from_whitelist(&mut env.dst, OWNER, STRANGER)?);
    assert!(!env.dst_factory.is_whitelisted(&STRANGER));
    assert_eq!(
        env.dst_factory.add_resolver_to_whitelist(&mut env.dst, STRANGER, STRANGER),
        Err(FactoryError::NotOwner(STRANGER))
    );

    let events = factory_events(&env.dst);
    assert_eq!(events.first(), Some(&FactoryEvent::ResolverAdded { resolver: STRANGER }));
    assert_eq!(events.last(), Some(&FactoryEvent::ResolverRemoved { resolver: STRANGER }));
    assert_eq!(events.len(), 3);
    Ok(())
}

#[test]
fn whitelist_bypass() -> eyre::Result<()> {
    let mut env = Environment::setup_with(|config| config.with_bypass_whitelist(true))?;
    let immutables = native_dst_immutables(STRANGER);
    let msg = Msg::new(STRANGER).with_value(U256::from(10) + SAFETY_DEPOSIT);
    env.dst_factory.create_dst_escrow(&mut env.dst, msg, &immutables, T0 + 1_800)?;

    assert!(env.dst_factory.set_whitelist_bypass(&mut env.dst, OWNER, false)?);
    env.dst.warp(1);
    assert_eq!(
        env.dst_factory.create_dst_escrow(&mut env.dst, msg, &immutables, T0 + 1_800),
        Err(FactoryError::NotWhitelisted(STRANGER))
    );
    assert_eq!(factory_events(&env.dst).last(), Some(&FactoryEvent::WhitelistBypassSet { enabled: false }));
    Ok(())
}

#[test]
fn src_escrow_must_be_funded() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let immutables = Environment::src_immutables();
    let escrow = env.src_factory.address_of_escrow_src(&immutables.clone().with_deployed_at(T0 as u32));
    let create = |env: &mut Environment, value| {
        env.src_factory.create_src_escrow(
            &mut env.src,
            Msg::new(RESOLVER).with_value(value),
            &immutables,
            Environment::dst_complement(),
        )
    };

    assert_eq!(
        create(&mut env, U256::ZERO),
        Err(FactoryError::InsufficientEscrowBalance {
            escrow,
            token: NATIVE_TOKEN,
            required: SAFETY_DEPOSIT,
            available: U256::ZERO,
        })
    );

    // the safety deposit sent with the call counts, and is returned when the tokens are missing
    assert_eq!(
        create(&mut env, SAFETY_DEPOSIT),
        Err(FactoryError::InsufficientEscrowBalance {
            escrow,
            token: SRC_TOKEN,
            required: U256::from(100),
            available: U256::ZERO,
        })
    );
    assert_eq!(env.src.balance_of(NATIVE_TOKEN, RESOLVER), ONE_ETHER);
    assert_eq!(env.src.balance_of(NATIVE_TOKEN, escrow), U256::ZERO);
    assert!(!env.src.has_code(escrow));

    env.src.transfer(SRC_TOKEN, MAKER, escrow, U256::from(100))?;
    let (created, _) = create(&mut env, SAFETY_DEPOSIT)?;
    assert_eq!(created, escrow);
    assert_eq!(env.src.balance_of(NATIVE_TOKEN, escrow), SAFETY_DEPOSIT);
    Ok(())
}

#[test]
fn dst_escrow_value_must_match() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let immutables = Environment::dst_immutables();

    for value in [U256::ZERO, SAFETY_DEPOSIT + U256::from(1)] {
        assert_eq!(
            env.dst_factory.create_dst_escrow(
                &mut env.dst,
                Msg::new(RESOLVER).with_value(value),
                &immutables,
                T0 + 1_800,
            ),
            Err(FactoryError::InsufficientEscrowValue { required: SAFETY_DEPOSIT, provided: value })
        );
    }
    Ok(())
}

#[test]
fn dst_escrow_cancels_before_src() -> eyre::Result<()> {
    let mut env = Environment::setup()?;

    assert!(matches!(
        env.create_dst_escrow(&Environment::dst_immutables(), T0 + 899)
            .map_err(|err| err.downcast::<FactoryError>())
            .unwrap_err(),
        Ok(FactoryError::InvalidCreationTime { dst_cancellation, src_cancellation })
            if dst_cancellation == T0 + 900 && src_cancellation == T0 + 899
    ));
    env.create_dst_escrow(&Environment::dst_immutables(), T0 + 900)?;
    Ok(())
}

#[test]
fn invalid_timelocks_are_rejected() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let immutables = Immutables {
        timelocks: Timelocks { src_withdrawal: 200, ..Environment::timelocks() },
        ..Environment::src_immutables()
    };

    env.fund_src_escrow(&immutables)?;
    assert_eq!(
        env.src_factory.create_src_escrow(
            &mut env.src,
            Msg::new(RESOLVER),
            &immutables,
            Environment::dst_complement(),
        ),
        Err(FactoryError::Timelocks(TimelocksError::NonMonotonic {
            earlier: Stage::SrcWithdrawal,
            later: Stage::SrcPublicWithdrawal,
        }))
    );
    Ok(())
}

#[test]
fn same_escrow_cannot_be_created_twice() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let (escrow, _) = env.create_dst_escrow(&Environment::dst_immutables(), T0 + 1_800)?;
    let resolver_tokens = env.dst.balance_of(DST_TOKEN, RESOLVER);
    let resolver_native = env.dst.balance_of(NATIVE_TOKEN, RESOLVER);

    let immutables = Environment::dst_immutables();
    assert_eq!(
        env.dst_factory.create_dst_escrow(
            &mut env.dst,
            Msg::new(RESOLVER).with_value(SAFETY_DEPOSIT),
            &immutables,
            T0 + 1_800,
        ),
        Err(FactoryError::Deploy(DeployError::AlreadyDeployed(escrow)))
    );
    assert_eq!(env.dst.balance_of(DST_TOKEN, RESOLVER), resolver_tokens);
    assert_eq!(env.dst.balance_of(NATIVE_TOKEN, RESOLVER), resolver_native);
    assert_eq!(env.dst.balance_of(DST_TOKEN, escrow), U256::from(10));

    // a second later the immutables hash, and so the address, differ
    env.dst.warp(1);
    let (other, _) = env.create_dst_escrow(&immutables, T0 + 1_800)?;
    assert_ne!(other, escrow);
    Ok(())
}

#[test]
fn failed_dst_creation_leaves_no_trace() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    env.dst.ledger_mut().approve(DST_TOKEN, RESOLVER, FACTORY, U256::from(9));
    let logs = env.dst.logs().len();

    let immutables = Environment::dst_immutables();
    let escrow =
        env.dst_factory.address_of_escrow_dst(&immutables.clone().with_deployed_at(T0 as u32));
    assert_eq!(
        env.dst_factory.create_dst_escrow(
            &mut env.dst,
            Msg::new(RESOLVER).with_value(SAFETY_DEPOSIT),
            &immutables,
            T0 + 1_800,
        ),
        Err(FactoryError::Transfer(TransferError::InsufficientAllowance {
            token: DST_TOKEN,
            owner: RESOLVER,
            spender: FACTORY,
            allowance: U256::from(9),
            required: U256::from(10),
        }))
    );

    assert!(!env.dst.has_code(escrow));
    assert_eq!(env.dst.balance_of(NATIVE_TOKEN, RESOLVER), ONE_ETHER);
    assert_eq!(env.dst.balance_of(NATIVE_TOKEN, escrow), U256::ZERO);
    assert_eq!(env.dst.ledger().allowance(DST_TOKEN, RESOLVER, FACTORY), U256::from(9));
    assert_eq!(env.dst.logs().len(), logs);
    Ok(())
}

#[test]
fn overflowing_native_amount_is_rejected() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let immutables = Immutables {
        amount: U256::MAX,
        safety_deposit: U256::from(1),
        ..native_dst_immutables(RESOLVER)
    };
    let overflow =
        Err(FactoryError::AmountOverflow { amount: U256::MAX, safety_deposit: U256::from(1) });

    for value in [U256::ZERO, U256::MAX] {
        assert_eq!(
            env.dst_factory.create_dst_escrow(
                &mut env.dst,
                Msg::new(RESOLVER).with_value(value),
                &immutables,
                T0 + 1_800,
            ),
            overflow
        );
    }
    let escrow =
        env.dst_factory.address_of_escrow_dst(&immutables.clone().with_deployed_at(T0 as u32));
    assert!(!env.dst.has_code(escrow));

    let src_immutables = Immutables { maker: MAKER, taker: RESOLVER, ..immutables };
    assert_eq!(
        env.src_factory.create_src_escrow(
            &mut env.src,
            Msg::new(RESOLVER),
            &src_immutables,
            Environment::dst_complement(),
        ),
        overflow
    );
    assert!(env.src.logs().is_empty());
    assert!(factory_events(&env.dst).is_empty());
    Ok(())
}

#[test]
fn escrow_cannot_be_deployed_at_time_zero() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    env.dst.set_timestamp(0);

    assert_eq!(
        env.dst_factory.create_dst_escrow(
            &mut env.dst,
            Msg::new(RESOLVER).with_value(SAFETY_DEPOSIT),
            &Environment::dst_immutables(),
            T0 + 1_800,
        ),
        Err(FactoryError::Timelocks(TimelocksError::ZeroTimestamp))
    );
    assert_eq!(env.dst.balance_of(DST_TOKEN, RESOLVER), U256::from(1_000));
    Ok(())
}
