use crate::e2e::*;
use swap_escrow::{
    chain::Code,
    clones::{clone_creation_code, predict_deterministic_address, predict_from_creation_code},
    escrow::{EscrowKind, EscrowStatus},
    factory::implementation_address,
    types::FactoryEvent,
};

#[test]
fn created_escrows_land_at_predicted_addresses() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let swap = env.create_swap()?;

    let src_hash = swap.src_immutables.hash();
    assert_eq!(swap.src_escrow, env.src_factory.address_of_escrow_src(&swap.src_immutables));
    assert_eq!(
        swap.src_escrow,
        predict_deterministic_address(env.src_factory.implementation(EscrowKind::Src), src_hash, FACTORY)
    );
    assert_eq!(
        swap.dst_escrow,
        env.dst_factory.address_of_escrow(EscrowKind::Dst, &swap.dst_immutables)
    );

    let account = env.src.clone_at(swap.src_escrow).copied().ok_or_else(|| eyre::eyre!("no clone"))?;
    assert_eq!(account.salt, src_hash);
    assert_eq!(account.implementation, implementation_address(FACTORY, EscrowKind::Src));
    assert_eq!(account.status, EscrowStatus::Active);
    assert!(matches!(env.dst.code_at(swap.dst_escrow), Some(Code::Clone(_))));

    assert!(factory_events(&env.src).contains(&FactoryEvent::SrcEscrowCreated {
        escrow: swap.src_escrow,
        immutables_hash: src_hash,
        immutables: Box::new(swap.src_immutables.clone()),
        dst_complement: Environment::dst_complement(),
    }));
    assert!(factory_events(&env.dst).contains(&FactoryEvent::DstEscrowCreated {
        escrow: swap.dst_escrow,
        immutables_hash: swap.dst_immutables.hash(),
        hashlock: swap.dst_immutables.hashlock,
        taker: RESOLVER,
    }));
    Ok(())
}

#[test]
fn raw_creation_code_scheme_diverges_from_deployment() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let (escrow, immutables) = env.create_src_escrow(&Environment::src_immutables())?;
    let implementation = env.src_factory.implementation(EscrowKind::Src);

    // hashing the implementation instead of the proxy that delegates to it
    let wrong = predict_from_creation_code(implementation.as_slice(), immutables.hash(), FACTORY);
    assert_ne!(wrong, escrow);
    assert!(!env.src.has_code(wrong));

    let proxy = clone_creation_code(implementation);
    assert_eq!(predict_from_creation_code(&proxy, immutables.hash(), FACTORY), escrow);
    Ok(())
}

#[test]
fn address_depends_on_deployment_time() -> eyre::Result<()> {
    let env = Environment::setup()?;
    let immutables = Environment::src_immutables();

    let at_t0 = env.src_factory.address_of_escrow_src(&immutables.clone().with_deployed_at(T0 as u32));
    let later =
        env.src_factory.address_of_escrow_src(&immutables.clone().with_deployed_at(T0 as u32 + 1));
    assert_ne!(at_t0, later);
    assert_eq!(
        at_t0,
        env.src_factory.address_of_escrow_src(&immutables.with_deployed_at(T0 as u32))
    );
    Ok(())
}

#[test]
fn variants_and_chains() -> eyre::Result<()> {
    let env = Environment::setup()?;
    let immutables = Environment::src_immutables().with_deployed_at(T0 as u32);

    // same factory address on both chains
    assert_eq!(
        env.src_factory.address_of_escrow_src(&immutables),
        env.dst_factory.address_of_escrow_src(&immutables)
    );
    assert_ne!(
        env.src_factory.address_of_escrow_src(&immutables),
        env.src_factory.address_of_escrow_dst(&immutables)
    );
    Ok(())
}
