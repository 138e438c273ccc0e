//! Escrow constants.

use alloy::primitives::{Address, hex};

/// The token address standing for the chain's native currency.
///
/// Safety deposits are always paid in the native currency.
pub const NATIVE_TOKEN: Address = Address::ZERO;

/// Default delay after deployment before residual funds can be rescued from an escrow (8 days).
pub const DEFAULT_RESCUE_DELAY: u64 = 691_200;

/// Nonce the factory uses to create the source escrow implementation.
pub const SRC_IMPLEMENTATION_NONCE: u64 = 1;

/// Nonce the factory uses to create the destination escrow implementation.
pub const DST_IMPLEMENTATION_NONCE: u64 = 2;

/// EIP-1167 creation code preceding the implementation address.
///
/// The first 10 bytes copy the runtime code into memory and return it, the remaining 10 bytes are
/// the start of the runtime code up to the `PUSH20` of the implementation.
pub const CLONE_CREATION_PREFIX: [u8; 20] = hex!("3d602d80600a3d3981f3363d3d373d3d3d363d73");

/// EIP-1167 runtime code following the implementation address.
pub const CLONE_CREATION_SUFFIX: [u8; 15] = hex!("5af43d82803e903d91602b57fd5bf3");

/// Length of the full EIP-1167 creation code.
pub const CLONE_CREATION_CODE_LEN: usize =
    CLONE_CREATION_PREFIX.len() + 20 + CLONE_CREATION_SUFFIX.len();
