//! Deterministic addresses of escrow clones.
//!
//! Escrows are EIP-1167 minimal proxies deployed with CREATE2, using the immutables hash as salt.
//! The address only depends on the implementation, the salt and the deployer, so it can be computed
//! and funded before the escrow exists.

use crate::constants::{CLONE_CREATION_CODE_LEN, CLONE_CREATION_PREFIX, CLONE_CREATION_SUFFIX};
use alloy::primitives::{Address, B256, Bytes, keccak256};
use tracing::debug;

/// Returns the EIP-1167 creation code of a proxy delegating to `implementation`.
pub fn clone_creation_code(implementation: Address) -> Bytes {
    let mut code = Vec::with_capacity(CLONE_CREATION_CODE_LEN);
    code.extend_from_slice(&CLONE_CREATION_PREFIX);
    code.extend_from_slice(implementation.as_slice());
    code.extend_from_slice(&CLONE_CREATION_SUFFIX);
    code.into()
}

/// Returns the hash of the proxy creation code for `implementation`.
pub fn proxy_bytecode_hash(implementation: Address) -> B256 {
    keccak256(clone_creation_code(implementation))
}

/// Predicts the address of a clone of `implementation` deployed by `deployer` with `salt`.
pub fn predict_deterministic_address(implementation: Address, salt: B256, deployer: Address) -> Address {
    predict_with_bytecode_hash(proxy_bytecode_hash(implementation), salt, deployer)
}

/// Predicts a clone address from a precomputed proxy bytecode hash.
pub fn predict_with_bytecode_hash(bytecode_hash: B256, salt: B256, deployer: Address) -> Address {
    let address = deployer.create2(salt, bytecode_hash);
    debug!(%deployer, %salt, %address, "predicted escrow address");
    address
}

/// Predicts the address of `code` deployed by `deployer` with `salt`, hashing the code as is.
///
/// This is the plain CREATE2 scheme. Passing an implementation's own code here does not give the
/// address of its clones.
pub fn predict_from_creation_code(code: &[u8], salt: B256, deployer: Address) -> Address {
    deployer.create2_from_code(salt, code)
}
