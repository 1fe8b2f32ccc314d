//! The declaration of the most primitive types used in zkSync network.
//!
//! Most of them are just re-exported from the `web3` crate.

#[macro_use]
mod macros;

pub mod convert;

use std::{
    fmt,
    num::ParseIntError,
    ops::{Add, Deref, DerefMut, Sub},
    str::FromStr,
};

pub use web3;
pub use web3::ethabi;
pub use web3::types::{Address, Bytes, H160, H2048, H256, U128, U256, U64};

pub use self::convert::{
    address_to_h256, address_to_u256, h256_to_address, h256_to_u256, to_checksum_address,
    u256_to_h256,
};

/// Hashes the provided bytes with Keccak-256.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    web3::signing::keccak256(bytes)
}

basic_type!(
    /// zkSync account nonce.
    Nonce,
    u32
);

basic_type!(
    /// ChainId in the Ethereum network.
    L1ChainId,
    u64
);

basic_type!(
    /// ChainId in the ZkSync network.
    L2ChainId,
    u64
);

impl L2ChainId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[allow(clippy::derivable_impls)]
impl Default for Nonce {
    fn default() -> Self {
        Self(0)
    }
}

/// Chain id of a local development node.
impl Default for L2ChainId {
    fn default() -> Self {
        Self(270)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_parses_and_serializes_as_number() {
        let chain_id: L2ChainId = "324".parse().unwrap();
        assert_eq!(chain_id.as_u64(), 324);
        assert_eq!(serde_json::to_string(&chain_id).unwrap(), "324");
        assert_eq!(L2ChainId::default(), L2ChainId(270));
    }

    #[test]
    fn nonce_arithmetic() {
        let nonce = Nonce(5);
        assert_eq!(nonce.next(), Nonce(6));
        assert_eq!(nonce + 2, Nonce(7));
        assert_eq!(nonce - 5, Nonce::default());
        assert_eq!(*nonce, 5);
    }
}
