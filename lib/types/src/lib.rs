//! ZKsync types: essential type definitions for the L2 client.
//!
//! Most primitive types are re-exported from [`zksync_basic_types`]; this crate adds
//! the transaction model, bytecode hashing, and contract address derivation on top.

#![allow(clippy::upper_case_acronyms, clippy::derive_partial_eq_without_eq)]

pub use zksync_basic_types::*;
pub use zksync_crypto_primitives::{
    eip712_signature::{
        struct_builder::StructBuilder,
        typed_structure::{EIP712TypedStructure, Eip712Domain},
    },
    K256PrivateKey, PackedEthSignature,
};

pub use self::{
    constants::*,
    deployment::{Salt, ValidationError},
    utils::{deployed_address_create, deployed_address_create2, CREATE2_PREFIX, CREATE_PREFIX},
};

pub mod api;
pub mod bytecode;
pub mod constants;
pub mod deployment;
pub mod event;
pub mod fee;
pub mod transaction_request;
pub mod utils;

/// Denotes the first byte of the special zkSync's EIP-712-signed transaction.
pub const EIP_712_TX_TYPE: u8 = 0x71;

/// Denotes the first byte of the `EIP-1559` transaction.
pub const EIP_1559_TX_TYPE: u8 = 0x02;

/// Denotes the first byte of some legacy transaction, which type is unknown to the server.
pub const LEGACY_TX_TYPE: u8 = 0x0;
