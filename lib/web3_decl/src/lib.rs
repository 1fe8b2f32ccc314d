//! Declarations of the ZKsync Web3 API as seen by a client, plus the clients speaking it.
//!
//! The `eth` and `zks` namespaces are declared with `jsonrpsee` procedural macros, which generate
//! `EthNamespaceClient` / `ZksNamespaceClient` extension traits implemented for every JSON-RPC client.

#![allow(clippy::derive_partial_eq_without_eq)]

pub mod client;
pub mod error;
pub mod namespaces;

pub use jsonrpsee;
