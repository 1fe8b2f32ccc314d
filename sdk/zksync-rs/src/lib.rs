//! Client library for ZKsync L2 chains.
//!
//! [`Wallet`] pairs a JSON-RPC provider with a [`Signer`] and exposes builders for contract calls,
//! deployments and withdrawals. Sent transactions are awaited through
//! [`SyncTransactionHandle`](operations::SyncTransactionHandle).

pub use zksync_contracts::AbiRegistry;
pub use zksync_eth_signer::{EthereumSigner, PrivateKeySigner};
pub use zksync_types::{self, ethabi, web3};
pub use zksync_web3_decl::{
    client::{L2Client, L2ClientBuilder, MockClient},
    jsonrpsee::http_client::*,
    namespaces::{EthNamespaceClient, ZksNamespaceClient},
};

pub use crate::{
    config::ClientConfig, deployer::ContractDeployer, signer::Signer, wallet::Wallet,
};

pub mod config;
pub mod deployer;
pub mod error;
pub mod operations;
pub mod priority_op;
pub mod signer;
pub mod utils;
pub mod wallet;
