use std::time::Duration;

use zksync_contracts::ContractError;
use zksync_eth_signer::SignerError;
use zksync_types::{Address, ValidationError, H256};
use zksync_web3_decl::error::EnrichedClientError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid deployment parameters: {0}")]
    Validation(#[from] ValidationError),
    #[error("Unable to sign the transaction: {0}")]
    SigningError(#[from] SignerError),
    #[error("Transaction was rejected by the node: {0}")]
    SubmissionError(String),
    #[error("Transaction {tx_hash:?} was not confirmed in {elapsed:?}")]
    ConfirmationTimeout { tx_hash: H256, elapsed: Duration },
    #[error("Could not extract deployed contract address: {0}")]
    AddressExtraction(String),
    #[error("Deployed contract address {observed:?} doesn't match precomputed {precomputed:?}")]
    AddressMismatch {
        precomputed: Address,
        observed: Address,
    },
    #[error("Network error: {0}")]
    NetworkError(#[from] EnrichedClientError),
    #[error("ABI error: {0}")]
    Abi(#[from] ContractError),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Missing required field for a transaction: {0}")]
    MissingRequiredField(String),
}
