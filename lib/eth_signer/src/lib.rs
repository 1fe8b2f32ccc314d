use async_trait::async_trait;
use zksync_types::{Address, EIP712TypedStructure, Eip712Domain, PackedEthSignature};

pub use crate::pk_signer::PrivateKeySigner;

mod pk_signer;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SignerError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),
    #[error("Signing key is not available: {0}")]
    NoSigningKey(String),
    #[error("Transaction cannot be signed: {0}")]
    InvalidTransaction(String),
    #[error("Signature recovers to {recovered:?} instead of the signer address {expected:?}")]
    InvalidSignature { expected: Address, recovered: Address },
}

/// Source of EIP-712 signatures for an account.
///
/// Implementations may hold the key locally or delegate to an external service,
/// hence the async interface.
#[async_trait]
pub trait EthereumSigner: 'static + Send + Sync + Clone {
    async fn sign_typed_data<S: EIP712TypedStructure + Sync>(
        &self,
        domain: &Eip712Domain,
        typed_struct: &S,
    ) -> Result<PackedEthSignature, SignerError>;

    async fn get_address(&self) -> Result<Address, SignerError>;
}
