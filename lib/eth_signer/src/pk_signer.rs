use async_trait::async_trait;
use zksync_types::{
    Address, EIP712TypedStructure, Eip712Domain, K256PrivateKey, PackedEthSignature,
};

use crate::{EthereumSigner, SignerError};

/// Signer holding the secp256k1 key in memory.
#[derive(Clone)]
pub struct PrivateKeySigner {
    private_key: K256PrivateKey,
}

impl std::fmt::Debug for PrivateKeySigner {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PrivateKeySigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl PrivateKeySigner {
    pub fn new(private_key: K256PrivateKey) -> Self {
        Self { private_key }
    }

    pub fn address(&self) -> Address {
        self.private_key.address()
    }
}

#[async_trait]
impl EthereumSigner for PrivateKeySigner {
    /// Signs typed struct using Ethereum private key by EIP-712 signature standard.
    /// Result of this function is the equivalent of RPC calling `eth_signTypedData`.
    async fn sign_typed_data<S: EIP712TypedStructure + Sync>(
        &self,
        domain: &Eip712Domain,
        typed_struct: &S,
    ) -> Result<PackedEthSignature, SignerError> {
        let signature =
            PackedEthSignature::sign_typed_data(&self.private_key, domain, typed_struct)
                .map_err(|err| SignerError::SigningFailed(err.to_string()))?;
        Ok(signature)
    }

    /// Get Ethereum address that matches the private key.
    async fn get_address(&self) -> Result<Address, SignerError> {
        Ok(self.private_key.address())
    }
}
