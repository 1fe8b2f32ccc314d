use zksync_eth_signer::{EthereumSigner, SignerError};
use zksync_types::{
    transaction_request::TransactionRequest, Address, Bytes, Eip712Domain, L2ChainId,
    PackedEthSignature, H256,
};

/// Transaction signed by [`Signer`], ready to be broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Transaction with the signature fields and the raw payload filled in.
    pub tx: TransactionRequest,
    pub hash: H256,
    /// Payload for `eth_sendRawTransaction`.
    pub raw: Bytes,
}

#[derive(Debug)]
pub struct Signer<S: EthereumSigner> {
    pub(crate) eth_signer: S,
    pub(crate) address: Address,
    pub(crate) chain_id: L2ChainId,
}

impl<S: EthereumSigner> Signer<S> {
    pub fn new(eth_signer: S, address: Address, chain_id: L2ChainId) -> Self {
        Self {
            eth_signer,
            address,
            chain_id,
        }
    }

    /// Creates a signer for the address reported by the external signer itself.
    pub async fn for_signer(eth_signer: S, chain_id: L2ChainId) -> Result<Self, SignerError> {
        let address = eth_signer.get_address().await?;
        Ok(Self::new(eth_signer, address, chain_id))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> L2ChainId {
        self.chain_id
    }

    /// Signs an EIP-712 transaction and serializes it.
    ///
    /// The transaction must be sent from the signer's address on the signer's chain.
    pub async fn sign_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> Result<SignedTransaction, SignerError> {
        tx.check_signable()
            .map_err(|err| SignerError::InvalidTransaction(err.to_string()))?;
        if tx.from != Some(self.address) {
            return Err(SignerError::InvalidTransaction(format!(
                "transaction is sent from {:?}, while the signer address is {:?}",
                tx.from, self.address
            )));
        }
        if tx.chain_id != Some(self.chain_id.as_u64()) {
            return Err(SignerError::InvalidTransaction(format!(
                "transaction chain id {:?} doesn't match the signer chain id {}",
                tx.chain_id, self.chain_id
            )));
        }

        let domain = Eip712Domain::new(self.chain_id);
        let signature = self.eth_signer.sign_typed_data(&domain, tx).await?;
        let has_custom_signature = tx
            .get_custom_signature()
            .is_some_and(|signature| !signature.is_empty());
        if !has_custom_signature {
            self.check_signature(tx, &signature)?;
        }
        let raw = tx
            .get_signed_bytes(&signature)
            .map_err(|err| SignerError::InvalidTransaction(err.to_string()))?;

        let mut tx = tx.clone();
        tx.set_signature(&signature);
        tx.raw = Some(Bytes(raw.clone()));
        let hash = tx
            .get_tx_hash()
            .map_err(|err| SignerError::InvalidTransaction(err.to_string()))?;
        tracing::debug!(tx_hash = ?hash, nonce = %tx.nonce, "signed L2 transaction");

        Ok(SignedTransaction {
            tx,
            hash,
            raw: Bytes(raw),
        })
    }

    /// Checks that `signature` recovers to [`Self::address()`].
    fn check_signature(
        &self,
        tx: &TransactionRequest,
        signature: &PackedEthSignature,
    ) -> Result<(), SignerError> {
        let signed_message = tx
            .get_default_signed_message()
            .map_err(|err| SignerError::InvalidTransaction(err.to_string()))?;
        let recovered = signature
            .signature_recover_signer(&signed_message)
            .map_err(|err| SignerError::SigningFailed(err.to_string()))?;
        if recovered != self.address {
            return Err(SignerError::InvalidSignature {
                expected: self.address,
                recovered,
            });
        }
        Ok(())
    }
}
