use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use zksync_basic_types::{keccak256, Address, H256};

use crate::{
    ecdsa_signature::{
        public_to_address, recover, sign, Error as EcdsaError, K256PrivateKey,
        Signature as ETHSignature,
    },
    eip712_signature::typed_structure::{EIP712TypedStructure, Eip712Domain},
};

/// Ethereum signature in the packed 65-byte form produced by `eth_sign` / `eth_signTypedData`.
///
/// Clients disagree on whether `v` is the raw recovery id (0 or 1) or `27 + recovery_id`.
/// Internally the raw recovery id is always stored: deserialization strips the 27 offset
/// when present, and [`Self::serialize_packed()`] adds it back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedEthSignature(ETHSignature);

impl PackedEthSignature {
    pub fn serialize_packed(&self) -> [u8; 65] {
        // adds 27 to v
        self.0.into_electrum()
    }

    pub fn deserialize_packed(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let mut signature: [u8; 65] = bytes
            .try_into()
            .map_err(|_| DeserializeError::IncorrectSignatureLength(bytes.len()))?;
        if signature[64] >= 27 {
            signature[64] -= 27;
        }

        Ok(PackedEthSignature(ETHSignature::from(signature)))
    }

    pub fn sign_raw(
        private_key: &K256PrivateKey,
        signed_bytes: &H256,
    ) -> Result<PackedEthSignature, EcdsaError> {
        let signature = sign(private_key, signed_bytes)?;
        Ok(PackedEthSignature(signature))
    }

    /// Signs typed struct using Ethereum private key by EIP-712 signature standard.
    /// Result of this function is the equivalent of RPC calling `eth_signTypedData`.
    pub fn sign_typed_data(
        private_key: &K256PrivateKey,
        domain: &Eip712Domain,
        typed_struct: &impl EIP712TypedStructure,
    ) -> Result<PackedEthSignature, EcdsaError> {
        let signed_bytes = Self::typed_data_to_signed_bytes(domain, typed_struct);
        Self::sign_raw(private_key, &signed_bytes)
    }

    /// Digest that is actually signed for a typed structure: `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct)`.
    pub fn typed_data_to_signed_bytes(
        domain: &Eip712Domain,
        typed_struct: &impl EIP712TypedStructure,
    ) -> H256 {
        let mut bytes = Vec::with_capacity(66);
        bytes.extend_from_slice(b"\x19\x01");
        bytes.extend_from_slice(domain.hash_struct().as_bytes());
        bytes.extend_from_slice(typed_struct.hash_struct().as_bytes());
        keccak256(&bytes).into()
    }

    pub fn message_to_signed_bytes(msg: &[u8]) -> H256 {
        keccak256(msg).into()
    }

    /// Checks signature and returns Ethereum address of the signer.
    /// `signed_bytes` must be the digest that was signed; no hashing or prefixes are applied.
    pub fn signature_recover_signer(&self, signed_bytes: &H256) -> Result<Address, EcdsaError> {
        let public_key = recover(&self.0, signed_bytes)?;
        Ok(public_to_address(&public_key))
    }

    pub fn from_rsv(r: &H256, s: &H256, v: u8) -> Self {
        PackedEthSignature(ETHSignature::from_rsv(r, s, v))
    }

    pub fn r(&self) -> &[u8] {
        self.0.r()
    }
    pub fn s(&self) -> &[u8] {
        self.0.s()
    }
    pub fn v(&self) -> u8 {
        self.0.v()
    }
    pub fn v_with_chain_id(&self, chain_id: u64) -> u64 {
        self.0.v() as u64 + 35 + chain_id * 2
    }
    pub fn unpack_v(v: u64) -> Result<(u8, Option<u64>), EcdsaError> {
        if v == 27 {
            return Ok((0, None));
        } else if v == 28 {
            return Ok((1, None));
        } else if v >= 35 {
            let chain_id = (v - 35) >> 1;
            let v = v - 35 - chain_id * 2;
            if v == 0 {
                return Ok((0, Some(chain_id)));
            } else if v == 1 {
                return Ok((1, Some(chain_id)));
            }
        }

        Err(EcdsaError::Custom(anyhow::format_err!("Invalid v")))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DeserializeError {
    #[error("Eth signature length should be 65 bytes, got {0}")]
    IncorrectSignatureLength(usize),
    #[error("Eth signature is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl Serialize for PackedEthSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let packed_signature = self.serialize_packed();
        serializer.serialize_str(&format!("0x{}", hex::encode(packed_signature)))
    }
}

impl<'de> Deserialize<'de> for PackedEthSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        let bytes = hex::decode(string.strip_prefix("0x").unwrap_or(&string))
            .map_err(|err| serde::de::Error::custom(DeserializeError::from(err)))?;
        Self::deserialize_packed(&bytes).map_err(serde::de::Error::custom)
    }
}
