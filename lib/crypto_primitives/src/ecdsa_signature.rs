//! secp256k1 keys and recoverable signatures as used by Ethereum accounts.

use std::fmt;

use rand::Rng;
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};
use zksync_basic_types::{keccak256, web3::types::H512, Address, H256};

/// Uncompressed public key without the leading `0x04` tag.
pub type Public = H512;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid secret key")]
    InvalidSecretKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid recovery id")]
    InvalidRecoveryId,
    #[error("invalid message")]
    InvalidMessage,
    #[error(transparent)]
    Secp(#[from] secp256k1::Error),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

/// Private key for the secp256k1 curve.
#[derive(Clone, PartialEq, Eq)]
pub struct K256PrivateKey(SecretKey);

impl fmt::Debug for K256PrivateKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("K256PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl K256PrivateKey {
    /// Converts a 32-byte secret into a key. Fails for zero and for values not below the curve order.
    pub fn from_bytes(bytes: H256) -> Result<Self, Error> {
        SecretKey::from_slice(bytes.as_bytes())
            .map(Self)
            .map_err(|_| Error::InvalidSecretKey)
    }

    /// Generates a random private key using the thread-local RNG.
    pub fn random() -> Self {
        Self::random_using(&mut rand::thread_rng())
    }

    /// Generates a random private key using the provided RNG.
    pub fn random_using(rng: &mut impl Rng) -> Self {
        loop {
            let bytes: [u8; 32] = rng.gen();
            // The probability of hitting an invalid scalar is negligible.
            if let Ok(key) = SecretKey::from_slice(&bytes) {
                return Self(key);
            }
        }
    }

    pub fn expose_secret(&self) -> H256 {
        H256(self.0.secret_bytes())
    }

    pub fn public(&self) -> Public {
        let public = PublicKey::from_secret_key(SECP256K1, &self.0);
        H512::from_slice(&public.serialize_uncompressed()[1..])
    }

    /// Ethereum address controlled by this key.
    pub fn address(&self) -> Address {
        public_to_address(&self.public())
    }
}

/// Recoverable signature laid out as `r ‖ s ‖ v` with `v` being the raw recovery id.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 65]);

impl Default for Signature {
    fn default() -> Self {
        Self([0; 65])
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Signature(0x{})", hex::encode(self.0))
    }
}

impl From<[u8; 65]> for Signature {
    fn from(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }
}

impl Signature {
    pub fn from_rsv(r: &H256, s: &H256, v: u8) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(r.as_bytes());
        bytes[32..64].copy_from_slice(s.as_bytes());
        bytes[64] = v;
        Self(bytes)
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// Returns the signature with `v` shifted by 27, the way `eth_sign` clients expect it.
    pub fn into_electrum(mut self) -> [u8; 65] {
        self.0[64] += 27;
        self.0
    }

    fn to_recoverable(self) -> Result<RecoverableSignature, Error> {
        let recovery_id =
            RecoveryId::from_i32(i32::from(self.v())).map_err(|_| Error::InvalidRecoveryId)?;
        RecoverableSignature::from_compact(&self.0[..64], recovery_id)
            .map_err(|_| Error::InvalidSignature)
    }
}

pub fn sign(private_key: &K256PrivateKey, message: &H256) -> Result<Signature, Error> {
    let message = Message::from_slice(message.as_bytes()).map_err(|_| Error::InvalidMessage)?;
    let signature = SECP256K1.sign_ecdsa_recoverable(&message, &private_key.0);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&compact);
    bytes[64] = u8::try_from(recovery_id.to_i32()).map_err(|_| Error::InvalidRecoveryId)?;
    Ok(Signature(bytes))
}

pub fn recover(signature: &Signature, message: &H256) -> Result<Public, Error> {
    let message = Message::from_slice(message.as_bytes()).map_err(|_| Error::InvalidMessage)?;
    let signature = signature.to_recoverable()?;
    let public = SECP256K1.recover_ecdsa(&message, &signature)?;
    Ok(H512::from_slice(&public.serialize_uncompressed()[1..]))
}

pub fn public_to_address(public: &Public) -> Address {
    let hash = keccak256(public.as_bytes());
    Address::from_slice(&hash[12..])
}
