pub use self::{ecdsa_signature::K256PrivateKey, packed_eth_signature::PackedEthSignature};

pub mod ecdsa_signature;
pub mod eip712_signature;
pub mod packed_eth_signature;
