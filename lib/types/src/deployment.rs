//! Input validation for contract deployment.

use std::fmt;

use serde::{Deserialize, Serialize};
use zksync_basic_types::H256;

use crate::bytecode::InvalidBytecodeError;

/// Error in user-supplied deployment parameters. Always raised before any hashing or encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("salt must be exactly 32 bytes long, got {0}")]
    InvalidSaltLength(usize),
    #[error("invalid bytecode: {0}")]
    InvalidBytecode(#[from] InvalidBytecodeError),
}

/// CREATE2 salt. Guaranteed to be exactly 32 bytes; the default salt consists of zeros.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt(H256);

impl fmt::Debug for Salt {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Salt({:?})", self.0)
    }
}

impl Salt {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() != 32 {
            return Err(ValidationError::InvalidSaltLength(bytes.len()));
        }
        Ok(Self(H256::from_slice(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn to_fixed_bytes(self) -> [u8; 32] {
        self.0.to_fixed_bytes()
    }
}

impl From<H256> for Salt {
    fn from(value: H256) -> Self {
        Self(value)
    }
}

impl From<[u8; 32]> for Salt {
    fn from(value: [u8; 32]) -> Self {
        Self(H256(value))
    }
}

impl TryFrom<&[u8]> for Salt {
    type Error = ValidationError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

#[cfg(test)]
mod tests {
    use test_casing::test_casing;

    use super::*;

    #[test]
    fn default_salt_is_zero() {
        assert_eq!(Salt::default().as_bytes(), &[0; 32]);
    }

    #[test_casing(4, [0, 16, 31, 33])]
    #[test]
    fn salt_of_wrong_length_is_rejected(len: usize) {
        assert_eq!(
            Salt::from_slice(&vec![1; len]),
            Err(ValidationError::InvalidSaltLength(len))
        );
    }

    #[test]
    fn salt_keeps_bytes_verbatim() {
        let bytes: Vec<u8> = (0..32).collect();
        let salt = Salt::try_from(bytes.as_slice()).unwrap();
        assert_eq!(salt.as_bytes(), bytes.as_slice());
    }
}
