//! Hashing of EraVM bytecode.

use sha2::{Digest, Sha256};
use zksync_basic_types::H256;

use crate::MAX_BYTECODE_LENGTH_BYTES;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum InvalidBytecodeError {
    #[error("Bytecode too long: {0} bytes, while max {1} allowed")]
    BytecodeTooLong(usize, usize),
    #[error("Bytecode has even number of 32-byte words")]
    BytecodeLengthInWordsIsEven,
    #[error("Bytecode length is not divisible by 32")]
    BytecodeLengthIsNotDivisibleBy32,
}

pub fn validate_bytecode(code: &[u8]) -> Result<(), InvalidBytecodeError> {
    let bytecode_len = code.len();

    if bytecode_len > MAX_BYTECODE_LENGTH_BYTES {
        return Err(InvalidBytecodeError::BytecodeTooLong(
            bytecode_len,
            MAX_BYTECODE_LENGTH_BYTES,
        ));
    }

    if bytecode_len % 32 != 0 {
        return Err(InvalidBytecodeError::BytecodeLengthIsNotDivisibleBy32);
    }

    let bytecode_len_words = bytecode_len / 32;

    if bytecode_len_words % 2 == 0 {
        return Err(InvalidBytecodeError::BytecodeLengthInWordsIsEven);
    }

    Ok(())
}

/// Bytecode marker encoded in the first byte of the bytecode hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BytecodeMarker {
    /// EraVM bytecode marker (1).
    EraVm = 1,
    /// EVM bytecode marker (2).
    Evm = 2,
}

impl BytecodeMarker {
    /// Parses a marker from the bytecode hash.
    pub fn new(bytecode_hash: H256) -> Option<Self> {
        Some(match bytecode_hash.as_bytes()[0] {
            val if val == Self::EraVm as u8 => Self::EraVm,
            val if val == Self::Evm as u8 => Self::Evm,
            _ => return None,
        })
    }
}

/// Hashes the provided EraVM bytecode.
///
/// The hash is `sha256(code)` with the first 4 bytes replaced by the version marker,
/// a zero byte and the code length in 32-byte words (big-endian `u16`).
pub fn hash_bytecode(code: &[u8]) -> Result<H256, InvalidBytecodeError> {
    validate_bytecode(code)?;

    let len_in_words = u16::try_from(code.len() / 32).map_err(|_| {
        InvalidBytecodeError::BytecodeTooLong(code.len(), MAX_BYTECODE_LENGTH_BYTES)
    })?;
    let digest = Sha256::digest(code);

    let mut output = [0u8; 32];
    output.copy_from_slice(digest.as_slice());
    output[0] = BytecodeMarker::EraVm as u8;
    output[1] = 0;
    output[2..4].copy_from_slice(&len_in_words.to_be_bytes());

    Ok(H256(output))
}

pub fn bytecode_len_in_words(bytecode_hash: &H256) -> u16 {
    u16::from_be_bytes([bytecode_hash[2], bytecode_hash[3]])
}

pub fn bytecode_len_in_bytes(bytecode_hash: H256) -> usize {
    bytecode_len_in_words(&bytecode_hash) as usize * 32
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use test_casing::test_casing;

    use super::*;

    #[test]
    fn bytecode_hash_has_era_vm_header() {
        let bytecode = vec![0xab; 32 * 3];
        let hash = hash_bytecode(&bytecode).unwrap();

        assert_eq!(BytecodeMarker::new(hash), Some(BytecodeMarker::EraVm));
        assert_eq!(hash.as_bytes()[1], 0);
        assert_eq!(bytecode_len_in_words(&hash), 3);
        assert_eq!(bytecode_len_in_bytes(hash), bytecode.len());

        let digest = Sha256::digest(&bytecode);
        assert_eq!(hash.as_bytes()[4..], digest[4..]);
    }

    #[test]
    fn bytecode_hash_is_deterministic() {
        let bytecode: Vec<u8> = (0..32 * 5).map(|i| i as u8).collect();
        assert_eq!(
            hash_bytecode(&bytecode).unwrap(),
            hash_bytecode(&bytecode.clone()).unwrap()
        );

        let mut other = bytecode.clone();
        other[100] ^= 1;
        assert_ne!(
            hash_bytecode(&bytecode).unwrap(),
            hash_bytecode(&other).unwrap()
        );
    }

    #[test]
    fn longest_valid_bytecode_is_hashed() {
        // 2047 words is the longest odd word count within the byte limit.
        let bytecode = vec![1; MAX_BYTECODE_LENGTH_BYTES - 32];
        let hash = hash_bytecode(&bytecode).unwrap();
        assert_eq!(bytecode_len_in_words(&hash), 2047);
    }

    #[test]
    fn too_long_bytecode_is_rejected() {
        let bytecode = vec![0; MAX_BYTECODE_LENGTH_BYTES + 32];
        assert_matches!(
            hash_bytecode(&bytecode),
            Err(InvalidBytecodeError::BytecodeTooLong(len, MAX_BYTECODE_LENGTH_BYTES))
                if len == bytecode.len()
        );
    }

    #[test_casing(4, [0, 64, 31, 33])]
    #[test]
    fn malformed_bytecode_is_rejected(len: usize) {
        let err = hash_bytecode(&vec![0; len]).unwrap_err();
        if len % 32 == 0 {
            assert_eq!(err, InvalidBytecodeError::BytecodeLengthInWordsIsEven);
        } else {
            assert_eq!(err, InvalidBytecodeError::BytecodeLengthIsNotDivisibleBy32);
        }
    }
}
