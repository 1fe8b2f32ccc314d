//! Addresses of the system contracts and protocol-wide defaults.

use zksync_basic_types::{Address, H160};

pub const NONCE_HOLDER_ADDRESS: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x80, 0x03,
]);

pub const CONTRACT_DEPLOYER_ADDRESS: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x80, 0x06,
]);

/// Contract holding balances of the base (native) token.
pub const L2_BASE_TOKEN_ADDRESS: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x80, 0x0a,
]);

/// Address used by clients to denote the base token in token-parametrized calls.
pub const ETHEREUM_ADDRESS: Address = H160([0; 20]);

/// Gas per pubdata byte limit used when the caller does not specify one.
pub const DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE: u64 = 50_000;

/// Priority fee used when the caller does not specify one, in wei.
pub const DEFAULT_MAX_PRIORITY_FEE_PER_GAS: u64 = 100_000_000;

/// Maximum length of a deployable bytecode in bytes.
pub const MAX_BYTECODE_LENGTH_BYTES: usize = 1 << 16;
