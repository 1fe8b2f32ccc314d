use once_cell::sync::Lazy;

use crate::{address_to_h256, keccak256, u256_to_h256, Address, Salt, H256, U256};

/// Domain separator of addresses produced by the deployer's `create`.
pub static CREATE_PREFIX: Lazy<H256> = Lazy::new(|| H256(keccak256(b"zksyncCreate")));

/// Domain separator of addresses produced by the deployer's `create2`.
pub static CREATE2_PREFIX: Lazy<H256> = Lazy::new(|| H256(keccak256(b"zksyncCreate2")));

/// Pre-calculates the address of the to-be-deployed EraVM contract (via CREATE, not CREATE2).
///
/// `deploy_nonce` is the deployment nonce of the sender, encoded as a 32-byte big-endian word.
pub fn deployed_address_create(sender: Address, deploy_nonce: U256) -> Address {
    let address_bytes = address_to_h256(&sender);
    let nonce_bytes = u256_to_h256(deploy_nonce);

    let mut bytes = [0u8; 96];
    bytes[..32].copy_from_slice(CREATE_PREFIX.as_bytes());
    bytes[32..64].copy_from_slice(address_bytes.as_bytes());
    bytes[64..].copy_from_slice(nonce_bytes.as_bytes());

    Address::from_slice(&keccak256(&bytes)[12..])
}

/// Pre-calculates the address of the EraVM contract deployed via CREATE2.
pub fn deployed_address_create2(
    sender: Address,
    salt: Salt,
    bytecode_hash: H256,
    constructor_input: &[u8],
) -> Address {
    let input_hash = keccak256(constructor_input);

    let mut bytes = [0u8; 160];
    bytes[..32].copy_from_slice(CREATE2_PREFIX.as_bytes());
    bytes[32..64].copy_from_slice(address_to_h256(&sender).as_bytes());
    bytes[64..96].copy_from_slice(salt.as_bytes());
    bytes[96..128].copy_from_slice(bytecode_hash.as_bytes());
    bytes[128..].copy_from_slice(&input_hash);

    Address::from_slice(&keccak256(&bytes)[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::hash_bytecode;

    fn sender() -> Address {
        "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".parse().unwrap()
    }

    #[test]
    fn prefixes_match_deployer_constants() {
        assert_eq!(
            *CREATE_PREFIX,
            "0x63bae3a9951d38e8a3fbb7b70909afc1200610fc5bc55ade242f815974674f23"
                .parse()
                .unwrap()
        );
        assert_eq!(
            *CREATE2_PREFIX,
            "0x2020dba91b30cc0006188af794c2fb30dd8520db7e2c088b7fc7c103c00ca494"
                .parse()
                .unwrap()
        );
    }

    #[test]
    fn create_address_depends_on_nonce() {
        let address0 = deployed_address_create(sender(), 0.into());
        let address1 = deployed_address_create(sender(), 1.into());
        assert_ne!(address0, address1);
        assert_eq!(address0, deployed_address_create(sender(), U256::zero()));

        let mut preimage = CREATE_PREFIX.as_bytes().to_vec();
        preimage.extend_from_slice(&[0; 12]);
        preimage.extend_from_slice(sender().as_bytes());
        let mut nonce = [0u8; 32];
        nonce[31] = 1;
        preimage.extend_from_slice(&nonce);
        assert_eq!(address1, Address::from_slice(&keccak256(&preimage)[12..]));
    }

    #[test]
    fn create2_address_is_deterministic_and_input_sensitive() {
        let bytecode = vec![7; 32];
        let bytecode_hash = hash_bytecode(&bytecode).unwrap();
        let salt = Salt::default();
        let input = [1, 2, 3];

        let address = deployed_address_create2(sender(), salt, bytecode_hash, &input);
        assert_eq!(
            address,
            deployed_address_create2(sender(), salt, bytecode_hash, &input)
        );

        let mut other_sender = sender();
        other_sender.0[19] ^= 1;
        let mut other_salt = [0u8; 32];
        other_salt[0] = 1;
        let mut other_hash = bytecode_hash;
        other_hash.0[31] ^= 1;

        let variations = [
            deployed_address_create2(other_sender, salt, bytecode_hash, &input),
            deployed_address_create2(sender(), other_salt.into(), bytecode_hash, &input),
            deployed_address_create2(sender(), salt, other_hash, &input),
            deployed_address_create2(sender(), salt, bytecode_hash, &[1, 2, 4]),
            deployed_address_create2(sender(), salt, bytecode_hash, &[]),
        ];
        for variation in variations {
            assert_ne!(variation, address);
        }
    }
}
