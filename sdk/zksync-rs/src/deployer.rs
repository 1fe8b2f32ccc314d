//! Encoding of deployer calls, address derivation and extraction of deployed addresses.

use std::sync::Arc;

use zksync_contracts::AbiRegistry;
use zksync_types::{
    api::TransactionReceipt, bytecode::hash_bytecode, deployed_address_create,
    deployed_address_create2, event::is_deploy_event, Address, Salt, ValidationError, H256, U256,
};

use crate::error::ClientError;

/// Client-side counterpart of the contract deployer system contract.
#[derive(Debug, Clone)]
pub struct ContractDeployer {
    abi: Arc<AbiRegistry>,
}

fn validate_inputs(bytecode: &[u8], salt: Option<&[u8]>) -> Result<(Salt, H256), ValidationError> {
    let salt = salt.map(Salt::from_slice).transpose()?.unwrap_or_default();
    let bytecode_hash = hash_bytecode(bytecode)?;
    Ok((salt, bytecode_hash))
}

impl ContractDeployer {
    pub fn new(abi: Arc<AbiRegistry>) -> Self {
        Self { abi }
    }

    /// Calldata of the deployer's `create`. Call data defaults to empty, salt to 32 zero bytes.
    pub fn encode_create(
        &self,
        bytecode: &[u8],
        call_data: Option<&[u8]>,
        salt: Option<&[u8]>,
    ) -> Result<Vec<u8>, ClientError> {
        let (salt, bytecode_hash) = validate_inputs(bytecode, salt)?;
        Ok(self.abi.contract_deployer.encode_create(
            H256(salt.to_fixed_bytes()),
            bytecode_hash,
            call_data.unwrap_or_default(),
        )?)
    }

    /// Calldata of the deployer's `create2`. Call data defaults to empty, salt to 32 zero bytes.
    pub fn encode_create2(
        &self,
        bytecode: &[u8],
        call_data: Option<&[u8]>,
        salt: Option<&[u8]>,
    ) -> Result<Vec<u8>, ClientError> {
        let (salt, bytecode_hash) = validate_inputs(bytecode, salt)?;
        Ok(self.abi.contract_deployer.encode_create2(
            H256(salt.to_fixed_bytes()),
            bytecode_hash,
            call_data.unwrap_or_default(),
        )?)
    }

    /// Address of a contract created by `sender` with the given deployment nonce.
    pub fn derive_create_address(sender: Address, deployment_nonce: U256) -> Address {
        deployed_address_create(sender, deployment_nonce)
    }

    /// Address of a contract created by `sender` via `create2`.
    pub fn derive_create2_address(
        sender: Address,
        bytecode: &[u8],
        constructor_data: &[u8],
        salt: &[u8],
    ) -> Result<Address, ValidationError> {
        let (salt, bytecode_hash) = validate_inputs(bytecode, Some(salt))?;
        Ok(deployed_address_create2(
            sender,
            salt,
            bytecode_hash,
            constructor_data,
        ))
    }

    /// Addresses of all contracts deployed by the transaction, in log order.
    pub fn extract_all_contract_addresses(
        &self,
        receipt: &TransactionReceipt,
    ) -> Result<Vec<Address>, ClientError> {
        receipt
            .logs
            .iter()
            .filter(|log| is_deploy_event(log))
            .map(|log| {
                let (_, _, contract_address) = self
                    .abi
                    .contract_deployer
                    .decode_contract_deployed(log.topics.clone(), log.data.0.clone())?;
                Ok(contract_address)
            })
            .collect()
    }

    /// Address of the contract deployed by the transaction. If the transaction deployed several
    /// contracts, the last one is returned; it's the top-level contract, since nested
    /// deployments finish first.
    pub fn extract_contract_address(
        &self,
        receipt: &TransactionReceipt,
    ) -> Result<Address, ClientError> {
        self.extract_all_contract_addresses(receipt)?
            .pop()
            .ok_or_else(|| {
                ClientError::AddressExtraction(format!(
                    "no ContractDeployed events in the receipt of {:?}",
                    receipt.transaction_hash
                ))
            })
    }

    /// Checks that the contract was deployed at the precomputed address.
    pub fn verify_deployed_address(
        &self,
        precomputed: Address,
        receipt: &TransactionReceipt,
    ) -> Result<Address, ClientError> {
        let observed = self.extract_contract_address(receipt)?;
        if observed != precomputed {
            return Err(ClientError::AddressMismatch {
                precomputed,
                observed,
            });
        }
        Ok(observed)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use test_casing::test_casing;
    use zksync_types::{
        address_to_h256, api::Log, event::DEPLOY_EVENT_SIGNATURE, CONTRACT_DEPLOYER_ADDRESS,
    };

    use super::*;

    fn deployer() -> ContractDeployer {
        ContractDeployer::new(Arc::new(AbiRegistry::new().unwrap()))
    }

    fn sender() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn bytecode() -> Vec<u8> {
        vec![0x42; 32 * 3]
    }

    fn deploy_log(contract_address: Address) -> Log {
        Log {
            address: CONTRACT_DEPLOYER_ADDRESS,
            topics: vec![
                *DEPLOY_EVENT_SIGNATURE,
                address_to_h256(&sender()),
                hash_bytecode(&bytecode()).unwrap(),
                address_to_h256(&contract_address),
            ],
            ..Log::default()
        }
    }

    #[test]
    fn create2_calldata_commits_to_inputs() {
        let deployer = deployer();
        let salt = [7; 32];
        let calldata = deployer
            .encode_create2(&bytecode(), Some(&[1, 2][..]), Some(&salt[..]))
            .unwrap();
        assert_eq!(calldata[..4], [0x3c, 0xda, 0x33, 0x51]);
        assert_eq!(calldata[4..36], salt);
        assert_eq!(
            calldata[36..68],
            *hash_bytecode(&bytecode()).unwrap().as_bytes()
        );

        let create = deployer.encode_create(&bytecode(), None, None).unwrap();
        assert_eq!(create[..4], [0x9c, 0x4d, 0x53, 0x5b]);
        assert_eq!(create[4..36], [0; 32]);
    }

    #[test_casing(3, [0, 31, 64])]
    #[test]
    fn invalid_salt_is_rejected_before_hashing(salt_len: usize) {
        let salt = vec![1; salt_len];
        // Bytecode is invalid as well; the salt is checked first.
        let bytecode = vec![0; 64];
        let err = deployer()
            .encode_create2(&bytecode, None, Some(salt.as_slice()))
            .unwrap_err();
        assert_matches!(
            err,
            ClientError::Validation(ValidationError::InvalidSaltLength(len)) if len == salt_len
        );
        let err = ContractDeployer::derive_create2_address(sender(), &bytecode, &[], &salt)
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidSaltLength(salt_len));
    }

    #[test]
    fn derived_addresses_match_reference_vectors() {
        let sender: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".parse().unwrap();
        let create2 =
            ContractDeployer::derive_create2_address(sender, &bytecode(), &[], &[0; 32]).unwrap();
        let expected: Address = "0x51efec5d470fb093de37d80305a40d87c8f085f6".parse().unwrap();
        assert_eq!(create2, expected);

        let create = ContractDeployer::derive_create_address(sender, 5.into());
        let expected: Address = "0x08af5b84118f7a5942369be7f9a114aeecf29d28".parse().unwrap();
        assert_eq!(create, expected);
    }

    #[test]
    fn invalid_bytecode_is_rejected() {
        let err = ContractDeployer::derive_create2_address(sender(), &[0; 64], &[], &[0; 32])
            .unwrap_err();
        assert_matches!(err, ValidationError::InvalidBytecode(_));
    }

    #[test]
    fn create2_derivation_is_sensitive_to_every_input() {
        let salt = [0; 32];
        let address =
            ContractDeployer::derive_create2_address(sender(), &bytecode(), &[1], &salt).unwrap();
        assert_eq!(
            address,
            ContractDeployer::derive_create2_address(sender(), &bytecode(), &[1], &salt).unwrap()
        );

        let mut other_bytecode = bytecode();
        other_bytecode[0] ^= 1;
        let mut other_salt = salt;
        other_salt[31] = 1;
        let variations = [
            ContractDeployer::derive_create2_address(
                Address::repeat_byte(0xab),
                &bytecode(),
                &[1],
                &salt,
            ),
            ContractDeployer::derive_create2_address(sender(), &other_bytecode, &[1], &salt),
            ContractDeployer::derive_create2_address(sender(), &bytecode(), &[2], &salt),
            ContractDeployer::derive_create2_address(sender(), &bytecode(), &[1], &other_salt),
        ];
        for variation in variations {
            assert_ne!(variation.unwrap(), address);
        }
    }

    #[test]
    fn last_deployed_address_is_extracted() {
        let deployer = deployer();
        let mut foreign_log = deploy_log(Address::repeat_byte(3));
        foreign_log.address = Address::repeat_byte(0x99);
        let receipt = TransactionReceipt {
            logs: vec![
                deploy_log(Address::repeat_byte(1)),
                foreign_log,
                Log::default(),
                deploy_log(Address::repeat_byte(2)),
            ],
            ..TransactionReceipt::default()
        };

        assert_eq!(
            deployer.extract_all_contract_addresses(&receipt).unwrap(),
            [Address::repeat_byte(1), Address::repeat_byte(2)]
        );
        assert_eq!(
            deployer.extract_contract_address(&receipt).unwrap(),
            Address::repeat_byte(2)
        );
        assert_eq!(
            deployer
                .verify_deployed_address(Address::repeat_byte(2), &receipt)
                .unwrap(),
            Address::repeat_byte(2)
        );
        let err = deployer
            .verify_deployed_address(Address::repeat_byte(1), &receipt)
            .unwrap_err();
        assert_matches!(
            err,
            ClientError::AddressMismatch { precomputed, observed }
                if precomputed == Address::repeat_byte(1) && observed == Address::repeat_byte(2)
        );
    }

    #[test]
    fn missing_deploy_event_is_reported() {
        let receipt = TransactionReceipt {
            logs: vec![Log::default()],
            ..TransactionReceipt::default()
        };
        let err = deployer().extract_contract_address(&receipt).unwrap_err();
        assert_matches!(err, ClientError::AddressExtraction(_));
    }
}
