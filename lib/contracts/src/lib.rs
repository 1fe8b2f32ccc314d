//! ABIs of the L2 system contracts the client talks to.
//!
//! The artifacts are embedded at compile time, so building an [`AbiRegistry`] never touches the filesystem.
//! Every contract is exposed through a typed wrapper with named encoders; callers never look up
//! functions by string.

#![allow(clippy::derive_partial_eq_without_eq)]

use zksync_basic_types::{
    ethabi::{self, Contract, Event, Function, RawLog, Token},
    Address, H256, U256,
};

const CONTRACT_DEPLOYER_ARTIFACT: &str = include_str!("../abi/IContractDeployer.json");
const NONCE_HOLDER_ARTIFACT: &str = include_str!("../abi/INonceHolder.json");
const L2_BRIDGE_ARTIFACT: &str = include_str!("../abi/IL2Bridge.json");
const BASE_TOKEN_ARTIFACT: &str = include_str!("../abi/IBaseToken.json");
const PAYMASTER_FLOW_ARTIFACT: &str = include_str!("../abi/IPaymasterFlow.json");

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("failed to parse artifact of {name}: {source}")]
    Parse {
        name: String,
        source: serde_json::Error,
    },
    #[error("artifact of {0} has no `abi` field")]
    MissingAbi(String),
    #[error(transparent)]
    Abi(#[from] ethabi::Error),
    #[error("unexpected output of `{function}`: {reason}")]
    UnexpectedOutput {
        function: &'static str,
        reason: String,
    },
}

/// Parses the `abi` field of a compiler artifact (a JSON object as produced by hardhat / foundry).
pub fn load_contract_from_artifact(name: &str, artifact: &str) -> Result<Contract, ContractError> {
    let mut value: serde_json::Value =
        serde_json::from_str(artifact).map_err(|source| ContractError::Parse {
            name: name.to_owned(),
            source,
        })?;
    let abi = value
        .get_mut("abi")
        .map(serde_json::Value::take)
        .ok_or_else(|| ContractError::MissingAbi(name.to_owned()))?;
    serde_json::from_value(abi).map_err(|source| ContractError::Parse {
        name: name.to_owned(),
        source,
    })
}

/// `IContractDeployer` system contract.
#[derive(Debug, Clone)]
pub struct ContractDeployerAbi {
    create: Function,
    create2: Function,
    contract_deployed: Event,
}

impl ContractDeployerAbi {
    fn new(contract: &Contract) -> Result<Self, ContractError> {
        Ok(Self {
            create: contract.function("create")?.clone(),
            create2: contract.function("create2")?.clone(),
            contract_deployed: contract.event("ContractDeployed")?.clone(),
        })
    }

    /// Calldata of `create(bytes32 salt, bytes32 bytecodeHash, bytes input)`.
    pub fn encode_create(
        &self,
        salt: H256,
        bytecode_hash: H256,
        constructor_input: &[u8],
    ) -> Result<Vec<u8>, ContractError> {
        Ok(self
            .create
            .encode_input(&deploy_params(salt, bytecode_hash, constructor_input))?)
    }

    /// Calldata of `create2(bytes32 salt, bytes32 bytecodeHash, bytes input)`.
    pub fn encode_create2(
        &self,
        salt: H256,
        bytecode_hash: H256,
        constructor_input: &[u8],
    ) -> Result<Vec<u8>, ContractError> {
        Ok(self
            .create2
            .encode_input(&deploy_params(salt, bytecode_hash, constructor_input))?)
    }

    /// Topic 0 of the `ContractDeployed` event.
    pub fn contract_deployed_signature(&self) -> H256 {
        self.contract_deployed.signature()
    }

    /// Decodes a raw `ContractDeployed` log into `(deployer, bytecode_hash, contract_address)`.
    pub fn decode_contract_deployed(
        &self,
        topics: Vec<H256>,
        data: Vec<u8>,
    ) -> Result<(Address, H256, Address), ContractError> {
        let log = self.contract_deployed.parse_log(RawLog { topics, data })?;
        match log
            .params
            .into_iter()
            .map(|param| param.value)
            .collect::<Vec<_>>()
            .as_slice()
        {
            [Token::Address(deployer), Token::FixedBytes(hash), Token::Address(contract)]
                if hash.len() == 32 =>
            {
                Ok((*deployer, H256::from_slice(hash), *contract))
            }
            other => Err(ContractError::UnexpectedOutput {
                function: "ContractDeployed",
                reason: format!("{other:?}"),
            }),
        }
    }
}

fn deploy_params(salt: H256, bytecode_hash: H256, constructor_input: &[u8]) -> [Token; 3] {
    [
        Token::FixedBytes(salt.as_bytes().to_vec()),
        Token::FixedBytes(bytecode_hash.as_bytes().to_vec()),
        Token::Bytes(constructor_input.to_vec()),
    ]
}

/// `INonceHolder` system contract.
#[derive(Debug, Clone)]
pub struct NonceHolderAbi {
    get_deployment_nonce: Function,
}

impl NonceHolderAbi {
    fn new(contract: &Contract) -> Result<Self, ContractError> {
        Ok(Self {
            get_deployment_nonce: contract.function("getDeploymentNonce")?.clone(),
        })
    }

    pub fn encode_get_deployment_nonce(&self, address: Address) -> Result<Vec<u8>, ContractError> {
        Ok(self
            .get_deployment_nonce
            .encode_input(&[Token::Address(address)])?)
    }

    pub fn decode_get_deployment_nonce(&self, output: &[u8]) -> Result<U256, ContractError> {
        let tokens = self.get_deployment_nonce.decode_output(output)?;
        match tokens.as_slice() {
            [Token::Uint(nonce)] => Ok(*nonce),
            other => Err(ContractError::UnexpectedOutput {
                function: "getDeploymentNonce",
                reason: format!("{other:?}"),
            }),
        }
    }
}

/// Default L2 bridge (`IL2Bridge`), used to withdraw ERC-20 tokens.
#[derive(Debug, Clone)]
pub struct L2BridgeAbi {
    withdraw: Function,
}

impl L2BridgeAbi {
    fn new(contract: &Contract) -> Result<Self, ContractError> {
        Ok(Self {
            withdraw: contract.function("withdraw")?.clone(),
        })
    }

    /// Calldata of `withdraw(address l1Receiver, address l2Token, uint256 amount)`.
    pub fn encode_withdraw(
        &self,
        l1_receiver: Address,
        l2_token: Address,
        amount: U256,
    ) -> Result<Vec<u8>, ContractError> {
        Ok(self.withdraw.encode_input(&[
            Token::Address(l1_receiver),
            Token::Address(l2_token),
            Token::Uint(amount),
        ])?)
    }
}

/// L2 base token system contract, used to withdraw the native token.
#[derive(Debug, Clone)]
pub struct BaseTokenAbi {
    withdraw: Function,
}

impl BaseTokenAbi {
    fn new(contract: &Contract) -> Result<Self, ContractError> {
        Ok(Self {
            withdraw: contract.function("withdraw")?.clone(),
        })
    }

    /// Calldata of `withdraw(address l1Receiver)`; the amount is the transaction value.
    pub fn encode_withdraw(&self, l1_receiver: Address) -> Result<Vec<u8>, ContractError> {
        Ok(self.withdraw.encode_input(&[Token::Address(l1_receiver)])?)
    }
}

/// `IPaymasterFlow`, the input format understood by paymasters.
#[derive(Debug, Clone)]
pub struct PaymasterFlowAbi {
    approval_based: Function,
    general: Function,
}

impl PaymasterFlowAbi {
    fn new(contract: &Contract) -> Result<Self, ContractError> {
        Ok(Self {
            approval_based: contract.function("approvalBased")?.clone(),
            general: contract.function("general")?.clone(),
        })
    }

    pub fn encode_approval_based(
        &self,
        token: Address,
        min_allowance: U256,
        inner_input: &[u8],
    ) -> Result<Vec<u8>, ContractError> {
        Ok(self.approval_based.encode_input(&[
            Token::Address(token),
            Token::Uint(min_allowance),
            Token::Bytes(inner_input.to_vec()),
        ])?)
    }

    pub fn encode_general(&self, inner_input: &[u8]) -> Result<Vec<u8>, ContractError> {
        Ok(self
            .general
            .encode_input(&[Token::Bytes(inner_input.to_vec())])?)
    }
}

/// All ABIs used by the client, parsed once and then shared read-only.
#[derive(Debug, Clone)]
pub struct AbiRegistry {
    pub contract_deployer: ContractDeployerAbi,
    pub nonce_holder: NonceHolderAbi,
    pub l2_bridge: L2BridgeAbi,
    pub base_token: BaseTokenAbi,
    pub paymaster_flow: PaymasterFlowAbi,
}

impl AbiRegistry {
    pub fn new() -> Result<Self, ContractError> {
        Ok(Self {
            contract_deployer: ContractDeployerAbi::new(&load_contract_from_artifact(
                "IContractDeployer",
                CONTRACT_DEPLOYER_ARTIFACT,
            )?)?,
            nonce_holder: NonceHolderAbi::new(&load_contract_from_artifact(
                "INonceHolder",
                NONCE_HOLDER_ARTIFACT,
            )?)?,
            l2_bridge: L2BridgeAbi::new(&load_contract_from_artifact(
                "IL2Bridge",
                L2_BRIDGE_ARTIFACT,
            )?)?,
            base_token: BaseTokenAbi::new(&load_contract_from_artifact(
                "IBaseToken",
                BASE_TOKEN_ARTIFACT,
            )?)?,
            paymaster_flow: PaymasterFlowAbi::new(&load_contract_from_artifact(
                "IPaymasterFlow",
                PAYMASTER_FLOW_ARTIFACT,
            )?)?,
        })
    }
}
