use once_cell::sync::Lazy;

use crate::{api::Log, ethabi, keccak256, CONTRACT_DEPLOYER_ADDRESS, H256};

/// `ContractDeployed(address indexed deployerAddress, bytes32 indexed bytecodeHash, address indexed contractAddress)`
pub static DEPLOY_EVENT_SIGNATURE: Lazy<H256> = Lazy::new(|| {
    ethabi::long_signature(
        "ContractDeployed",
        &[
            ethabi::ParamType::Address,
            ethabi::ParamType::FixedBytes(32),
            ethabi::ParamType::Address,
        ],
    )
});

/// `NewPriorityRequest` emitted by the diamond proxy on L1. None of the event params are indexed;
/// the data starts with `txId` followed by the L2 transaction hash.
pub static NEW_PRIORITY_REQUEST_EVENT_SIGNATURE: Lazy<H256> = Lazy::new(|| {
    H256(keccak256(
        b"NewPriorityRequest(uint256,bytes32,uint64,(uint256,uint256,uint256,uint256,uint256,\
          uint256,uint256,uint256,uint256,uint256,uint256[4],bytes,bytes,uint256[],bytes,bytes),\
          bytes[])",
    ))
});

/// Returns `true` if the log is a `ContractDeployed` event emitted by the contract deployer.
pub fn is_deploy_event(log: &Log) -> bool {
    log.address == CONTRACT_DEPLOYER_ADDRESS && log.topics.first() == Some(&DEPLOY_EVENT_SIGNATURE)
}
