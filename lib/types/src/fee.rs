use serde::{Deserialize, Serialize};

use crate::U256;

/// Fee parameters of an L2 transaction, as returned by `zks_estimateFee`.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    /// The limit of gas that are to be spent on the actual transaction.
    pub gas_limit: U256,
    /// zkSync version of EIP1559 maxFeePerGas.
    pub max_fee_per_gas: U256,
    /// zkSync version of EIP1559 maxPriorityFeePerGas.
    pub max_priority_fee_per_gas: U256,
    /// The maximal gas per pubdata byte the user agrees to.
    pub gas_per_pubdata_limit: U256,
}
