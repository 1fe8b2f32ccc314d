//! Types returned by the Web3 API of an L2 node.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{Address, Bytes, H256, U256, U64};

/// Block number selector, as accepted by `eth_getBlockByNumber` and similar methods.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockNumber {
    /// Alias for `BlockNumber::Latest`.
    Committed,
    /// Last block that was finalized on L1.
    Finalized,
    /// Latest sealed block.
    Latest,
    /// Earliest block (genesis).
    Earliest,
    /// Latest block (may be the block that is currently open).
    Pending,
    /// Block by number from canonical chain.
    Number(U64),
}

impl<T: Into<U64>> From<T> for BlockNumber {
    fn from(x: T) -> Self {
        Self::Number(x.into())
    }
}

impl Serialize for BlockNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::Number(ref x) => serializer.serialize_str(&format!("0x{x:x}")),
            Self::Committed => serializer.serialize_str("committed"),
            Self::Finalized => serializer.serialize_str("finalized"),
            Self::Latest => serializer.serialize_str("latest"),
            Self::Earliest => serializer.serialize_str("earliest"),
            Self::Pending => serializer.serialize_str("pending"),
        }
    }
}

impl<'de> Deserialize<'de> for BlockNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl de::Visitor<'_> for V {
            type Value = BlockNumber;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("A block number or one of the supported aliases")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                let result = match value {
                    "committed" => BlockNumber::Committed,
                    "finalized" => BlockNumber::Finalized,
                    "latest" => BlockNumber::Latest,
                    "earliest" => BlockNumber::Earliest,
                    "pending" => BlockNumber::Pending,
                    num => {
                        let number = U64::from_str_radix(num.trim_start_matches("0x"), 16)
                            .map_err(|_| de::Error::custom("invalid block number"))?;
                        BlockNumber::Number(number)
                    }
                };
                Ok(result)
            }
        }
        deserializer.deserialize_str(V)
    }
}

/// A log produced by a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// H160
    pub address: Address,
    /// Topics
    pub topics: Vec<H256>,
    /// Data
    pub data: Bytes,
    /// Block Hash
    #[serde(default)]
    pub block_hash: Option<H256>,
    /// Block Number
    #[serde(default)]
    pub block_number: Option<U64>,
    /// L1 batch number the log is included in.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Transaction Hash
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    /// Transaction Index
    #[serde(default)]
    pub transaction_index: Option<U64>,
    /// Log Index in Block
    #[serde(default)]
    pub log_index: Option<U256>,
    /// Log Index in Transaction
    #[serde(default)]
    pub transaction_log_index: Option<U256>,
    /// Log Type
    #[serde(default)]
    pub log_type: Option<String>,
    /// Removed
    #[serde(default)]
    pub removed: Option<bool>,
}

/// A transaction receipt.
///
/// `block_hash` / `block_number` stay unset while the transaction is known to the node
/// but not yet included in a sealed block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Transaction hash.
    pub transaction_hash: H256,
    /// Index within the block.
    #[serde(default)]
    pub transaction_index: U64,
    /// Hash of the block this transaction was included within.
    #[serde(default)]
    pub block_hash: Option<H256>,
    /// Number of the miniblock this transaction was included within.
    #[serde(default)]
    pub block_number: Option<U64>,
    /// Index of transaction in l1 batch
    #[serde(default)]
    pub l1_batch_tx_index: Option<U64>,
    /// Number of the l1 batch this transaction was included within.
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Sender
    #[serde(default)]
    pub from: Address,
    /// Recipient (None when contract creation)
    #[serde(default)]
    pub to: Option<Address>,
    /// Cumulative gas used within the block after this was executed.
    #[serde(default)]
    pub cumulative_gas_used: U256,
    /// Gas used by this transaction alone.
    #[serde(default)]
    pub gas_used: Option<U256>,
    /// Contract address created, or `None` if not a deployment.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Logs generated within this transaction.
    #[serde(default)]
    pub logs: Vec<Log>,
    /// Status: either 1 (success) or 0 (failure).
    #[serde(default)]
    pub status: Option<U64>,
    /// Effective gas price
    #[serde(default)]
    pub effective_gas_price: Option<U256>,
    /// Transaction type, Some(1) for AccessList transaction, None for Legacy
    #[serde(rename = "type", default)]
    pub transaction_type: Option<U64>,
}

impl TransactionReceipt {
    /// Returns `true` if the receipt belongs to a sealed block.
    pub fn is_included(&self) -> bool {
        self.block_hash.is_some()
    }

    /// Returns `true` if the transaction was executed successfully.
    pub fn is_successful(&self) -> bool {
        self.status == Some(U64::one())
    }
}

/// Block header fields the client cares about; other fields of the response are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Hash of the block
    #[serde(default)]
    pub hash: Option<H256>,
    /// Hash of the parent
    #[serde(default)]
    pub parent_hash: H256,
    /// Block number
    #[serde(default)]
    pub number: Option<U64>,
    /// L1 batch number the block belongs to
    #[serde(default)]
    pub l1_batch_number: Option<U64>,
    /// Timestamp
    #[serde(default)]
    pub timestamp: U256,
    /// Base fee per unit of gas
    #[serde(default)]
    pub base_fee_per_gas: U256,
}

/// Default bridge contracts of the chain, as returned by `zks_getBridgeContracts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAddresses {
    pub l1_shared_default_bridge: Option<Address>,
    pub l2_shared_default_bridge: Option<Address>,
    pub l1_erc20_default_bridge: Option<Address>,
    pub l2_erc20_default_bridge: Option<Address>,
    pub l1_weth_bridge: Option<Address>,
    pub l2_weth_bridge: Option<Address>,
    pub l2_legacy_shared_bridge: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_number_serialization() {
        assert_eq!(
            serde_json::to_string(&BlockNumber::Finalized).unwrap(),
            "\"finalized\""
        );
        assert_eq!(
            serde_json::to_string(&BlockNumber::from(255_u64)).unwrap(),
            "\"0xff\""
        );
        let parsed: BlockNumber = serde_json::from_str("\"0x10\"").unwrap();
        assert_eq!(parsed, BlockNumber::Number(16.into()));
        let parsed: BlockNumber = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, BlockNumber::Pending);
    }

    #[test]
    fn pending_receipt_is_not_included() {
        let receipt: TransactionReceipt = serde_json::from_value(serde_json::json!({
            "transactionHash": format!("{:?}", H256::repeat_byte(1)),
            "blockHash": null,
            "blockNumber": null,
            "logs": [],
        }))
        .unwrap();
        assert!(!receipt.is_included());
        assert!(!receipt.is_successful());
    }

    #[test]
    fn bridge_addresses_deserialize_partially() {
        let addresses: BridgeAddresses = serde_json::from_value(serde_json::json!({
            "l2Erc20DefaultBridge": "0x0000000000000000000000000000000000000abc",
        }))
        .unwrap();
        assert_eq!(
            addresses.l2_erc20_default_bridge,
            Some(Address::from_low_u64_be(0xabc))
        );
        assert_eq!(addresses.l1_erc20_default_bridge, None);
    }
}
