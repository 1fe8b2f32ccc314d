#[allow(unused_imports)]
use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;
use zksync_types::{
    api::{Block, BlockNumber, TransactionReceipt},
    transaction_request::CallRequest,
    Address, Bytes, H256, U256,
};

/// Subset of the `eth` namespace used by the client.
#[rpc(client, namespace = "eth")]
pub trait EthNamespace {
    #[method(name = "call")]
    async fn call(&self, req: CallRequest, block: Option<BlockNumber>) -> RpcResult<Bytes>;

    #[method(name = "estimateGas")]
    async fn estimate_gas(&self, req: CallRequest, block: Option<BlockNumber>)
        -> RpcResult<U256>;

    #[method(name = "gasPrice")]
    async fn gas_price(&self) -> RpcResult<U256>;

    #[method(name = "getBalance")]
    async fn get_balance(&self, address: Address, block: Option<BlockNumber>) -> RpcResult<U256>;

    #[method(name = "getBlockByNumber")]
    async fn get_block_by_number(
        &self,
        block_number: BlockNumber,
        full_transactions: bool,
    ) -> RpcResult<Option<Block>>;

    #[method(name = "getTransactionCount")]
    async fn get_transaction_count(
        &self,
        address: Address,
        block: Option<BlockNumber>,
    ) -> RpcResult<U256>;

    #[method(name = "getTransactionReceipt")]
    async fn get_transaction_receipt(&self, hash: H256) -> RpcResult<Option<TransactionReceipt>>;

    #[method(name = "sendRawTransaction")]
    async fn send_raw_transaction(&self, tx_bytes: Bytes) -> RpcResult<H256>;
}
