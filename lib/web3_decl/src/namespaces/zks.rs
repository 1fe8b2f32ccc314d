#[allow(unused_imports)]
use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;
use zksync_types::{api::BridgeAddresses, fee::Fee, transaction_request::CallRequest, Address};

/// ZKsync-specific methods used by the client.
#[rpc(client, namespace = "zks")]
pub trait ZksNamespace {
    #[method(name = "estimateFee")]
    async fn estimate_fee(&self, req: CallRequest) -> RpcResult<Fee>;

    #[method(name = "getMainContract")]
    async fn get_main_contract(&self) -> RpcResult<Address>;

    #[method(name = "getTestnetPaymaster")]
    async fn get_testnet_paymaster(&self) -> RpcResult<Option<Address>>;

    #[method(name = "getBridgeContracts")]
    async fn get_bridge_contracts(&self) -> RpcResult<BridgeAddresses>;
}
