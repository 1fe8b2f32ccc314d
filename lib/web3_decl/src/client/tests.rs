//! Tests for the L2 client wrappers.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use assert_matches::assert_matches;
use jsonrpsee::{
    core::params::{ArrayParams, BatchRequestBuilder},
    types::error::ErrorCode,
};
use zksync_types::{
    api::{BlockNumber, TransactionReceipt},
    Address, H256, U256, U64,
};

use super::*;
use crate::{
    error::ClientRpcContext,
    namespaces::{EthNamespaceClient, ZksNamespaceClient},
};

#[tokio::test]
async fn mock_client_serves_typed_requests() {
    let client = MockClient::builder()
        .method("eth_gasPrice", || Ok(U256::from(250_000_000)))
        .method(
            "eth_getTransactionCount",
            |address: Address, block: Option<BlockNumber>| {
                assert_eq!(block, Some(BlockNumber::Pending));
                Ok(U256::from(address.as_bytes()[19]))
            },
        )
        .build();

    assert_eq!(client.gas_price().await.unwrap(), U256::from(250_000_000));
    let nonce = client
        .get_transaction_count(Address::repeat_byte(7), Some(BlockNumber::Pending))
        .await
        .unwrap();
    assert_eq!(nonce, U256::from(7));
}

#[tokio::test]
async fn unknown_methods_are_reported() {
    let client = MockClient::builder().build();
    let err = client.get_main_contract().await.unwrap_err();
    assert_matches!(
        err,
        Error::Call(err) if err.code() == ErrorCode::MethodNotFound.code()
    );
}

#[tokio::test]
async fn async_handlers_are_supported() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_handler = calls.clone();
    let client = MockClient::builder()
        .method("eth_getTransactionReceipt", move |hash: H256| {
            let call_idx = calls_in_handler.fetch_add(1, Ordering::SeqCst);
            async move {
                // The receipt becomes available on the second poll.
                Ok((call_idx > 0).then(|| TransactionReceipt {
                    transaction_hash: hash,
                    block_hash: Some(H256::repeat_byte(1)),
                    block_number: Some(U64::from(1)),
                    ..TransactionReceipt::default()
                }))
            }
        })
        .build();

    let hash = H256::repeat_byte(0x11);
    assert_eq!(client.get_transaction_receipt(hash).await.unwrap(), None);
    let receipt = client.get_transaction_receipt(hash).await.unwrap().unwrap();
    assert_eq!(receipt.transaction_hash, hash);
    assert!(receipt.is_included());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn l2_client_wraps_inner_client() {
    let mock = MockClient::builder()
        .method("zks_getMainContract", || Ok(Address::repeat_byte(0x32)))
        .build();
    let client = L2ClientBuilder::new(mock).build().for_component("test");

    assert_eq!(
        client.get_main_contract().await.unwrap(),
        Address::repeat_byte(0x32)
    );
    let err = client
        .gas_price()
        .rpc_context("gas_price")
        .await
        .unwrap_err();
    assert_eq!(err.method(), "gas_price");
}

#[tokio::test]
async fn http_client_rejects_invalid_url() {
    assert!(L2Client::http("not a url").is_err());
    assert!(L2Client::http("http://127.0.0.1:3050").is_ok());
}

#[tokio::test]
async fn batch_errors_pass_through_wrapper() {
    let client = L2ClientBuilder::new(MockClient::builder().build())
        .build()
        .for_component("test");
    let mut batch = BatchRequestBuilder::new();
    batch.insert("eth_gasPrice", ArrayParams::new()).unwrap();
    batch.insert("zks_getMainContract", ArrayParams::new()).unwrap();

    let method_names = ["eth_gasPrice".to_owned(), "zks_getMainContract".to_owned()];
    assert_eq!(
        CallOrigin::BatchRequest(&method_names).to_string(),
        r#"batch request ["eth_gasPrice", "zks_getMainContract"]"#
    );
    let err = client.batch_request::<U256>(batch).await.unwrap_err();
    assert_matches!(err, Error::Custom(msg) if msg.contains("batch"));
}
