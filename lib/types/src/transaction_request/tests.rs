use assert_matches::assert_matches;

use super::*;
use crate::{bytecode::hash_bytecode, K256PrivateKey};

fn eip712_request(from: Address) -> TransactionRequest {
    TransactionRequest {
        nonce: U256::from(1u32),
        to: Some(Address::random()),
        from: Some(from),
        value: U256::from(10u32),
        gas_price: U256::from(11u32),
        max_priority_fee_per_gas: Some(U256::from(0u32)),
        gas: U256::from(12u32),
        input: Bytes::from(vec![1, 2, 3]),
        transaction_type: Some(U64::from(EIP_712_TX_TYPE)),
        eip712_meta: Some(Eip712Meta {
            gas_per_pubdata: U256::from(4u32),
            factory_deps: vec![vec![2; 32]],
            custom_signature: Some(vec![]),
            paymaster_params: None,
        }),
        chain_id: Some(270),
        ..Default::default()
    }
}

#[test]
fn decode_eip712_with_meta() {
    let private_key = K256PrivateKey::random();
    let address = private_key.address();

    let mut tx = eip712_request(address);
    tx.eip712_meta = Some(Eip712Meta {
        gas_per_pubdata: U256::from(4u32),
        factory_deps: vec![vec![2; 32]],
        custom_signature: Some(vec![1, 2, 3]),
        paymaster_params: Some(PaymasterParams {
            paymaster: Default::default(),
            paymaster_input: vec![],
        }),
    });

    let msg = PackedEthSignature::typed_data_to_signed_bytes(
        &Eip712Domain::new(L2ChainId::from(270)),
        &tx,
    );
    let signature = PackedEthSignature::sign_raw(&private_key, &msg).unwrap();

    let mut rlp = RlpStream::new();
    tx.rlp(&mut rlp, Some(&signature)).unwrap();
    let mut data = rlp.out().to_vec();
    data.insert(0, EIP_712_TX_TYPE);
    tx.raw = Some(Bytes(data.clone()));
    tx.set_signature(&signature);

    let (tx2, _) = TransactionRequest::from_bytes(&data, L2ChainId::from(270)).unwrap();

    assert_eq!(tx, tx2);
}

#[test]
fn check_recovered_public_key_eip712() {
    let private_key = K256PrivateKey::random();
    let address = private_key.address();

    let transaction_request = eip712_request(address);
    let domain = Eip712Domain::new(L2ChainId::from(270));
    let signature =
        PackedEthSignature::sign_typed_data(&private_key, &domain, &transaction_request).unwrap();

    let encoded_tx = transaction_request.get_signed_bytes(&signature).unwrap();
    assert_eq!(encoded_tx[0], EIP_712_TX_TYPE);

    let (decoded_tx, _) =
        TransactionRequest::from_bytes(encoded_tx.as_slice(), L2ChainId::from(270)).unwrap();
    let recovered_signer = decoded_tx.from.unwrap();
    assert_eq!(address, recovered_signer);
}

#[test]
fn tx_hash_commits_to_signature() {
    let private_key = K256PrivateKey::random();
    let mut tx = eip712_request(private_key.address());
    let domain = Eip712Domain::new(L2ChainId::from(270));
    let signature = PackedEthSignature::sign_typed_data(&private_key, &domain, &tx).unwrap();
    let encoded_tx = tx.get_signed_bytes(&signature).unwrap();

    let (_, decoded_hash) =
        TransactionRequest::from_bytes(&encoded_tx, L2ChainId::from(270)).unwrap();
    tx.set_signature(&signature);
    assert_eq!(tx.get_tx_hash().unwrap(), decoded_hash);

    let mut expected_preimage = tx.get_default_signed_message().unwrap().as_bytes().to_vec();
    expected_preimage.extend_from_slice(&keccak256(&signature.serialize_packed()));
    assert_eq!(decoded_hash, H256(keccak256(&expected_preimage)));
}

#[test]
fn check_recovered_public_key_eip712_with_wrong_chain_id() {
    let private_key = K256PrivateKey::random();
    let address = private_key.address();

    let transaction_request = eip712_request(address);
    let domain = Eip712Domain::new(L2ChainId::from(270));
    let signature =
        PackedEthSignature::sign_typed_data(&private_key, &domain, &transaction_request).unwrap();

    let encoded_tx = transaction_request.get_signed_bytes(&signature).unwrap();

    let decoded_tx = TransactionRequest::from_bytes(encoded_tx.as_slice(), L2ChainId::from(272));
    assert_matches!(
        decoded_tx,
        Err(SerializationTransactionError::WrongChainId(Some(270)))
    );
}

#[test]
fn signature_from_other_key_is_rejected() {
    let private_key = K256PrivateKey::random();
    let transaction_request = eip712_request(Address::random());
    let domain = Eip712Domain::new(L2ChainId::from(270));
    let signature =
        PackedEthSignature::sign_typed_data(&private_key, &domain, &transaction_request).unwrap();

    let encoded_tx = transaction_request.get_signed_bytes(&signature).unwrap();
    assert_matches!(
        TransactionRequest::from_bytes(&encoded_tx, L2ChainId::from(270)),
        Err(SerializationTransactionError::MalformedSignature)
    );
}

#[test]
fn deploy_transaction_without_recipient_is_encoded() {
    let private_key = K256PrivateKey::random();
    let mut tx = eip712_request(private_key.address());
    tx.to = None;

    let domain = Eip712Domain::new(L2ChainId::from(270));
    let signature = PackedEthSignature::sign_typed_data(&private_key, &domain, &tx).unwrap();
    let encoded_tx = tx.get_signed_bytes(&signature).unwrap();

    let (decoded_tx, _) =
        TransactionRequest::from_bytes(&encoded_tx, L2ChainId::from(270)).unwrap();
    assert_eq!(decoded_tx.to, None);
    assert_eq!(decoded_tx.get_factory_deps(), vec![vec![2; 32]]);
}

#[test]
fn gas_limit_patch_only_touches_gas() {
    let tx = eip712_request(Address::random());
    let patched = tx.with_gas_limit(U256::from(1_000_000));

    assert_eq!(patched.gas, U256::from(1_000_000));
    assert_eq!(
        TransactionRequest {
            gas: tx.gas,
            ..patched.clone()
        },
        tx
    );
    assert_ne!(patched.hash_struct(), tx.hash_struct());
}

#[test]
fn factory_deps_are_hashed_in_order() {
    let first = vec![1; 32];
    let second = vec![2; 96];
    let mut tx = eip712_request(Address::random());
    tx.eip712_meta.as_mut().unwrap().factory_deps = vec![first.clone(), second.clone()];
    let hash = tx.hash_struct();

    tx.eip712_meta.as_mut().unwrap().factory_deps = vec![second, first];
    assert_ne!(tx.hash_struct(), hash);

    let encoded = tx.encode_data();
    let dep_hashes = [
        hash_bytecode(&[2; 96]).unwrap(),
        hash_bytecode(&[1; 32]).unwrap(),
    ];
    let mut concatenated = Vec::new();
    for dep_hash in dep_hashes {
        concatenated.extend_from_slice(dep_hash.as_bytes());
    }
    // `factoryDeps` is the 12th member of the structure.
    assert_eq!(
        &encoded[11 * 32..12 * 32],
        keccak256(&concatenated).as_slice()
    );
}

#[test]
fn unsignable_requests_are_reported() {
    let mut tx = eip712_request(Address::random());
    tx.from = None;
    assert_matches!(
        tx.check_signable(),
        Err(SerializationTransactionError::FromAddressIsNull)
    );

    let mut tx = eip712_request(Address::random());
    tx.eip712_meta = None;
    assert_matches!(
        tx.check_signable(),
        Err(SerializationTransactionError::Eip712MetaIsNull)
    );

    let mut tx = eip712_request(Address::random());
    tx.eip712_meta.as_mut().unwrap().factory_deps = vec![vec![0; 64]];
    assert_matches!(
        tx.check_signable(),
        Err(SerializationTransactionError::InvalidFactoryDependencies(0, _))
    );

    assert_matches!(eip712_request(Address::random()).check_signable(), Ok(()));
}

#[test]
fn unknown_transaction_type_is_rejected() {
    assert_matches!(
        TransactionRequest::from_bytes(&[0x02, 0xc0], L2ChainId::from(270)),
        Err(SerializationTransactionError::UnknownTransactionFormat)
    );
}

#[test]
fn call_request_inherits_meta() {
    let tx = eip712_request(Address::repeat_byte(1));
    let call_request = CallRequest::from(tx.clone());

    assert_eq!(call_request.from, tx.from);
    assert_eq!(call_request.to, tx.to);
    assert_eq!(call_request.data, Some(tx.input.clone()));
    assert_eq!(call_request.eip712_meta, tx.eip712_meta);
    assert_eq!(
        call_request.transaction_type,
        Some(U64::from(EIP_712_TX_TYPE))
    );

    let json = serde_json::to_value(&call_request).unwrap();
    assert!(json.get("eip712Meta").is_some());
    assert_eq!(json["type"], "0x71");
}

#[test]
fn signed_payload_matches_reference_encoding() {
    let key: H256 = "0x7726827caac94a7f9e1b160f7ea819f172f7b6f9d2a97f992c38edeab82d4110"
        .parse()
        .unwrap();
    let private_key = K256PrivateKey::from_bytes(key).unwrap();
    let tx = TransactionRequest {
        nonce: U256::from(3u32),
        to: Some(Address::repeat_byte(0x11)),
        from: Some(private_key.address()),
        value: U256::from(7u32),
        gas_price: U256::from(250_000_000u64),
        max_priority_fee_per_gas: Some(U256::from(100_000_000u64)),
        gas: U256::from(1_000_000u64),
        input: Bytes::from(vec![1, 2, 3]),
        transaction_type: Some(U64::from(EIP_712_TX_TYPE)),
        eip712_meta: Some(Eip712Meta {
            gas_per_pubdata: U256::from(50_000u32),
            factory_deps: vec![vec![0x42; 96]],
            custom_signature: None,
            paymaster_params: None,
        }),
        chain_id: Some(270),
        ..Default::default()
    };

    let digest = tx.get_default_signed_message().unwrap();
    let expected_digest: H256 =
        "0xff14a506643e36f231f45de6babb5895b1f93f186470e6fcc9375e3e3cf1699d"
            .parse()
            .unwrap();
    assert_eq!(digest, expected_digest);

    // RFC 6979 nonces make the signature deterministic.
    let signature = PackedEthSignature::sign_raw(&private_key, &digest).unwrap();
    let raw = tx.get_signed_bytes(&signature).unwrap();
    let expected_raw = hex::decode(concat!(
        "71f8ed038405f5e100840ee6b280830f4240941111111111111111111111111111111111",
        "111111078301020380a089f77783485e4e129b624df24a16d28626f26a6d4c63da3b54eb",
        "1639eadbf891a03ddf48ba7724d31f8355eed913024199eea589a9d878b3ce1de040a455",
        "739d8482010e9436615cf349d7f6344891b1e7ca7c72883f5dc04982c350f862b8604242",
        "424242424242424242424242424242424242424242424242424242424242424242424242",
        "424242424242424242424242424242424242424242424242424242424242424242424242",
        "4242424242424242424242424242424242424242424280c0",
    ))
    .unwrap();
    assert_eq!(hex::encode(&raw), hex::encode(&expected_raw));

    let (_, hash) = TransactionRequest::from_bytes(&raw, L2ChainId::from(270)).unwrap();
    let expected_hash: H256 = "0x70fca254036fd1e70fab903befc7dfa00d4b9dad513f8ba472500246f40fb176"
        .parse()
        .unwrap();
    assert_eq!(hash, expected_hash);
}
