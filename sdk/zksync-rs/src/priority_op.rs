//! Helpers for L1 -> L2 priority operations.

use zksync_types::{
    api::TransactionReceipt, event::NEW_PRIORITY_REQUEST_EVENT_SIGNATURE, Address, H256,
};

use crate::error::ClientError;

/// Returns the L2 hash of the priority operation requested by an L1 transaction.
///
/// `receipt` is the L1 receipt of the request and `main_contract` the diamond proxy returned by
/// `zks_getMainContract`. The hash is read from the first `NewPriorityRequest` event emitted by
/// the main contract. The L2 transaction can then be awaited with
/// [`SyncTransactionHandle`](crate::operations::SyncTransactionHandle).
pub fn get_l2_hash_from_priority_op(
    receipt: &TransactionReceipt,
    main_contract: Address,
) -> Result<H256, ClientError> {
    let log = receipt
        .logs
        .iter()
        .find(|log| {
            log.address == main_contract
                && log.topics.first() == Some(&NEW_PRIORITY_REQUEST_EVENT_SIGNATURE)
        })
        .ok_or_else(|| {
            ClientError::MalformedResponse(format!(
                "receipt of {:?} has no NewPriorityRequest events emitted by the main contract {main_contract:?}",
                receipt.transaction_hash
            ))
        })?;
    // Data layout: `txId` (32 bytes), `txHash` (32 bytes), ...
    let l2_hash = log.data.0.get(32..64).ok_or_else(|| {
        ClientError::MalformedResponse(format!(
            "NewPriorityRequest data is too short: {} bytes",
            log.data.0.len()
        ))
    })?;
    Ok(H256::from_slice(l2_hash))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use zksync_types::{api::Log, Bytes};

    use super::*;

    const L1_TX_HASH: H256 = H256([0x11; 32]);

    fn priority_request_log(address: Address, l2_hash: H256) -> Log {
        let mut data = vec![0; 32];
        data.extend_from_slice(l2_hash.as_bytes());
        // Tail of the event data, irrelevant for the hash.
        data.extend_from_slice(&[0; 64]);
        Log {
            address,
            topics: vec![*NEW_PRIORITY_REQUEST_EVENT_SIGNATURE],
            data: Bytes(data),
            transaction_hash: Some(L1_TX_HASH),
            ..Log::default()
        }
    }

    #[test]
    fn l2_hash_is_read_from_priority_request_event() {
        let main_contract = Address::repeat_byte(0x32);
        let unrelated_log = Log {
            address: main_contract,
            topics: vec![H256::repeat_byte(0xee)],
            data: Bytes(vec![0xee; 64]),
            transaction_hash: Some(L1_TX_HASH),
            ..Log::default()
        };
        let receipt = TransactionReceipt {
            transaction_hash: L1_TX_HASH,
            logs: vec![
                priority_request_log(Address::repeat_byte(1), H256::repeat_byte(1)),
                unrelated_log,
                priority_request_log(main_contract, H256::repeat_byte(0x22)),
                priority_request_log(main_contract, H256::repeat_byte(3)),
            ],
            ..TransactionReceipt::default()
        };

        let l2_hash = get_l2_hash_from_priority_op(&receipt, main_contract).unwrap();
        assert_eq!(l2_hash, H256::repeat_byte(0x22));
        assert_ne!(l2_hash, L1_TX_HASH);
    }

    #[test]
    fn receipt_without_priority_request_is_rejected() {
        let main_contract = Address::repeat_byte(0x32);
        let receipt = TransactionReceipt {
            logs: vec![priority_request_log(
                Address::repeat_byte(1),
                H256::repeat_byte(1),
            )],
            ..TransactionReceipt::default()
        };
        let err = get_l2_hash_from_priority_op(&receipt, main_contract).unwrap_err();
        assert_matches!(err, ClientError::MalformedResponse(_));

        let mut truncated = priority_request_log(main_contract, H256::repeat_byte(2));
        truncated.data.0.truncate(40);
        let receipt = TransactionReceipt {
            logs: vec![truncated],
            ..TransactionReceipt::default()
        };
        let err = get_l2_hash_from_priority_op(&receipt, main_contract).unwrap_err();
        assert_matches!(err, ClientError::MalformedResponse(_));
    }
}
