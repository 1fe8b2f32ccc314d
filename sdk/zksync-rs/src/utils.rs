use zksync_contracts::AbiRegistry;
use zksync_types::{
    transaction_request::PaymasterParams, Address, ETHEREUM_ADDRESS, L2_BASE_TOKEN_ADDRESS, U256,
};

use crate::error::ClientError;

/// Returns `true` if the address denotes the base token of the chain.
pub fn is_token_eth(token_address: Address) -> bool {
    token_address == ETHEREUM_ADDRESS || token_address == L2_BASE_TOKEN_ADDRESS
}

/// Paymaster parameters for the approval-based flow: the paymaster is allowed to take
/// `min_allowance` of `token_address` from the sender to cover the fee.
pub fn get_approval_based_paymaster_input(
    abi: &AbiRegistry,
    paymaster: Address,
    token_address: Address,
    min_allowance: U256,
    inner_input: &[u8],
) -> Result<PaymasterParams, ClientError> {
    let paymaster_input =
        abi.paymaster_flow
            .encode_approval_based(token_address, min_allowance, inner_input)?;
    Ok(PaymasterParams {
        paymaster,
        paymaster_input,
    })
}

/// Returns the approval based paymaster input to be used for estimation of transactions.
/// Note, that the `min_allowance` will be approved to paymaster contract during estimation and so for
/// instance "low" values like zero could lead to underestimation of the transaction (because the cost per
/// write depends on the size of the value).
pub fn get_approval_based_paymaster_input_for_estimation(
    abi: &AbiRegistry,
    paymaster: Address,
    token_address: Address,
    min_allowance: U256,
) -> Result<PaymasterParams, ClientError> {
    get_approval_based_paymaster_input(abi, paymaster, token_address, min_allowance, &[])
}

/// Paymaster parameters for the general flow, where the paymaster interprets `inner_input` itself.
pub fn get_general_paymaster_input(
    abi: &AbiRegistry,
    paymaster: Address,
    inner_input: &[u8],
) -> Result<PaymasterParams, ClientError> {
    let paymaster_input = abi.paymaster_flow.encode_general(inner_input)?;
    Ok(PaymasterParams {
        paymaster,
        paymaster_input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_token_aliases() {
        assert!(is_token_eth(Address::zero()));
        assert!(is_token_eth(L2_BASE_TOKEN_ADDRESS));
        assert!(!is_token_eth(Address::repeat_byte(1)));
    }

    #[test]
    fn paymaster_inputs_use_flow_selectors() {
        let abi = AbiRegistry::new().unwrap();
        let paymaster = Address::repeat_byte(0x50);

        let params = get_approval_based_paymaster_input_for_estimation(
            &abi,
            paymaster,
            Address::repeat_byte(0x70),
            1_000.into(),
        )
        .unwrap();
        assert_eq!(params.paymaster, paymaster);
        assert_eq!(params.paymaster_input[..4], [0x94, 0x94, 0x31, 0xdc]);
        assert_eq!(params.paymaster_input[16..36], [0x70; 20]);

        let params = get_general_paymaster_input(&abi, paymaster, b"hi").unwrap();
        assert_eq!(params.paymaster_input[..4], [0x8c, 0x5a, 0x34, 0x45]);
    }
}
