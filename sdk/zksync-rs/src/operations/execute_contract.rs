use zksync_eth_signer::EthereumSigner;
use zksync_types::{
    fee::Fee,
    transaction_request::{PaymasterParams, TransactionRequest},
    Address, Nonce, U256,
};
use zksync_web3_decl::namespaces::{EthNamespaceClient, ZksNamespaceClient};

use crate::{
    error::ClientError,
    operations::{SyncTransactionHandle, TxOverrides},
    wallet::Wallet,
};

/// Builder of a transaction calling a deployed contract.
pub struct ExecuteContractBuilder<'a, S: EthereumSigner, P> {
    wallet: &'a Wallet<S, P>,
    contract_address: Option<Address>,
    calldata: Option<Vec<u8>>,
    value: Option<U256>,
    overrides: TxOverrides,
}

impl<'a, S, P> ExecuteContractBuilder<'a, S, P>
where
    S: EthereumSigner,
    P: ZksNamespaceClient + EthNamespaceClient + Sync,
{
    /// Initializes a contract call transaction building process.
    pub fn new(wallet: &'a Wallet<S, P>) -> Self {
        Self {
            wallet,
            contract_address: None,
            calldata: None,
            value: None,
            overrides: TxOverrides::default(),
        }
    }

    /// Returns the unsigned transaction. Its gas limit is 0 unless it was set explicitly.
    pub async fn tx(&self) -> Result<TransactionRequest, ClientError> {
        let contract_address = self
            .contract_address
            .ok_or_else(|| ClientError::MissingRequiredField("contract_address".into()))?;
        let calldata = self
            .calldata
            .clone()
            .ok_or_else(|| ClientError::MissingRequiredField("calldata".into()))?;

        self.wallet
            .build_transaction(
                Some(contract_address),
                calldata,
                self.value.unwrap_or_default(),
                self.overrides.clone(),
            )
            .await
    }

    /// Sends the transaction, returning the handle for its awaiting.
    pub async fn send(self) -> Result<SyncTransactionHandle<'a, P>, ClientError> {
        let wallet = self.wallet;
        let tx = self.tx().await?;
        wallet.send_transaction(tx).await
    }

    pub async fn estimate_gas(&self) -> Result<U256, ClientError> {
        let tx = self.tx().await?;
        self.wallet.estimate_gas(&tx).await
    }

    pub async fn estimate_fee(&self) -> Result<Fee, ClientError> {
        let tx = self.tx().await?;
        self.wallet.estimate_fee(&tx).await
    }

    pub(crate) fn set_overrides(&mut self, overrides: TxOverrides) {
        self.overrides = overrides;
    }

    /// Sets the address of the called contract.
    pub fn contract_address(mut self, address: Address) -> Self {
        self.contract_address = Some(address);
        self
    }

    /// Sets the ABI-encoded call.
    pub fn calldata(mut self, calldata: Vec<u8>) -> Self {
        self.calldata = Some(calldata);
        self
    }

    /// Sets the amount of the base token sent along with the call.
    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the bytecodes the call depends on.
    pub fn factory_deps(mut self, factory_deps: Vec<Vec<u8>>) -> Self {
        self.overrides.factory_deps = factory_deps;
        self
    }

    /// Sets all the fee parameters at once, e.g. the result of [`Self::estimate_fee()`].
    pub fn fee(mut self, fee: Fee) -> Self {
        self.overrides.set_fee(fee);
        self
    }

    pub fn gas_limit(mut self, gas_limit: U256) -> Self {
        self.overrides.gas_limit = Some(gas_limit);
        self
    }

    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.overrides.gas_price = Some(gas_price);
        self
    }

    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.overrides.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Sets the transaction nonce.
    pub fn nonce(mut self, nonce: Nonce) -> Self {
        self.overrides.nonce = Some(nonce);
        self
    }

    /// Sets the paymaster parameters.
    pub fn paymaster_params(mut self, paymaster_params: PaymasterParams) -> Self {
        self.overrides.paymaster_params = Some(paymaster_params);
        self
    }
}
