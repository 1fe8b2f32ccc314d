use zksync_eth_signer::EthereumSigner;
use zksync_types::{
    fee::Fee,
    transaction_request::{PaymasterParams, TransactionRequest},
    Address, Nonce, L2_BASE_TOKEN_ADDRESS, U256,
};
use zksync_web3_decl::{
    error::ClientRpcContext,
    namespaces::{EthNamespaceClient, ZksNamespaceClient},
};

use crate::{
    error::ClientError,
    operations::{ExecuteContractBuilder, SyncTransactionHandle, TxOverrides},
    utils::is_token_eth,
    wallet::Wallet,
};

/// Builder of a transaction withdrawing funds from L2 to L1.
pub struct WithdrawBuilder<'a, S: EthereumSigner, P> {
    wallet: &'a Wallet<S, P>,
    to: Option<Address>,
    token: Option<Address>,
    amount: Option<U256>,
    bridge: Option<Address>,
    overrides: TxOverrides,
}

impl<'a, S, P> WithdrawBuilder<'a, S, P>
where
    S: EthereumSigner,
    P: ZksNamespaceClient + EthNamespaceClient + Sync,
{
    /// Initializes a withdraw transaction building process.
    pub fn new(wallet: &'a Wallet<S, P>) -> Self {
        Self {
            wallet,
            to: None,
            token: None,
            amount: None,
            bridge: None,
            overrides: TxOverrides::default(),
        }
    }

    async fn get_execute_builder(&self) -> Result<ExecuteContractBuilder<'a, S, P>, ClientError> {
        let token = self
            .token
            .ok_or_else(|| ClientError::MissingRequiredField("token".into()))?;
        let amount = self
            .amount
            .ok_or_else(|| ClientError::MissingRequiredField("amount".into()))?;
        let to = self.to.unwrap_or_else(|| self.wallet.address());
        let abi = self.wallet.abi();

        let (contract_address, calldata, value) = if is_token_eth(token) {
            let calldata = abi.base_token.encode_withdraw(to)?;
            (L2_BASE_TOKEN_ADDRESS, calldata, amount)
        } else {
            let bridge_address = match self.bridge {
                Some(bridge) => bridge,
                None => self.default_bridge().await?,
            };
            let calldata = abi.l2_bridge.encode_withdraw(to, token, amount)?;
            (bridge_address, calldata, U256::zero())
        };
        tracing::debug!(?token, ?to, %amount, ?contract_address, "withdrawal routed");

        let mut builder = ExecuteContractBuilder::new(self.wallet)
            .contract_address(contract_address)
            .calldata(calldata)
            .value(value);
        builder.set_overrides(self.overrides.clone());
        Ok(builder)
    }

    async fn default_bridge(&self) -> Result<Address, ClientError> {
        let bridges = self
            .wallet
            .provider
            .get_bridge_contracts()
            .rpc_context("get_bridge_contracts")
            .await?;
        bridges.l2_erc20_default_bridge.ok_or_else(|| {
            ClientError::MalformedResponse("node didn't return the default L2 ERC20 bridge".into())
        })
    }

    /// Returns the unsigned withdrawal transaction.
    pub async fn tx(&self) -> Result<TransactionRequest, ClientError> {
        self.get_execute_builder().await?.tx().await
    }

    /// Sends the transaction, returning the handle for its awaiting.
    pub async fn send(self) -> Result<SyncTransactionHandle<'a, P>, ClientError> {
        let wallet = self.wallet;
        let tx = self.tx().await?;
        wallet.send_transaction(tx).await
    }

    pub async fn estimate_gas(&self) -> Result<U256, ClientError> {
        self.get_execute_builder().await?.estimate_gas().await
    }

    pub async fn estimate_fee(&self) -> Result<Fee, ClientError> {
        self.get_execute_builder().await?.estimate_fee().await
    }

    /// Set the withdrawal amount.
    pub fn amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the withdrawn L2 token. Zero address stands for the base token.
    pub fn token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the L1 address to withdraw funds to. Defaults to the wallet address.
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Sets the bridge contract to request the withdrawal.
    pub fn bridge(mut self, address: Address) -> Self {
        self.bridge = Some(address);
        self
    }

    /// Set the fee amount.
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
