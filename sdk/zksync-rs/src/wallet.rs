use std::{sync::Arc, time::Duration};

use zksync_contracts::AbiRegistry;
use zksync_eth_signer::EthereumSigner;
use zksync_types::{
    api::{BlockNumber, TransactionReceipt},
    fee::Fee,
    transaction_request::{CallRequest, Eip712Meta, TransactionRequest},
    Address, L2ChainId, Nonce, EIP_712_TX_TYPE, NONCE_HOLDER_ADDRESS, U256,
};
use zksync_web3_decl::{
    client::L2Client,
    error::{ClientRpcContext, EnrichedClientError},
    jsonrpsee::core::ClientError as RpcError,
    namespaces::{EthNamespaceClient, ZksNamespaceClient},
};

use crate::{
    config::ClientConfig,
    deployer::ContractDeployer,
    error::ClientError,
    operations::{
        DeployContractBuilder, ExecuteContractBuilder, SyncTransactionHandle, TxOverrides,
        WithdrawBuilder,
    },
    signer::Signer,
};

/// Account on an L2 chain: a JSON-RPC provider paired with the signer of the account.
#[derive(Debug)]
pub struct Wallet<S: EthereumSigner, P> {
    pub provider: P,
    pub signer: Signer<S>,
    abi: Arc<AbiRegistry>,
    config: ClientConfig,
}

impl<S> Wallet<S, L2Client>
where
    S: EthereumSigner,
{
    /// Connects to the node at `config.l2_rpc_address` over HTTP.
    pub fn with_http_client(
        config: ClientConfig,
        signer: Signer<S>,
        abi: Arc<AbiRegistry>,
    ) -> Result<Self, ClientError> {
        let client = L2Client::http(&config.l2_rpc_address)
            .map_err(|err| {
                EnrichedClientError::custom(err.to_string(), "connect")
                    .with_arg("url", &config.l2_rpc_address)
            })?
            .build()
            .for_component("zksync_sdk");
        Ok(Self::new(client, signer, abi).with_config(config))
    }
}

impl<S, P> Wallet<S, P>
where
    S: EthereumSigner,
    P: EthNamespaceClient + ZksNamespaceClient + Sync,
{
    pub fn new(provider: P, signer: Signer<S>, abi: Arc<AbiRegistry>) -> Self {
        Self {
            provider,
            signer,
            abi,
            config: ClientConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the wallet address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> L2ChainId {
        self.signer.chain_id()
    }

    pub fn abi(&self) -> &Arc<AbiRegistry> {
        &self.abi
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn deployer(&self) -> ContractDeployer {
        ContractDeployer::new(self.abi.clone())
    }

    /// Returns the nonce of the next transaction, counting pending ones.
    pub async fn get_nonce(&self) -> Result<Nonce, ClientError> {
        let address = self.address();
        let nonce = self
            .provider
            .get_transaction_count(address, Some(BlockNumber::Pending))
            .rpc_context("get_transaction_count")
            .with_arg("address", &address)
            .await?;
        if nonce > U256::from(u32::MAX) {
            return Err(ClientError::MalformedResponse(format!(
                "nonce {nonce} of {address:?} doesn't fit into u32"
            )));
        }
        Ok(Nonce(nonce.as_u32()))
    }

    /// Returns the deployment nonce of the wallet, which determines the address of its next
    /// contract deployed with CREATE.
    pub async fn get_deployment_nonce(&self) -> Result<U256, ClientError> {
        let address = self.address();
        let calldata = self
            .abi
            .nonce_holder
            .encode_get_deployment_nonce(address)?;
        let request = CallRequest::builder()
            .to(Some(NONCE_HOLDER_ADDRESS))
            .data(calldata.into())
            .build();
        let output = self
            .provider
            .call(request, Some(BlockNumber::Latest))
            .rpc_context("call")
            .with_arg("address", &address)
            .await?;
        Ok(self.abi.nonce_holder.decode_get_deployment_nonce(&output.0)?)
    }

    /// Returns the base token balance of the wallet.
    pub async fn get_balance(&self) -> Result<U256, ClientError> {
        let address = self.address();
        Ok(self
            .provider
            .get_balance(address, Some(BlockNumber::Latest))
            .rpc_context("get_balance")
            .with_arg("address", &address)
            .await?)
    }

    pub async fn get_gas_price(&self) -> Result<U256, ClientError> {
        Ok(self.provider.gas_price().rpc_context("gas_price").await?)
    }

    /// Returns the L1 diamond proxy of the chain, which emits priority requests.
    pub async fn get_main_contract(&self) -> Result<Address, ClientError> {
        Ok(self
            .provider
            .get_main_contract()
            .rpc_context("get_main_contract")
            .await?)
    }

    /// Returns the testnet paymaster, or `None` if the chain doesn't deploy one.
    pub async fn get_testnet_paymaster(&self) -> Result<Option<Address>, ClientError> {
        Ok(self
            .provider
            .get_testnet_paymaster()
            .rpc_context("get_testnet_paymaster")
            .await?)
    }

    /// Estimates the gas limit of a transaction with `eth_estimateGas`.
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<U256, ClientError> {
        Ok(self
            .provider
            .estimate_gas(CallRequest::from(tx.clone()), None)
            .rpc_context("estimate_gas")
            .with_arg("nonce", &tx.nonce)
            .await?)
    }

    /// Estimates all the fee parameters of a transaction with `zks_estimateFee`.
    pub async fn estimate_fee(&self, tx: &TransactionRequest) -> Result<Fee, ClientError> {
        Ok(self
            .provider
            .estimate_fee(CallRequest::from(tx.clone()))
            .rpc_context("estimate_fee")
            .with_arg("nonce", &tx.nonce)
            .await?)
    }

    /// Initializes a contract call transaction building process.
    pub fn start_execute_contract(&self) -> ExecuteContractBuilder<'_, S, P> {
        ExecuteContractBuilder::new(self)
    }

    /// Initializes a contract deployment transaction building process.
    pub fn start_deploy_contract(&self) -> DeployContractBuilder<'_, S, P> {
        DeployContractBuilder::new(self)
    }

    /// Initializes a withdrawal transaction building process.
    pub fn start_withdraw(&self) -> WithdrawBuilder<'_, S, P> {
        WithdrawBuilder::new(self)
    }

    /// Creates an EIP-712 transaction from this wallet. Fields missing in `overrides` are fetched
    /// from the node or taken from the config; the gas limit stays 0 unless set.
    pub(crate) async fn build_transaction(
        &self,
        to: Option<Address>,
        calldata: Vec<u8>,
        value: U256,
        overrides: TxOverrides,
    ) -> Result<TransactionRequest, ClientError> {
        let nonce = match overrides.nonce {
            Some(nonce) => nonce,
            None => self.get_nonce().await?,
        };
        tracing::debug!(address = ?self.address(), %nonce, "nonce fetched");

        let gas_price = match overrides.gas_price {
            Some(gas_price) => gas_price,
            None => self.get_gas_price().await?,
        };
        let max_priority_fee_per_gas = overrides
            .max_priority_fee_per_gas
            .unwrap_or_else(|| self.config.max_priority_fee_per_gas());
        let gas_per_pubdata = overrides
            .gas_per_pubdata
            .unwrap_or_else(|| self.config.gas_per_pubdata());

        let tx = TransactionRequest {
            nonce: nonce.0.into(),
            from: Some(self.address()),
            to,
            value,
            gas_price,
            gas: overrides.gas_limit.unwrap_or_default(),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            input: calldata.into(),
            transaction_type: Some(EIP_712_TX_TYPE.into()),
            eip712_meta: Some(Eip712Meta {
                gas_per_pubdata,
                factory_deps: overrides.factory_deps,
                custom_signature: None,
                paymaster_params: overrides.paymaster_params,
            }),
            chain_id: Some(self.chain_id().as_u64()),
            ..TransactionRequest::default()
        };
        tracing::debug!(%nonce, to = ?tx.to, gas_limit = %tx.gas, "transaction built");
        Ok(tx)
    }

    /// Estimates gas for the transaction if its gas limit is 0, then signs and broadcasts it.
    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> Result<SyncTransactionHandle<'_, P>, ClientError> {
        let tx = if tx.gas.is_zero() {
            let gas_limit = self.estimate_gas(&tx).await?;
            tracing::debug!(nonce = %tx.nonce, %gas_limit, "gas estimated");
            tx.with_gas_limit(gas_limit)
        } else {
            tx
        };

        let signed = self.signer.sign_transaction(&tx).await?;
        let tx_hash = self
            .provider
            .send_raw_transaction(signed.raw.clone())
            .await
            .map_err(|err| match err {
                RpcError::Call(err) => ClientError::SubmissionError(err.message().to_owned()),
                err => EnrichedClientError::new(err, "send_raw_transaction")
                    .with_arg("tx_hash", &signed.hash)
                    .into(),
            })?;
        if tx_hash != signed.hash {
            tracing::warn!(
                expected = ?signed.hash,
                returned = ?tx_hash,
                "node returned unexpected transaction hash"
            );
        }
        tracing::info!(?tx_hash, nonce = %tx.nonce, gas_limit = %tx.gas, "transaction broadcast");

        Ok(SyncTransactionHandle::new(tx_hash, &self.provider)
            .polling_interval(self.config.polling_interval())
            .confirmation_timeout(self.config.confirmation_timeout()))
    }

    /// Sends an already built transaction and waits for it to be included in a block.
    pub async fn submit_and_confirm(
        &self,
        tx: TransactionRequest,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<TransactionReceipt, ClientError> {
        self.send_transaction(tx)
            .await?
            .polling_interval(poll_interval)
            .confirmation_timeout(timeout)
            .wait_for_receipt()
            .await
    }
}
