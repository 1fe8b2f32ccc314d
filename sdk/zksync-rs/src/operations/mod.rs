//! Builders of L2 transactions and the handle used to await their inclusion.

use std::time::Duration;

use tokio::time::Instant;
use zksync_types::{
    api::{BlockNumber, TransactionReceipt},
    fee::Fee,
    transaction_request::PaymasterParams,
    Nonce, H256, U256,
};
use zksync_web3_decl::{error::ClientRpcContext, namespaces::EthNamespaceClient};

pub use self::{
    deploy_contract::{DeployContractBuilder, DeployScheme},
    execute_contract::ExecuteContractBuilder,
    withdraw::WithdrawBuilder,
};
use crate::error::ClientError;

mod deploy_contract;
mod execute_contract;
mod withdraw;


/// Transaction parameters that are fetched from the node unless set explicitly.
#[derive(Debug, Clone, Default)]
pub(crate) struct TxOverrides {
    pub nonce: Option<Nonce>,
    pub gas_limit: Option<U256>,
    pub gas_price: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub gas_per_pubdata: Option<U256>,
    pub factory_deps: Vec<Vec<u8>>,
    pub paymaster_params: Option<PaymasterParams>,
}

impl TxOverrides {
    pub fn set_fee(&mut self, fee: Fee) {
        self.gas_limit = Some(fee.gas_limit);
        self.gas_price = Some(fee.max_fee_per_gas);
        self.max_priority_fee_per_gas = Some(fee.max_priority_fee_per_gas);
        self.gas_per_pubdata = Some(fee.gas_per_pubdata_limit);
    }
}

/// Handle of a broadcast transaction.
///
/// Polls `eth_getTransactionReceipt` until the transaction lands in a block, bounded by the
/// confirmation timeout.
#[derive(Debug)]
pub struct SyncTransactionHandle<'a, P> {
    hash: H256,
    provider: &'a P,
    polling_interval: Duration,
    confirmation_timeout: Duration,
}

impl<'a, P> SyncTransactionHandle<'a, P>
where
    P: EthNamespaceClient + Sync,
{
    const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(100);
    const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(hash: H256, provider: &'a P) -> Self {
        Self {
            hash,
            provider,
            polling_interval: Self::DEFAULT_POLLING_INTERVAL,
            confirmation_timeout: Self::DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    pub fn hash(&self) -> H256 {
        self.hash
    }

    /// Sets the interval between receipt requests.
    #[must_use]
    pub fn polling_interval(mut self, polling_interval: Duration) -> Self {
        self.polling_interval = polling_interval;
        self
    }

    /// Sets the upper bound on the wait. The timer starts when a wait method is called.
    #[must_use]
    pub fn confirmation_timeout(mut self, confirmation_timeout: Duration) -> Self {
        self.confirmation_timeout = confirmation_timeout;
        self
    }

    /// Waits until the transaction is included in a sealed L2 block.
    pub async fn wait_for_receipt(&self) -> Result<TransactionReceipt, ClientError> {
        self.wait(false).await
    }

    /// Waits until the block containing the transaction is finalized on L1.
    pub async fn wait_finalized(&self) -> Result<TransactionReceipt, ClientError> {
        self.wait(true).await
    }

    async fn wait(&self, finalized: bool) -> Result<TransactionReceipt, ClientError> {
        let started_at = Instant::now();
        tracing::debug!(
            tx_hash = ?self.hash,
            finalized,
            timeout = ?self.confirmation_timeout,
            "waiting for transaction receipt"
        );

        let poll_loop = async {
            loop {
                if let Some(receipt) = self.check_receipt(finalized).await? {
                    return Ok::<_, ClientError>(receipt);
                }
                tokio::time::sleep(self.polling_interval).await;
            }
        };

        match tokio::time::timeout(self.confirmation_timeout, poll_loop).await {
            Ok(Ok(receipt)) => {
                tracing::info!(
                    tx_hash = ?self.hash,
                    block_number = ?receipt.block_number,
                    status = ?receipt.status,
                    "transaction confirmed"
                );
                Ok(receipt)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                let elapsed = started_at.elapsed();
                tracing::warn!(tx_hash = ?self.hash, ?elapsed, "transaction was not confirmed in time");
                Err(ClientError::ConfirmationTimeout {
                    tx_hash: self.hash,
                    elapsed,
                })
            }
        }
    }

    async fn check_receipt(
        &self,
        finalized: bool,
    ) -> Result<Option<TransactionReceipt>, ClientError> {
        let receipt = self
            .provider
            .get_transaction_receipt(self.hash)
            .rpc_context("get_transaction_receipt")
            .with_arg("hash", &self.hash)
            .await?;
        let Some(receipt) = receipt.filter(TransactionReceipt::is_included) else {
            tracing::trace!(tx_hash = ?self.hash, "transaction is pending");
            return Ok(None);
        };
        if !finalized {
            return Ok(Some(receipt));
        }

        let Some(block_number) = receipt.block_number else {
            return Ok(None);
        };
        let finalized_block = self
            .provider
            .get_block_by_number(BlockNumber::Finalized, false)
            .rpc_context("get_block_by_number")
            .with_arg("block", &BlockNumber::Finalized)
            .await?;
        let finalized_number = finalized_block.and_then(|block| block.number);
        if finalized_number.is_some_and(|number| number >= block_number) {
            Ok(Some(receipt))
        } else {
            tracing::trace!(
                tx_hash = ?self.hash,
                %block_number,
                ?finalized_number,
                "transaction block is not finalized yet"
            );
            Ok(None)
        }
    }
}
