use zksync_eth_signer::EthereumSigner;
use zksync_types::{
    fee::Fee,
    transaction_request::{PaymasterParams, TransactionRequest},
    Address, Nonce, CONTRACT_DEPLOYER_ADDRESS, U256,
};
use zksync_web3_decl::namespaces::{EthNamespaceClient, ZksNamespaceClient};

use crate::{
    deployer::ContractDeployer,
    error::ClientError,
    operations::{SyncTransactionHandle, TxOverrides},
    wallet::Wallet,
};

/// Deployer method used to create the contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployScheme {
    /// Address depends on the deployment nonce of the sender.
    #[default]
    Create,
    /// Address depends on the salt, the bytecode and the constructor input.
    Create2,
}

/// Builder of a contract deployment transaction.
///
/// The transaction calls the contract deployer system contract; the deployed bytecode is
/// appended to the factory dependencies.
pub struct DeployContractBuilder<'a, S: EthereumSigner, P> {
    wallet: &'a Wallet<S, P>,
    scheme: DeployScheme,
    bytecode: Option<Vec<u8>>,
    calldata: Option<Vec<u8>>,
    salt: Option<Vec<u8>>,
    value: Option<U256>,
    overrides: TxOverrides,
}

impl<'a, S, P> DeployContractBuilder<'a, S, P>
where
    S: EthereumSigner,
    P: ZksNamespaceClient + EthNamespaceClient + Sync,
{
    /// Initializes a contract deployment transaction building process.
    pub fn new(wallet: &'a Wallet<S, P>) -> Self {
        Self {
            wallet,
            scheme: DeployScheme::default(),
            bytecode: None,
            calldata: None,
            salt: None,
            value: None,
            overrides: TxOverrides::default(),
        }
    }

    fn bytecode_ref(&self) -> Result<&[u8], ClientError> {
        self.bytecode
            .as_deref()
            .ok_or_else(|| ClientError::MissingRequiredField("bytecode".into()))
    }

    fn deployer(&self) -> ContractDeployer {
        self.wallet.deployer()
    }

    /// Returns the unsigned transaction. Its gas limit is 0 unless it was set explicitly.
    pub async fn tx(&self) -> Result<TransactionRequest, ClientError> {
        let bytecode = self.bytecode_ref()?;
        let calldata = self.calldata.as_deref();
        let salt = self.salt.as_deref();
        let deployer = self.deployer();
        let execute_calldata = match self.scheme {
            DeployScheme::Create => deployer.encode_create(bytecode, calldata, salt)?,
            DeployScheme::Create2 => deployer.encode_create2(bytecode, calldata, salt)?,
        };

        let mut overrides = self.overrides.clone();
        overrides.factory_deps.push(bytecode.to_vec());

        self.wallet
            .build_transaction(
                Some(CONTRACT_DEPLOYER_ADDRESS),
                execute_calldata,
                self.value.unwrap_or_default(),
                overrides,
            )
            .await
    }

    /// Computes the address the contract will be deployed at.
    ///
    /// For [`DeployScheme::Create`], the address depends on the current deployment nonce
    /// of the wallet, so it is only valid until the wallet deploys another contract.
    pub async fn precompute_address(&self) -> Result<Address, ClientError> {
        let sender = self.wallet.address();
        match self.scheme {
            DeployScheme::Create => {
                let deployment_nonce = self.wallet.get_deployment_nonce().await?;
                Ok(ContractDeployer::derive_create_address(
                    sender,
                    deployment_nonce,
                ))
            }
            DeployScheme::Create2 => {
                let salt = self.salt.as_deref().unwrap_or(&[0_u8; 32][..]);
                Ok(ContractDeployer::derive_create2_address(
                    sender,
                    self.bytecode_ref()?,
                    self.calldata.as_deref().unwrap_or_default(),
                    salt,
                )?)
            }
        }
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

    /// Sets the deployer method. [`DeployScheme::Create`] is used by default.
    pub fn scheme(mut self, scheme: DeployScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the deployed bytecode.
    pub fn bytecode(mut self, bytecode: Vec<u8>) -> Self {
        self.bytecode = Some(bytecode);
        self
    }

    /// Sets the calldata for deploying
    pub fn constructor_calldata(mut self, calldata: Vec<u8>) -> Self {
        self.calldata = Some(calldata);
        self
    }

    /// Sets the 32-byte salt. Zero salt is used by default.
    pub fn salt(mut self, salt: Vec<u8>) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Sets the amount of the base token passed to the constructor.
    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the factory deps for deploying. The deployed bytecode is added after them.
    pub fn factory_deps(mut self, factory_deps: Vec<Vec<u8>>) -> Self {
        self.overrides.factory_deps = factory_deps;
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
