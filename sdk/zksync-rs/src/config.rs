use std::time::Duration;

use serde::Deserialize;
use zksync_types::{DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE, DEFAULT_MAX_PRIORITY_FEE_PER_GAS, U256};

/// Configuration of the client.
///
/// Read from the environment with the `ZKSYNC_CLIENT_` prefix; every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Address of the L2 Web3 API.
    #[serde(default = "default_l2_rpc_address")]
    pub l2_rpc_address: String,

    /// How long to wait for a transaction receipt before giving up.
    #[serde(default = "default_confirmation_timeout_sec")]
    pub confirmation_timeout_sec: u64,

    /// Interval between receipt requests.
    #[serde(default = "default_polling_interval_ms")]
    pub polling_interval_ms: u64,

    /// Gas per pubdata byte limit put into the EIP-712 metadata of new transactions.
    #[serde(default = "default_gas_per_pubdata")]
    pub gas_per_pubdata: u64,

    /// Max priority fee used when the caller doesn't provide one.
    #[serde(default = "default_max_priority_fee_per_gas")]
    pub max_priority_fee_per_gas: u64,
}

fn default_l2_rpc_address() -> String {
    let result = "http://127.0.0.1:3050".to_owned();
    tracing::info!("Using default L2_RPC_ADDRESS: {result}");
    result
}

fn default_confirmation_timeout_sec() -> u64 {
    let result = 120;
    tracing::info!("Using default CONFIRMATION_TIMEOUT_SEC: {result}");
    result
}

fn default_polling_interval_ms() -> u64 {
    let result = 100;
    tracing::info!("Using default POLLING_INTERVAL_MS: {result}");
    result
}

fn default_gas_per_pubdata() -> u64 {
    let result = DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE;
    tracing::info!("Using default GAS_PER_PUBDATA: {result}");
    result
}

fn default_max_priority_fee_per_gas() -> u64 {
    let result = DEFAULT_MAX_PRIORITY_FEE_PER_GAS;
    tracing::info!("Using default MAX_PRIORITY_FEE_PER_GAS: {result}");
    result
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            l2_rpc_address: default_l2_rpc_address(),
            confirmation_timeout_sec: default_confirmation_timeout_sec(),
            polling_interval_ms: default_polling_interval_ms(),
            gas_per_pubdata: default_gas_per_pubdata(),
            max_priority_fee_per_gas: default_max_priority_fee_per_gas(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> envy::Result<Self> {
        envy::prefixed("ZKSYNC_CLIENT_").from_env()
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_sec)
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }

    pub fn gas_per_pubdata(&self) -> U256 {
        self.gas_per_pubdata.into()
    }

    pub fn max_priority_fee_per_gas(&self) -> U256 {
        self.max_priority_fee_per_gas.into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn config_defaults() {
        let config: ClientConfig = envy::from_iter(HashMap::<String, String>::new()).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.l2_rpc_address, "http://127.0.0.1:3050");
        assert_eq!(config.confirmation_timeout(), Duration::from_secs(120));
        assert_eq!(config.polling_interval(), Duration::from_millis(100));
        assert_eq!(config.gas_per_pubdata(), U256::from(50_000));
        assert_eq!(config.max_priority_fee_per_gas(), U256::from(100_000_000));
    }

    #[test]
    fn config_overrides() {
        let vars = HashMap::from([
            (
                "ZKSYNC_CLIENT_L2_RPC_ADDRESS".to_owned(),
                "http://node:3050".to_owned(),
            ),
            (
                "ZKSYNC_CLIENT_POLLING_INTERVAL_MS".to_owned(),
                "250".to_owned(),
            ),
        ]);
        let config: ClientConfig = envy::prefixed("ZKSYNC_CLIENT_").from_iter(vars).unwrap();
        assert_eq!(config.l2_rpc_address, "http://node:3050");
        assert_eq!(config.polling_interval(), Duration::from_millis(250));
        assert_eq!(config.confirmation_timeout_sec, 120);
    }
}
