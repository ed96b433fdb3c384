use std::fmt;

use eth::types::EthConfig;
use ethers::types::{Address, U256};

use crate::error::ConfigError;

pub const DEFAULT_BLOCK_NUMBER: u64 = 5671744;
pub const DEFAULT_RECIPIENT: &str = "0xC36512B146C028F651df6ae1Dbd5fB378DB5d583";
/// 0.001 ether
pub const DEFAULT_TRANSFER_VALUE_WEI: u64 = 1_000_000_000_000_000;
/// Intrinsic gas of a plain value transfer
pub const DEFAULT_GAS_LIMIT: u64 = 21000;

/// Main configuration structure of the inspector and transfer binaries.
#[derive(Clone)]
pub struct Config {
    pub execution_rpc: String,
    pub private_key: Option<String>,
    pub block_number: u64,
    pub recipient: Address,
    pub value_wei: U256,
    pub gas_limit: u64,
    pub rpc_timeout_secs: u64,
    pub rpc_pool_max_idle_per_host: usize,
    pub rpc_max_retries: u32,
}

impl Config {
    /// The private key is only needed when sending a transfer.
    pub fn private_key(&self) -> Result<&str, ConfigError> {
        self.private_key
            .as_deref()
            .ok_or(ConfigError::Missing("PRIVATE_KEY"))
    }
}

impl Default for Config {
    fn default() -> Self {
        let eth_config = EthConfig::default();

        Config {
            execution_rpc: String::new(),
            private_key: None,
            block_number: DEFAULT_BLOCK_NUMBER,
            recipient: DEFAULT_RECIPIENT.parse().unwrap_or_default(),
            value_wei: U256::from(DEFAULT_TRANSFER_VALUE_WEI),
            gas_limit: DEFAULT_GAS_LIMIT,
            rpc_timeout_secs: eth_config.timeout_secs,
            rpc_pool_max_idle_per_host: eth_config.pool_max_idle_per_host,
            rpc_max_retries: eth_config.rpc_max_retries,
        }
    }
}

// Keeps the private key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("execution_rpc", &self.execution_rpc)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("block_number", &self.block_number)
            .field("recipient", &self.recipient)
            .field("value_wei", &self.value_wei)
            .field("gas_limit", &self.gas_limit)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("rpc_pool_max_idle_per_host", &self.rpc_pool_max_idle_per_host)
            .field("rpc_max_retries", &self.rpc_max_retries)
            .finish()
    }
}

impl From<Config> for EthConfig {
    fn from(config: Config) -> Self {
        EthConfig {
            pool_max_idle_per_host: config.rpc_pool_max_idle_per_host,
            timeout_secs: config.rpc_timeout_secs,
            rpc_max_retries: config.rpc_max_retries,
        }
    }
}

/// The fixed parts of a transfer, everything but nonce and gas price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    pub recipient: Address,
    pub value: U256,
    pub gas_limit: U256,
}

impl From<&Config> for TransferParams {
    fn from(config: &Config) -> Self {
        TransferParams {
            recipient: config.recipient,
            value: config.value_wei,
            gas_limit: U256::from(config.gas_limit),
        }
    }
}
