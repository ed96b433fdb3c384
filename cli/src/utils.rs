use dotenv::dotenv;
use ethers::types::{Address, U256};
use log::info;
use std::{env, fmt::Display, str::FromStr};

use crate::error::ConfigError;
use crate::types::Config;

/// Loads the configuration from the environment variables, reading a `.env`
/// file first if there is one.
pub fn load_config() -> Result<Config, ConfigError> {
    if let Err(e) = dotenv() {
        info!("No .env file loaded ({}); using environment variables", e);
    }

    load_config_from(|name| env::var(name).ok())
}

/// Builds the configuration out of any variable lookup. Empty values count
/// as missing.
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
    let defaults = Config::default();

    let execution_rpc = get("ETH_NODE_URL").ok_or(ConfigError::Missing("ETH_NODE_URL"))?;

    Ok(Config {
        execution_rpc,
        private_key: get("PRIVATE_KEY"),
        block_number: parse_var(get("BLOCK_NUMBER"), "BLOCK_NUMBER", defaults.block_number)?,
        recipient: parse_var::<Address>(get("RECIPIENT"), "RECIPIENT", defaults.recipient)?,
        value_wei: match get("TRANSFER_VALUE_WEI") {
            Some(value) => U256::from_dec_str(value.trim()).map_err(|e| ConfigError::Invalid {
                name: "TRANSFER_VALUE_WEI",
                value,
                reason: e.to_string(),
            })?,
            None => defaults.value_wei,
        },
        gas_limit: parse_var(get("GAS_LIMIT"), "GAS_LIMIT", defaults.gas_limit)?,
        rpc_timeout_secs: parse_var(
            get("RPC_TIMEOUT_SECS"),
            "RPC_TIMEOUT_SECS",
            defaults.rpc_timeout_secs,
        )?,
        rpc_pool_max_idle_per_host: parse_var(
            get("RPC_POOL_MAX_IDLE_PER_HOST"),
            "RPC_POOL_MAX_IDLE_PER_HOST",
            defaults.rpc_pool_max_idle_per_host,
        )?,
        rpc_max_retries: parse_var(
            get("RPC_MAX_RETRIES"),
            "RPC_MAX_RETRIES",
            defaults.rpc_max_retries,
        )?,
    })
}

fn parse_var<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(value) => T::from_str(value.trim()).map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
