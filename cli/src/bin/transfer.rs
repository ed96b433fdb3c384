extern crate cli;

use cli::{load_config, transfer::Transfer, types::TransferParams};
use eth::{execution::ExecutionRPC, types::EthConfig, wallet::Signer};
use eyre::{Context, Result};
use log::{error, info};
use std::{process, sync::Arc};

/// Sends the configured value from the account of `PRIVATE_KEY`.
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("Transfer failed: {:?}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = load_config()?;

    let signer =
        Signer::from_hex(config.private_key()?).wrap_err("failed to parse PRIVATE_KEY")?;
    println!("From Address: {}", signer.checksum_address());

    let execution = Arc::new(ExecutionRPC::new(
        config.execution_rpc.clone(),
        EthConfig::from(config.clone()),
    )?);
    info!("Connected to {}", execution.rpc);

    let transfer = Transfer::new(execution, signer, TransferParams::from(&config));
    let tx_hash = transfer.execute().await?;
    println!("Transaction sent: {:?}", tx_hash);

    Ok(())
}
