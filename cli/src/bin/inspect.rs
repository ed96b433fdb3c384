extern crate cli;

use cli::{inspector::Inspector, load_config};
use eth::{execution::ExecutionRPC, types::EthConfig};
use eyre::Result;
use log::{error, info};
use std::{process, sync::Arc};

/// Prints the metadata of the configured block.
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("Block inspection failed: {:?}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = load_config()?;

    let execution = Arc::new(ExecutionRPC::new(
        config.execution_rpc.clone(),
        EthConfig::from(config.clone()),
    )?);
    info!("Connected to {}", execution.rpc);

    let report = Inspector::new(execution)
        .inspect(config.block_number)
        .await?;
    println!("{}", report);

    Ok(())
}
