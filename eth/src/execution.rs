use std::time::Duration;

use async_trait::async_trait;
use ethers::prelude::Http;
use ethers::providers::{
    HttpRateLimitRetryPolicy, Middleware, Provider, RetryClient, RetryClientBuilder,
};
use ethers::types::{Address, Block, BlockNumber, Bytes, Transaction, H256, U256, U64};
use eyre::Result;
use log::debug;
use mockall::automock;
use reqwest::Url;

use crate::error::RPCError;
use crate::types::EthConfig;

/// A trait describing the limited set of execution layer methods needed to
/// inspect blocks and submit value transfers.
#[automock]
#[async_trait]
pub trait EthExecutionAPI: Sync + Send + 'static {
    /// Get a block by its block number. This method returns the block with
    /// the full transactions.
    async fn get_block_with_txs(&self, block_number: u64) -> Result<Option<Block<Transaction>>>;
    /// Get a block by its block number. This method returns the block without
    /// the full transactions, which is all the header information the node
    /// exposes.
    async fn get_block(&self, block_number: u64) -> Result<Option<Block<H256>>>;
    /// Get the number of transactions in the block with the given hash.
    async fn get_transaction_count_by_hash(&self, block_hash: H256) -> Result<u64>;
    /// Get the next nonce of an account, counting transactions that are
    /// still pending.
    async fn get_pending_nonce(&self, address: Address) -> Result<U256>;
    /// Get the gas price currently suggested by the node.
    async fn suggest_gas_price(&self) -> Result<U256>;
    /// Get the chain id used for replay protected signatures.
    async fn get_chain_id(&self) -> Result<U256>;
    /// Submit a signed, RLP encoded transaction and return its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256>;
}

/// A client for interacting with the Ethereum execution layer.
pub struct ExecutionRPC {
    pub provider: Provider<RetryClient<Http>>,
    pub rpc: String,
}

impl ExecutionRPC {
    pub fn new(rpc: String, config: EthConfig) -> Result<Self, RPCError> {
        let url =
            Url::parse(&rpc).map_err(|e| RPCError::InvalidEndpoint(rpc.clone(), e.to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| RPCError::InvalidEndpoint(rpc.clone(), e.to_string()))?;

        let http = Http::new_with_client(url, http_client);
        // Only rate limited requests may be retried. Timeouts and connection
        // errors are not, a submitted transaction must reach the node once.
        let client = RetryClientBuilder::default()
            .rate_limit_retries(config.rpc_max_retries)
            .timeout_retries(0)
            .initial_backoff(Duration::from_millis(50))
            .build(http, Box::new(HttpRateLimitRetryPolicy));

        let provider = Provider::new(client);

        Ok(ExecutionRPC { rpc, provider })
    }
}

#[cfg(not(tarpaulin_include))]
#[async_trait]
impl EthExecutionAPI for ExecutionRPC {
    async fn get_block_with_txs(&self, block_number: u64) -> Result<Option<Block<Transaction>>> {
        let block = self
            .provider
            .get_block_with_txs(block_number)
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?;

        Ok(block)
    }

    async fn get_block(&self, block_number: u64) -> Result<Option<Block<H256>>> {
        let block = self
            .provider
            .get_block(block_number)
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?;

        Ok(block)
    }

    async fn get_transaction_count_by_hash(&self, block_hash: H256) -> Result<u64> {
        let count: Option<U64> = self
            .provider
            .request("eth_getBlockTransactionCountByHash", [block_hash])
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?;

        let count = count.ok_or_else(|| RPCError::NotFoundError(format!("{:?}", block_hash)))?;

        Ok(count.as_u64())
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<U256> {
        let nonce = self
            .provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?;

        debug!("Pending nonce of {:?} is {}", address, nonce);
        Ok(nonce)
    }

    async fn suggest_gas_price(&self) -> Result<U256> {
        Ok(self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?)
    }

    async fn get_chain_id(&self) -> Result<U256> {
        Ok(self
            .provider
            .get_chainid()
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| RPCError::RequestError(e.to_string()))?;

        Ok(pending.tx_hash())
    }
}
