use ethers::types::{Block, H256, U256};
use serde::{Deserialize, Serialize};

use crate::error::RPCError;

/// The basic configuration of the execution client transport
#[derive(Debug, Clone)]
pub struct EthConfig {
    pub pool_max_idle_per_host: usize,
    pub rpc_max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for EthConfig {
    fn default() -> Self {
        EthConfig {
            pool_max_idle_per_host: 10,
            timeout_secs: 10,
            rpc_max_retries: 0,
        }
    }
}

/// The fields of a block that get reported, independent of whether the
/// block was fetched with full transactions or only their hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: H256,
    pub timestamp: u64,
    pub transaction_count: u64,
}

impl<TX> TryFrom<&Block<TX>> for BlockSummary {
    type Error = RPCError;

    fn try_from(block: &Block<TX>) -> Result<Self, Self::Error> {
        // Pending blocks come back without number and hash
        let number = block
            .number
            .ok_or_else(|| RPCError::UnknownError("block without number".to_string()))?;
        let hash = block
            .hash
            .ok_or_else(|| RPCError::UnknownError(format!("block {} without hash", number)))?;

        if block.timestamp > U256::from(u64::MAX) {
            return Err(RPCError::UnknownError(format!(
                "block {} timestamp {} does not fit in 64 bits",
                number, block.timestamp
            )));
        }

        Ok(BlockSummary {
            number: number.as_u64(),
            hash,
            timestamp: block.timestamp.as_u64(),
            transaction_count: block.transactions.len() as u64,
        })
    }
}
