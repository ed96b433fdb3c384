use eth::execution::EthExecutionAPI;
use eth::types::BlockSummary;
use eyre::{eyre, Context, Result};
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

/// Everything reported about a single block. The header is fetched
/// separately from the full block, and the transaction count comes from an
/// independent query by block hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionReport {
    pub block: BlockSummary,
    pub header: BlockSummary,
    pub transaction_count: u64,
}

impl InspectionReport {
    /// Cross-checks the transactions of the full block against the count query.
    pub fn counts_agree(&self) -> bool {
        self.block.transaction_count == self.transaction_count
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block Number: {}", self.block.number)?;
        writeln!(f, "Block Hash: {:?}", self.block.hash)?;
        writeln!(f, "Block Time: {}", self.block.timestamp)?;
        writeln!(f, "Number of Transactions: {}", self.block.transaction_count)?;

        writeln!(f, "Block Number: {}", self.header.number)?;
        writeln!(f, "Block Hash: {:?}", self.header.hash)?;
        writeln!(f, "Block Time: {}", self.header.timestamp)?;

        write!(f, "Number of Transactions: {}", self.transaction_count)
    }
}

pub struct Inspector<E: EthExecutionAPI> {
    execution: Arc<E>,
}

impl<E: EthExecutionAPI> Inspector<E> {
    pub fn new(execution: Arc<E>) -> Self {
        Inspector { execution }
    }

    /// Fetches the block, its header and its transaction count, in that
    /// order. Any failure aborts the inspection.
    pub async fn inspect(&self, block_number: u64) -> Result<InspectionReport> {
        let block = self
            .execution
            .get_block_with_txs(block_number)
            .await
            .wrap_err(format!("failed to retrieve block {}", block_number))?
            .ok_or_else(|| eyre!("could not find block {}", block_number))?;
        let block = BlockSummary::try_from(&block)?;
        debug!("Got block {} with hash {:?}", block.number, block.hash);

        let header = self
            .execution
            .get_block(block_number)
            .await
            .wrap_err(format!("failed to retrieve block header {}", block_number))?
            .ok_or_else(|| eyre!("could not find block header {}", block_number))?;
        let header = BlockSummary::try_from(&header)?;

        let transaction_count = self
            .execution
            .get_transaction_count_by_hash(block.hash)
            .await
            .wrap_err(format!(
                "failed to retrieve transaction count of {:?}",
                block.hash
            ))?;

        let report = InspectionReport {
            block,
            header,
            transaction_count,
        };

        if report.counts_agree() {
            info!(
                "Block {} has {} transactions",
                block_number, report.transaction_count
            );
        } else {
            warn!(
                "Block {} lists {} transactions but the node counts {}",
                block_number, report.block.transaction_count, report.transaction_count
            );
        }

        Ok(report)
    }
}
