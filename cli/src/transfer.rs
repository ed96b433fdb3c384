use eth::execution::EthExecutionAPI;
use eth::wallet::{SignedTransfer, Signer, TransferDraft};
use ethers::types::{Address, H256, U256};
use eyre::{eyre, Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::types::TransferParams;

/// Sends a single value transfer from the signer's account.
pub struct Transfer<E: EthExecutionAPI> {
    execution: Arc<E>,
    signer: Signer,
    params: TransferParams,
}

impl<E: EthExecutionAPI> Transfer<E> {
    pub fn new(execution: Arc<E>, signer: Signer, params: TransferParams) -> Self {
        Transfer {
            execution,
            signer,
            params,
        }
    }

    pub fn sender(&self) -> Address {
        self.signer.address()
    }

    /// Queries nonce, gas price and chain id, then signs the transfer.
    /// Nothing is sent to the node.
    pub async fn prepare(&self) -> Result<SignedTransfer> {
        let from = self.sender();

        let nonce = self
            .execution
            .get_pending_nonce(from)
            .await
            .wrap_err(format!("failed to get nonce of {:?}", from))?;

        let gas_price = self
            .execution
            .suggest_gas_price()
            .await
            .wrap_err("failed to suggest gas price")?;

        let draft = TransferDraft {
            nonce,
            to: self.params.recipient,
            value: self.params.value,
            gas_limit: self.params.gas_limit,
            gas_price,
        };

        let chain_id = self
            .execution
            .get_chain_id()
            .await
            .wrap_err("failed to get chain id")?;
        if chain_id > U256::from(u64::MAX) {
            return Err(eyre!("chain id {} does not fit in 64 bits", chain_id));
        }
        debug!(
            "Signing transfer with nonce {} gas price {} on chain {}",
            nonce, gas_price, chain_id
        );

        let signed = self
            .signer
            .sign_transfer(&draft, chain_id.as_u64())
            .wrap_err("failed to sign transaction")?;

        Ok(signed)
    }

    /// Prepares the transfer and submits it. A rejected submission is
    /// returned as an error and the signed transaction is dropped.
    pub async fn execute(&self) -> Result<H256> {
        let signed = self.prepare().await?;

        let tx_hash = self
            .execution
            .send_raw_transaction(signed.raw.clone())
            .await
            .wrap_err("failed to send transaction")?;

        if tx_hash != signed.hash {
            warn!(
                "Node returned hash {:?}, locally computed {:?}",
                tx_hash, signed.hash
            );
        }
        info!("Transaction {:?} accepted by the node", tx_hash);

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eth::execution::MockEthExecutionAPI;
    use ethers::types::Transaction;
    use ethers::utils::{keccak256, rlp};
    use mockall::{predicate, Sequence};

    const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const CHAIN_ID: u64 = 31337;
    const NONCE: u64 = 3;
    const GAS_PRICE: u64 = 1_875_000_000;

    fn get_params() -> TransferParams {
        TransferParams {
            recipient: "0xC36512B146C028F651df6ae1Dbd5fB378DB5d583"
                .parse()
                .unwrap(),
            value: U256::from(1_000_000_000_000_000u64),
            gas_limit: U256::from(21000),
        }
    }

    fn sender() -> Address {
        SENDER.parse().unwrap()
    }

    fn expect_queries(execution: &mut MockEthExecutionAPI, seq: &mut Sequence) {
        execution
            .expect_get_pending_nonce()
            .with(predicate::eq(sender()))
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(U256::from(NONCE)));
        execution
            .expect_suggest_gas_price()
            .times(1)
            .in_sequence(seq)
            .returning(|| Ok(U256::from(GAS_PRICE)));
        execution
            .expect_get_chain_id()
            .times(1)
            .in_sequence(seq)
            .returning(|| Ok(U256::from(CHAIN_ID)));
    }

    fn setup_transfer(execution: MockEthExecutionAPI) -> Transfer<MockEthExecutionAPI> {
        let signer = Signer::from_hex(PRIVATE_KEY).unwrap();
        Transfer::new(Arc::new(execution), signer, get_params())
    }

    #[tokio::test]
    async fn test_prepare_builds_legacy_transfer() {
        let mut execution = MockEthExecutionAPI::new();
        let mut seq = Sequence::new();
        expect_queries(&mut execution, &mut seq);
        execution.expect_send_raw_transaction().never();

        let transfer = setup_transfer(execution);
        assert_eq!(transfer.sender(), sender());

        let signed = transfer.prepare().await.unwrap();
        assert_eq!(signed.chain_id, CHAIN_ID);
        signed.verify(sender()).unwrap();

        let tx: Transaction = rlp::decode(&signed.raw).unwrap();
        assert_eq!(tx.nonce, U256::from(NONCE));
        assert_eq!(tx.to, Some(get_params().recipient));
        assert_eq!(tx.value, get_params().value);
        assert_eq!(tx.gas, U256::from(21000));
        assert_eq!(tx.gas_price, Some(U256::from(GAS_PRICE)));
        assert!(tx.input.is_empty());
        assert_eq!(tx.recover_from().unwrap(), sender());
    }

    #[tokio::test]
    async fn test_execute_submits_signed_transfer() {
        let mut execution = MockEthExecutionAPI::new();
        let mut seq = Sequence::new();
        expect_queries(&mut execution, &mut seq);
        execution
            .expect_send_raw_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|raw| Ok(H256::from(keccak256(&raw))));

        let transfer = setup_transfer(execution);
        let tx_hash = transfer.execute().await.unwrap();

        let signer = Signer::from_hex(PRIVATE_KEY).unwrap();
        let draft = TransferDraft {
            nonce: U256::from(NONCE),
            to: get_params().recipient,
            value: get_params().value,
            gas_limit: get_params().gas_limit,
            gas_price: U256::from(GAS_PRICE),
        };
        let expected = signer.sign_transfer(&draft, CHAIN_ID).unwrap();
        assert_eq!(tx_hash, expected.hash);
    }

    #[tokio::test]
    async fn test_rejected_submission_is_an_error() {
        let mut execution = MockEthExecutionAPI::new();
        let mut seq = Sequence::new();
        expect_queries(&mut execution, &mut seq);
        execution
            .expect_send_raw_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(eyre!("nonce too low")));

        let transfer = setup_transfer(execution);
        let err = transfer.execute().await.unwrap_err();

        assert!(err.to_string().contains("failed to send transaction"));
        assert_eq!(err.root_cause().to_string(), "nonce too low");
    }

    #[tokio::test]
    async fn test_nonce_failure_stops_before_signing() {
        let mut execution = MockEthExecutionAPI::new();
        execution
            .expect_get_pending_nonce()
            .returning(|_| Err(eyre!("connection refused")));
        execution.expect_suggest_gas_price().never();
        execution.expect_get_chain_id().never();
        execution.expect_send_raw_transaction().never();

        let transfer = setup_transfer(execution);
        let err = transfer.execute().await.unwrap_err();

        assert!(err.to_string().contains("failed to get nonce"));
    }

    #[tokio::test]
    async fn test_oversized_chain_id() {
        let mut execution = MockEthExecutionAPI::new();
        execution
            .expect_get_pending_nonce()
            .returning(|_| Ok(U256::zero()));
        execution
            .expect_suggest_gas_price()
            .returning(|| Ok(U256::one()));
        execution
            .expect_get_chain_id()
            .returning(|| Ok(U256::MAX));
        execution.expect_send_raw_transaction().never();

        let transfer = setup_transfer(execution);
        assert!(transfer.execute().await.is_err());
    }
}
