use ethers::signers::{LocalWallet, Signer as _};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Signature, TransactionRequest, H256, U256};
use ethers::utils::{keccak256, to_checksum};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("Failed to sign transaction: {0}")]
    SigningError(String),
    #[error("Signature recovers {recovered:?} instead of {expected:?}")]
    SignatureMismatch {
        expected: Address,
        recovered: Address,
    },
}

/// An unsigned legacy value transfer. The payload is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferDraft {
    pub nonce: U256,
    pub to: Address,
    pub value: U256,
    pub gas_limit: U256,
    pub gas_price: U256,
}

impl TransferDraft {
    /// Builds the legacy request that gets signed. The chain id is part of
    /// the EIP-155 sighash, so it has to be set before signing.
    pub fn to_request(&self, chain_id: u64) -> TransactionRequest {
        TransactionRequest::new()
            .nonce(self.nonce)
            .to(self.to)
            .value(self.value)
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .data(Bytes::default())
            .chain_id(chain_id)
    }
}

/// A signed transfer, ready to be submitted to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    pub raw: Bytes,
    pub hash: H256,
    pub sighash: H256,
    pub signature: Signature,
    pub chain_id: u64,
}

impl SignedTransfer {
    /// Recovers the signer of the transfer and checks it against `address`.
    pub fn verify(&self, address: Address) -> Result<(), WalletError> {
        let recovered = self
            .signature
            .recover(self.sighash)
            .map_err(|e| WalletError::SigningError(e.to_string()))?;

        if recovered != address {
            return Err(WalletError::SignatureMismatch {
                expected: address,
                recovered,
            });
        }

        Ok(())
    }
}

/// Holds the secp256k1 key that authorizes transfers.
#[derive(Debug, Clone)]
pub struct Signer {
    wallet: LocalWallet,
}

impl Signer {
    /// Parses a hex encoded private key, with or without the `0x` prefix.
    pub fn from_hex(key: &str) -> Result<Self, WalletError> {
        let wallet = key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;

        Ok(Signer { wallet })
    }

    /// The address derived from the public key of the signer.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// The EIP-55 mixed case form of the address.
    pub fn checksum_address(&self) -> String {
        to_checksum(&self.address(), None)
    }

    pub fn sign_transfer(
        &self,
        draft: &TransferDraft,
        chain_id: u64,
    ) -> Result<SignedTransfer, WalletError> {
        let tx: TypedTransaction = draft.to_request(chain_id).into();

        let signature = self
            .wallet
            .clone()
            .with_chain_id(chain_id)
            .sign_transaction_sync(&tx)
            .map_err(|e| WalletError::SigningError(e.to_string()))?;

        let raw = tx.rlp_signed(&signature);
        let hash = H256::from(keccak256(&raw));

        Ok(SignedTransfer {
            raw,
            hash,
            sighash: tx.sighash(),
            signature,
            chain_id,
        })
    }
}
