//! A library for interacting with an Ethereum execution node over JSON-RPC.
//!
//! Provides a limited execution client, plain summaries of the blocks it
//! returns and a local signer for legacy value transfers.

pub mod error;
pub mod execution;
pub mod types;
pub mod wallet;
