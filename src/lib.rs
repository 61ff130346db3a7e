//! mcswap - transaction assembly for the McSwap escrow programs
//!
//! Builds compute-sized, priority-priced v0 transactions around swap
//! instructions for SPL tokens and Core, NFT, pNFT and cNFT assets, and
//! submits and confirms them.

pub mod codec;
pub mod compat;
pub mod config;
pub mod rpc;
pub mod structured_logging;
pub mod swap;
pub mod tx_builder;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use codec::CodecError;
pub use config::Config;
pub use rpc::{RpcError, SwapRpc};
pub use swap::{StandardDescriptor, SwapStandard};
pub use tx_builder::{TransactionBuilderError, TxAssembler, TxBuildOutput, TxRequest};

// Re-export commonly used types
pub use solana_sdk::{message::VersionedMessage, pubkey::Pubkey, signature::Signature};
