//! Finalized assembly output
//!
//! Exactly one representation is produced per call, chosen by [`OutputMode`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_sdk::{pubkey::Pubkey, transaction::VersionedTransaction};

use super::errors::TransactionBuilderError;
use super::request::OutputMode;

/// Result of one assembly call
#[derive(Debug, Clone, PartialEq)]
pub enum TxBuildOutput {
    /// Compiled transaction, signed by any ephemeral signers
    Transaction(VersionedTransaction),
    /// Wire bytes of the transaction
    Serialized(Vec<u8>),
    /// Base64 of the wire bytes
    Encoded(String),
}

impl TxBuildOutput {
    /// Convert a compiled transaction into the representation `mode` asks for
    pub fn finalize(
        tx: VersionedTransaction,
        mode: OutputMode,
    ) -> Result<Self, TransactionBuilderError> {
        match mode {
            OutputMode::Transaction => Ok(Self::Transaction(tx)),
            OutputMode::Serialized => serialize(&tx).map(Self::Serialized),
            OutputMode::Encoded => serialize(&tx).map(|bytes| Self::Encoded(STANDARD.encode(bytes))),
        }
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            Self::Transaction(_) => OutputMode::Transaction,
            Self::Serialized(_) => OutputMode::Serialized,
            Self::Encoded(_) => OutputMode::Encoded,
        }
    }

    pub fn as_transaction(&self) -> Option<&VersionedTransaction> {
        match self {
            Self::Transaction(tx) => Some(tx),
            _ => None,
        }
    }

    /// Recover the transaction from any representation
    pub fn into_transaction(self) -> Result<VersionedTransaction, TransactionBuilderError> {
        match self {
            Self::Transaction(tx) => Ok(tx),
            Self::Serialized(bytes) => deserialize(&bytes),
            Self::Encoded(text) => {
                let bytes = STANDARD
                    .decode(text)
                    .map_err(|e| TransactionBuilderError::Internal(format!("base64 decode: {e}")))?;
                deserialize(&bytes)
            }
        }
    }

    /// Wire bytes, ready for submission
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionBuilderError> {
        match self {
            Self::Transaction(tx) => serialize(tx),
            Self::Serialized(bytes) => Ok(bytes.clone()),
            Self::Encoded(text) => STANDARD
                .decode(text)
                .map_err(|e| TransactionBuilderError::Internal(format!("base64 decode: {e}"))),
        }
    }

    /// Keys whose signatures the message requires, fee payer first
    pub fn required_signers(&self) -> Result<Vec<Pubkey>, TransactionBuilderError> {
        let tx = self.clone().into_transaction()?;
        Ok(crate::compat::get_required_signers(&tx.message).to_vec())
    }
}

fn serialize(tx: &VersionedTransaction) -> Result<Vec<u8>, TransactionBuilderError> {
    bincode::serialize(tx)
        .map_err(|e| TransactionBuilderError::Internal(format!("serialize transaction: {e}")))
}

fn deserialize(bytes: &[u8]) -> Result<VersionedTransaction, TransactionBuilderError> {
    bincode::deserialize(bytes)
        .map_err(|e| TransactionBuilderError::Internal(format!("deserialize transaction: {e}")))
}
