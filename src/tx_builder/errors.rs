//! Error types for the transaction assembly pipeline
//!
//! Every stage of [`TxAssembler`](super::TxAssembler) returns a tagged
//! `Result`; component errors convert into [`TransactionBuilderError`] so they
//! can be forwarded with `?` without losing their kind.

use thiserror::Error;

use crate::codec::CodecError;
use crate::rpc::RpcError;

/// Comprehensive error type for all transaction assembly operations
#[derive(Error, Debug)]
pub enum TransactionBuilderError {
    /// A required request field is missing or malformed
    ///
    /// Raised before any network call is made. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Simulation reported an execution error
    ///
    /// Carries the error detail and the program logs of the failed simulation.
    /// Fatal to the current assembly attempt.
    #[error("Estimation failed: {detail}")]
    Estimation {
        /// Execution error reported by the cluster
        detail: String,
        /// Program logs captured during simulation
        logs: Vec<String>,
    },

    /// The priority-fee oracle failed or returned unparseable data
    #[error("Fee oracle error: {0}")]
    Oracle(String),

    /// I/O failure on any cluster call
    #[error("Network error: {0}")]
    Network(#[from] RpcError),

    /// A payload value did not fit its layout
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The final instruction list could not be compiled into a message
    #[error("Compile error: {0}")]
    Compile(String),

    /// Failed to sign the transaction
    ///
    /// This can indicate:
    /// - A keypair that is not a required signer of the message
    /// - Invalid transaction structure
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Budget instructions are not where the pipeline placed them
    #[error("Invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Internal invariant violation or unexpected state
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransactionBuilderError {
    /// Check if this error is potentially retryable
    ///
    /// Only transport-level failures qualify; everything the request itself
    /// caused will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::Oracle(_) => true,

            Self::Validation(_) => false,
            Self::Estimation { .. } => false,
            Self::Codec(_) => false,
            Self::Compile(_) => false,
            Self::Signing(_) => false,
            Self::InvalidInstructionOrder(_) => false,
            Self::Internal(_) => false,
        }
    }

    /// Get the error category for logs and callers
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Estimation { .. } => "estimation",
            Self::Oracle(_) => "oracle",
            Self::Network(_) => "network",
            Self::Codec(_) => "codec",
            Self::Compile(_) => "compile",
            Self::Signing(_) => "signing",
            Self::InvalidInstructionOrder(_) => "ordering",
            Self::Internal(_) => "internal",
        }
    }
}

// Convenience constructors for common error scenarios
impl TransactionBuilderError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Create an estimation error from a failed simulation
    pub fn estimation_failed(detail: impl Into<String>, logs: Vec<String>) -> Self {
        Self::Estimation {
            detail: detail.into(),
            logs,
        }
    }

    pub fn oracle(reason: impl Into<String>) -> Self {
        Self::Oracle(reason.into())
    }

    pub fn signing_failed(reason: impl Into<String>) -> Self {
        Self::Signing(reason.into())
    }

    /// Program logs attached to an estimation failure, empty otherwise
    pub fn logs(&self) -> &[String] {
        match self {
            Self::Estimation { logs, .. } => logs,
            _ => &[],
        }
    }
}
