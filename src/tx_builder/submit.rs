//! Submission and confirmation helpers
//!
//! `submit` is a single best-effort broadcast. `await_status` is a bounded
//! poll with three terminal outcomes and one exhaustion outcome.

use std::{fmt, time::Duration};

use solana_sdk::{signature::Signature, transaction::VersionedTransaction};
use tracing::{debug, info, warn};

use super::errors::TransactionBuilderError;
use crate::config::ConfirmationConfig;
use crate::rpc::{ConfirmationLevel, SwapRpc};
use crate::structured_logging::AssemblyLogger;

/// Broadcast a fully signed transaction once
///
/// Preflight is skipped and the cluster is told not to retry. Resubmission is
/// left to the caller, since a naive retry can outlive the blockhash.
pub async fn submit(
    rpc: &dyn SwapRpc,
    signed_tx: &[u8],
) -> Result<Signature, TransactionBuilderError> {
    let tx: VersionedTransaction = bincode::deserialize(signed_tx).map_err(|e| {
        TransactionBuilderError::validation(format!("not a serialized transaction: {e}"))
    })?;
    let signature = rpc.send_transaction(&tx).await?;
    info!(signature = %signature, "Transaction submitted");
    Ok(signature)
}

/// Polling bounds for [`await_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub max_polls: u32,
    pub interval_secs: u64,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            max_polls: 10,
            interval_secs: 4,
        }
    }
}

impl ConfirmationPolicy {
    pub fn new(max_polls: u32, interval_secs: u64) -> Self {
        Self {
            max_polls,
            interval_secs,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Longest the poll can run, in seconds
    pub fn max_wait_secs(&self) -> u64 {
        (self.max_polls as u64).saturating_mul(self.interval_secs)
    }
}

impl From<&ConfirmationConfig> for ConfirmationPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self::new(config.max_polls, config.interval_secs)
    }
}

/// How a confirmation poll ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Finalized without an on-chain error
    Finalized,
    /// Finalized with an on-chain error
    ProgramError(String),
    /// Polls exhausted before finalization
    TimedOut { waited_secs: u64 },
}

impl ConfirmationOutcome {
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl fmt::Display for ConfirmationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finalized => f.write_str("finalized"),
            Self::ProgramError(_) => f.write_str("program error!"),
            Self::TimedOut { waited_secs } => write!(f, "{waited_secs} seconds max wait reached"),
        }
    }
}

/// Poll `signature` until it finalizes or `policy.max_polls` polls have run
///
/// Each poll is preceded by one interval of sleep, so exhaustion takes exactly
/// `max_polls * interval_secs`. Processed and confirmed statuses keep polling.
/// A network error on a poll is returned as is.
pub async fn await_status(
    rpc: &dyn SwapRpc,
    signature: &Signature,
    policy: ConfirmationPolicy,
) -> Result<ConfirmationOutcome, TransactionBuilderError> {
    let logger = AssemblyLogger::new();
    let sig = signature.to_string();

    for attempt in 1..=policy.max_polls {
        tokio::time::sleep(policy.interval()).await;

        let state = rpc.get_signature_state(signature).await?;
        match state {
            Some(state) if state.level == Some(ConfirmationLevel::Finalized) => {
                if let Some(err) = state.err {
                    warn!(signature = %sig, error = %err, "Transaction finalized with error");
                    return Ok(ConfirmationOutcome::ProgramError(err));
                }
                info!(signature = %sig, attempt, "Transaction finalized");
                return Ok(ConfirmationOutcome::Finalized);
            }
            Some(state) => {
                let status = match state.level {
                    Some(ConfirmationLevel::Confirmed) => "confirmed",
                    Some(ConfirmationLevel::Processed) => "processed",
                    _ => "unknown",
                };
                logger.log_poll(&sig, attempt, status);
            }
            None => logger.log_poll(&sig, attempt, "not found"),
        }
    }

    let waited_secs = policy.max_wait_secs();
    debug!(signature = %sig, waited_secs, "Confirmation polls exhausted");
    Ok(ConfirmationOutcome::TimedOut { waited_secs })
}
