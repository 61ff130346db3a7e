//! Fee estimator
//!
//! Asks a priority-fee oracle for a microLamport price per compute unit for
//! the draft transaction, then applies the floor corrections.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount, hash::Hash, instruction::Instruction,
    pubkey::Pubkey,
};
use tracing::{debug, warn};

use super::builder::compile_unsigned;
use super::errors::TransactionBuilderError;
use super::request::PriorityLevel;

/// Degenerate estimate some oracles return when they have no data
pub const DEGENERATE_FEE_ESTIMATE: u64 = 1;
/// Price substituted for [`DEGENERATE_FEE_ESTIMATE`]
pub const FALLBACK_PRIORITY_FEE: u64 = 100_000;
/// Lowest price ever returned
pub const MIN_PRIORITY_FEE: u64 = 10_000;

/// `100_000` for the degenerate estimate `1`, otherwise at least `10_000`
pub fn apply_fee_floor(estimate: u64) -> u64 {
    if estimate == DEGENERATE_FEE_ESTIMATE {
        FALLBACK_PRIORITY_FEE
    } else {
        estimate.max(MIN_PRIORITY_FEE)
    }
}

/// Source of priority-fee estimates
#[async_trait]
pub trait FeeOracle: Send + Sync {
    /// Raw estimate for a base-58 serialized transaction at `level`
    async fn priority_fee_estimate(
        &self,
        transaction_b58: &str,
        level: PriorityLevel,
    ) -> Result<u64, TransactionBuilderError>;
}

/// `getPriorityFeeEstimate` JSON-RPC oracle
#[derive(Debug, Clone)]
pub struct HeliusFeeOracle {
    http: Client,
    url: String,
}

impl HeliusFeeOracle {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransactionBuilderError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(TransactionBuilderError::validation(
                "fee oracle URL is empty",
            ));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransactionBuilderError::oracle(e.to_string()))?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Pull `result.priorityFeeEstimate` out of an oracle response
///
/// Fractional estimates are truncated.
pub fn parse_fee_response(body: &serde_json::Value) -> Result<u64, TransactionBuilderError> {
    if let Some(err) = body.get("error") {
        return Err(TransactionBuilderError::oracle(format!(
            "oracle returned error: {err}"
        )));
    }
    let estimate = body
        .get("result")
        .and_then(|r| r.get("priorityFeeEstimate"))
        .ok_or_else(|| TransactionBuilderError::oracle("response has no priorityFeeEstimate"))?;

    if let Some(v) = estimate.as_u64() {
        return Ok(v);
    }
    match estimate.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v.trunc() as u64),
        _ => Err(TransactionBuilderError::oracle(format!(
            "unparseable priorityFeeEstimate: {estimate}"
        ))),
    }
}

#[async_trait]
impl FeeOracle for HeliusFeeOracle {
    async fn priority_fee_estimate(
        &self,
        transaction_b58: &str,
        level: PriorityLevel,
    ) -> Result<u64, TransactionBuilderError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": "1",
            "method": "getPriorityFeeEstimate",
            "params": [{
                "transaction": transaction_b58,
                "options": { "priorityLevel": level.oracle_level() },
            }],
        });

        let resp = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransactionBuilderError::oracle(format!("request error: {e}")))?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "Fee oracle returned an error status");
            return Err(TransactionBuilderError::oracle(format!(
                "oracle responded with {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TransactionBuilderError::oracle(format!("JSON parse error: {e}")))?;
        parse_fee_response(&body)
    }
}

/// Price the draft transaction at `level`
///
/// The draft is compiled unsigned exactly as for simulation and sent to the
/// oracle base-58 encoded.
pub async fn estimate_priority_fee(
    oracle: &dyn FeeOracle,
    payer: &Pubkey,
    level: PriorityLevel,
    instructions: &[Instruction],
    blockhash: Hash,
    table: Option<&AddressLookupTableAccount>,
) -> Result<u64, TransactionBuilderError> {
    let tx = compile_unsigned(payer, instructions, blockhash, table)?;
    let bytes = bincode::serialize(&tx)
        .map_err(|e| TransactionBuilderError::Internal(format!("serialize draft: {e}")))?;
    let encoded = bs58::encode(bytes).into_string();

    let raw = oracle.priority_fee_estimate(&encoded, level).await?;
    let priority_fee = apply_fee_floor(raw);
    debug!(
        raw,
        priority_fee,
        level = level.oracle_level(),
        "Priority fee estimated"
    );
    Ok(priority_fee)
}
