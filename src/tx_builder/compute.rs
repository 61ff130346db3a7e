//! Compute estimator
//!
//! Simulates the draft instruction set against current cluster state and turns
//! the measured consumption into a binding compute-unit ceiling.

use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount, hash::Hash, instruction::Instruction,
    pubkey::Pubkey,
};
use tracing::{debug, warn};

use super::builder::compile_unsigned;
use super::errors::TransactionBuilderError;
use super::instructions::{with_simulation_budget, MAX_COMPUTE_UNIT_LIMIT};
use super::request::ComputeTolerance;
use crate::rpc::SwapRpc;

/// `ceil(consumed * tolerance)`, capped at [`MAX_COMPUTE_UNIT_LIMIT`]
pub fn compute_unit_ceiling(consumed: u64, tolerance: ComputeTolerance) -> u32 {
    let ceiling = tolerance.apply(consumed);
    if ceiling > MAX_COMPUTE_UNIT_LIMIT as u64 {
        warn!(
            consumed,
            ceiling, "Compute ceiling above network maximum, capping"
        );
        return MAX_COMPUTE_UNIT_LIMIT;
    }
    ceiling as u32
}

/// Simulate `instructions` and return the compute-unit ceiling to declare
///
/// Simulation runs on a copy carrying placeholder budget instructions. An
/// execution error is returned as [`TransactionBuilderError::Estimation`] with
/// the program logs and is not retried.
pub async fn estimate_compute_units(
    rpc: &dyn SwapRpc,
    payer: &Pubkey,
    instructions: &[Instruction],
    tolerance: ComputeTolerance,
    blockhash: Hash,
    table: Option<&AddressLookupTableAccount>,
) -> Result<u32, TransactionBuilderError> {
    let draft = with_simulation_budget(instructions);
    let tx = compile_unsigned(payer, &draft, blockhash, table)?;

    let outcome = rpc.simulate_transaction(&tx).await?;
    if let Some(detail) = outcome.err {
        debug!(error = %detail, logs = outcome.logs.len(), "Simulation reported an execution error");
        return Err(TransactionBuilderError::estimation_failed(
            detail,
            outcome.logs,
        ));
    }

    let consumed = outcome.units_consumed.ok_or_else(|| {
        TransactionBuilderError::estimation_failed(
            "simulation did not report consumed compute units",
            outcome.logs.clone(),
        )
    })?;

    let cu_limit = compute_unit_ceiling(consumed, tolerance);
    debug!(
        consumed,
        tolerance = tolerance.factor(),
        cu_limit,
        "Compute units estimated"
    );
    Ok(cu_limit)
}
