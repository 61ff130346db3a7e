//! Transaction assembler
//!
//! Orchestrates one assembly call: validate the request, fetch a blockhash,
//! append the memo, run the compute and fee stages, compile the final
//! versioned message, sign with ephemeral keypairs and finalize the output.
//!
//! Any stage failure aborts the remaining stages.

use std::sync::Arc;

use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount,
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::Instruction,
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};
use tracing::debug;

use super::compute::estimate_compute_units;
use super::errors::TransactionBuilderError;
use super::fee::{estimate_priority_fee, FeeOracle, HeliusFeeOracle};
use super::instructions::{memo_instruction, sanity_check_budget_order};
use super::output::TxBuildOutput;
use super::request::{ComputeTolerance, OutputMode, PriorityLevel, TxRequest};
use crate::compat;
use crate::config::Config;
use crate::rpc::{RpcNetwork, SwapRpc};
use crate::structured_logging::AssemblyLogger;

/// Compile `instructions` into an unsigned v0 transaction
///
/// Signature slots are filled with placeholders, one per required signer.
pub fn compile_unsigned(
    payer: &Pubkey,
    instructions: &[Instruction],
    blockhash: Hash,
    table: Option<&AddressLookupTableAccount>,
) -> Result<VersionedTransaction, TransactionBuilderError> {
    let tables = table.map(std::slice::from_ref).unwrap_or(&[]);
    let message = v0::Message::try_compile(payer, instructions, tables, blockhash)
        .map_err(|e| TransactionBuilderError::Compile(e.to_string()))?;
    let message = VersionedMessage::V0(message);
    let required = compat::get_num_required_signatures(&message) as usize;
    Ok(VersionedTransaction {
        signatures: vec![Signature::default(); required],
        message,
    })
}

/// Sign `tx` with each keypair in its required-signer slot
///
/// The fee payer's slot is left for the caller's wallet.
pub fn sign_with(
    tx: &mut VersionedTransaction,
    signers: &[Keypair],
) -> Result<(), TransactionBuilderError> {
    if signers.is_empty() {
        return Ok(());
    }
    let message_bytes = tx.message.serialize();
    for keypair in signers {
        let pubkey = keypair.pubkey();
        let slot = compat::signer_index(&tx.message, &pubkey).ok_or_else(|| {
            TransactionBuilderError::signing_failed(format!(
                "{pubkey} is not a required signer of this transaction"
            ))
        })?;
        tx.signatures[slot] = keypair.sign_message(&message_bytes);
    }
    Ok(())
}

/// Defaults applied to requests created through [`TxAssembler::request`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyDefaults {
    pub priority: PriorityLevel,
    pub tolerance: ComputeTolerance,
}

/// Final instruction list and everything needed to compile it
#[derive(Debug)]
pub struct AssemblyPlan {
    pub payer: Pubkey,
    pub instructions: Vec<Instruction>,
    pub blockhash: Hash,
    pub lookup_table: Option<AddressLookupTableAccount>,
    pub signers: Vec<Keypair>,
    pub output: OutputMode,
    pub cu_limit: Option<u32>,
    pub priority_fee: Option<u64>,
    logger: AssemblyLogger,
}

impl AssemblyPlan {
    /// Correlation id shared by every log event of this assembly
    pub fn context_id(&self) -> &str {
        self.logger.context_id()
    }
}

/// Builds, sizes and prices swap transactions
#[derive(Clone)]
pub struct TxAssembler {
    rpc: Arc<dyn SwapRpc>,
    oracle: Arc<dyn FeeOracle>,
    defaults: AssemblyDefaults,
}

impl TxAssembler {
    pub fn new(rpc: Arc<dyn SwapRpc>, oracle: Arc<dyn FeeOracle>) -> Self {
        Self {
            rpc,
            oracle,
            defaults: AssemblyDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: AssemblyDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Assembler over the configured RPC endpoint and fee oracle
    pub fn from_config(config: &Config) -> Result<Self, TransactionBuilderError> {
        let rpc = RpcNetwork::new(&config.rpc.url, config.rpc.timeout())?;
        let oracle = HeliusFeeOracle::new(config.oracle_url(), config.oracle.timeout())?;
        let defaults = AssemblyDefaults {
            priority: config.assembly.priority,
            tolerance: ComputeTolerance::new(config.assembly.tolerance)?,
        };
        Ok(Self::new(Arc::new(rpc), Arc::new(oracle)).with_defaults(defaults))
    }

    pub fn rpc(&self) -> &Arc<dyn SwapRpc> {
        &self.rpc
    }

    /// New request seeded with this assembler's defaults
    pub fn request(&self, payer: Pubkey, instructions: Vec<Instruction>) -> TxRequest {
        TxRequest::new(payer, instructions)
            .with_priority(self.defaults.priority)
            .with_tolerance(self.defaults.tolerance)
    }

    /// Run every stage up to (not including) compilation
    pub async fn plan(&self, request: TxRequest) -> Result<AssemblyPlan, TransactionBuilderError> {
        request.validate()?;
        let logger = AssemblyLogger::new();
        logger.log_request(
            &request.payer.to_string(),
            request.instructions.len(),
            request.signers.len(),
        );

        let result = self.run_stages(request, &logger).await;
        if let Err(e) = &result {
            logger.log_failure(e.category(), &e.to_string());
        }
        result
    }

    async fn run_stages(
        &self,
        request: TxRequest,
        logger: &AssemblyLogger,
    ) -> Result<AssemblyPlan, TransactionBuilderError> {
        let TxRequest {
            payer,
            mut instructions,
            signers,
            lookup_table,
            priority,
            tolerance,
            compute,
            fees,
            output,
            memo,
        } = request;

        let blockhash = self.rpc.get_latest_blockhash().await?;
        debug!(blockhash = %blockhash, context_id = logger.context_id(), "Fetched blockhash");

        if let Some(memo) = memo {
            instructions.push(memo_instruction(&memo, &payer));
            logger.log_memo(memo.len());
        }

        let mut cu_limit = None;
        if compute {
            let limit = estimate_compute_units(
                self.rpc.as_ref(),
                &payer,
                &instructions,
                tolerance,
                blockhash,
                lookup_table.as_ref(),
            )
            .await?;
            instructions.insert(0, ComputeBudgetInstruction::set_compute_unit_limit(limit));
            logger.log_compute_limit(limit);
            cu_limit = Some(limit);
        }

        let mut priority_fee = None;
        if fees {
            let price = estimate_priority_fee(
                self.oracle.as_ref(),
                &payer,
                priority,
                &instructions,
                blockhash,
                lookup_table.as_ref(),
            )
            .await?;
            instructions.insert(0, ComputeBudgetInstruction::set_compute_unit_price(price));
            logger.log_priority_fee(price, priority.oracle_level());
            priority_fee = Some(price);
        }

        sanity_check_budget_order(&instructions, fees, compute)?;

        Ok(AssemblyPlan {
            payer,
            instructions,
            blockhash,
            lookup_table,
            signers,
            output,
            cu_limit,
            priority_fee,
            logger: logger.clone(),
        })
    }

    /// Compile, sign and convert a plan into its output representation
    pub fn finalize(plan: AssemblyPlan) -> Result<TxBuildOutput, TransactionBuilderError> {
        let mut tx = compile_unsigned(
            &plan.payer,
            &plan.instructions,
            plan.blockhash,
            plan.lookup_table.as_ref(),
        )?;
        sign_with(&mut tx, &plan.signers)?;
        plan.logger.log_compiled(plan.instructions.len(), plan.signers.len());
        TxBuildOutput::finalize(tx, plan.output)
    }

    /// Full pipeline: plan then finalize
    pub async fn assemble(&self, request: TxRequest) -> Result<TxBuildOutput, TransactionBuilderError> {
        let plan = self.plan(request).await?;
        Self::finalize(plan)
    }
}
