//! Transaction assembly pipeline
//!
//! Turns a fee payer plus an ordered instruction list into a compiled v0
//! transaction, optionally through an address lookup table.
//!
//! ## Stages
//!
//! 1. Validate the request before any network access
//! 2. Fetch the latest blockhash once
//! 3. Append the memo, if any
//! 4. Simulate a budgeted copy and prepend a compute unit limit
//! 5. Price the draft with the fee oracle and prepend a compute unit price
//! 6. Compile, sign with ephemeral keypairs, emit the requested output
//!
//! The final order is `[price?, limit?, caller instructions.., memo?]`.
//!
//! ## Submission
//!
//! [`submit`] broadcasts signed wire bytes once. [`await_status`] polls a
//! signature with a bounded number of fixed-interval polls.
//!
//! ```rust,no_run
//! use mcswap::tx_builder::{TxAssembler, TransactionBuilderError};
//! # use solana_sdk::{pubkey::Pubkey, instruction::Instruction};
//!
//! # async fn example(assembler: TxAssembler, payer: Pubkey, ixs: Vec<Instruction>)
//! #     -> Result<(), TransactionBuilderError> {
//! let request = assembler.request(payer, ixs).with_memo("order 17");
//! let output = assembler.assemble(request).await?;
//! let _bytes = output.to_bytes()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod compute;
pub mod errors;
pub mod fee;
pub mod instructions;
pub mod output;
pub mod request;
pub mod submit;

pub use builder::{
    compile_unsigned, sign_with, AssemblyDefaults, AssemblyPlan, TxAssembler,
};
pub use errors::TransactionBuilderError;
pub use fee::{FeeOracle, HeliusFeeOracle};
pub use output::TxBuildOutput;
pub use request::{ComputeTolerance, OutputMode, PriorityLevel, TxRequest};
pub use submit::{await_status, submit, ConfirmationOutcome, ConfirmationPolicy};
