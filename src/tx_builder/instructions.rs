//! Budget and memo instructions, plus ordering validation
//!
//! Final instruction order produced by the assembler:
//! 1. `SetComputeUnitPrice` (fee stage)
//! 2. `SetComputeUnitLimit` (compute stage)
//! 3. Caller instructions, untouched and in caller order
//! 4. Memo (if any)

use solana_sdk::{
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::tx_builder::errors::TransactionBuilderError;

/// Network ceiling for a transaction's compute units
pub const MAX_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;

/// Nominal price attached to the simulation draft
pub const SIMULATION_UNIT_PRICE: u64 = 10_000;

pub const MEMO_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

// ComputeBudgetInstruction discriminants
pub const SET_COMPUTE_UNIT_LIMIT_TAG: u8 = 2;
pub const SET_COMPUTE_UNIT_PRICE_TAG: u8 = 3;

/// Copy of `instructions` with placeholder budget instructions in front
///
/// `[price(SIMULATION_UNIT_PRICE), limit(MAX_COMPUTE_UNIT_LIMIT), ...]`. The
/// caller's slice is left as it is.
pub fn with_simulation_budget(instructions: &[Instruction]) -> Vec<Instruction> {
    let mut draft = Vec::with_capacity(instructions.len() + 2);
    draft.push(ComputeBudgetInstruction::set_compute_unit_price(
        SIMULATION_UNIT_PRICE,
    ));
    draft.push(ComputeBudgetInstruction::set_compute_unit_limit(
        MAX_COMPUTE_UNIT_LIMIT,
    ));
    draft.extend_from_slice(instructions);
    draft
}

/// Memo over `memo` with the fee payer as its only (read-only) signer
pub fn memo_instruction(memo: &str, payer: &Pubkey) -> Instruction {
    Instruction::new_with_bytes(
        MEMO_PROGRAM_ID,
        memo.as_bytes(),
        vec![AccountMeta::new_readonly(*payer, true)],
    )
}

pub fn is_compute_budget(ix: &Instruction) -> bool {
    ix.program_id == compute_budget::id()
}

/// Discriminant of a compute-budget instruction, `None` for any other program
pub fn budget_tag(ix: &Instruction) -> Option<u8> {
    is_compute_budget(ix).then(|| ix.data.first().copied()).flatten()
}

/// Validate the budget prefix the assembler prepended (debug/test only)
///
/// With both stages enabled the list must start `[price, limit]`; with one
/// stage the matching instruction must come first.
#[cfg(debug_assertions)]
pub fn sanity_check_budget_order(
    instructions: &[Instruction],
    has_price: bool,
    has_limit: bool,
) -> Result<(), TransactionBuilderError> {
    let mut expected = Vec::with_capacity(2);
    if has_price {
        expected.push((SET_COMPUTE_UNIT_PRICE_TAG, "SetComputeUnitPrice"));
    }
    if has_limit {
        expected.push((SET_COMPUTE_UNIT_LIMIT_TAG, "SetComputeUnitLimit"));
    }

    if instructions.len() <= expected.len() {
        return Err(TransactionBuilderError::InvalidInstructionOrder(format!(
            "expected {} budget instructions followed by at least one instruction, got {}",
            expected.len(),
            instructions.len()
        )));
    }

    for (idx, (tag, name)) in expected.iter().enumerate() {
        if budget_tag(&instructions[idx]) != Some(*tag) {
            return Err(TransactionBuilderError::InvalidInstructionOrder(format!(
                "expected {name} at position {idx}, got program_id: {}",
                instructions[idx].program_id
            )));
        }
    }
    Ok(())
}

/// No-op version of sanity_check_budget_order for release builds
#[cfg(not(debug_assertions))]
#[inline]
pub fn sanity_check_budget_order(
    _instructions: &[Instruction],
    _has_price: bool,
    _has_limit: bool,
) -> Result<(), TransactionBuilderError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_ix(tag: u8) -> Instruction {
        Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[tag],
            vec![AccountMeta::new(Pubkey::new_unique(), false)],
        )
    }

    #[test]
    fn test_simulation_budget_prefix() {
        let ixs = vec![program_ix(1), program_ix(2)];
        let draft = with_simulation_budget(&ixs);

        assert_eq!(draft.len(), 4);
        assert_eq!(draft[0], ComputeBudgetInstruction::set_compute_unit_price(10_000));
        assert_eq!(draft[1], ComputeBudgetInstruction::set_compute_unit_limit(1_400_000));
        assert_eq!(&draft[2..], &ixs[..]);
        // caller list untouched
        assert_eq!(ixs.len(), 2);
    }

    #[test]
    fn test_memo_instruction() {
        let payer = Pubkey::new_unique();
        let ix = memo_instruction("order #42", &payer);

        assert_eq!(ix.program_id, MEMO_PROGRAM_ID);
        assert_eq!(ix.data, b"order #42");
        assert_eq!(ix.accounts, vec![AccountMeta::new_readonly(payer, true)]);
    }

    #[test]
    fn test_budget_tags() {
        assert_eq!(
            budget_tag(&ComputeBudgetInstruction::set_compute_unit_limit(5)),
            Some(SET_COMPUTE_UNIT_LIMIT_TAG)
        );
        assert_eq!(
            budget_tag(&ComputeBudgetInstruction::set_compute_unit_price(5)),
            Some(SET_COMPUTE_UNIT_PRICE_TAG)
        );
        assert_eq!(budget_tag(&program_ix(3)), None);
    }

    #[test]
    fn test_sanity_check_accepts_assembled_order() {
        let ixs = with_simulation_budget(&[program_ix(0)]);
        assert!(sanity_check_budget_order(&ixs, true, true).is_ok());

        let limit_only = vec![
            ComputeBudgetInstruction::set_compute_unit_limit(1),
            program_ix(0),
        ];
        assert!(sanity_check_budget_order(&limit_only, false, true).is_ok());
        assert!(sanity_check_budget_order(&[program_ix(0)], false, false).is_ok());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_sanity_check_rejects_swapped_budget() {
        let swapped = vec![
            ComputeBudgetInstruction::set_compute_unit_limit(1),
            ComputeBudgetInstruction::set_compute_unit_price(1),
            program_ix(0),
        ];
        let err = sanity_check_budget_order(&swapped, true, true).unwrap_err();
        assert!(matches!(err, TransactionBuilderError::InvalidInstructionOrder(_)));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_sanity_check_rejects_budget_only() {
        let only_budget = vec![ComputeBudgetInstruction::set_compute_unit_price(1)];
        assert!(sanity_check_budget_order(&only_budget, true, false).is_err());
    }
}
