//! End-to-end assembly of swap transactions
//!
//! Builds real swap instructions from the default program descriptors and
//! runs them through the assembler against in-memory network doubles.

use std::sync::Arc;

use mcswap::codec::Value;
use mcswap::config::Config;
use mcswap::rpc::SimulationOutcome;
use mcswap::swap::{build_swap_instruction, SwapOperation, SwapStandard};
use mcswap::test_utils::{MockFeeOracle, MockRpc};
use mcswap::tx_builder::{OutputMode, PriorityLevel, TxAssembler, TxBuildOutput};
use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount,
    compute_budget::ComputeBudgetInstruction,
    instruction::{AccountMeta, Instruction},
    message::VersionedMessage,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

fn pipeline(units: u64, fee: u64) -> (TxAssembler, Arc<MockRpc>, Arc<MockFeeOracle>) {
    let rpc = Arc::new(MockRpc::new().with_simulation(SimulationOutcome {
        units_consumed: Some(units),
        err: None,
        logs: vec!["Program log: Instruction: Execute".into()],
    }));
    let oracle = Arc::new(MockFeeOracle::returning(fee));
    (TxAssembler::new(rpc.clone(), oracle.clone()), rpc, oracle)
}

fn execute_ix(standard: SwapStandard, taker: &Pubkey, escrow: &Pubkey) -> Instruction {
    let descriptor = Config::default().descriptor(standard).unwrap();
    build_swap_instruction(
        &descriptor,
        SwapOperation::Execute,
        vec![
            AccountMeta::new(*taker, true),
            AccountMeta::new(*escrow, false),
            AccountMeta::new(descriptor.swap_vault_pda(), false),
            AccountMeta::new_readonly(descriptor.program_state_pda(), false),
            AccountMeta::new(descriptor.treasury, false),
        ],
        vec![Value::U64(0)],
    )
    .unwrap()
}

#[tokio::test]
async fn test_budget_instructions_prefix_swap_instructions() {
    let (assembler, _rpc, _oracle) = pipeline(200_000, 5_000);
    let payer = Pubkey::new_unique();
    let a = execute_ix(SwapStandard::Core, &payer, &Pubkey::new_unique());
    let b = execute_ix(SwapStandard::Nft, &payer, &Pubkey::new_unique());

    let plan = assembler
        .plan(assembler.request(payer, vec![a.clone(), b.clone()]))
        .await
        .unwrap();

    assert_eq!(
        plan.instructions,
        vec![
            ComputeBudgetInstruction::set_compute_unit_price(10_000),
            ComputeBudgetInstruction::set_compute_unit_limit(220_000),
            a,
            b,
        ]
    );
    assert_eq!(plan.cu_limit, Some(220_000));
    assert_eq!(plan.priority_fee, Some(10_000));
}

#[tokio::test]
async fn test_oracle_estimate_above_floor_is_kept() {
    let (assembler, _rpc, oracle) = pipeline(150_000, 250_000);
    let payer = Pubkey::new_unique();
    let request = assembler
        .request(payer, vec![execute_ix(SwapStandard::Spl, &payer, &Pubkey::new_unique())])
        .with_priority(PriorityLevel::VeryHigh);

    let plan = assembler.plan(request).await.unwrap();
    assert_eq!(plan.priority_fee, Some(250_000));
    assert_eq!(plan.cu_limit, Some(165_000));
    assert_eq!(oracle.last_level(), Some(PriorityLevel::VeryHigh));
}

#[tokio::test]
async fn test_degenerate_estimate_uses_fallback() {
    let (assembler, _rpc, _oracle) = pipeline(100_000, 1);
    let payer = Pubkey::new_unique();
    let plan = assembler
        .plan(assembler.request(payer, vec![execute_ix(SwapStandard::Pnft, &payer, &Pubkey::new_unique())]))
        .await
        .unwrap();
    assert_eq!(plan.priority_fee, Some(100_000));
}

#[tokio::test]
async fn test_lookup_table_compresses_accounts() {
    let (assembler, _rpc, _oracle) = pipeline(80_000, 20_000);
    let payer = Pubkey::new_unique();
    let escrow = Pubkey::new_unique();
    let descriptor = Config::default().descriptor(SwapStandard::Core).unwrap();
    let table = AddressLookupTableAccount {
        key: Pubkey::new_unique(),
        addresses: vec![descriptor.swap_vault_pda(), descriptor.program_state_pda()],
    };

    let request = assembler
        .request(payer, vec![execute_ix(SwapStandard::Core, &payer, &escrow)])
        .with_lookup_table(table.clone());
    let output = assembler.assemble(request).await.unwrap();

    let tx = output.as_transaction().unwrap();
    match &tx.message {
        VersionedMessage::V0(message) => {
            assert_eq!(message.address_table_lookups.len(), 1);
            assert_eq!(message.address_table_lookups[0].account_key, table.key);
            assert!(!message.account_keys.contains(&descriptor.swap_vault_pda()));
        }
        other => panic!("expected a v0 message, got {other:?}"),
    }
}

#[tokio::test]
async fn test_encoded_output_with_ephemeral_signer() {
    let (assembler, _rpc, _oracle) = pipeline(60_000, 10_000);
    let payer = Pubkey::new_unique();
    let temp_account = Keypair::new();
    let ix = Instruction::new_with_bytes(
        Config::default().descriptor(SwapStandard::Spl).unwrap().program_id,
        &[0],
        vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(temp_account.pubkey(), true),
        ],
    );

    let request = assembler
        .request(payer, vec![ix])
        .with_signers(vec![temp_account.insecure_clone()])
        .with_output(OutputMode::from_flags(true, true))
        .with_memo("mcswap");
    let output = assembler.assemble(request).await.unwrap();
    assert!(matches!(output, TxBuildOutput::Encoded(_)));

    let signers = output.required_signers().unwrap();
    assert_eq!(signers, vec![payer, temp_account.pubkey()]);

    let tx = output.into_transaction().unwrap();
    assert_eq!(tx.signatures[0], Signature::default());
    assert!(tx.signatures[1].verify(temp_account.pubkey().as_ref(), &tx.message.serialize()));
}

#[tokio::test]
async fn test_invalid_request_never_touches_network() {
    let (assembler, rpc, oracle) = pipeline(60_000, 10_000);
    let err = assembler
        .assemble(assembler.request(Pubkey::new_unique(), vec![]))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "validation");
    assert_eq!(rpc.blockhash_calls(), 0);
    assert_eq!(rpc.simulate_calls(), 0);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_simulation_failure_carries_logs() {
    let rpc = Arc::new(MockRpc::new().with_simulation(SimulationOutcome {
        units_consumed: Some(12_000),
        err: Some("InstructionError(2, Custom(6003))".into()),
        logs: vec!["Program log: Error: swap expired".into()],
    }));
    let oracle = Arc::new(MockFeeOracle::returning(10_000));
    let assembler = TxAssembler::new(rpc, oracle.clone());
    let payer = Pubkey::new_unique();

    let err = assembler
        .assemble(assembler.request(payer, vec![execute_ix(SwapStandard::Core, &payer, &Pubkey::new_unique())]))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "estimation");
    assert_eq!(err.logs(), ["Program log: Error: swap expired".to_string()]);
    assert_eq!(oracle.calls(), 0);
}
