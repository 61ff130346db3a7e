//! Per-standard program descriptors and the generic instruction builder

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::{SwapOperation, SwapStandard};
use crate::codec::{encode, layouts, parse_key, CodecError, Schema, Value};
use crate::config::ProgramConfig;

const PROGRAM_STATE_SEED: &[u8] = b"program-state";
const SWAP_VAULT_SEED: &[u8] = b"swap-vault";
const SWAP_STATE_SEED: &[u8] = b"swap-state";

/// Addresses and layouts of one swap program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardDescriptor {
    pub standard: SwapStandard,
    pub program_id: Pubkey,
    pub treasury: Pubkey,
    pub lookup_table: Option<Pubkey>,
}

impl StandardDescriptor {
    pub fn from_config(standard: SwapStandard, config: &ProgramConfig) -> Result<Self, CodecError> {
        Ok(Self {
            standard,
            program_id: parse_key(&config.program_id)?,
            treasury: parse_key(&config.treasury)?,
            lookup_table: config.lookup_table.as_deref().map(parse_key).transpose()?,
        })
    }

    pub fn program_state_schema(&self) -> &'static Schema {
        match self.standard {
            SwapStandard::Spl => &layouts::SPL_PROGRAM_STATE,
            _ => &layouts::FEE_PROGRAM_STATE,
        }
    }

    /// Field of the program state holding the per-swap fee in lamports
    pub fn fee_field(&self) -> &'static str {
        match self.standard {
            SwapStandard::Spl => "dev_lamports",
            _ => "fee_lamports",
        }
    }

    /// Swap-state field naming the counterparty; cNFT escrows store it as the leaf owner
    pub fn taker_field(&self) -> &'static str {
        match self.standard {
            SwapStandard::Cnft => "swap_leaf_owner",
            _ => "taker",
        }
    }

    pub fn swap_state_schema(&self) -> &'static Schema {
        match self.standard {
            SwapStandard::Spl => &layouts::SPL_SWAP_STATE,
            SwapStandard::Core => &layouts::CORE_SWAP_STATE,
            SwapStandard::Nft => &layouts::NFT_SWAP_STATE,
            SwapStandard::Pnft => &layouts::PNFT_SWAP_STATE,
            SwapStandard::Cnft => &layouts::CNFT_SWAP_STATE,
        }
    }

    pub fn payload_schema(&self, op: SwapOperation) -> &'static Schema {
        use SwapOperation::*;
        use SwapStandard::*;
        match (self.standard, op) {
            (Spl, Create) => &layouts::SPL_CREATE,
            (Core | Nft | Pnft, Create) => &layouts::ASSET_CREATE,
            (Cnft, Create) => &layouts::CNFT_CREATE,
            (Cnft, Execute) => &layouts::CNFT_EXECUTE,
            (_, Execute) => &layouts::EXECUTE,
            (Nft, Cancel) => &layouts::NFT_CANCEL,
            (Cnft, Cancel) => &layouts::CNFT_CANCEL,
            (Spl | Core | Pnft, Cancel) => &layouts::KEYED_CANCEL,
        }
    }

    pub fn program_state_pda(&self) -> Pubkey {
        Pubkey::find_program_address(&[PROGRAM_STATE_SEED], &self.program_id).0
    }

    pub fn swap_vault_pda(&self) -> Pubkey {
        Pubkey::find_program_address(&[SWAP_VAULT_SEED], &self.program_id).0
    }

    /// Escrow address for the given asset keys
    ///
    /// The SPL program seeds with the temporary token account, the others with
    /// the offered asset followed by the requested one.
    pub fn swap_state_pda(&self, keys: &[Pubkey]) -> Pubkey {
        let mut seeds: Vec<&[u8]> = Vec::with_capacity(keys.len() + 1);
        seeds.push(SWAP_STATE_SEED);
        seeds.extend(keys.iter().map(|k| k.as_ref()));
        Pubkey::find_program_address(&seeds, &self.program_id).0
    }
}

/// Build one swap instruction for `descriptor`
///
/// `args` are the payload fields after the tag, which is prepended from `op`.
/// `accounts` are used exactly in the given order.
pub fn build_swap_instruction(
    descriptor: &StandardDescriptor,
    op: SwapOperation,
    accounts: Vec<AccountMeta>,
    args: Vec<Value>,
) -> Result<Instruction, CodecError> {
    let mut values = Vec::with_capacity(args.len() + 1);
    values.push(Value::U8(op.tag()));
    values.extend(args);

    let data = encode(descriptor.payload_schema(op), &values)?;
    Ok(Instruction {
        program_id: descriptor.program_id,
        accounts,
        data,
    })
}
