//! On-chain reads: program fee and escrow records

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::{descriptor::StandardDescriptor, SwapError, SwapStandard};
use crate::codec::{decode_record, CodecError, Record};
use crate::rpc::{RpcError, SwapRpc};

/// Per-swap fee in lamports, read from the program-state account
pub async fn program_fee(
    rpc: &dyn SwapRpc,
    descriptor: &StandardDescriptor,
) -> Result<u64, SwapError> {
    let address = descriptor.program_state_pda();
    let data = rpc
        .get_account_data(&address)
        .await?
        .ok_or_else(|| RpcError::account_not_found(&address, rpc.endpoint()))?;

    let record = decode_record(descriptor.program_state_schema(), &data)?;
    let lamports = record.u64(descriptor.fee_field())?;
    debug!(standard = %descriptor.standard, lamports, "Program fee read");
    Ok(lamports)
}

/// Decoded swap-state account
///
/// Key fields holding the system program address mean "unset" and are
/// reported as `None` by [`EscrowRecord::key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowRecord {
    pub standard: SwapStandard,
    pub address: Pubkey,
    pub initializer: Pubkey,
    /// `None` for an open offer any taker may fill
    pub taker: Option<Pubkey>,
    /// Creation time, unix seconds
    pub utime: u64,
    pub physical: u8,
    record: Record,
}

impl EscrowRecord {
    pub fn from_record(
        descriptor: &StandardDescriptor,
        address: Pubkey,
        record: Record,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            standard: descriptor.standard,
            address,
            initializer: record.key("initializer")?,
            taker: unset_to_none(record.key(descriptor.taker_field())?),
            utime: record.u64("utime")?,
            physical: record.u8("physical")?,
            record,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.record.flag("is_initialized").unwrap_or(false)
    }

    /// Key field by name, `None` when the field holds the system address
    pub fn key(&self, field: &str) -> Result<Option<Pubkey>, CodecError> {
        self.record.key(field).map(unset_to_none)
    }

    /// Integer field by name (amounts, lamports, nonces)
    pub fn amount(&self, field: &str) -> Result<u64, CodecError> {
        self.record.u64(field)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

fn unset_to_none(key: Pubkey) -> Option<Pubkey> {
    (key != Pubkey::default()).then_some(key)
}

/// Read and decode the swap-state account at `address`
pub async fn fetch_escrow(
    rpc: &dyn SwapRpc,
    descriptor: &StandardDescriptor,
    address: &Pubkey,
) -> Result<EscrowRecord, SwapError> {
    let data = rpc
        .get_account_data(address)
        .await?
        .ok_or_else(|| RpcError::account_not_found(address, rpc.endpoint()))?;

    let record = decode_record(descriptor.swap_state_schema(), &data)?;
    let escrow = EscrowRecord::from_record(descriptor, *address, record)?;
    debug!(
        standard = %descriptor.standard,
        address = %address,
        initializer = %escrow.initializer,
        "Escrow fetched"
    );
    Ok(escrow)
}
