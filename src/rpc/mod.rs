//! Network client boundary
//!
//! Everything the assembly pipeline needs from a cluster goes through the
//! [`SwapRpc`] trait: account reads, the latest blockhash, simulation,
//! broadcast and signature status. [`RpcNetwork`] implements it over the
//! nonblocking `solana-client`; tests substitute an in-memory double.

mod client;
pub mod errors;

pub use client::RpcNetwork;
pub use errors::RpcError;

use async_trait::async_trait;
use solana_sdk::{
    address_lookup_table::{state::AddressLookupTable, AddressLookupTableAccount},
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};

/// Result of simulating an unsigned transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub units_consumed: Option<u64>,
    /// Execution error rendered as text, `None` on success
    pub err: Option<String>,
    pub logs: Vec<String>,
}

/// Settlement level reported for a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfirmationLevel {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureState {
    pub level: Option<ConfirmationLevel>,
    /// On-chain execution error, if the transaction failed
    pub err: Option<String>,
}

#[async_trait]
pub trait SwapRpc: Send + Sync {
    /// Endpoint identifier used in errors and logs
    fn endpoint(&self) -> &str;

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError>;

    /// Raw account data, `None` when the account does not exist
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, RpcError>;

    /// Simulate with signature verification off and blockhash replacement on
    async fn simulate_transaction(
        &self,
        tx: &VersionedTransaction,
    ) -> Result<SimulationOutcome, RpcError>;

    /// Broadcast once, preflight disabled, no client-side retries
    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature, RpcError>;

    /// Current status of `signature`, `None` when the cluster has no record yet
    async fn get_signature_state(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureState>, RpcError>;

    /// Fetch and deserialize an address lookup table
    async fn get_lookup_table(
        &self,
        address: &Pubkey,
    ) -> Result<AddressLookupTableAccount, RpcError> {
        let data = self
            .get_account_data(address)
            .await?
            .ok_or_else(|| RpcError::account_not_found(address, self.endpoint()))?;
        let table = AddressLookupTable::deserialize(&data).map_err(|e| RpcError::Deserialize {
            account: address.to_string(),
            message: e.to_string(),
        })?;
        Ok(AddressLookupTableAccount {
            key: *address,
            addresses: table.addresses.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockRpc;

    #[tokio::test]
    async fn test_lookup_table_missing_account() {
        let rpc = MockRpc::new();
        let address = Pubkey::new_unique();
        let err = rpc.get_lookup_table(&address).await.unwrap_err();
        assert!(matches!(err, RpcError::AccountNotFound { .. }));
    }

    #[tokio::test]
    async fn test_lookup_table_garbage_data() {
        let rpc = MockRpc::new();
        let address = Pubkey::new_unique();
        rpc.set_account(address, vec![9, 9, 9]);
        let err = rpc.get_lookup_table(&address).await.unwrap_err();
        assert!(matches!(err, RpcError::Deserialize { .. }));
    }

    #[test]
    fn test_confirmation_level_ordering() {
        assert!(ConfirmationLevel::Processed < ConfirmationLevel::Confirmed);
        assert!(ConfirmationLevel::Confirmed < ConfirmationLevel::Finalized);
    }
}
