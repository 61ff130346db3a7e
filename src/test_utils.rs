//! Test Utilities Module
//!
//! In-memory doubles for the network and the fee oracle. Every call is
//! recorded so tests can assert on what the pipeline sent and how often.
//!
//! Only compiled for tests or with the `test_utils` feature enabled.

#![cfg(any(test, feature = "test_utils"))]

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::rpc::{RpcError, SignatureState, SimulationOutcome, SwapRpc};
use crate::tx_builder::{FeeOracle, PriorityLevel, TransactionBuilderError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deterministic [`SwapRpc`] double
///
/// Simulation returns a fixed outcome (200 000 units by default). Signature
/// status responses are served in order and the last one repeats.
pub struct MockRpc {
    blockhash: Hash,
    blockhash_calls: Mutex<usize>,
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    simulation: SimulationOutcome,
    simulated: Mutex<Vec<VersionedTransaction>>,
    send_signature: Signature,
    send_error: Option<RpcError>,
    sent: Mutex<Vec<VersionedTransaction>>,
    statuses: Mutex<VecDeque<Option<SignatureState>>>,
    status_error: Option<RpcError>,
    status_calls: Mutex<usize>,
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            blockhash_calls: Mutex::new(0),
            accounts: Mutex::new(HashMap::new()),
            simulation: SimulationOutcome {
                units_consumed: Some(200_000),
                err: None,
                logs: vec![],
            },
            simulated: Mutex::new(Vec::new()),
            send_signature: Signature::from([7u8; 64]),
            send_error: None,
            sent: Mutex::new(Vec::new()),
            statuses: Mutex::new(VecDeque::new()),
            status_error: None,
            status_calls: Mutex::new(0),
        }
    }

    pub fn with_simulation(mut self, outcome: SimulationOutcome) -> Self {
        self.simulation = outcome;
        self
    }

    pub fn with_account(self, address: Pubkey, data: Vec<u8>) -> Self {
        self.set_account(address, data);
        self
    }

    pub fn with_send_error(mut self, error: RpcError) -> Self {
        self.send_error = Some(error);
        self
    }

    pub fn with_statuses(self, statuses: Vec<Option<SignatureState>>) -> Self {
        *lock(&self.statuses) = statuses.into();
        self
    }

    pub fn with_status_error(mut self, error: RpcError) -> Self {
        self.status_error = Some(error);
        self
    }

    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        lock(&self.accounts).insert(address, data);
    }

    /// The blockhash every call to `get_latest_blockhash` returns
    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn blockhash_calls(&self) -> usize {
        *lock(&self.blockhash_calls)
    }

    pub fn simulated_transactions(&self) -> Vec<VersionedTransaction> {
        lock(&self.simulated).clone()
    }

    pub fn simulate_calls(&self) -> usize {
        lock(&self.simulated).len()
    }

    /// The signature every successful send returns
    pub fn send_signature(&self) -> Signature {
        self.send_signature
    }

    pub fn sent_transactions(&self) -> Vec<VersionedTransaction> {
        lock(&self.sent).clone()
    }

    pub fn status_calls(&self) -> usize {
        *lock(&self.status_calls)
    }
}

impl Default for MockRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SwapRpc for MockRpc {
    fn endpoint(&self) -> &str {
        "mock"
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        *lock(&self.blockhash_calls) += 1;
        Ok(self.blockhash)
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, RpcError> {
        Ok(lock(&self.accounts).get(address).cloned())
    }

    async fn simulate_transaction(
        &self,
        tx: &VersionedTransaction,
    ) -> Result<SimulationOutcome, RpcError> {
        lock(&self.simulated).push(tx.clone());
        Ok(self.simulation.clone())
    }

    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature, RpcError> {
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        lock(&self.sent).push(tx.clone());
        Ok(self.send_signature)
    }

    async fn get_signature_state(
        &self,
        _signature: &Signature,
    ) -> Result<Option<SignatureState>, RpcError> {
        *lock(&self.status_calls) += 1;
        if let Some(err) = &self.status_error {
            return Err(err.clone());
        }
        let mut statuses = lock(&self.statuses);
        if statuses.len() > 1 {
            Ok(statuses.pop_front().flatten())
        } else {
            Ok(statuses.front().cloned().flatten())
        }
    }
}

/// Deterministic [`FeeOracle`] double
pub struct MockFeeOracle {
    response: Result<u64, String>,
    calls: Mutex<usize>,
    last_level: Mutex<Option<PriorityLevel>>,
    last_transaction: Mutex<Option<String>>,
}

impl MockFeeOracle {
    /// Oracle that always answers `estimate`
    pub fn returning(estimate: u64) -> Self {
        Self::with_response(Ok(estimate))
    }

    /// Oracle that always fails with `message`
    pub fn failing(message: &str) -> Self {
        Self::with_response(Err(message.to_string()))
    }

    fn with_response(response: Result<u64, String>) -> Self {
        Self {
            response,
            calls: Mutex::new(0),
            last_level: Mutex::new(None),
            last_transaction: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }

    pub fn last_level(&self) -> Option<PriorityLevel> {
        *lock(&self.last_level)
    }

    /// Base-58 transaction of the most recent query
    pub fn last_transaction(&self) -> Option<String> {
        lock(&self.last_transaction).clone()
    }
}

#[async_trait]
impl FeeOracle for MockFeeOracle {
    async fn priority_fee_estimate(
        &self,
        transaction_b58: &str,
        level: PriorityLevel,
    ) -> Result<u64, TransactionBuilderError> {
        *lock(&self.calls) += 1;
        *lock(&self.last_level) = Some(level);
        *lock(&self.last_transaction) = Some(transaction_b58.to_string());
        self.response.clone().map_err(TransactionBuilderError::oracle)
    }
}
