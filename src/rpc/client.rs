use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcSendTransactionConfig, RpcSimulateTransactionConfig},
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::VersionedTransaction,
};
use solana_transaction_status::TransactionConfirmationStatus;
use tracing::debug;

use super::{ConfirmationLevel, RpcError, SignatureState, SimulationOutcome, SwapRpc};

/// [`SwapRpc`] over a single JSON-RPC endpoint at `confirmed` commitment
#[derive(Clone)]
pub struct RpcNetwork {
    client: Arc<RpcClient>,
    endpoint: String,
    commitment: CommitmentConfig,
}

impl RpcNetwork {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        if url.trim().is_empty() {
            return Err(RpcError::Configuration("RPC endpoint URL is empty".into()));
        }
        let commitment = CommitmentConfig::confirmed();
        Ok(Self {
            client: Arc::new(RpcClient::new_with_timeout_and_commitment(
                url.to_string(),
                timeout,
                commitment,
            )),
            endpoint: url.to_string(),
            commitment,
        })
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    fn map_err(&self, err: solana_client::client_error::ClientError) -> RpcError {
        RpcError::from_client_error(err, &self.endpoint)
    }
}

#[async_trait]
impl SwapRpc for RpcNetwork {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, RpcError> {
        let (hash, _last_valid_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(hash)
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, RpcError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(response.value.map(|account| account.data))
    }

    async fn simulate_transaction(
        &self,
        tx: &VersionedTransaction,
    ) -> Result<SimulationOutcome, RpcError> {
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            commitment: Some(self.commitment),
            ..Default::default()
        };
        let result = self
            .client
            .simulate_transaction_with_config(tx, config)
            .await
            .map_err(|e| self.map_err(e))?
            .value;
        debug!(
            units_consumed = ?result.units_consumed,
            failed = result.err.is_some(),
            "Simulation finished"
        );
        Ok(SimulationOutcome {
            units_consumed: result.units_consumed,
            err: result.err.map(|e| format!("{e:?}")),
            logs: result.logs.unwrap_or_default(),
        })
    }

    async fn send_transaction(&self, tx: &VersionedTransaction) -> Result<Signature, RpcError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            max_retries: Some(0),
            ..Default::default()
        };
        self.client
            .send_transaction_with_config(tx, config)
            .await
            .map_err(|e| self.map_err(e))
    }

    async fn get_signature_state(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureState>, RpcError> {
        let response = self
            .client
            .get_signature_statuses_with_history(&[*signature])
            .await
            .map_err(|e| self.map_err(e))?;
        Ok(response.value.into_iter().next().flatten().map(|status| {
            SignatureState {
                level: status.confirmation_status.map(|s| match s {
                    TransactionConfirmationStatus::Processed => ConfirmationLevel::Processed,
                    TransactionConfirmationStatus::Confirmed => ConfirmationLevel::Confirmed,
                    TransactionConfirmationStatus::Finalized => ConfirmationLevel::Finalized,
                }),
                err: status.err.map(|e| e.to_string()),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        let err = RpcNetwork::new("  ", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, RpcError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_recorded() {
        let rpc = RpcNetwork::new("http://127.0.0.1:8899", Duration::from_secs(5)).unwrap();
        assert_eq!(rpc.endpoint(), "http://127.0.0.1:8899");
    }
}
