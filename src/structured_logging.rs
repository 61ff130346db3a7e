//! Structured logging for assembly and confirmation runs

use std::time::Instant;

use uuid::Uuid;

/// Per-request structured logger
///
/// Every event of one assembly call carries the same `context_id`.
#[derive(Debug, Clone)]
pub struct AssemblyLogger {
    context_id: String,
    started: Instant,
}

impl AssemblyLogger {
    pub fn new() -> Self {
        Self::with_context_id(Uuid::new_v4().to_string())
    }

    pub fn with_context_id(context_id: String) -> Self {
        Self {
            context_id,
            started: Instant::now(),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn log_request(&self, payer: &str, instruction_count: usize, signer_count: usize) {
        tracing::debug!(
            context_id = %self.context_id,
            payer = %payer,
            instruction_count = %instruction_count,
            signer_count = %signer_count,
            "Assembly started"
        );
    }

    pub fn log_memo(&self, len: usize) {
        tracing::debug!(
            context_id = %self.context_id,
            memo_len = %len,
            "Memo appended"
        );
    }

    pub fn log_compute_limit(&self, cu_limit: u32) {
        tracing::debug!(
            context_id = %self.context_id,
            cu_limit = %cu_limit,
            "Compute unit limit prepended"
        );
    }

    pub fn log_priority_fee(&self, priority_fee: u64, level: &str) {
        tracing::debug!(
            context_id = %self.context_id,
            priority_fee = %priority_fee,
            level = %level,
            "Compute unit price prepended"
        );
    }

    pub fn log_compiled(&self, instruction_count: usize, signed: usize) {
        tracing::info!(
            context_id = %self.context_id,
            instruction_count = %instruction_count,
            signed = %signed,
            latency_ms = %self.elapsed_ms(),
            "Transaction assembled"
        );
    }

    pub fn log_failure(&self, stage: &str, error: &str) {
        tracing::warn!(
            context_id = %self.context_id,
            stage = %stage,
            error = %error,
            latency_ms = %self.elapsed_ms(),
            "Assembly failed"
        );
    }

    pub fn log_poll(&self, signature: &str, attempt: u32, status: &str) {
        tracing::debug!(
            context_id = %self.context_id,
            signature = %signature,
            attempt = %attempt,
            status = %status,
            "Signature status polled"
        );
    }
}

impl Default for AssemblyLogger {
    fn default() -> Self {
        Self::new()
    }
}
