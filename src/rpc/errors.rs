use solana_client::client_error::ClientError;
use thiserror::Error;

/// Network client error types
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// Transport-level errors (network, connection)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// Timeout errors
    #[error("Timeout after {timeout_ms}ms (endpoint: {endpoint})")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// RPC response errors (from the RPC server)
    #[error("RPC response error: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        endpoint: String,
        message: String,
        code: Option<i64>,
    },

    #[error("Rate limit exceeded (endpoint: {endpoint})")]
    RateLimitExceeded { endpoint: String },

    #[error("Blockhash not found (endpoint: {endpoint})")]
    BlockhashNotFound { endpoint: String },

    /// The requested account does not exist on chain
    #[error("Account not found: {account} (endpoint: {endpoint})")]
    AccountNotFound { account: String, endpoint: String },

    /// Account exists but its data could not be interpreted
    #[error("Failed to deserialize account {account}: {message}")]
    Deserialize { account: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RpcError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Transport { .. } => true,
            RpcError::Timeout { .. } => true,
            RpcError::RateLimitExceeded { .. } => true,
            RpcError::BlockhashNotFound { .. } => true,

            RpcError::AccountNotFound { .. } => false,
            RpcError::Deserialize { .. } => false,
            RpcError::Configuration(_) => false,

            // Retry on server errors (5xx)
            RpcError::RpcResponse { code, .. } => matches!(code, Some(c) if (500..600).contains(c)),
        }
    }

    /// Get the endpoint associated with this error, if any
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            RpcError::Transport { endpoint, .. }
            | RpcError::Timeout { endpoint, .. }
            | RpcError::RpcResponse { endpoint, .. }
            | RpcError::RateLimitExceeded { endpoint }
            | RpcError::BlockhashNotFound { endpoint }
            | RpcError::AccountNotFound { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    pub fn account_not_found(account: impl ToString, endpoint: &str) -> Self {
        RpcError::AccountNotFound {
            account: account.to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    /// Create from ClientError with context
    pub fn from_client_error(err: ClientError, endpoint: &str) -> Self {
        Self::classify(&err.to_string(), endpoint)
    }

    /// Classify an error message from the client
    pub fn classify(message: &str, endpoint: &str) -> Self {
        let err_str = message.to_lowercase();
        let endpoint = endpoint.to_string();

        if err_str.contains("blockhash not found") {
            RpcError::BlockhashNotFound { endpoint }
        } else if err_str.contains("rate limit")
            || err_str.contains("too many requests")
            || err_str.contains("429")
        {
            RpcError::RateLimitExceeded { endpoint }
        } else if err_str.contains("timeout") || err_str.contains("timed out") {
            RpcError::Timeout {
                endpoint,
                timeout_ms: 0,
            }
        } else if err_str.contains("error sending request")
            || err_str.contains("connection refused")
            || err_str.contains("connection reset")
        {
            RpcError::Transport {
                endpoint,
                message: message.to_string(),
            }
        } else {
            // Extract error code if available
            let code = err_str
                .split("code:")
                .nth(1)
                .and_then(|s| s.split_whitespace().next())
                .and_then(|s| s.trim_end_matches(',').parse::<i64>().ok());

            RpcError::RpcResponse {
                endpoint,
                message: message.to_string(),
                code,
            }
        }
    }
}
