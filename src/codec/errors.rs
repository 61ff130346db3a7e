//! Error types for the payload codec
//!
//! Codec failures are always local and always fatal: a value that does not fit
//! its declared field, or a buffer whose length does not match the schema, is
//! reported instead of being truncated or partially parsed.

use thiserror::Error;

/// Errors raised while encoding or decoding instruction payloads and account records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The number of values does not match the number of schema fields
    #[error("Field count mismatch for {schema}: expected {expected}, got {actual}")]
    FieldCount {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A value does not match the kind declared for its field
    #[error("Type mismatch for {schema}.{field}: expected {expected}")]
    TypeMismatch {
        schema: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// A value does not fit its field width (e.g. more than 255 proof accounts)
    #[error("Value for {schema}.{field} overflows its field: {reason}")]
    FieldOverflow {
        schema: &'static str,
        field: &'static str,
        reason: String,
    },

    /// Buffer length does not match what the schema requires
    ///
    /// Decoding never parses a prefix of a longer buffer nor pads a shorter one.
    #[error("Length mismatch for {schema}: expected {expected} bytes, got {actual}")]
    Length {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Text is not valid base-58
    #[error("Invalid base-58 key '{input}': {reason}")]
    InvalidKey { input: String, reason: String },

    /// Base-58 text decoded to something other than 32 bytes
    #[error("Key '{input}' decodes to {actual} bytes, expected 32")]
    KeyLength { input: String, actual: usize },

    /// A decoded record has no field with the requested name or kind
    #[error("Record {schema} has no {expected} field named '{field}'")]
    MissingField {
        schema: &'static str,
        field: String,
        expected: &'static str,
    },

    /// Amount is negative, non-finite or not a whole number of base units
    #[error("Invalid amount {0}")]
    InvalidAmount(String),

    /// Amount is at or above 2^53 and cannot be represented exactly as a float
    #[error("Amount {0} is outside the exactly representable range [0, 2^53)")]
    UnsafeAmount(String),
}

impl CodecError {
    pub fn category(&self) -> &'static str {
        match self {
            Self::FieldCount { .. } | Self::TypeMismatch { .. } | Self::FieldOverflow { .. } => {
                "encode"
            }
            Self::Length { .. } | Self::MissingField { .. } => "decode",
            Self::InvalidKey { .. } | Self::KeyLength { .. } => "key",
            Self::InvalidAmount(_) | Self::UnsafeAmount(_) => "amount",
        }
    }
}
