//! Payload codec
//!
//! Typed field sequences encoded into fixed-offset byte buffers for instruction
//! data, and persisted account bytes decoded back into typed records.
//!
//! - **schema**: field kinds, `encode` / `decode` and named records
//! - **layouts**: the concrete account-state and instruction-payload layouts
//! - **errors**: `CodecError`

pub mod errors;
pub mod layouts;
pub mod schema;

pub use errors::CodecError;
pub use schema::{decode, decode_record, encode, Field, FieldKind, Record, Schema, Value};

use solana_sdk::pubkey::Pubkey;

/// Largest integer a 64-bit float represents exactly (2^53 - 1)
pub const MAX_SAFE_AMOUNT: u64 = (1u64 << 53) - 1;

/// Parse a base-58 key, requiring exactly 32 decoded bytes
pub fn parse_key(input: &str) -> Result<Pubkey, CodecError> {
    let bytes = bs58::decode(input)
        .into_vec()
        .map_err(|e| CodecError::InvalidKey {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
    let raw: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CodecError::KeyLength {
            input: input.to_string(),
            actual: bytes.len(),
        })?;
    Ok(Pubkey::new_from_array(raw))
}

/// Convert a floating-point amount of base units into a `u64`
///
/// Floats are exact only below 2^53, so larger inputs are rejected rather than
/// silently rounded. Negative, non-finite and fractional inputs are invalid.
pub fn amount_from_f64(amount: f64) -> Result<u64, CodecError> {
    if !amount.is_finite() || amount < 0.0 || amount.fract() != 0.0 {
        return Err(CodecError::InvalidAmount(amount.to_string()));
    }
    if amount > MAX_SAFE_AMOUNT as f64 {
        return Err(CodecError::UnsafeAmount(amount.to_string()));
    }
    Ok(amount as u64)
}
