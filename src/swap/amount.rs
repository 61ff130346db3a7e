//! Amount conversion between display units and base units

use crate::codec::{amount_from_f64, CodecError};

const BPS_DENOMINATOR: u128 = 10_000;

/// Convert a display amount (e.g. `1.5` SOL) into base units
///
/// The scaled value is rounded to the nearest unit to absorb float noise such
/// as `0.29 * 100 = 28.999999999999996`. Results at or above 2^53 are rejected.
pub fn to_base_units(ui_amount: f64, decimals: u8) -> Result<u64, CodecError> {
    if !ui_amount.is_finite() || ui_amount < 0.0 {
        return Err(CodecError::InvalidAmount(ui_amount.to_string()));
    }
    let scaled = ui_amount * 10f64.powi(i32::from(decimals));
    amount_from_f64(scaled.round())
}

/// Render base units with exactly `decimals` fractional digits
pub fn format_ui_amount(amount: u64, decimals: u8) -> String {
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return amount.to_string();
    }
    let digits = format!("{amount:0>width$}", width = decimals + 1);
    let (whole, frac) = digits.split_at(digits.len() - decimals);
    format!("{whole}.{frac}")
}

/// Amount that arrives after a token-extension transfer fee of `basis_points`
///
/// The withheld fee is `ceil(amount * bps / 10000)`, matching how the token
/// program charges it.
pub fn amount_less_transfer_fee(amount: u64, basis_points: u16) -> u64 {
    let bps = u128::from(basis_points).min(BPS_DENOMINATOR);
    let fee = (u128::from(amount) * bps).div_ceil(BPS_DENOMINATOR);
    // fee <= amount because bps <= 10000
    amount - fee as u64
}
