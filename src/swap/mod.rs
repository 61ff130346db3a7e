//! Swap program surface
//!
//! One [`StandardDescriptor`] per asset standard carries the program address,
//! treasury, lookup table and byte layouts. Instruction building, program-fee
//! reads and escrow reads are written once against the descriptor.

pub mod amount;
pub mod descriptor;
pub mod escrow;

pub use amount::{amount_less_transfer_fee, format_ui_amount, to_base_units};
pub use descriptor::{build_swap_instruction, StandardDescriptor};
pub use escrow::{fetch_escrow, program_fee, EscrowRecord};

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::CodecError;
use crate::rpc::RpcError;

/// Asset standards with a deployed swap program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStandard {
    Spl,
    Core,
    Nft,
    Pnft,
    Cnft,
}

impl SwapStandard {
    pub const ALL: [SwapStandard; 5] = [
        SwapStandard::Spl,
        SwapStandard::Core,
        SwapStandard::Nft,
        SwapStandard::Pnft,
        SwapStandard::Cnft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SwapStandard::Spl => "spl",
            SwapStandard::Core => "core",
            SwapStandard::Nft => "nft",
            SwapStandard::Pnft => "pnft",
            SwapStandard::Cnft => "cnft",
        }
    }
}

impl fmt::Display for SwapStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapStandard {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|standard| standard.as_str() == wanted)
            .ok_or_else(|| SwapError::UnknownStandard(s.to_string()))
    }
}

/// Instruction tag, the first payload byte of every swap instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SwapOperation {
    Create = 0,
    Execute = 1,
    Cancel = 2,
}

impl SwapOperation {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

#[derive(Error, Debug, Clone)]
pub enum SwapError {
    #[error("Unknown asset standard '{0}' (expected one of spl, core, nft, pnft, cnft)")]
    UnknownStandard(String),

    #[error(transparent)]
    Network(#[from] RpcError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl SwapError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwapError::Network(e) if e.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_names_round_trip() {
        for standard in SwapStandard::ALL {
            assert_eq!(standard.to_string().parse::<SwapStandard>().unwrap(), standard);
        }
        assert_eq!(" PNFT ".parse::<SwapStandard>().unwrap(), SwapStandard::Pnft);
        assert!(matches!(
            "token22".parse::<SwapStandard>(),
            Err(SwapError::UnknownStandard(_))
        ));
    }

    #[test]
    fn test_standard_serde_is_lowercase() {
        let json = serde_json::to_string(&SwapStandard::Cnft).unwrap();
        assert_eq!(json, "\"cnft\"");
    }

    #[test]
    fn test_operation_tags() {
        assert_eq!(SwapOperation::Create.tag(), 0);
        assert_eq!(SwapOperation::Execute.tag(), 1);
        assert_eq!(SwapOperation::Cancel.tag(), 2);
    }
}
