//! Draft transaction request
//!
//! A strongly-typed request replaces loosely-typed option bags: every optional
//! stage has an explicit field with a documented default.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount, instruction::Instruction, pubkey::Pubkey,
    signature::Keypair,
};

use super::errors::TransactionBuilderError;

/// Qualitative priority tier sent to the fee oracle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
    /// Normalized to the oracle's highest tier
    Extreme,
}

impl PriorityLevel {
    /// Tier name understood by the oracle
    pub fn oracle_level(self) -> &'static str {
        match self {
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::VeryHigh | PriorityLevel::Extreme => "VeryHigh",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::VeryHigh => "VeryHigh",
            PriorityLevel::Extreme => "Extreme",
        };
        f.write_str(name)
    }
}

impl FromStr for PriorityLevel {
    type Err = TransactionBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "low" => Ok(PriorityLevel::Low),
            "medium" => Ok(PriorityLevel::Medium),
            "high" => Ok(PriorityLevel::High),
            "veryhigh" => Ok(PriorityLevel::VeryHigh),
            "extreme" => Ok(PriorityLevel::Extreme),
            other => Err(TransactionBuilderError::validation(format!(
                "unknown priority level '{other}'"
            ))),
        }
    }
}

/// Safety multiplier applied to simulated compute units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputeTolerance(f64);

impl ComputeTolerance {
    pub const DEFAULT: f64 = 1.1;

    pub fn new(factor: f64) -> Result<Self, TransactionBuilderError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TransactionBuilderError::validation(format!(
                "compute tolerance must be a positive number, got {factor}"
            )));
        }
        Ok(Self(factor))
    }

    pub fn factor(self) -> f64 {
        self.0
    }

    /// Tolerance in basis points, so 1.1 is exactly 11_000
    pub fn basis_points(self) -> u64 {
        (self.0 * 10_000.0).round() as u64
    }

    /// `ceil(units * tolerance)` in integer arithmetic, saturating at `u64::MAX`
    pub fn apply(self, units: u64) -> u64 {
        let scaled = (units as u128 * self.basis_points() as u128).div_ceil(10_000);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

impl Default for ComputeTolerance {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Representation returned by the assembler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// The compiled (possibly partially signed) transaction object
    #[default]
    Transaction,
    /// Wire bytes
    Serialized,
    /// Base64 of the wire bytes
    Encoded,
}

impl OutputMode {
    /// Map the serialize/encode flag pair; `encode` wins when both are set
    pub fn from_flags(serialize: bool, encode: bool) -> Self {
        match (serialize, encode) {
            (_, true) => OutputMode::Encoded,
            (true, false) => OutputMode::Serialized,
            (false, false) => OutputMode::Transaction,
        }
    }
}

/// Everything one assembly call needs
///
/// Built per call and consumed by the assembler.
#[derive(Debug)]
pub struct TxRequest {
    pub payer: Pubkey,
    pub instructions: Vec<Instruction>,
    /// Ephemeral keypairs that sign after compilation
    pub signers: Vec<Keypair>,
    pub lookup_table: Option<AddressLookupTableAccount>,
    pub priority: PriorityLevel,
    pub tolerance: ComputeTolerance,
    /// Run the compute stage
    pub compute: bool,
    /// Run the fee stage
    pub fees: bool,
    pub output: OutputMode,
    pub memo: Option<String>,
}

impl TxRequest {
    pub fn new(payer: Pubkey, instructions: Vec<Instruction>) -> Self {
        Self {
            payer,
            instructions,
            signers: Vec::new(),
            lookup_table: None,
            priority: PriorityLevel::default(),
            tolerance: ComputeTolerance::default(),
            compute: true,
            fees: true,
            output: OutputMode::default(),
            memo: None,
        }
    }

    pub fn with_signers(mut self, signers: Vec<Keypair>) -> Self {
        self.signers = signers;
        self
    }

    pub fn with_lookup_table(mut self, table: AddressLookupTableAccount) -> Self {
        self.lookup_table = Some(table);
        self
    }

    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tolerance(mut self, tolerance: ComputeTolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_compute(mut self, enabled: bool) -> Self {
        self.compute = enabled;
        self
    }

    pub fn with_fees(mut self, enabled: bool) -> Self {
        self.fees = enabled;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Attach a memo; empty text means no memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        let memo = memo.into();
        self.memo = (!memo.is_empty()).then_some(memo);
        self
    }

    pub fn validate(&self) -> Result<(), TransactionBuilderError> {
        if self.payer == Pubkey::default() {
            return Err(TransactionBuilderError::validation("fee payer is required"));
        }
        if self.instructions.is_empty() {
            return Err(TransactionBuilderError::validation(
                "at least one instruction is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ix() -> Instruction {
        Instruction::new_with_bytes(Pubkey::new_unique(), &[1], vec![])
    }

    #[test]
    fn test_priority_oracle_levels() {
        assert_eq!(PriorityLevel::default(), PriorityLevel::Low);
        assert_eq!(PriorityLevel::Extreme.oracle_level(), "VeryHigh");
        assert_eq!(PriorityLevel::VeryHigh.oracle_level(), "VeryHigh");
        assert_eq!(PriorityLevel::Medium.oracle_level(), "Medium");
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("very_high".parse::<PriorityLevel>().unwrap(), PriorityLevel::VeryHigh);
        assert_eq!("Extreme".parse::<PriorityLevel>().unwrap(), PriorityLevel::Extreme);
        assert!("urgent".parse::<PriorityLevel>().is_err());
    }

    #[test]
    fn test_tolerance_is_exact() {
        let tol = ComputeTolerance::default();
        assert_eq!(tol.basis_points(), 11_000);
        assert_eq!(tol.apply(200_000), 220_000);
        assert_eq!(tol.apply(1), 2);
        assert_eq!(tol.apply(0), 0);
        assert_eq!(ComputeTolerance::new(1.0).unwrap().apply(12_345), 12_345);
    }

    #[test]
    fn test_tolerance_saturates() {
        let tol = ComputeTolerance::new(1e6).unwrap();
        assert_eq!(tol.apply(u64::MAX), u64::MAX);
        assert_eq!(tol.apply(1 << 60), u64::MAX);
    }

    #[test]
    fn test_tolerance_rejects_invalid() {
        assert!(ComputeTolerance::new(0.0).is_err());
        assert!(ComputeTolerance::new(-1.2).is_err());
        assert!(ComputeTolerance::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_output_flags() {
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Transaction);
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::Serialized);
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Encoded);
        assert_eq!(OutputMode::from_flags(false, true), OutputMode::Encoded);
    }

    #[test]
    fn test_request_defaults() {
        let req = TxRequest::new(Pubkey::new_unique(), vec![ix()]);
        assert_eq!(req.priority, PriorityLevel::Low);
        assert_eq!(req.tolerance, ComputeTolerance::default());
        assert!(req.compute && req.fees);
        assert!(req.signers.is_empty() && req.lookup_table.is_none() && req.memo.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_validation() {
        let no_payer = TxRequest::new(Pubkey::default(), vec![ix()]);
        assert!(matches!(no_payer.validate(), Err(TransactionBuilderError::Validation(_))));

        let no_ixs = TxRequest::new(Pubkey::new_unique(), vec![]);
        assert!(matches!(no_ixs.validate(), Err(TransactionBuilderError::Validation(_))));
    }

    #[test]
    fn test_empty_memo_is_none() {
        let req = TxRequest::new(Pubkey::new_unique(), vec![ix()]).with_memo("");
        assert!(req.memo.is_none());
        let req = req.with_memo("hello");
        assert_eq!(req.memo.as_deref(), Some("hello"));
    }
}
