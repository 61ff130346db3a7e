//! Configuration module for the swap transaction toolkit
//!
//! Handles loading from TOML files and environment variables, and carries the
//! per-standard program addresses so none of them are hardcoded in business code.

use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::codec::parse_key;
use crate::swap::{StandardDescriptor, SwapStandard};
use crate::tx_builder::{ComputeTolerance, PriorityLevel};

pub const RPC_URL_ENV: &str = "MCSWAP_RPC_URL";
pub const ORACLE_URL_ENV: &str = "MCSWAP_ORACLE_URL";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Priority-fee oracle; defaults to the RPC endpoint
    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub assembly: AssemblyConfig,

    #[serde(default)]
    pub confirmation: ConfirmationConfig,

    #[serde(default)]
    pub programs: ProgramsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    #[serde(default)]
    pub priority: PriorityLevel,

    /// Multiplier applied to simulated compute units
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

/// Addresses of one swap program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    pub program_id: String,
    pub treasury: String,
    /// Static lookup table shipped with the program, if any
    #[serde(default)]
    pub lookup_table: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    #[serde(default = "default_spl_program")]
    pub spl: ProgramConfig,
    #[serde(default = "default_core_program")]
    pub core: ProgramConfig,
    #[serde(default = "default_nft_program")]
    pub nft: ProgramConfig,
    #[serde(default = "default_pnft_program")]
    pub pnft: ProgramConfig,
    #[serde(default = "default_cnft_program")]
    pub cnft: ProgramConfig,
}

// Default value functions
fn default_rpc_url() -> String { "https://api.mainnet-beta.solana.com".to_string() }
fn default_rpc_timeout() -> u64 { 30 }
fn default_oracle_timeout() -> u64 { 10 }
fn default_tolerance() -> f64 { ComputeTolerance::DEFAULT }
fn default_max_polls() -> u32 { 10 }
fn default_interval_secs() -> u64 { 4 }

fn program(program_id: &str, treasury: &str, lookup_table: Option<&str>) -> ProgramConfig {
    ProgramConfig {
        program_id: program_id.to_string(),
        treasury: treasury.to_string(),
        lookup_table: lookup_table.map(str::to_string),
    }
}

fn default_spl_program() -> ProgramConfig {
    program(
        "BG9YVprV4XeQR15puwwaWfBBPzamTtuMRJLkAa8pG5hz",
        "5zx6c1E5aaBE6BbXu1ureKoZfpGbPBk9srmKavr3Xz3k",
        Some("HtWT9EbpaxrNfbTgjsMuk9dXYmkvJwyr7q7bQjCCRQHU"),
    )
}

fn default_core_program() -> ProgramConfig {
    program(
        "DE6UDLhAu8U8CL6b1XPjj76merQeSKFYgPQs2R4jc7Ba",
        "Fmu3MXN9oNkcJsgf9Y2X19tHyYJ4SsPxyrgVoou1iKke",
        None,
    )
}

fn default_nft_program() -> ProgramConfig {
    program(
        "34dUBGrhkvjGDPSuH3zgtpBdBwZ6QSag8JpvZAnXmXTR",
        "7y1PdbvkkCuSYAE1zKeDrfv81Wfcuhi3ukHYPZsUoTiE",
        Some("BT4AUPXSxvbDrzSt3LLkE3Jd5s8R3fBSxJuyicyEMYH3"),
    )
}

fn default_pnft_program() -> ProgramConfig {
    program(
        "6aGKsKBA9zRbBZ2xKof94JEFf73vQg6kTWkB6gqtgfFm",
        "FpStfD3eZaHzdsbpyYnXPLYoCnDVbmQBDxim7kvmf5R",
        Some("F33TuQuCtiSpTjsCv4h51E2q48Wt5tyr469Lxb4Mgazu"),
    )
}

fn default_cnft_program() -> ProgramConfig {
    program(
        "GyQWcNNXnU2qhTry6f8CBv4M7vjV4Jab5nojvgAMQdjg",
        "H6WH84cmQGbXPwMi4fsv9bPbwWjWJuyy2iviEDZS9SmL",
        Some("6rztYc8onxK3FUku97XJrzvdZHqWavwx5xw8fB7QufCA"),
    )
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_secs: default_rpc_timeout(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_oracle_timeout(),
        }
    }
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            priority: PriorityLevel::default(),
            tolerance: default_tolerance(),
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_polls: default_max_polls(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            spl: default_spl_program(),
            core: default_core_program(),
            nft: default_nft_program(),
            pnft: default_pnft_program(),
            cnft: default_cnft_program(),
        }
    }
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ProgramsConfig {
    pub fn get(&self, standard: SwapStandard) -> &ProgramConfig {
        match standard {
            SwapStandard::Spl => &self.spl,
            SwapStandard::Core => &self.core,
            SwapStandard::Nft => &self.nft,
            SwapStandard::Pnft => &self.pnft,
            SwapStandard::Cnft => &self.cnft,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {path}"))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `MCSWAP_RPC_URL` / `MCSWAP_ORACLE_URL` if set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(RPC_URL_ENV).ok(),
            std::env::var(ORACLE_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, rpc_url: Option<String>, oracle_url: Option<String>) {
        if let Some(url) = rpc_url.filter(|u| !u.trim().is_empty()) {
            self.rpc.url = url;
        }
        if let Some(url) = oracle_url.filter(|u| !u.trim().is_empty()) {
            self.oracle.url = Some(url);
        }
    }

    /// Oracle endpoint, falling back to the RPC endpoint
    pub fn oracle_url(&self) -> &str {
        self.oracle.url.as_deref().unwrap_or(&self.rpc.url)
    }

    pub fn tolerance(&self) -> anyhow::Result<ComputeTolerance> {
        ComputeTolerance::new(self.assembly.tolerance).map_err(anyhow::Error::from)
    }

    /// Descriptor for `standard` built from the configured addresses
    pub fn descriptor(&self, standard: SwapStandard) -> anyhow::Result<StandardDescriptor> {
        StandardDescriptor::from_config(standard, self.programs.get(standard))
            .with_context(|| format!("Invalid program addresses for {standard}"))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rpc.url.trim().is_empty() {
            bail!("rpc.url must not be empty");
        }
        if let Some(url) = &self.oracle.url {
            if url.trim().is_empty() {
                bail!("oracle.url must not be empty when set");
            }
        }
        self.tolerance()?;
        if self.confirmation.max_polls == 0 {
            bail!("confirmation.max_polls must be at least 1");
        }
        if self.confirmation.interval_secs == 0 {
            bail!("confirmation.interval_secs must be at least 1");
        }
        for standard in SwapStandard::ALL {
            let program = self.programs.get(standard);
            parse_key(&program.program_id)
                .with_context(|| format!("programs.{standard}.program_id"))?;
            parse_key(&program.treasury).with_context(|| format!("programs.{standard}.treasury"))?;
            if let Some(table) = &program.lookup_table {
                parse_key(table).with_context(|| format!("programs.{standard}.lookup_table"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confirmation.max_polls, 10);
        assert_eq!(config.confirmation.interval_secs, 4);
        assert_eq!(config.assembly.priority, PriorityLevel::Low);
        assert_eq!(config.oracle_url(), config.rpc.url);
        assert!(config.programs.core.lookup_table.is_none());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[rpc]
url = "http://localhost:8899"

[assembly]
priority = "High"
tolerance = 1.25

[confirmation]
max_polls = 3
"#
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.rpc.url, "http://localhost:8899");
        assert_eq!(config.rpc.timeout_secs, 30);
        assert_eq!(config.assembly.priority, PriorityLevel::High);
        assert_eq!(config.tolerance().unwrap().basis_points(), 12_500);
        assert_eq!(config.confirmation.max_polls, 3);
        assert_eq!(config.confirmation.interval_secs, 4);
        assert_eq!(config.programs.spl, default_spl_program());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(Config::from_file("/nonexistent/mcswap.toml").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://override".into()), Some("http://oracle".into()));
        assert_eq!(config.rpc.url, "http://override");
        assert_eq!(config.oracle_url(), "http://oracle");

        config.apply_overrides(Some("  ".into()), None);
        assert_eq!(config.rpc.url, "http://override");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.assembly.tolerance = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.confirmation.max_polls = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.programs.nft.treasury = "not-a-key".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rpc.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_descriptor_from_config() {
        let config = Config::default();
        let spl = config.descriptor(SwapStandard::Spl).unwrap();
        assert_eq!(
            spl.program_id.to_string(),
            "BG9YVprV4XeQR15puwwaWfBBPzamTtuMRJLkAa8pG5hz"
        );
        assert!(spl.lookup_table.is_some());
        assert!(config.descriptor(SwapStandard::Core).unwrap().lookup_table.is_none());
    }
}
