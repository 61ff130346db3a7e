//! mcswap operator tool
//!
//! Thin command line front end over the library: broadcast a signed
//! transaction, poll a signature, read a program fee or decode an escrow.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcswap::config::Config;
use mcswap::rpc::{RpcNetwork, SwapRpc};
use mcswap::swap::{fetch_escrow, format_ui_amount, program_fee, SwapStandard};
use mcswap::tx_builder::{await_status, submit, ConfirmationOutcome, ConfirmationPolicy};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Broadcast a base64 signed transaction and wait for finalization
    Send { transaction: String },
    /// Poll a signature until it finalizes or the poll budget runs out
    Status { signature: String },
    /// Read the per-swap program fee
    Fee {
        standard: SwapStandard,
        /// Print SOL instead of lamports
        #[arg(long)]
        display: bool,
    },
    /// Decode an escrow (swap-state) account
    Escrow { standard: SwapStandard, address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = load_config(&args.config)?;
    config.validate().context("Invalid configuration")?;
    info!(rpc = %config.rpc.url, "Configuration loaded");

    let rpc = RpcNetwork::new(&config.rpc.url, config.rpc.timeout())
        .context("Failed to create RPC client")?;
    let policy = ConfirmationPolicy::from(&config.confirmation);

    match args.command {
        Command::Send { transaction } => {
            let bytes = STANDARD
                .decode(transaction.trim())
                .context("Transaction is not valid base64")?;
            let signature = submit(&rpc, &bytes).await?;
            println!("{signature}");
            report(await_status(&rpc, &signature, policy).await?);
        }
        Command::Status { signature } => {
            let signature: Signature = signature.parse().context("Invalid signature")?;
            report(await_status(&rpc, &signature, policy).await?);
        }
        Command::Fee { standard, display } => {
            let descriptor = config.descriptor(standard)?;
            let lamports = program_fee(&rpc, &descriptor)
                .await
                .with_context(|| format!("Failed to read {standard} program fee"))?;
            if display {
                println!("{}", format_ui_amount(lamports, 9));
            } else {
                println!("{lamports}");
            }
        }
        Command::Escrow { standard, address } => {
            let descriptor = config.descriptor(standard)?;
            let address: Pubkey = address.parse().context("Invalid escrow address")?;
            let escrow = fetch_escrow(&rpc, &descriptor, &address)
                .await
                .with_context(|| format!("Failed to fetch escrow from {}", rpc.endpoint()))?;
            for (name, value) in &escrow.record().fields {
                println!("{name}: {value:?}");
            }
        }
    }

    Ok(())
}

fn report(outcome: ConfirmationOutcome) {
    match &outcome {
        ConfirmationOutcome::ProgramError(err) => warn!(error = %err, "Transaction failed on chain"),
        ConfirmationOutcome::TimedOut { waited_secs } => {
            warn!(waited_secs, "Gave up waiting for finalization")
        }
        ConfirmationOutcome::Finalized => {}
    }
    println!("{outcome}");
}

/// Initialize structured logging
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "mcswap=debug,info"
    } else {
        "mcswap=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {path}"))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        dotenvy::dotenv().ok();
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
