//! `paylink`: offline helpers for passphrase vault deposits
//!
//! Builds and opens payment links and computes the values a wallet needs
//! before submitting a deposit or a commit-reveal claim.

use anyhow::Context;
use clap::{Parser, Subcommand};
use contracts::hashing::{claim_hash, derive_deposit_id, passphrase_commitment};
use tracing::{debug, info};
use types::ids::{Address, Asset, DepositId, Timestamp};
use types::numeric::{format_units, parse_units, NATIVE_DECIMALS};

#[derive(Parser)]
#[command(name = "paylink")]
#[command(version)]
#[command(about = "Payment links and claim helpers for the passphrase vault", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a deposit id and passphrase into a payment link token
    Encode {
        #[arg(long)]
        deposit_id: DepositId,
        #[arg(long)]
        passphrase: String,
    },
    /// Open a payment link token
    Decode {
        #[arg(long)]
        token: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the deposit id the vault will assign
    DeriveId {
        #[arg(long)]
        depositor: Address,
        /// `native` or a token address
        #[arg(long, default_value = "native")]
        asset: Asset,
        /// Human-readable amount, e.g. `10.5`
        #[arg(long)]
        amount: String,
        #[arg(long, default_value_t = NATIVE_DECIMALS)]
        decimals: u32,
        #[arg(long)]
        passphrase: String,
        /// Unix seconds
        #[arg(long)]
        unlock_time: Timestamp,
    },
    /// Compute the claim hash to commit for a destination
    ClaimHash {
        #[arg(long)]
        passphrase: String,
        #[arg(long)]
        destination: Address,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            deposit_id,
            passphrase,
        } => {
            info!(deposit_id = %deposit_id.short(), "Encoding payment link");
            println!("{}", paylink::encode(&deposit_id, &passphrase));
        }
        Commands::Decode { token, json } => {
            let link = paylink::decode(&token).context("failed to decode payment link")?;
            info!(deposit_id = %link.deposit_id.short(), "Decoded payment link");
            if json {
                println!("{}", serde_json::to_string_pretty(&link)?);
            } else {
                println!("deposit_id: {}", link.deposit_id);
                println!("passphrase: {}", link.passphrase);
            }
        }
        Commands::DeriveId {
            depositor,
            asset,
            amount,
            decimals,
            passphrase,
            unlock_time,
        } => {
            let amount = parse_units(&amount, decimals)
                .with_context(|| format!("invalid amount {amount:?}"))?;
            debug!(amount, decimals, display = %format_units(amount, decimals), "Parsed amount");
            let commitment = passphrase_commitment(&passphrase);
            let id = derive_deposit_id(&depositor, &asset, amount, &commitment, unlock_time);
            info!(%depositor, %asset, amount, unlock_time, "Derived deposit id");
            println!("{id}");
        }
        Commands::ClaimHash {
            passphrase,
            destination,
        } => {
            println!("{}", claim_hash(&passphrase, &destination));
        }
    }

    Ok(())
}
