use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "safe-queue")]
#[command(about = "Inspect a Safe's transaction queue and find what can execute", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display Safe information (nonce, threshold, owners, version)
    Info(InfoArgs),

    /// Evaluate the pending queue: confirmations, quorum and readiness
    Queue(QueueArgs),

    /// Compute the EIP-712 digest owners sign for a transaction
    Hash(HashArgs),
}

#[derive(Parser, Clone)]
pub struct InfoArgs {
    /// Safe contract address
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: String,

    /// RPC endpoint URL
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: String,
}

#[derive(Parser, Clone)]
pub struct QueueArgs {
    /// Safe contract address
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: String,

    /// RPC endpoint URL (without it every state is `unknown`)
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Transaction service base URL, e.g. https://safe-transaction-mainnet.safe.global/api
    #[arg(long, env = "SAFE_TX_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Read pending transactions from a saved service response instead
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Chain ID, required when no RPC endpoint is given
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// First nonce to fetch from the service (defaults to the on-chain nonce)
    #[arg(long)]
    pub from_nonce: Option<u64>,

    /// Also print execTransaction payloads for ready transactions
    #[arg(long)]
    pub payloads: bool,
}

#[derive(Parser, Clone)]
pub struct HashArgs {
    /// JSON file holding one transaction
    #[arg(value_name = "PATH")]
    pub file: PathBuf,

    /// Safe contract version to hash for
    #[arg(long = "contract-version", default_value = "1.4.1")]
    pub contract_version: String,

    /// Override the chain ID recorded in the file
    #[arg(long)]
    pub chain_id: Option<u64>,
}
