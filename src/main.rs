//! token-tools
//!
//! Operator CLI for a mintable, burnable ERC-20 style token.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv / env ──▶ cli ──▶ config (file + overrides, validated)
//!                   │
//!                   ▼
//!                broker ──▶ authorizer (nonce, gas price, gas limit, value)
//!                   │
//!                   ▼
//!               contract ──▶ client ──▶ JSON-RPC node
//! ```

use clap::Parser;

use token_tools::cli::{self, Cli};
use token_tools::observability::{init_logging, LogFormat};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = init_logging(
        &config.observability.log_level,
        LogFormat::from_str_lossy(&config.observability.log_format),
    ) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    tracing::debug!(
        rpc_url = %config.network.rpc_url,
        token = %config.token.address,
        "Configuration loaded"
    );

    if let Err(e) = cli::run(cli, config).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
