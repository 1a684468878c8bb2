//! Command-line front-end.
//!
//! # Responsibilities
//! - Parse arguments and environment overrides
//! - Assemble the effective configuration
//! - Dispatch subcommands to the broker and print results
//!
//! Results go to stdout as text or pretty JSON; logs go to stderr.

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::units::{format_base_units, parse_decimal, to_base_units};
use crate::blockchain::{Account, BrokerError, RpcBroker, TxHandle};
use crate::config::loader::{read_config, validate};
use crate::config::{ConfigError, TokenToolsConfig};

#[derive(Debug, Parser)]
#[command(name = "token-tools")]
#[command(about = "Query balances and mint or burn tokens", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint URL
    #[arg(long, global = true, env = "TOKEN_TOOLS_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Token contract address
    #[arg(long, global = true, env = "TOKEN_TOOLS_TOKEN_ADDRESS")]
    pub token: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the token balance of an address
    Balance {
        #[arg(value_parser = parse_address)]
        address: Address,
    },
    /// Mint tokens to an address
    Mint {
        #[arg(value_parser = parse_address)]
        address: Address,
        /// Amount in whole tokens, e.g. 2.5
        #[arg(value_parser = parse_amount)]
        amount: BigDecimal,
    },
    /// Burn tokens held by an address
    Burn {
        #[arg(value_parser = parse_address)]
        address: Address,
        /// Amount in whole tokens, e.g. 2.5
        #[arg(value_parser = parse_amount)]
        amount: BigDecimal,
    },
    /// Show the operator address derived from the private key
    Address,
}

/// Errors surfaced to the user by `run`.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Broker(#[from] BrokerError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct BalanceReport {
    address: Address,
    balance: String,
    formatted: String,
    decimals: u8,
}

#[derive(Debug, Serialize)]
struct AddressReport {
    address: Address,
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.trim()
        .parse::<Address>()
        .map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn parse_amount(s: &str) -> Result<BigDecimal, String> {
    let amount = parse_decimal(s).map_err(|e| e.to_string())?;
    if amount < BigDecimal::from(0) {
        return Err(format!("amount must not be negative: {}", s));
    }
    // Whole tokens past uint256 cannot be minted or burned at any scale.
    to_base_units(&amount, 0)
        .and_then(|whole| whole.to_u256())
        .map_err(|e| format!("amount too large: {}", e))?;
    Ok(amount)
}

impl Cli {
    /// Effective configuration: file (or defaults), then flag and env overrides.
    ///
    /// Not validated; subcommands that touch the network validate it in [`run`].
    pub fn resolve_config(&self) -> Result<TokenToolsConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => TokenToolsConfig::default(),
        };

        if let Some(rpc_url) = &self.rpc_url {
            config.network.rpc_url = rpc_url.clone();
        }
        if let Some(token) = &self.token {
            config.token.address = token.clone();
        }

        Ok(config)
    }
}

/// Execute the parsed command against `config`.
pub async fn run(cli: Cli, config: TokenToolsConfig) -> Result<(), CliError> {
    let account = Account::from_env()?;

    if let Commands::Address = cli.command {
        let report = AddressReport {
            address: account.address(),
        };
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.address);
        }
        return Ok(());
    }

    let config = validate(config)?;
    let broker = RpcBroker::connect(&config, account).await?;
    let decimals = u32::from(broker.decimals());

    match cli.command {
        Commands::Balance { address } => {
            let balance = broker.balance_of(address).await?;
            let report = balance_report(address, balance, broker.decimals());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}: {} ({} base units)",
                    report.address, report.formatted, report.balance
                );
            }
        }
        Commands::Mint { address, amount } => {
            let amount = to_base_units(&amount, decimals).map_err(BrokerError::from)?;
            let handle = broker.mint(address, &amount).await?;
            print_handle(&handle, cli.json)?;
        }
        Commands::Burn { address, amount } => {
            let amount = to_base_units(&amount, decimals).map_err(BrokerError::from)?;
            let handle = broker.burn(address, &amount).await?;
            print_handle(&handle, cli.json)?;
        }
        Commands::Address => {}
    }

    Ok(())
}

fn balance_report(address: Address, balance: U256, decimals: u8) -> BalanceReport {
    BalanceReport {
        address,
        balance: balance.to_string(),
        formatted: format_base_units(balance, u32::from(decimals)),
        decimals,
    }
}

fn print_handle(handle: &TxHandle, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(handle)?);
    } else {
        println!(
            "{} submitted: {} (nonce {})",
            handle.operation, handle.hash, handle.nonce
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const HOLDER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    #[test]
    fn test_parse_mint() {
        let cli = Cli::try_parse_from(["token-tools", "mint", HOLDER, "2.5"]).unwrap();
        match cli.command {
            Commands::Mint { address, amount } => {
                assert_eq!(address, Address::from_str(HOLDER).unwrap());
                assert_eq!(amount, BigDecimal::from_str("2.5").unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "token-tools",
            "balance",
            HOLDER,
            "--json",
            "--rpc-url",
            "http://127.0.0.1:9545",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.rpc_url.as_deref(), Some("http://127.0.0.1:9545"));
    }

    #[test]
    fn test_rejects_bad_address() {
        assert!(Cli::try_parse_from(["token-tools", "balance", "0x1234"]).is_err());
        assert!(Cli::try_parse_from(["token-tools", "burn", "not-an-address", "1"]).is_err());
    }

    #[test]
    fn test_rejects_bad_amount() {
        assert!(Cli::try_parse_from(["token-tools", "mint", HOLDER, "abc"]).is_err());
        assert!(Cli::try_parse_from(["token-tools", "mint", HOLDER, "1.2.3"]).is_err());
        assert!(Cli::try_parse_from(["token-tools", "mint", HOLDER, "-1"]).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 0.1 ").unwrap(), BigDecimal::from_str("0.1").unwrap());
        assert_eq!(parse_amount("0").unwrap(), BigDecimal::from(0));
        assert!(parse_amount("-0.5").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_amount_bounds_exponent() {
        assert!(parse_amount("1e1000000000").is_err());
        assert!(parse_amount("1e78").is_err());
        assert!(parse_amount("1e77").is_ok());
        assert!(parse_amount("1e-20000000").is_ok());
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let cli = Cli {
            config: None,
            rpc_url: Some("https://rpc.example.org".to_string()),
            token: Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
            json: false,
            command: Commands::Address,
        };
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.network.rpc_url, "https://rpc.example.org");
        assert_eq!(config.token.address, "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert_eq!(config.transaction.gas_limit, 300_000);
    }

    #[test]
    fn test_balance_report() {
        let report = balance_report(
            Address::from_str(HOLDER).unwrap(),
            U256::from(1_500_000_000_000_000_000u128),
            18,
        );
        assert_eq!(report.balance, "1500000000000000000");
        assert_eq!(report.formatted, "1.5");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["formatted"], "1.5");
        assert_eq!(json["decimals"], 18);
    }
}
