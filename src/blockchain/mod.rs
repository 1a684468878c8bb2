//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → account.rs (key loading, address derivation)
//!     → units.rs (decimal amount → base units)
//!     → authorizer.rs (nonce + gas price snapshot, fixed gas limit, zero value)
//!     → contract.rs (token calldata, sign, broadcast)
//!     → broker.rs (balanceOf / mint / burn facade)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Submissions are serialized so no two share a nonce

pub mod account;
pub mod authorizer;
pub mod broker;
pub mod client;
pub mod contract;
pub mod types;
pub mod units;

pub use account::Account;
pub use authorizer::{NetworkState, TransactionAuthorization, TransactionAuthorizer};
pub use broker::{Broker, RpcBroker};
pub use client::RpcClient;
pub use contract::{BoundToken, TokenCall, TokenContract};
pub use types::{BrokerError, BrokerResult, ChainId, TokenOperation, TxHandle};
pub use units::{format_base_units, to_base_units, BaseUnitAmount, ConversionError, TokenAmount};
