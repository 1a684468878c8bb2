//! Token balance queries and mint/burn submissions over JSON-RPC.

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod observability;

pub use blockchain::{Account, Broker, BrokerError, RpcBroker};
pub use config::schema::TokenToolsConfig;
