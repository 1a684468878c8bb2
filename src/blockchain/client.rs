//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint and verify the chain ID
//! - Query network state (pending nonce, gas price)
//! - Perform read-only calls and relay signed transactions
//! - Bound every request with a timeout
//!
//! No retries: a failed request is reported to the caller as-is.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::authorizer::NetworkState;
use crate::blockchain::types::{BrokerError, BrokerResult, ChainId};
use crate::config::schema::NetworkConfig;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    /// Chain ID reported by the node at connect time.
    chain_id: u64,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Connect to the configured endpoint.
    ///
    /// Fails if the URL is invalid, the node cannot report its chain ID, or
    /// the chain ID differs from the configured one.
    pub async fn connect(config: &NetworkConfig) -> BrokerResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BrokerError::Transport(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url);

        let mut client = Self {
            provider: Arc::new(provider),
            rpc_url: config.rpc_url.clone(),
            chain_id: 0,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        };

        let actual = client.get_chain_id().await?;
        if let Some(expected) = config.chain_id {
            if actual.0 != expected {
                return Err(BrokerError::ChainMismatch {
                    expected,
                    actual: actual.0,
                });
            }
        }
        client.chain_id = actual.0;

        tracing::info!(
            rpc_url = %client.rpc_url,
            chain_id = client.chain_id,
            "Blockchain client initialized"
        );
        Ok(client)
    }

    /// Run one request under the configured timeout.
    async fn request<T, E, F>(&self, method: &'static str, fut: F) -> BrokerResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(BrokerError::Transport(format!("{}: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(BrokerError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BrokerResult<ChainId> {
        self.request("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the transaction count for an address, counting pending transactions.
    pub async fn get_pending_transaction_count(&self, address: Address) -> BrokerResult<u64> {
        self.request(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BrokerResult<u128> {
        self.request("eth_gasPrice", self.provider.get_gas_price())
            .await
    }

    /// Execute a read-only call against the latest state.
    pub async fn call(&self, to: Address, input: Bytes) -> BrokerResult<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(input);
        self.request("eth_call", self.provider.call(request)).await
    }

    /// Relay a signed, EIP-2718 encoded transaction.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> BrokerResult<TxHash> {
        let pending = self
            .request("eth_sendRawTransaction", self.provider.send_raw_transaction(raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Chain ID verified at connect time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl NetworkState for RpcClient {
    async fn pending_nonce(&self, address: Address) -> BrokerResult<u64> {
        self.get_pending_transaction_count(address)
            .await
            .map_err(|e| BrokerError::NetworkQuery(format!("pending nonce for {}: {}", address, e)))
    }

    async fn suggested_gas_price(&self) -> BrokerResult<u128> {
        self.get_gas_price()
            .await
            .map_err(|e| BrokerError::NetworkQuery(format!("gas price: {}", e)))
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
