//! Transaction authorization: nonce, gas terms and signer for one call.
//!
//! # Responsibilities
//! - Query the pending nonce and suggested gas price fresh for every call
//! - Bundle them with the signer into a single-use authorization
//! - Sign the final transaction request
//!
//! # Nonce hazard
//! The authorizer keeps no state. Two authorizations built from the same
//! pending count carry the same nonce and one of them will be rejected on
//! submission. Callers sending concurrently from one account must serialize
//! authorize-and-submit; [`Broker`](crate::blockchain::broker::Broker) does.

use std::future::Future;

use alloy::consensus::TxEnvelope;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::account::Account;
use crate::blockchain::types::{BrokerError, BrokerResult};

/// Live network state needed to authorize a transaction.
pub trait NetworkState {
    /// Number of transactions from `address`, including pending ones.
    fn pending_nonce(&self, address: Address) -> impl Future<Output = BrokerResult<u64>> + Send;

    /// The node's suggested legacy gas price in wei.
    fn suggested_gas_price(&self) -> impl Future<Output = BrokerResult<u128>> + Send;
}

/// Single-use signing authorization for one state-changing call.
///
/// Not `Clone`: [`sign`](Self::sign) consumes it.
pub struct TransactionAuthorization {
    signer: PrivateKeySigner,
    from: Address,
    nonce: u64,
    value: U256,
    gas_limit: u64,
    gas_price: u128,
}

impl TransactionAuthorization {
    pub fn sender(&self) -> Address {
        self.from
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    /// Build the legacy transaction request this authorization permits.
    pub fn request(&self, to: Address, input: Bytes, chain_id: u64) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(to)
            .with_input(input)
            .with_value(self.value)
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_chain_id(chain_id)
    }

    /// Sign a call to `to` with `input` as calldata.
    pub async fn sign(self, to: Address, input: Bytes, chain_id: u64) -> BrokerResult<TxEnvelope> {
        let request = self.request(to, input, chain_id);
        let wallet = EthereumWallet::from(self.signer);
        request
            .build(&wallet)
            .await
            .map_err(|e| BrokerError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for TransactionAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionAuthorization")
            .field("from", &self.from)
            .field("nonce", &self.nonce)
            .field("value", &self.value)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .finish_non_exhaustive()
    }
}

/// Builds fresh authorizations from live network state.
#[derive(Debug, Clone, Copy)]
pub struct TransactionAuthorizer {
    gas_limit: u64,
}

impl TransactionAuthorizer {
    /// Create an authorizer using a fixed gas limit for every call.
    pub fn new(gas_limit: u64) -> Self {
        Self { gas_limit }
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Query nonce and gas price for `account` and bundle them.
    ///
    /// Either query failing aborts with [`BrokerError::NetworkQuery`]; no
    /// default values are substituted.
    pub async fn authorize<S: NetworkState>(
        &self,
        account: &Account,
        network: &S,
    ) -> BrokerResult<TransactionAuthorization> {
        let from = account.address();

        let nonce = network.pending_nonce(from).await?;
        let gas_price = network.suggested_gas_price().await?;

        tracing::debug!(
            from = %from,
            nonce = nonce,
            gas_price = gas_price,
            gas_limit = self.gas_limit,
            "Transaction authorized"
        );

        Ok(TransactionAuthorization {
            signer: account.signer(),
            from,
            nonce,
            value: U256::ZERO,
            gas_limit: self.gas_limit,
            gas_price,
        })
    }
}
