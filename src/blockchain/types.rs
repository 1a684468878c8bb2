//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::units::ConversionError;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// State-changing entry points of the token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenOperation {
    Mint,
    Burn,
}

impl std::fmt::Display for TokenOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenOperation::Mint => f.write_str("mint"),
            TokenOperation::Burn => f.write_str("burn"),
        }
    }
}

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Private key material could not be turned into a signing key.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Pending nonce or gas price lookup failed.
    #[error("Network query failed: {0}")]
    NetworkQuery(String),

    /// Decimal amount could not be converted to base units.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Read-only contract call failed.
    #[error("Balance query failed: {0}")]
    Query(String),

    /// A mint or burn could not be submitted.
    #[error("{operation} submission failed: {source}")]
    Submission {
        operation: TokenOperation,
        #[source]
        source: Box<BrokerError>,
    },

    /// The node did not accept a raw transaction or the request failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Transaction signing failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Address string is not a 20-byte hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl BrokerError {
    /// Wrap `self` as the cause of a failed submission.
    pub fn into_submission(self, operation: TokenOperation) -> Self {
        BrokerError::Submission {
            operation,
            source: Box::new(self),
        }
    }
}

/// Result type for token operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Handle for a transaction accepted by the node for relay.
///
/// Acceptance does not mean the transaction is final on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxHandle {
    pub hash: TxHash,
    pub operation: TokenOperation,
    pub nonce: u64,
}
