//! Operator account and key loading.
//!
//! # Security
//! - The private key is read from an explicit source at startup and handed
//!   to the broker as a value
//! - Keys are never logged or serialized
//! - The address is always derived from the key, never stored beside it

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::utils::public_key_to_address;

use crate::blockchain::types::{BrokerError, BrokerResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "TOKEN_TOOLS_PRIVATE_KEY";

/// An asymmetric key pair used to sign mint and burn transactions.
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    /// Create an account from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> BrokerResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            BrokerError::KeyDerivation(format!("Invalid private key format: {}", e))
        })?;

        let account = Self { signer };
        tracing::info!(address = %account.address(), "Account loaded");
        Ok(account)
    }

    /// Load the account from environment variable.
    ///
    /// Reads `TOKEN_TOOLS_PRIVATE_KEY` from environment.
    pub fn from_env() -> BrokerResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BrokerError::KeyDerivation(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// The on-chain address, recomputed from the public key.
    pub fn address(&self) -> Address {
        public_key_to_address(self.signer.credential().verifying_key())
    }

    /// Signer handed to a single transaction authorization.
    pub(crate) fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_account_from_private_key() {
        let account = Account::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            account.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_account_with_0x_prefix() {
        let account = Account::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            account.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_address_matches_signer() {
        let account = Account::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(account.address(), account.signer().address());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Account::from_private_key("invalid_key");
        let err = result.unwrap_err();
        assert!(matches!(err, BrokerError::KeyDerivation(_)));
        assert!(err.to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_zero_key_rejected() {
        let zero = "0".repeat(64);
        assert!(matches!(
            Account::from_private_key(&zero),
            Err(BrokerError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", account);
        assert!(!debug.contains(TEST_PRIVATE_KEY));
        assert!(debug.contains("address"));
    }
}
