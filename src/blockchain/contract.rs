//! Token contract binding.
//!
//! Encodes `balanceOf`, `mint` and `burn` calls and submits signed
//! transactions through the RPC client.

use std::future::Future;

use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::authorizer::TransactionAuthorization;
use crate::blockchain::client::RpcClient;
use crate::blockchain::types::{BrokerError, BrokerResult, TokenOperation, TxHandle};

sol! {
    /// Mintable and burnable token interface.
    interface Token {
        function balanceOf(address account) external view returns (uint256);
        function mint(address to, uint256 amount) external;
        function burn(address account, uint256 amount) external;
    }
}

/// A state-changing token call with its typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCall {
    Mint { to: Address, amount: U256 },
    Burn { account: Address, amount: U256 },
}

impl TokenCall {
    pub fn operation(&self) -> TokenOperation {
        match self {
            TokenCall::Mint { .. } => TokenOperation::Mint,
            TokenCall::Burn { .. } => TokenOperation::Burn,
        }
    }

    /// ABI-encoded calldata for this call.
    pub fn calldata(&self) -> Bytes {
        match self {
            TokenCall::Mint { to, amount } => Token::mintCall {
                to: *to,
                amount: *amount,
            }
            .abi_encode()
            .into(),
            TokenCall::Burn { account, amount } => Token::burnCall {
                account: *account,
                amount: *amount,
            }
            .abi_encode()
            .into(),
        }
    }
}

/// Bound token contract handle.
pub trait TokenContract {
    /// Read-only `balanceOf(owner)`.
    fn balance_of(&self, owner: Address) -> impl Future<Output = BrokerResult<U256>> + Send;

    /// Sign `call` with `authorization` and hand it to the node for relay.
    fn submit(
        &self,
        call: TokenCall,
        authorization: TransactionAuthorization,
    ) -> impl Future<Output = BrokerResult<TxHandle>> + Send;
}

/// Token contract at a fixed address, reached through [`RpcClient`].
#[derive(Debug, Clone)]
pub struct BoundToken {
    client: RpcClient,
    address: Address,
}

impl BoundToken {
    pub fn new(client: RpcClient, address: Address) -> Self {
        Self { client, address }
    }
}

impl TokenContract for BoundToken {
    async fn balance_of(&self, owner: Address) -> BrokerResult<U256> {
        let input = Token::balanceOfCall { account: owner }.abi_encode();
        let output = self
            .client
            .call(self.address, input.into())
            .await
            .map_err(|e| BrokerError::Query(e.to_string()))?;

        Token::balanceOfCall::abi_decode_returns(&output)
            .map_err(|e| BrokerError::Query(format!("undecodable balanceOf result: {}", e)))
    }

    async fn submit(
        &self,
        call: TokenCall,
        authorization: TransactionAuthorization,
    ) -> BrokerResult<TxHandle> {
        let operation = call.operation();
        let nonce = authorization.nonce();

        let envelope = authorization
            .sign(self.address, call.calldata(), self.client.chain_id())
            .await?;
        let hash = self
            .client
            .send_raw_transaction(&envelope.encoded_2718())
            .await?;

        tracing::info!(
            tx_hash = %hash,
            operation = %operation,
            nonce = nonce,
            token = %self.address,
            "Transaction submitted"
        );

        Ok(TxHandle {
            hash,
            operation,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLDER: Address = Address::repeat_byte(0xab);

    #[test]
    fn test_selectors() {
        assert_eq!(Token::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(Token::mintCall::SELECTOR, [0x40, 0xc1, 0x0f, 0x19]);
        assert_eq!(Token::burnCall::SELECTOR, [0x9d, 0xc2, 0x9f, 0xac]);
    }

    #[test]
    fn test_mint_calldata() {
        let call = TokenCall::Mint {
            to: HOLDER,
            amount: U256::from(2_500_000_000_000_000_000u128),
        };
        let data = call.calldata();

        // 4 (selector) + 32 (address) + 32 (amount) = 68 bytes.
        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &Token::mintCall::SELECTOR);

        let decoded = Token::mintCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.to, HOLDER);
        assert_eq!(decoded.amount, U256::from(2_500_000_000_000_000_000u128));
    }

    #[test]
    fn test_burn_calldata() {
        let call = TokenCall::Burn {
            account: HOLDER,
            amount: U256::from(1u8),
        };
        assert_eq!(call.operation(), TokenOperation::Burn);

        let decoded = Token::burnCall::abi_decode(&call.calldata()).unwrap();
        assert_eq!(decoded.account, HOLDER);
        assert_eq!(decoded.amount, U256::from(1u8));
    }
}
