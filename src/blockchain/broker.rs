//! Broker facade over the token contract.
//!
//! Owns the operator account, the network-state accessor and the bound
//! contract. Mint and burn hold a submission lock from nonce query until
//! the node has accepted the transaction, so the next authorization always
//! sees the updated pending count.

use alloy::primitives::{Address, U256};
use tokio::sync::Mutex;

use crate::blockchain::account::Account;
use crate::blockchain::authorizer::{NetworkState, TransactionAuthorizer};
use crate::blockchain::client::RpcClient;
use crate::blockchain::contract::{BoundToken, TokenCall, TokenContract};
use crate::blockchain::types::{BrokerError, BrokerResult, TokenOperation, TxHandle};
use crate::blockchain::units::BaseUnitAmount;
use crate::config::schema::TokenToolsConfig;

/// Broker wired to a live JSON-RPC endpoint.
pub type RpcBroker = Broker<RpcClient, BoundToken>;

/// Entry point for balance queries and mint/burn submissions.
pub struct Broker<S, C> {
    account: Account,
    network: S,
    contract: C,
    authorizer: TransactionAuthorizer,
    decimals: u8,
    /// One in-flight nonce reservation for `account`.
    submission_lock: Mutex<()>,
}

impl RpcBroker {
    /// Connect to the configured node and bind the token contract.
    pub async fn connect(config: &TokenToolsConfig, account: Account) -> BrokerResult<Self> {
        let token: Address = config
            .token
            .address
            .parse()
            .map_err(|e| BrokerError::InvalidAddress(format!("{}: {}", config.token.address, e)))?;

        let client = RpcClient::connect(&config.network).await?;
        let contract = BoundToken::new(client.clone(), token);

        Ok(Broker::new(
            account,
            client,
            contract,
            TransactionAuthorizer::new(config.transaction.gas_limit),
            config.token.decimals,
        ))
    }
}

impl<S, C> Broker<S, C>
where
    S: NetworkState,
    C: TokenContract,
{
    pub fn new(
        account: Account,
        network: S,
        contract: C,
        authorizer: TransactionAuthorizer,
        decimals: u8,
    ) -> Self {
        Self {
            account,
            network,
            contract,
            authorizer,
            decimals,
            submission_lock: Mutex::new(()),
        }
    }

    /// Address of the operator account.
    pub fn address(&self) -> Address {
        self.account.address()
    }

    /// Decimal places of the token's unit.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Token balance of `owner` in base units.
    pub async fn balance_of(&self, owner: Address) -> BrokerResult<U256> {
        let balance = self.contract.balance_of(owner).await?;
        tracing::debug!(owner = %owner, balance = %balance, "Balance queried");
        Ok(balance)
    }

    /// Mint `amount` base units to `to`.
    pub async fn mint(&self, to: Address, amount: &BaseUnitAmount) -> BrokerResult<TxHandle> {
        self.submit(TokenOperation::Mint, to, amount).await
    }

    /// Burn `amount` base units from `account`.
    pub async fn burn(&self, account: Address, amount: &BaseUnitAmount) -> BrokerResult<TxHandle> {
        self.submit(TokenOperation::Burn, account, amount).await
    }

    async fn submit(
        &self,
        operation: TokenOperation,
        target: Address,
        amount: &BaseUnitAmount,
    ) -> BrokerResult<TxHandle> {
        let amount = amount
            .to_u256()
            .map_err(|e| BrokerError::from(e).into_submission(operation))?;
        let call = match operation {
            TokenOperation::Mint => TokenCall::Mint { to: target, amount },
            TokenOperation::Burn => TokenCall::Burn {
                account: target,
                amount,
            },
        };

        let _guard = self.submission_lock.lock().await;

        let authorization = self
            .authorizer
            .authorize(&self.account, &self.network)
            .await
            .map_err(|e| e.into_submission(operation))?;

        self.contract
            .submit(call, authorization)
            .await
            .map_err(|e| {
                tracing::error!(operation = %operation, target = %target, error = %e, "Submission failed");
                e.into_submission(operation)
            })
    }
}

impl<S, C> std::fmt::Debug for Broker<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("account", &self.account)
            .field("authorizer", &self.authorizer)
            .field("decimals", &self.decimals)
            .finish_non_exhaustive()
    }
}
