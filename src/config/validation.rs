//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the RPC URL and token address parse
//! - Validate value ranges (timeouts > 0, gas limit, decimals)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TokenToolsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::blockchain::units::MAX_DECIMALS;
use crate::config::schema::TokenToolsConfig;

/// Intrinsic gas of any transaction; a lower limit can never execute.
const MIN_GAS_LIMIT: u64 = 21_000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint of `config`.
pub fn validate_config(config: &TokenToolsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.network.rpc_url.parse::<url::Url>() {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "network.rpc_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("network.rpc_url", e.to_string())),
    }

    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.token.address.is_empty() {
        errors.push(ValidationError::new("token.address", "must be set"));
    } else if let Err(e) = config.token.address.parse::<Address>() {
        errors.push(ValidationError::new("token.address", e.to_string()));
    }

    if u32::from(config.token.decimals) > MAX_DECIMALS {
        errors.push(ValidationError::new(
            "token.decimals",
            format!("must be at most {}", MAX_DECIMALS),
        ));
    }

    if config.transaction.gas_limit < MIN_GAS_LIMIT {
        errors.push(ValidationError::new(
            "transaction.gas_limit",
            format!("must be at least {}", MIN_GAS_LIMIT),
        ));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", other),
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
