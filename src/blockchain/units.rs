//! Exact conversion between human token amounts and base units.
//!
//! Every input shape is routed through one arbitrary-precision decimal parse
//! and scaled with big-integer arithmetic. Binary floating point never holds
//! the final value.
//!
//! # Truncation
//! Fractional digits beyond the unit's scale are dropped toward zero, never
//! rounded: `"1.0000000000000000019"` at 18 decimals is
//! `1000000000000000001` base units. Ledgers only hold whole base units, so
//! the dropped remainder is simply not representable. Users entering more
//! precision than the token supports will see the smaller value.

use std::str::FromStr;

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use thiserror::Error;

/// Largest `uint256` is ~1.16e77, so scales above this cannot hold one whole token.
pub const MAX_DECIMALS: u32 = 77;

/// Errors from decimal parsing and base-unit range checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("malformed decimal amount: {0:?}")]
    Malformed(String),

    #[error("amount is not a finite number: {0}")]
    NonFinite(String),

    #[error("amount is negative: {0}")]
    Negative(String),

    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// A human-facing decimal quantity in one of the accepted input shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenAmount {
    Text(String),
    Float(f64),
    Integer(i64),
    Decimal(BigDecimal),
}

impl TokenAmount {
    /// Canonical parse path shared by every input shape.
    fn to_decimal(&self) -> Result<BigDecimal, ConversionError> {
        match self {
            TokenAmount::Text(text) => parse_decimal(text),
            TokenAmount::Float(value) => {
                if !value.is_finite() {
                    return Err(ConversionError::NonFinite(value.to_string()));
                }
                // Display gives the shortest text that round-trips, so 0.1 stays 0.1.
                parse_decimal(&value.to_string())
            }
            TokenAmount::Integer(value) => Ok(BigDecimal::from(*value)),
            TokenAmount::Decimal(value) => Ok(value.clone()),
        }
    }
}

impl From<&str> for TokenAmount {
    fn from(value: &str) -> Self {
        TokenAmount::Text(value.to_string())
    }
}

impl From<String> for TokenAmount {
    fn from(value: String) -> Self {
        TokenAmount::Text(value)
    }
}

impl From<f64> for TokenAmount {
    fn from(value: f64) -> Self {
        TokenAmount::Float(value)
    }
}

impl From<i64> for TokenAmount {
    fn from(value: i64) -> Self {
        TokenAmount::Integer(value)
    }
}

impl From<BigDecimal> for TokenAmount {
    fn from(value: BigDecimal) -> Self {
        TokenAmount::Decimal(value)
    }
}

impl From<&BigDecimal> for TokenAmount {
    fn from(value: &BigDecimal) -> Self {
        TokenAmount::Decimal(value.clone())
    }
}

/// An exact integer amount of a token's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnitAmount(BigInt);

impl BaseUnitAmount {
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    /// Narrow to the contract's `uint256` argument type.
    pub fn to_u256(&self) -> Result<U256, ConversionError> {
        let (sign, bytes) = self.0.to_bytes_be();
        if sign == Sign::Minus {
            return Err(ConversionError::Negative(self.0.to_string()));
        }
        U256::try_from_be_slice(&bytes)
            .ok_or_else(|| ConversionError::OutOfRange(format!("{} exceeds uint256", self.0)))
    }
}

impl From<BigInt> for BaseUnitAmount {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<U256> for BaseUnitAmount {
    fn from(value: U256) -> Self {
        Self(BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>()))
    }
}

impl std::fmt::Display for BaseUnitAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Largest power of ten an amount may be scaled up by.
///
/// `uint256` holds at most 78 decimal digits, so anything past this bound
/// can never reach the contract.
pub const MAX_SCALE_UP: u32 = 1024;

/// Convert a decimal quantity into base units at the given scale.
///
/// Computes `amount * 10^decimals` exactly and truncates any remaining
/// fraction toward zero. Negative amounts pass through; callers validate
/// sign before submission (see [`BaseUnitAmount::to_u256`]). A nonzero
/// amount whose exponent and `decimals` together scale it up by more than
/// `10^MAX_SCALE_UP` fails with [`ConversionError::OutOfRange`].
///
/// ```
/// use token_tools::blockchain::units::to_base_units;
///
/// let wei = to_base_units("0.1", 18).unwrap();
/// assert_eq!(wei.to_string(), "100000000000000000");
/// ```
pub fn to_base_units(
    amount: impl Into<TokenAmount>,
    decimals: u32,
) -> Result<BaseUnitAmount, ConversionError> {
    let decimal = amount.into().to_decimal()?;
    let (digits, scale) = decimal.into_bigint_and_exponent();

    if digits.sign() == Sign::NoSign {
        return Ok(BaseUnitAmount(digits));
    }

    // value = digits * 10^-scale, so the base-unit value is digits * 10^(decimals - scale).
    let shift = i128::from(decimals) - i128::from(scale);
    if shift >= 0 {
        let exponent = u32::try_from(shift)
            .ok()
            .filter(|exponent| *exponent <= MAX_SCALE_UP)
            .ok_or_else(|| {
                ConversionError::OutOfRange(format!("scaling by 10^{} is too large", shift))
            })?;
        Ok(BaseUnitAmount(digits * BigInt::from(10u8).pow(exponent)))
    } else {
        // |digits| < 2^bits <= 10^bits, so dividing by 10^bits or more leaves zero.
        let exponent = -shift;
        if exponent >= i128::from(digits.bits()) {
            return Ok(BaseUnitAmount(BigInt::from(0u8)));
        }
        let exponent = u32::try_from(exponent).map_err(|_| {
            ConversionError::OutOfRange(format!("scaling by 10^-{} is too large", exponent))
        })?;
        // BigInt division truncates toward zero.
        Ok(BaseUnitAmount(digits / BigInt::from(10u8).pow(exponent)))
    }
}

/// Render a base-unit amount as an exact decimal string.
///
/// Trailing fractional zeros are trimmed, so `1500000000000000000` at 18
/// decimals renders as `1.5` and whole amounts have no decimal point.
pub fn format_base_units(amount: U256, decimals: u32) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse decimal text exactly. Surrounding whitespace is ignored.
pub fn parse_decimal(text: &str) -> Result<BigDecimal, ConversionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::Malformed(text.to_string()));
    }
    BigDecimal::from_str(trimmed).map_err(|_| ConversionError::Malformed(text.to_string()))
}
