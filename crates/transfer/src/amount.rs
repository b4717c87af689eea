//! Conversion between human decimal amounts and token base units.
//!
//! Both directions are exact integer arithmetic: `"1.5"` with 18 decimals is
//! `1500000000000000000` and never goes through floating point.

use alloy_primitives::{
    utils::{format_units, parse_units, ParseUnits},
    U256,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Amount must be a non-negative decimal number: {0}")]
    Invalid(String),

    #[error("Amount has more than {decimals} decimal places")]
    TooPrecise { decimals: u8 },

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

/// Parse a decimal string into base units for a token with `decimals`.
///
/// Accepts `123`, `1.5`, `.5` and `1.`; rejects signs, exponents and anything
/// with more fractional digits than the token supports.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = input.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Invalid(amount.to_string()));
    }

    if fraction.len() > usize::from(decimals) {
        return Err(AmountError::TooPrecise { decimals });
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    match parse_units(&normalized, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(AmountError::Invalid(amount.to_string())),
        Err(e) => Err(AmountError::OutOfRange(e.to_string())),
    }
}

/// Render base units as a decimal string: exact, no trailing fractional
/// zeros, no trailing dot.
pub fn format_amount(raw: U256, decimals: u8) -> Result<String, AmountError> {
    let formatted = format_units(raw, decimals).map_err(|e| AmountError::OutOfRange(e.to_string()))?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}
