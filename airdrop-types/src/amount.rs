//! Parsing of the chain's `"<amount> <SYMBOL>"` asset strings.

use thiserror::Error;

pub const VESTS: &str = "VESTS";
pub const STEEM: &str = "STEEM";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("malformed asset string: {0:?}")]
    Malformed(String),

    #[error("expected {expected} amount, got {found:?}")]
    WrongSymbol { expected: &'static str, found: String },

    #[error("amount must be finite and non-negative: {0}")]
    OutOfRange(f64),
}

/// Parses `"1234.567890 VESTS"` into `1234.56789`, checking the symbol.
pub fn parse_asset_amount(raw: &str, expected: &'static str) -> Result<f64, AmountError> {
    let mut parts = raw.split_whitespace();
    let (Some(number), Some(symbol), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AmountError::Malformed(raw.to_string()));
    };

    if symbol != expected {
        return Err(AmountError::WrongSymbol {
            expected,
            found: symbol.to_string(),
        });
    }

    let value: f64 = number
        .parse()
        .map_err(|_| AmountError::Malformed(raw.to_string()))?;
    check_amount(value)
}

/// Rejects negative, NaN and infinite amounts.
pub fn check_amount(value: f64) -> Result<f64, AmountError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AmountError::OutOfRange(value));
    }
    Ok(value)
}
