use std::str::FromStr;

use alloy_primitives::utils::format_units as format_alloy_units;
use alloy_primitives::U256;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;

use crate::Error;

/// Scale a human readable `amount` to the token smallest unit, i.e. `floor(amount × 10^decimals)`.
///
/// The float is converted through its shortest decimal representation so that `100.1`
/// with 6 decimals gives `100100000` and not an artifact of its binary expansion.
pub fn parse_units(amount: f64, decimals: u8) -> Result<U256, Error> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    let value = BigDecimal::from_str(&amount.to_string()).map_err(|e| Error::InvalidAmount(e.to_string()))?;
    let multiplier = BigDecimal::new(BigInt::from(1), -(decimals as i64));

    let (digits, _) = (value * multiplier).with_scale(0).into_bigint_and_exponent();

    U256::from_str_radix(&digits.to_string(), 10).map_err(|e| Error::InvalidAmount(e.to_string()))
}

/// Format an amount given in the token smallest unit
pub fn format_units(amount: U256, decimals: u8) -> Result<String, Error> {
    format_alloy_units(amount, decimals).map_err(|e| Error::InvalidAmount(e.to_string()))
}
