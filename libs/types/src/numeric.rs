//! Conversion between human-readable amounts and base units
//!
//! Uses rust_decimal for exact parsing (no floating-point errors). Amounts
//! inside the vault are always integer base units.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::TypeError;
use crate::ids::Amount;

/// Decimal places of the native currency.
pub const NATIVE_DECIMALS: u32 = 18;

/// Parse a decimal string such as `"10.5"` into base units.
///
/// Rejects negative values and values with more fractional digits than
/// `decimals` allows.
pub fn parse_units(text: &str, decimals: u32) -> Result<Amount, TypeError> {
    let value = Decimal::from_str(text.trim())
        .map_err(|e| TypeError::InvalidAmount(format!("{}: {}", text, e)))?
        .normalize();

    if value.is_sign_negative() && !value.is_zero() {
        return Err(TypeError::InvalidAmount(format!("{} is negative", text)));
    }

    let scale = value.scale();
    if scale > decimals {
        return Err(TypeError::TooManyDecimals { scale, decimals });
    }

    let mantissa = value.mantissa().unsigned_abs();
    10u128
        .checked_pow(decimals - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| TypeError::InvalidAmount(format!("{} overflows base units", text)))
}

/// Render base units as a decimal string, trimming trailing zeros.
pub fn format_units(amount: Amount, decimals: u32) -> String {
    let Some(factor) = 10u128.checked_pow(decimals) else {
        return amount.to_string();
    };
    let whole = amount / factor;
    let frac = amount % factor;
    if frac == 0 {
        return whole.to_string();
    }
    let frac_text = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac_text.trim_end_matches('0'))
}
