//! Decimal amounts and base-unit conversion
//!
//! Balances and user input arrive as decimal strings ("12.5"). Comparisons happen
//! on exact base units (`U256`) scaled by the asset's precision, never on floats.

use alloy::primitives::U256;

/// Highest precision any supported asset uses (EVM tokens)
pub const MAX_PRECISION: u8 = 18;

/// Fee reserved by the "max" helper when the provider gave no estimate
pub const DEFAULT_ESTIMATED_FEE: &str = "0.005";

/// Failure to interpret a decimal amount string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a decimal number")]
    Malformed(String),
    #[error("'{value}' has more than {precision} decimal places")]
    TooPrecise { value: String, precision: u8 },
    #[error("precision {0} is not supported")]
    UnsupportedPrecision(u8),
}

/// Scale a decimal string to base units with specified decimals
///
/// Accepts `"10"`, `"10."`, `"0.25"` and `".5"`. Rejects signs, exponents and
/// more fractional digits than `decimals`.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, AmountError> {
    if decimals > MAX_PRECISION {
        return Err(AmountError::UnsupportedPrecision(decimals));
    }

    let value = value.trim();
    if value.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, frac) = value.split_once('.').unwrap_or((value, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(AmountError::Malformed(value.to_string()));
    }

    // Trailing zeros carry no value and do not count against precision
    let frac = frac.trim_end_matches('0');
    if frac.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            value: value.to_string(),
            precision: decimals,
        });
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(frac);
    digits.extend(std::iter::repeat('0').take(decimals as usize - frac.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    digits
        .parse::<U256>()
        .map_err(|_| AmountError::Malformed(value.to_string()))
}

/// Unscale base units back to a canonical decimal string
///
/// No trailing zeros, no trailing dot: 12_500_000 at 6 decimals is `"12.5"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

/// Rewrite a decimal string in canonical form for the given precision
pub fn normalize(value: &str, decimals: u8) -> Result<String, AmountError> {
    parse_units(value, decimals).map(|units| format_units(units, decimals))
}

/// Largest amount that still leaves `fee` behind, floored at zero
pub fn max_spendable(balance: &str, fee: &str, decimals: u8) -> Result<String, AmountError> {
    let balance = parse_units(balance, decimals)?;
    let fee = parse_units(fee, decimals)?;
    Ok(format_units(balance.saturating_sub(fee), decimals))
}
