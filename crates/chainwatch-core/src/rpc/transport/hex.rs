//! Hex quantity helpers for Ethereum-style JSON-RPC.

use rust_decimal::Decimal;

/// ERC-20 `balanceOf(address)` selector.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// Parse a `0x`-prefixed hex quantity. `"0x"` is zero.
pub(super) fn parse_quantity(raw: &str) -> Result<u128, String> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| format!("Quantity '{}' is missing 0x prefix", raw))?;

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(format!("Quantity '{}' exceeds 128 bits", raw));
    }
    u128::from_str_radix(significant, 16).map_err(|e| format!("Invalid quantity '{}': {}", raw, e))
}

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;
/// Largest scale a `Decimal` can hold.
const MAX_SCALE: u32 = 28;

/// Convert an integer base-unit amount into a decimal with `decimals` places.
///
/// Amounts wider than the decimal mantissa lose low-order fractional digits
/// (truncated toward zero). Only an amount whose whole part alone exceeds the
/// mantissa saturates at `Decimal::MAX`.
pub(super) fn to_decimal(amount: u128, decimals: u32) -> Decimal {
    let mut mantissa = amount;
    let mut scale = decimals;
    while (mantissa > MAX_MANTISSA || scale > MAX_SCALE) && scale > 0 {
        mantissa /= 10;
        scale -= 1;
    }

    let value = i128::try_from(mantissa)
        .ok()
        .filter(|_| mantissa <= MAX_MANTISSA)
        .and_then(|m| Decimal::try_from_i128_with_scale(m, scale).ok());
    match value {
        Some(value) => value.normalize(),
        None => {
            tracing::warn!(amount = %amount, decimals, "Amount exceeds decimal range; saturating");
            Decimal::MAX
        },
    }
}

/// True for a `0x`-prefixed, 20-byte hex address.
pub fn is_address(raw: &str) -> bool {
    address_hex(raw).is_some()
}

fn address_hex(raw: &str) -> Option<&str> {
    let hex = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
    (hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())).then_some(hex)
}

pub(super) fn encode_quantity(value: u64) -> String {
    format!("0x{:x}", value)
}

/// Calldata for `balanceOf(owner)`.
pub(super) fn encode_balance_of(owner: &str) -> Result<String, String> {
    let hex = address_hex(owner)
        .ok_or_else(|| format!("Address '{}' is not 20 bytes of hex", owner))?;
    Ok(format!("0x{}{:0>64}", BALANCE_OF_SELECTOR, hex.to_ascii_lowercase()))
}
