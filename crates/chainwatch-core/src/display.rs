//! Formatting and privacy masking for the presentation layer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder for any masked value.
pub const MASK: &str = "****";
/// Placeholder for a masked address.
pub const MASKED_ADDRESS: &str = "0x**...**";

/// Shorten `s` to fit in `max` characters.
///
/// Strings shorter than `max` are returned unchanged. Otherwise the result is
/// `max - 3` characters followed by `...`, or just the first `max` characters
/// when `max <= 3`.
pub fn truncate_string(s: &str, max: usize) -> String {
    if s.chars().count() < max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

/// Insert thousands separators into the integer part of a numeric string.
pub fn add_commas(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    format!("{sign}{grouped}{frac_part}")
}

pub fn format_float(value: f64, decimals: usize) -> String {
    add_commas(&format!("{value:.decimals$}"))
}

/// Format a decimal with `decimals` fraction digits, rounding half away from
/// zero. `None` renders as `"0"`.
pub fn format_decimal(value: Option<&Decimal>, decimals: u32) -> String {
    let Some(value) = value else {
        return "0".to_string();
    };
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    add_commas(&rounded.to_string())
}

pub fn mask_string(s: &str, privacy: bool) -> String {
    if privacy {
        MASK.to_string()
    } else {
        s.to_string()
    }
}

pub fn mask_address(address: &str, privacy: bool) -> String {
    if privacy {
        MASKED_ADDRESS.to_string()
    } else {
        address.to_string()
    }
}
