//! Classification of inbound text as a signed decimal amount.
//!
//! Accepted grammar after normalization: `-?[0-9]+(\.[0-9]+)?`, matched
//! against the whole string. Anything else (exponents, `+` signs, thousands
//! separators, a lone `-` or `.`, trailing text) is not a number.

use rust_decimal::Decimal;

/// What a message turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// A signed amount to add to the balance
    Amount(Decimal),
    /// Text that does not follow the number grammar
    NotNumeric,
    /// Follows the grammar but does not fit a 96-bit decimal
    /// (more than 28 significant digits, or out of range)
    Unrepresentable,
}

/// Trim surrounding whitespace and accept `,` as the decimal separator
pub fn normalize(text: &str) -> String {
    text.trim().replace(',', ".")
}

/// Whether `s` is exactly an optional minus, digits, and an optional
/// fraction of one or more digits
pub fn is_valid_number(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

/// Normalize and classify raw message text
pub fn interpret(text: &str) -> Interpretation {
    let normalized = normalize(text);
    if !is_valid_number(&normalized) {
        return Interpretation::NotNumeric;
    }

    // from_str_exact refuses to silently round literals that exceed
    // the decimal's precision
    match Decimal::from_str_exact(&normalized) {
        Ok(amount) => Interpretation::Amount(amount),
        Err(_) => Interpretation::Unrepresentable,
    }
}
