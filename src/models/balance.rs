//! Result types for balance adjustments

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Outcome of a guarded balance adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustOutcome {
    /// The adjustment was committed; carries the new balance
    Applied { balance: Decimal },
    /// The adjustment would have made the balance negative and was rolled
    /// back; carries the untouched balance
    InsufficientFunds { balance: Decimal },
}

impl AdjustOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Balance after the operation, whether or not it was applied
    pub fn balance(&self) -> Decimal {
        match self {
            Self::Applied { balance } | Self::InsufficientFunds { balance } => *balance,
        }
    }
}

/// Why `current + amount` cannot become a stored balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumError {
    /// Outside the decimal's range
    OutOfRange,
    /// Needs more than 28 significant digits, so the decimal would round it
    Inexact,
}

/// `current + amount`, refusing any result the decimal type had to round.
/// A rounded sum would break `adjust(a)` followed by `adjust(-a)`
/// restoring the balance.
pub fn exact_sum(current: Decimal, amount: Decimal) -> Result<Decimal, SumError> {
    let sum = current.checked_add(amount).ok_or(SumError::OutOfRange)?;
    if sum.checked_sub(amount) != Some(current) {
        return Err(SumError::Inexact);
    }
    Ok(sum)
}

/// Render a balance with exactly two fraction digits, rounding half away
/// from zero (`10.5` -> `10.50`, `0.125` -> `0.13`)
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
