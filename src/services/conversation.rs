//! Turns one inbound message into one reply

use crate::models::{format_amount, AdjustOutcome};
use crate::repositories::BalanceLedger;
use crate::services::interpreter::{interpret, Interpretation};
use rust_decimal::Decimal;
use std::fmt;
use tracing::{error, info, warn};

pub const INSUFFICIENT_FUNDS_TEXT: &str = "Недостаточно средств для списания.";
pub const ENTER_NUMBER_TEXT: &str = "Пожалуйста, введите число.";
pub const AMOUNT_REJECTED_TEXT: &str = "Эту сумму нельзя применить к балансу.";
pub const TRY_AGAIN_LATER_TEXT: &str = "Не удалось обработать запрос. Попробуйте позже.";

/// Reply to send back to the chat the message came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Adjustment committed, carries the new balance
    Balance(Decimal),
    InsufficientFunds,
    EnterNumber,
    /// The sum would leave the decimal range or need rounding
    AmountRejected,
    /// The store failed; nothing was changed as far as the user can tell
    TryAgainLater,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Balance(balance) => {
                write!(f, "Ваш текущий баланс: ${}", format_amount(*balance))
            }
            Reply::InsufficientFunds => f.write_str(INSUFFICIENT_FUNDS_TEXT),
            Reply::EnterNumber => f.write_str(ENTER_NUMBER_TEXT),
            Reply::AmountRejected => f.write_str(AMOUNT_REJECTED_TEXT),
            Reply::TryAgainLater => f.write_str(TRY_AGAIN_LATER_TEXT),
        }
    }
}

/// Handle the text of one message from `user_id`
///
/// Store faults never escape: they are logged and turned into
/// [`Reply::TryAgainLater`] so the loop keeps serving other users.
pub async fn handle_text(ledger: &dyn BalanceLedger, user_id: i64, text: &str) -> Reply {
    match ledger.ensure_created(user_id).await {
        Ok(true) => info!(user_id, "New user provisioned"),
        Ok(false) => {}
        Err(e) => {
            error!(user_id, error = %e, "Failed to provision user");
            return Reply::TryAgainLater;
        }
    }

    let amount = match interpret(text) {
        Interpretation::Amount(amount) => amount,
        Interpretation::NotNumeric => return Reply::EnterNumber,
        Interpretation::Unrepresentable => {
            warn!(user_id, text, "Number does not fit a decimal amount");
            return Reply::EnterNumber;
        }
    };

    match ledger.adjust(user_id, amount).await {
        Ok(AdjustOutcome::Applied { balance }) => {
            info!(user_id, %amount, %balance, "Balance adjusted");
            Reply::Balance(balance)
        }
        Ok(AdjustOutcome::InsufficientFunds { balance }) => {
            info!(user_id, %amount, %balance, "Insufficient funds");
            Reply::InsufficientFunds
        }
        Err(e) if e.is_amount_rejected() => {
            warn!(user_id, %amount, error = %e, "Adjustment cannot be represented");
            Reply::AmountRejected
        }
        Err(e) => {
            error!(user_id, %amount, error = %e, "Failed to adjust balance");
            Reply::TryAgainLater
        }
    }
}
