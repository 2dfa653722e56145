use crate::error::RepositoryResult;
use crate::models::AdjustOutcome;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Per-user balance ledger
///
/// Every operation is keyed by the chat platform's user id. Implementations
/// must never leave a balance negative: an adjustment that would do so is
/// rejected as a whole.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    /// Whether a ledger row exists for the user
    async fn exists(&self, user_id: i64) -> RepositoryResult<bool>;

    /// Create the user's row with a zero balance if it is missing.
    /// Returns `true` when this call created the row.
    async fn ensure_created(&self, user_id: i64) -> RepositoryResult<bool>;

    /// Add a signed amount to the user's balance
    async fn adjust(&self, user_id: i64, amount: Decimal) -> RepositoryResult<AdjustOutcome>;

    /// Current balance, zero for an unknown user
    async fn get_balance(&self, user_id: i64) -> RepositoryResult<Decimal>;
}
