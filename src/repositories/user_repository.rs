//! PostgreSQL-backed balance ledger

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{exact_sum, AdjustOutcome, User};
use crate::repositories::BalanceLedger;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

/// Repository for user balances
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user row by id
    pub async fn find_by_id(&self, user_id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, balance, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl BalanceLedger for UserRepository {
    async fn exists(&self, user_id: i64) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn ensure_created(&self, user_id: i64) -> RepositoryResult<bool> {
        // Single statement, so concurrent first contact cannot insert twice
        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, balance)
            VALUES ($1, 0.00)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;
        if created {
            debug!(user_id, "Provisioned ledger row");
        }
        Ok(created)
    }

    async fn adjust(&self, user_id: i64, amount: Decimal) -> RepositoryResult<AdjustOutcome> {
        let mut tx = self.pool.begin().await?;

        // Get current balance with lock
        let current = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT balance
            FROM users
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("User {} has no ledger row", user_id)))?;

        // Dropping the transaction on the error path releases the lock
        let new_balance =
            exact_sum(current, amount).map_err(|e| RepositoryError::from_sum(user_id, e))?;

        if new_balance < Decimal::ZERO {
            tx.rollback().await?;
            debug!(user_id, %amount, %current, "Adjustment rejected, insufficient funds");
            return Ok(AdjustOutcome::InsufficientFunds { balance: current });
        }

        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE users
            SET balance = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING balance
            "#,
        )
        .bind(user_id)
        .bind(new_balance)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(user_id, %amount, %balance, "Adjustment applied");
        Ok(AdjustOutcome::Applied { balance })
    }

    async fn get_balance(&self, user_id: i64) -> RepositoryResult<Decimal> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT balance FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance.unwrap_or(Decimal::ZERO))
    }
}
