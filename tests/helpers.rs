#![allow(dead_code)]

use async_trait::async_trait;
use balance_bot::error::{RepositoryError, RepositoryResult};
use balance_bot::config::DatabaseConfig;
use balance_bot::database::{create_pool, run_migrations};
use balance_bot::models::{exact_sum, AdjustOutcome};
use balance_bot::repositories::*;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Test database configuration
pub struct TestDatabase {
    pub pool: PgPool,
    pub user_repo: Arc<UserRepository>,
}

impl TestDatabase {
    /// Connect to `TEST_DATABASE_URL` (or `DATABASE_URL`) and migrate it.
    /// `None` when neither is set, so database tests pass trivially on
    /// machines without PostgreSQL.
    pub async fn connect() -> Option<Self> {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()?;

        let config = DatabaseConfig {
            url: database_url,
            max_connections: 5,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 300,
            max_lifetime_secs: 600,
            test_before_acquire: true,
            run_migrations: true,
        };

        let pool = create_pool(&config)
            .await
            .expect("Failed to create test database pool");

        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self::from_pool(pool).await)
    }

    pub async fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            user_repo: Arc::new(UserRepository::new(pool)),
        }
    }

    /// Remove whatever an earlier run left for `user_id`; tests share one
    /// database, so each test owns its own user ids
    pub async fn reset_user(&self, user_id: i64) {
        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .expect("Failed to reset user");
    }

    /// Provision a user and bring them to `balance`
    pub async fn user_with_balance(&self, user_id: i64, balance: Decimal) {
        self.user_repo
            .ensure_created(user_id)
            .await
            .expect("Failed to create user");
        if !balance.is_zero() {
            let outcome = self
                .user_repo
                .adjust(user_id, balance)
                .await
                .expect("Failed to seed balance");
            assert!(outcome.is_applied());
        }
    }

    pub async fn user_count(&self, user_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count users")
    }
}

/// Ledger kept in a map, with a switch that makes every call fail the way
/// an unreachable database would
#[derive(Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<i64, Decimal>>,
    failing: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn balance_of(&self, user_id: i64) -> Option<Decimal> {
        self.balances.lock().unwrap().get(&user_id).copied()
    }

    fn check(&self) -> RepositoryResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl BalanceLedger for InMemoryLedger {
    async fn exists(&self, user_id: i64) -> RepositoryResult<bool> {
        self.check()?;
        Ok(self.balances.lock().unwrap().contains_key(&user_id))
    }

    async fn ensure_created(&self, user_id: i64) -> RepositoryResult<bool> {
        self.check()?;
        let mut balances = self.balances.lock().unwrap();
        if balances.contains_key(&user_id) {
            return Ok(false);
        }
        balances.insert(user_id, Decimal::ZERO);
        Ok(true)
    }

    async fn adjust(&self, user_id: i64, amount: Decimal) -> RepositoryResult<AdjustOutcome> {
        self.check()?;
        let mut balances = self.balances.lock().unwrap();
        let current = balances
            .get_mut(&user_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", user_id)))?;
        let new_balance =
            exact_sum(*current, amount).map_err(|e| RepositoryError::from_sum(user_id, e))?;
        if new_balance < Decimal::ZERO {
            return Ok(AdjustOutcome::InsufficientFunds { balance: *current });
        }
        *current = new_balance;
        Ok(AdjustOutcome::Applied { balance: new_balance })
    }

    async fn get_balance(&self, user_id: i64) -> RepositoryResult<Decimal> {
        self.check()?;
        Ok(self.balance_of(user_id).unwrap_or(Decimal::ZERO))
    }
}
