//! Balance Bot Library
//!
//! A Telegram bot that reads numeric messages as deposits and withdrawals
//! against a per-user balance kept in PostgreSQL.

pub mod bot;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use repositories::UserRepository;
use std::sync::Arc;

/// Application state containing the pool and the ledger built on it
pub struct AppState {
    pub database: Database,
    pub user_repo: Arc<UserRepository>,
}

impl AppState {
    /// Create a new AppState with initialized repositories
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            database: Database::new(pool.clone()),
            user_repo: Arc::new(UserRepository::new(pool)),
        }
    }
}
