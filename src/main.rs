//! Balance Bot
//!
//! Main entry point: loads configuration, prepares the database and runs
//! the Telegram long-polling loop until Ctrl+C.

use balance_bot::bot;
use balance_bot::config::AppConfig;
use balance_bot::database::{create_pool, run_migrations};
use balance_bot::repositories::BalanceLedger;
use balance_bot::{AppError, AppResult, AppState};
use std::sync::Arc;
use teloxide::Bot;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "balance_bot={},sqlx=warn,teloxide=info",
            config.log_level
        )
        .into()
    });

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    init_tracing(&config);

    info!("Balance bot starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);

    info!("Connecting to database...");
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;
    info!(
        "Database pool ready (max connections: {})",
        config.database.max_connections
    );

    if config.database.run_migrations {
        info!("Running database migrations...");
        run_migrations(&pool).await.map_err(|e| {
            error!("Database migration failed: {}", e);
            AppError::Database(e)
        })?;
        info!("Database migrations completed");
    } else {
        warn!("RUN_MIGRATIONS disabled, assuming schema is up to date");
    }

    let state = AppState::new(pool);
    let ledger: Arc<dyn BalanceLedger> = state.user_repo.clone();

    let telegram = Bot::new(config.bot.token.clone());
    info!(
        "Polling Telegram (timeout {}s), press Ctrl+C to stop",
        config.bot.poll_timeout_secs
    );

    let result = bot::run(telegram, ledger, config.bot.poll_timeout()).await;
    if let Err(e) = &result {
        error!("Bot stopped with error: {}", e);
    }

    info!("Closing database pool...");
    state.database.close().await;
    info!("Balance bot shutdown complete");

    result
}
