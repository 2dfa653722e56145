use std::env;
use std::fmt;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub test_before_acquire: bool,
    pub run_migrations: bool,
}

/// Telegram bot configuration
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub poll_timeout_secs: u32,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub bot: BotConfig,
    pub log_level: String,
    pub environment: String,
}

/// Read an optional variable; set but unparsable is an error, not a default
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("Invalid {}: {:?}", name, raw)),
        Err(_) => Ok(None),
    }
}

impl DatabaseConfig {
    /// Create database config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required")?;

        let config = Self {
            url,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(5),
            acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS")?.unwrap_or(30),
            idle_timeout_secs: parse_var("DATABASE_IDLE_TIMEOUT_SECS")?.unwrap_or(600), // 10 minutes
            max_lifetime_secs: parse_var("DATABASE_MAX_LIFETIME_SECS")?.unwrap_or(1800), // 30 minutes
            test_before_acquire: parse_var("DATABASE_TEST_BEFORE_ACQUIRE")?.unwrap_or(true),
            run_migrations: parse_var("RUN_MIGRATIONS")?.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("DATABASE_URL must not be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("DATABASE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if self.acquire_timeout_secs == 0 {
            return Err("DATABASE_ACQUIRE_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get max lifetime as Duration
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/balance_bot".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            test_before_acquire: true,
            run_migrations: true,
        }
    }
}

impl BotConfig {
    /// Create bot config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| "TELEGRAM_BOT_TOKEN environment variable is required")?;

        let config = Self {
            token,
            poll_timeout_secs: parse_var("POLL_TIMEOUT_SECS")?.unwrap_or(60),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.token.trim().is_empty() {
            return Err("TELEGRAM_BOT_TOKEN must not be empty".to_string());
        }

        if self.poll_timeout_secs == 0 {
            return Err("POLL_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Long-poll timeout as Duration
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_timeout_secs))
    }
}

// The token never ends up in logs
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            poll_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        let database = DatabaseConfig::from_env()?;
        let bot = BotConfig::from_env()?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Self {
            database,
            bot,
            log_level: log_level.to_lowercase(),
            environment: environment.to_lowercase(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(format!(
                "Invalid ENVIRONMENT: {}. Must be one of: {:?}",
                self.environment, valid_environments
            ));
        }

        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            bot: BotConfig::default(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 30);
        assert!(config.run_migrations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_rejects_zero_pool() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bot_config_defaults_to_sixty_second_poll() {
        let config = BotConfig::default();
        assert_eq!(config.poll_timeout(), Duration::from_secs(60));
        // empty token is not a usable config
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bot_config_debug_hides_token() {
        let config = BotConfig {
            token: "123456:secret".to_string(),
            poll_timeout_secs: 60,
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_var_unset_is_none() {
        let value: Option<u32> = parse_var("BALANCE_BOT_TEST_UNSET_VAR").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_parse_var_reads_value() {
        env::set_var("BALANCE_BOT_TEST_POOL_SIZE", " 12 ");
        let value: Option<u32> = parse_var("BALANCE_BOT_TEST_POOL_SIZE").unwrap();
        assert_eq!(value, Some(12));
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("BALANCE_BOT_TEST_POLL_TIMEOUT", "abc");
        assert!(parse_var::<u32>("BALANCE_BOT_TEST_POLL_TIMEOUT").is_err());

        env::set_var("BALANCE_BOT_TEST_MAX_CONNECTIONS", "-1");
        let err = parse_var::<u32>("BALANCE_BOT_TEST_MAX_CONNECTIONS").unwrap_err();
        assert!(err.contains("BALANCE_BOT_TEST_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_app_config_rejects_unknown_log_level() {
        let config = AppConfig {
            log_level: "verbose".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
