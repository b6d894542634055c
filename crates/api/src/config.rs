//! Server configuration loaded from the environment

use anyhow::Context;
use std::env;

/// Number of todos a non-subscribed user may hold.
const DEFAULT_FREE_TIER_TODO_LIMIT: i64 = 3;

/// Fixed page size for todo listings.
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// svix signing secret for identity-provider webhooks. Absence is a
    /// fatal misconfiguration caught here, never reported to callers.
    pub webhook_secret: String,
    /// HS256 secret for session token verification.
    pub session_jwt_secret: String,
    /// Comma-separated CORS origin allow-list.
    pub allowed_origins: String,
    pub page_size: i64,
    pub free_tier_todo_limit: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            webhook_secret: require("WEBHOOK_SECRET")?,
            session_jwt_secret: require("SESSION_JWT_SECRET")?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
            page_size: parse_or("PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            free_tier_todo_limit: parse_or("FREE_TIER_TODO_LIMIT", DEFAULT_FREE_TIER_TODO_LIMIT)?,
        })
    }
}

fn require(name: &'static str) -> anyhow::Result<String> {
    let value = env::var(name).with_context(|| format!("{name} must be set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    Ok(value)
}

fn parse_or(name: &'static str, default: i64) -> anyhow::Result<i64> {
    let value = match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be an integer, got {raw:?}"))?,
        Err(_) => default,
    };
    if value < 1 {
        anyhow::bail!("{name} must be positive, got {value}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        env::set_var("DATABASE_URL", "postgres://localhost/taskboard_test");
        env::set_var("WEBHOOK_SECRET", "whsec_dGVzdC1zZWNyZXQ=");
        env::set_var("SESSION_JWT_SECRET", "test-session-secret");
    }

    fn clear_optional_vars() {
        for name in [
            "BIND_ADDRESS",
            "ALLOWED_ORIGINS",
            "PAGE_SIZE",
            "FREE_TIER_TODO_LIMIT",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn loads_with_defaults() {
        set_required_vars();
        clear_optional_vars();

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.free_tier_todo_limit, 3);
    }

    #[test]
    #[serial]
    fn missing_webhook_secret_fails() {
        set_required_vars();
        clear_optional_vars();
        env::remove_var("WEBHOOK_SECRET");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn blank_webhook_secret_fails() {
        set_required_vars();
        clear_optional_vars();
        env::set_var("WEBHOOK_SECRET", "   ");

        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn overrides_are_honored() {
        set_required_vars();
        clear_optional_vars();
        env::set_var("PAGE_SIZE", "25");
        env::set_var("FREE_TIER_TODO_LIMIT", "5");

        let config = Config::from_env().unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.free_tier_todo_limit, 5);

        clear_optional_vars();
    }

    #[test]
    #[serial]
    fn non_numeric_page_size_fails() {
        set_required_vars();
        clear_optional_vars();
        env::set_var("PAGE_SIZE", "lots");

        assert!(Config::from_env().is_err());

        clear_optional_vars();
    }

    #[test]
    #[serial]
    fn non_positive_limits_fail() {
        set_required_vars();

        for (name, value) in [("PAGE_SIZE", "0"), ("FREE_TIER_TODO_LIMIT", "-1")] {
            clear_optional_vars();
            env::set_var(name, value);

            assert!(Config::from_env().is_err(), "{name}={value}");
        }

        clear_optional_vars();
    }
}
