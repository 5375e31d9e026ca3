use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret used to sign session (access) tokens.
    pub jwt_secret: String,
    /// Optional distinct secret for refresh tokens; the session secret is
    /// used when unset.
    pub refresh_token_secret: Option<String>,
    pub access_token_expiry_hours: u64,
    pub refresh_token_expiry_days: u64,
    /// Window during which a session counts as freshly established.
    pub fresh_auth_window_mins: u64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_SECRET") {
            self.security.refresh_token_secret = Some(v);
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRY_HOURS") {
            self.security.access_token_expiry_hours =
                v.parse().unwrap_or(self.security.access_token_expiry_hours);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_EXPIRY_DAYS") {
            self.security.refresh_token_expiry_days =
                v.parse().unwrap_or(self.security.refresh_token_expiry_days);
        }
        if let Ok(v) = env::var("FRESH_AUTH_WINDOW_MINS") {
            self.security.fresh_auth_window_mins =
                v.parse().unwrap_or(self.security.fresh_auth_window_mins);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                // Local default only; JWT_SECRET always wins when set
                jwt_secret: "syncline-dev-secret".to_string(),
                refresh_token_secret: None,
                access_token_expiry_hours: 24,
                refresh_token_expiry_days: 7,
                fresh_auth_window_mins: 15,
                bcrypt_cost: 10,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                refresh_token_secret: None,
                access_token_expiry_hours: 24,
                refresh_token_expiry_days: 7,
                fresh_auth_window_mins: 15,
                bcrypt_cost: 10,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                refresh_token_secret: None,
                access_token_expiry_hours: 24,
                refresh_token_expiry_days: 7,
                fresh_auth_window_mins: 15,
                bcrypt_cost: 10,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.access_token_expiry_hours, 24);
        assert_eq!(config.security.refresh_token_expiry_days, 7);
        assert_eq!(config.security.fresh_auth_window_mins, 15);
        assert_eq!(config.security.bcrypt_cost, 10);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        // Production never ships a baked-in secret
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.security.refresh_token_secret.is_none());
        assert_eq!(config.database.max_connections, 50);
    }
}
