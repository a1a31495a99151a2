//! Configuration management for the intake webhook indexing service.

use std::{net::SocketAddr, str::FromStr};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The database is addressed by four discrete values (`DB_NAME`, `DB_USER`,
/// `DB_PASSWORD`, `DB_HOST`) rather than a single URL; that quartet is the
/// externally observable contract this service deploys with. Values are not
/// validated against the database up front; a wrong password or host
/// surfaces as a connection failure on the first request that needs one.
///
/// # Example
///
/// ```no_run
/// use intake_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
///
/// println!("Server will bind to {}:{}", config.host, config.port);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Database
    /// Database name.
    ///
    /// Environment variable: `DB_NAME`
    #[serde(default = "default_db_name", alias = "DB_NAME")]
    pub db_name: String,
    /// Database user.
    ///
    /// Environment variable: `DB_USER`
    #[serde(default = "default_db_user", alias = "DB_USER")]
    pub db_user: String,
    /// Database password.
    ///
    /// Environment variable: `DB_PASSWORD`
    #[serde(default = "default_db_password", alias = "DB_PASSWORD")]
    pub db_password: String,
    /// Database host.
    ///
    /// Environment variable: `DB_HOST`
    #[serde(default = "default_db_host", alias = "DB_HOST")]
    pub db_host: String,
    /// Database port.
    ///
    /// Environment variable: `DB_PORT`
    #[serde(default = "default_db_port", alias = "DB_PORT")]
    pub db_port: u16,
    /// Maximum number of database connections in the pool.
    ///
    /// Environment variable: `DATABASE_MAX_CONNECTIONS`
    #[serde(default = "default_max_connections", alias = "DATABASE_MAX_CONNECTIONS")]
    pub database_max_connections: u32,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// # Errors
    ///
    /// Returns error if a source fails to parse or validation rejects the
    /// merged result.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Builds PostgreSQL connection options from the discrete database
    /// values.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .database(&self.db_name);

        if !self.db_password.is_empty() {
            options = options.password(&self.db_password);
        }

        options
    }

    /// Parse server socket address from host and port configuration.
    ///
    /// # Errors
    ///
    /// Returns error if host and port do not form a valid socket address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Returns the database coordinates with the password masked for
    /// logging.
    pub fn database_dsn_masked(&self) -> String {
        let credentials = if self.db_password.is_empty() {
            self.db_user.clone()
        } else {
            format!("{}:***", self.db_user)
        };

        format!("postgresql://{}@{}:{}/{}", credentials, self.db_host, self.db_port, self.db_name)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.db_port == 0 {
            anyhow::bail!("db_port must be greater than 0");
        }

        if self.database_max_connections == 0 {
            anyhow::bail!("database max_connections must be greater than 0");
        }

        if self.db_name.is_empty() {
            anyhow::bail!("db_name must not be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_name: default_db_name(),
            db_user: default_db_user(),
            db_password: default_db_password(),
            db_host: default_db_host(),
            db_port: default_db_port(),
            database_max_connections: default_max_connections(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_db_name() -> String {
    "indexer".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    String::new()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, env, sync::Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct TestEnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        vars: Vec<String>,
        originals: HashMap<String, Option<String>>,
    }

    impl TestEnvGuard {
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Self { _lock: lock, vars: Vec::new(), originals: HashMap::new() }
        }

        fn set_var(&mut self, key: &str, value: &str) {
            if !self.vars.contains(&key.to_string()) {
                self.originals.insert(key.to_string(), env::var(key).ok());
                self.vars.push(key.to_string());
            }
            env::set_var(key, value);
        }
    }

    impl Drop for TestEnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                match self.originals.get(var) {
                    Some(Some(value)) => env::set_var(var, value),
                    Some(None) => env::remove_var(var),
                    None => {},
                }
            }
        }
    }

    #[test]
    fn defaults_bind_loopback_on_port_5000() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_port, 5432);
    }

    #[test]
    fn environment_supplies_the_four_database_values() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("DB_NAME", "webhooks");
        guard.set_var("DB_USER", "ingest");
        guard.set_var("DB_PASSWORD", "s3cret");
        guard.set_var("DB_HOST", "db.internal");

        let config = Config::load().expect("Config should load with env overrides");

        assert_eq!(config.db_name, "webhooks");
        assert_eq!(config.db_user, "ingest");
        assert_eq!(config.db_password, "s3cret");
        assert_eq!(config.db_host, "db.internal");
    }

    #[test]
    fn server_bind_overrides_apply() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("HOST", "127.0.0.1");
        guard.set_var("PORT", "9090");

        let config = Config::load().expect("Config should load");
        let addr = config.parse_server_addr().expect("Should parse socket address");

        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn masked_dsn_hides_the_password() {
        let mut config = Config::default();
        config.db_user = "ingest".to_string();
        config.db_password = "secret123".to_string();
        config.db_host = "db.example.com".to_string();

        let masked = config.database_dsn_masked();

        assert!(!masked.contains("secret123"));
        assert!(masked.contains("ingest"));
        assert!(masked.contains("db.example.com"));
        assert!(masked.contains("***"));
    }

    #[test]
    fn masked_dsn_without_password_has_no_placeholder() {
        let config = Config::default();

        assert!(!config.database_dsn_masked().contains("***"));
    }

    #[test]
    fn invalid_config_validation_fails() {
        let mut config = Config::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.database_max_connections = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.db_name = String::new();
        assert!(config.validate().is_err());
    }
}
