//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` and can be set via the
//! `-f` flag or the `HOTELCTL_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Sources are merged in order, later overriding earlier:
//!
//! 1. **YAML config file** (default: `config.yaml`)
//! 2. **Environment variables** prefixed with `HOTELCTL_`
//! 3. **DATABASE_URL** as a special case
//!
//! Nested values use double underscores: `HOTELCTL_AUTH__NATIVE__ENABLED=false`
//! sets `auth.native.enabled`.

use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "HOTELCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// PostgreSQL connection string. Usually supplied via DATABASE_URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Connection pool settings
    pub database: DatabaseConfig,
    /// Username for the initial admin user (created on first startup)
    pub admin_username: String,
    /// Email address for the initial admin user
    pub admin_email: String,
    /// Password for the initial admin user (optional, can be set via environment)
    pub admin_password: Option<String>,
    /// Secret key for JWT signing (required when any auth method is enabled)
    pub secret_key: Option<String>,
    /// Authentication configuration
    pub auth: AuthConfig,
}

/// Connection pool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Seconds to wait for a connection before failing
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub native: NativeAuthConfig,
    pub google: GoogleAuthConfig,
    pub security: SecurityConfig,
}

/// Username/password login.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NativeAuthConfig {
    pub enabled: bool,
    pub password: PasswordConfig,
}

impl Default for NativeAuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            password: PasswordConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

/// Google OAuth sign-in. The endpoint URLs are overridable so tests can
/// point the client at a local mock.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleAuthConfig {
    pub enabled: bool,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: Url,
    pub auth_url: Url,
    pub token_url: Url,
    pub userinfo_url: Url,
}

impl Default for GoogleAuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: Url::parse("http://localhost:3000/api/v1/auth/google/callback")
                .unwrap_or_else(|_| unreachable!()),
            auth_url: Url::parse("https://accounts.google.com/o/oauth2/v2/auth").unwrap_or_else(|_| unreachable!()),
            token_url: Url::parse("https://oauth2.googleapis.com/token").unwrap_or_else(|_| unreachable!()),
            userinfo_url: Url::parse("https://openidconnect.googleapis.com/v1/userinfo")
                .unwrap_or_else(|_| unreachable!()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// How long issued JWTs remain valid
    #[serde(with = "humantime_serde")]
    pub jwt_expiry: Duration,
    pub cors: CorsConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_expiry: Duration::from_secs(8 * 3600),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; "*" means any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            database: DatabaseConfig::default(),
            admin_username: "admin".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: None,
            secret_key: None,
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("HOTELCTL_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if (self.auth.native.enabled || self.auth.google.enabled) && self.secret_key.is_none() {
            return Err(Error::Internal {
                operation: "Config validation: authentication is enabled but secret_key is not configured. \
                 Please set HOTELCTL_SECRET_KEY or add secret_key to the config file."
                    .to_string(),
            });
        }

        if self.auth.native.enabled {
            if self.auth.native.password.min_length > self.auth.native.password.max_length {
                return Err(Error::Internal {
                    operation: format!(
                        "Config validation: invalid password configuration: min_length ({}) cannot be greater than max_length ({})",
                        self.auth.native.password.min_length, self.auth.native.password.max_length
                    ),
                });
            }

            if self.auth.native.password.min_length < 1 {
                return Err(Error::Internal {
                    operation: "Config validation: invalid password configuration: min_length must be at least 1".to_string(),
                });
            }
        }

        if self.auth.google.enabled && (self.auth.google.client_id.is_empty() || self.auth.google.client_secret.is_empty()) {
            return Err(Error::Internal {
                operation: "Config validation: Google sign-in is enabled but client_id or client_secret is missing".to_string(),
            });
        }

        if !self.auth.native.enabled && !self.auth.google.enabled {
            return Err(Error::Internal {
                operation: "Config validation: no authentication methods are enabled. Enable native or google authentication."
                    .to_string(),
            });
        }

        if self.auth.security.jwt_expiry.as_secs() < 300 {
            return Err(Error::Internal {
                operation: "Config validation: JWT expiry duration is too short (minimum 5 minutes)".to_string(),
            });
        }

        if self.auth.security.jwt_expiry.as_secs() > 86400 * 30 {
            return Err(Error::Internal {
                operation: "Config validation: JWT expiry duration is too long (maximum 30 days)".to_string(),
            });
        }

        if self.auth.security.cors.allowed_origins.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin."
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("HOTELCTL_SECRET_KEY", "test-secret");

            let config = Config::load(&args("missing.yaml")).expect("config should load");
            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 3000);
            assert!(config.auth.native.enabled);
            assert!(!config.auth.google.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_is_loaded() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                host: 127.0.0.1
                port: 8080
                secret_key: file-secret
                admin_username: boss
                "#,
            )?;

            let config = Config::load(&args("config.yaml")).expect("config should load");
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 8080);
            assert_eq!(config.admin_username, "boss");
            assert_eq!(config.bind_address(), "127.0.0.1:8080");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 8080
                secret_key: file-secret
                "#,
            )?;
            jail.set_env("HOTELCTL_PORT", "9090");
            jail.set_env("HOTELCTL_AUTH__SECURITY__JWT_EXPIRY", "1h");
            jail.set_env("DATABASE_URL", "postgres://localhost/hotel");

            let config = Config::load(&args("config.yaml")).expect("config should load");
            assert_eq!(config.port, 9090);
            assert_eq!(config.auth.security.jwt_expiry, Duration::from_secs(3600));
            assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/hotel"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_secret_key_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "port: 8080\n")?;

            let result = Config::load(&args("config.yaml"));
            assert!(result.is_err());
            Ok(())
        });
    }

    #[test]
    fn test_google_requires_credentials() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                secret_key: s3cret
                auth:
                  google:
                    enabled: true
                "#,
            )?;

            let result = Config::load(&args("config.yaml"));
            assert!(result.is_err());
            Ok(())
        });
    }

    #[test]
    fn test_short_jwt_expiry_rejected() {
        let mut config = Config {
            secret_key: Some("s".to_string()),
            ..Default::default()
        };
        config.auth.security.jwt_expiry = Duration::from_secs(60);
        assert!(config.validate().is_err());
    }
}
