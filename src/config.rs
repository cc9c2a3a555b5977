//! Configuration management for Book Register

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL of this client, used to build the login callback
    pub public_url: String,
}

/// Where the book canister is reached
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    /// Gateway host serving canister calls
    pub host: String,
    pub canister_id: String,
    pub connect_timeout_secs: u64,
}

/// Identity provider used for sign-in
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IdentityConfig {
    /// Login page of the identity provider
    pub provider_url: String,
    /// Shared secret the provider signs its assertions with
    pub assertion_secret: String,
    /// Session cookie name
    pub cookie_name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub display_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Identity provider and canister differ between local replica and mainnet
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("BOOK_REGISTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "identity.assertion_secret",
                env::var("IDENTITY_ASSERTION_SECRET").ok(),
            )?
            .set_override_option("backend.canister_id", env::var("CANISTER_ID_BACKEND").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Callback URL the identity provider redirects back to
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.server.public_url.trim_end_matches('/'))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:4943".to_string(),
            canister_id: "bkyz2-fmaaa-aaaaa-qaaaq-cai".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            provider_url: "http://be2us-64aaa-aaaaa-qaabq-cai.localhost:4943/authorize".to_string(),
            assertion_secret: "change-this-secret-in-production".to_string(),
            cookie_name: "book_register_session".to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { display_secs: 3 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
