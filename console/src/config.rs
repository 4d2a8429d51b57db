//! Configuration for the console.
//!
//! Loaded from environment variables with sensible defaults. The bearer
//! token comes from the process-local credential store an external login
//! flow populates; any of the three historical key names is accepted, and
//! absence is tolerated — the console then talks to the store
//! unauthenticated.

use std::env;
use ticketdesk_client::Credentials;

/// Console configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the entity store.
    pub store_url: String,
    /// Bearer token for the entity store, when the login flow left one.
    pub token: Option<String>,
    /// Log level filter (`RUST_LOG` syntax).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            store_url: env::var("TICKETDESK_STORE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            token: env::var("TICKETDESK_ACCESS_TOKEN")
                .or_else(|_| env::var("TICKETDESK_TOKEN"))
                .or_else(|_| env::var("TICKETDESK_AUTH_TOKEN"))
                .ok(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Entity store credentials for this configuration.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        match &self.token {
            Some(token) => Credentials::bearer(token.clone()),
            None => Credentials::anonymous(),
        }
    }
}
