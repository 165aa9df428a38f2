//! Configuration loading for the console client.
//!
//! Reads a `graphmail.toml` file and applies environment variable
//! overrides, then hands the values to the core as plain strings.

use anyhow::{Context, Result};
use graphmail_oauth::AuthConfig;
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// OAuth app registration values.
    pub auth: AuthSection,
}

/// OAuth app registration values.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSection {
    /// Application (client) ID.
    pub client_id: String,
    /// Directory (tenant) ID, or `common`/`organizations`/`consumers`.
    pub tenant_id: String,
    /// Comma-separated scope list, e.g. `User.Read,Mail.Read`.
    pub scopes: String,
}

impl Config {
    /// Loads configuration from the given TOML file with environment
    /// variable overrides (`GRAPHMAIL_CLIENT_ID`, `GRAPHMAIL_TENANT_ID`,
    /// `GRAPHMAIL_SCOPES`).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if let Ok(client_id) = env::var("GRAPHMAIL_CLIENT_ID") {
            config.auth.client_id = client_id;
        }
        if let Ok(tenant_id) = env::var("GRAPHMAIL_TENANT_ID") {
            config.auth.tenant_id = tenant_id;
        }
        if let Ok(scopes) = env::var("GRAPHMAIL_SCOPES") {
            config.auth.scopes = scopes;
        }

        Ok(config)
    }

    /// Converts the auth section into the core's credential configuration.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            client_id: self.auth.client_id.clone(),
            tenant_id: self.auth.tenant_id.clone(),
            scopes: self.auth.scopes.clone(),
        }
    }
}
