//! Configuration management

use std::{env, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Listener configuration
    pub server: ServerConfig,
    /// Upstream banking API configuration
    pub upstream: UpstreamConfig,
    /// Credential material references
    pub credentials: CredentialsConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// Upstream banking API configuration.
///
/// The two hostnames are fixed per environment; a request selects between
/// them with the `x-environment` indicator. Everything else about the
/// upstream is opaque to the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Staging environment hostname (the default target)
    pub stage_host: String,
    /// Production environment hostname (explicit opt-in)
    pub production_host: String,
    /// Upstream HTTPS port
    pub port: u16,
    /// Bound on the full upstream request/response cycle. A timeout
    /// surfaces as the same transport-failure outcome as a refused
    /// connection.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            stage_host: "matls-clients.api.stage.cora.com.br".to_string(),
            production_host: "matls-clients.api.cora.com.br".to_string(),
            port: 443,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Credential material references.
///
/// Each value is either a literal or an `env:VAR_NAME` indirection. The
/// defaults point at the environment variables the deployment has always
/// used. Certificate and key are base64-encoded PEM at rest; decoding
/// happens once at startup in [`crate::credentials::CredentialSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Base64-encoded client certificate (PEM)
    pub certificate: String,
    /// Base64-encoded client private key (PEM)
    pub private_key: String,
    /// Shared gateway secret callers present in `x-proxy-secret`
    pub secret: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            certificate: "env:CORA_CERT_BASE64".to_string(),
            private_key: "env:CORA_KEY_BASE64".to_string(),
            secret: "env:PROXY_SECRET".to_string(),
        }
    }
}

impl CredentialsConfig {
    /// Resolve the certificate value (expand `env:VAR`)
    pub fn resolve_certificate(&self) -> Result<String> {
        resolve_value("credentials.certificate", &self.certificate)
    }

    /// Resolve the private key value (expand `env:VAR`)
    pub fn resolve_private_key(&self) -> Result<String> {
        resolve_value("credentials.private_key", &self.private_key)
    }

    /// Resolve the gateway secret (expand `env:VAR`)
    pub fn resolve_secret(&self) -> Result<String> {
        resolve_value("credentials.secret", &self.secret)
    }
}

/// Expand an `env:VAR` reference, or pass a literal through.
///
/// Missing or empty values are a configuration failure: the process must
/// refuse to start rather than run without its credential material.
fn resolve_value(field: &str, value: &str) -> Result<String> {
    let resolved = if let Some(var_name) = value.strip_prefix("env:") {
        env::var(var_name).map_err(|_| {
            Error::Config(format!(
                "{field}: environment variable {var_name} is not set"
            ))
        })?
    } else {
        value.to_string()
    };

    if resolved.is_empty() {
        return Err(Error::Config(format!("{field} is empty")));
    }
    Ok(resolved)
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        // Load from file if provided
        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (CORA_PROXY_ prefix)
        figment = figment.merge(Env::prefixed("CORA_PROXY_").split("__"));

        figment.extract().map_err(|e| Error::Config(e.to_string()))
    }
}
