//! Cora Proxy Library
//!
//! A credential-gated forwarding gateway for the Cora banking API. Internal
//! services call this proxy with plain HTTP and a shared secret; the proxy
//! injects the mutual-TLS client identity (certificate + private key) that
//! callers never hold and forwards each request to one of two fixed upstream
//! environments (stage or production).
//!
//! # Request flow
//!
//! inbound request → authentication gate (`x-proxy-secret`) → environment
//! resolution (`x-environment` header, or the `environment` body field for
//! token issuance) → route table → one outbound mTLS call → verbatim relay
//! of the upstream status, headers and body.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber.with(fmt::layer().json()).init();
        }
        _ => {
            subscriber.with(fmt::layer()).init();
        }
    }

    Ok(())
}
