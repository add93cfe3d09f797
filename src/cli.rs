//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

/// Cora Proxy - credential-gated mTLS forwarding gateway
#[derive(Parser, Debug)]
#[command(name = "cora-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "CORA_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "CORA_PROXY_HOST")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "CORA_PROXY_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "CORA_PROXY_LOG_FORMAT")]
    pub log_format: Option<String>,
}
