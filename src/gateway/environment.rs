//! Environment resolution
//!
//! Maps a caller-supplied indicator to one of two fixed upstream hosts.
//! Only the literal string `production` selects the production host;
//! anything else, or no indicator at all, selects stage. Accidental
//! production calls therefore require an explicit opt-in.

use std::fmt;

use axum::http::HeaderMap;

use crate::config::UpstreamConfig;

/// Header carrying the environment indicator for all routes except token
/// issuance (which reads `environment` from the JSON body instead).
pub const ENVIRONMENT_HEADER: &str = "x-environment";

/// Upstream environment selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Staging environment (the default)
    Stage,
    /// Production environment (explicit opt-in)
    Production,
}

impl Environment {
    /// Resolve from an optional indicator value.
    pub fn from_indicator(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Stage,
        }
    }

    /// Resolve from the `x-environment` request header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_indicator(
            headers
                .get(ENVIRONMENT_HEADER)
                .and_then(|v| v.to_str().ok()),
        )
    }

    /// The fixed hostname for this environment.
    pub fn host<'a>(&self, upstream: &'a UpstreamConfig) -> &'a str {
        match self {
            Self::Stage => &upstream.stage_host,
            Self::Production => &upstream.production_host,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage => write!(f, "stage"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn only_exact_production_selects_production() {
        assert_eq!(
            Environment::from_indicator(Some("production")),
            Environment::Production
        );
        // Anything else defaults to stage, including near-misses
        assert_eq!(Environment::from_indicator(None), Environment::Stage);
        assert_eq!(Environment::from_indicator(Some("stage")), Environment::Stage);
        assert_eq!(
            Environment::from_indicator(Some("Production")),
            Environment::Stage
        );
        assert_eq!(Environment::from_indicator(Some("prod")), Environment::Stage);
        assert_eq!(Environment::from_indicator(Some("")), Environment::Stage);
    }

    #[test]
    fn from_headers_reads_x_environment() {
        let mut headers = HeaderMap::new();
        assert_eq!(Environment::from_headers(&headers), Environment::Stage);

        headers.insert(ENVIRONMENT_HEADER, HeaderValue::from_static("production"));
        assert_eq!(Environment::from_headers(&headers), Environment::Production);
    }

    #[test]
    fn host_selects_configured_hostname() {
        let upstream = UpstreamConfig::default();
        assert_eq!(
            Environment::Stage.host(&upstream),
            "matls-clients.api.stage.cora.com.br"
        );
        assert_eq!(
            Environment::Production.host(&upstream),
            "matls-clients.api.cora.com.br"
        );
    }
}
