//! Route table
//!
//! A fixed, ordered list of endpoint definitions mapping inbound patterns to
//! upstream path templates. Every entry resolves to the same underlying
//! forwarding call; the named entries exist only so callers do not need to
//! know the upstream's exact path shape for common operations. The `/proxy`
//! wildcard is the canonical, fully generic form and is registered last.

use axum::http::Method;

/// One inbound endpoint and its upstream mapping.
#[derive(Debug)]
pub struct Endpoint {
    /// Inbound HTTP method; `None` matches any method (wildcard entry)
    pub method: Option<Method>,
    /// Inbound path pattern (axum syntax, `{param}` / `{*param}`)
    pub path: &'static str,
    /// Upstream path template; `{param}` substitutes verbatim
    pub upstream: &'static str,
    /// Whether the inbound query string is appended to the upstream path
    pub forward_query: bool,
}

/// The fixed route table, wildcard last.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        method: Some(Method::POST),
        path: "/invoices",
        upstream: "/invoices",
        forward_query: false,
    },
    Endpoint {
        method: Some(Method::GET),
        path: "/invoices",
        upstream: "/invoices",
        forward_query: true,
    },
    Endpoint {
        method: Some(Method::GET),
        path: "/invoices/{invoice_id}",
        upstream: "/invoices/{invoice_id}",
        forward_query: false,
    },
    Endpoint {
        method: Some(Method::DELETE),
        path: "/invoices/{invoice_id}",
        upstream: "/invoices/{invoice_id}",
        forward_query: false,
    },
    Endpoint {
        method: Some(Method::GET),
        path: "/businesses/{business_id}/balance",
        upstream: "/businesses/{business_id}/balance",
        forward_query: false,
    },
    Endpoint {
        method: Some(Method::GET),
        path: "/businesses/{business_id}/statements",
        upstream: "/businesses/{business_id}/statements",
        forward_query: true,
    },
    // The inbound /cora prefix is historical; the upstream path is /transfers.
    Endpoint {
        method: Some(Method::GET),
        path: "/cora/transfers",
        upstream: "/transfers",
        forward_query: true,
    },
    Endpoint {
        method: Some(Method::GET),
        path: "/cora/transfers/{transfer_id}",
        upstream: "/transfers/{transfer_id}",
        forward_query: false,
    },
    // Generic passthrough: any method, any path below /proxy.
    Endpoint {
        method: None,
        path: "/proxy/{*path}",
        upstream: "/{path}",
        forward_query: true,
    },
];

impl Endpoint {
    /// Resolve the upstream path for this endpoint: substitute captured path
    /// parameters verbatim into the template and append the raw inbound
    /// query string when this entry forwards queries.
    ///
    /// Parameter values are placed as path segments without further
    /// escaping; the query string is relayed exactly as received so the
    /// upstream sees the caller's original ordering and encoding.
    pub fn upstream_path(&self, params: &[(&str, &str)], query: Option<&str>) -> String {
        let mut path = self.upstream.to_string();
        for (name, value) in params {
            path = path.replace(&format!("{{{name}}}"), value);
        }

        match query {
            Some(q) if self.forward_query && !q.is_empty() => format!("{path}?{q}"),
            _ => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(path: &'static str) -> &'static Endpoint {
        ENDPOINTS
            .iter()
            .find(|e| e.path == path)
            .expect("endpoint not in table")
    }

    #[test]
    fn wildcard_is_last_and_matches_any_method() {
        let last = ENDPOINTS.last().unwrap();
        assert_eq!(last.path, "/proxy/{*path}");
        assert!(last.method.is_none());
        assert!(last.forward_query);
    }

    #[test]
    fn named_entries_have_explicit_methods() {
        for endpoint in &ENDPOINTS[..ENDPOINTS.len() - 1] {
            assert!(endpoint.method.is_some(), "{} lacks a method", endpoint.path);
        }
    }

    #[test]
    fn path_parameters_substitute_verbatim() {
        let ep = endpoint("/businesses/{business_id}/balance");
        let path = ep.upstream_path(&[("business_id", "biz-123")], None);
        assert_eq!(path, "/businesses/biz-123/balance");
    }

    #[test]
    fn arbitrary_parameter_strings_are_not_escaped() {
        let ep = endpoint("/invoices/{invoice_id}");
        // Caller-supplied identifiers land in the path untouched
        let path = ep.upstream_path(&[("invoice_id", "inv_00%zz")], None);
        assert_eq!(path, "/invoices/inv_00%zz");
    }

    #[test]
    fn query_forwards_only_when_enabled() {
        let listing = ENDPOINTS
            .iter()
            .find(|e| e.path == "/invoices" && e.forward_query)
            .unwrap();
        assert_eq!(
            listing.upstream_path(&[], Some("start=2024-01-01&end=2024-02-01")),
            "/invoices?start=2024-01-01&end=2024-02-01"
        );

        let detail = endpoint("/invoices/{invoice_id}");
        assert_eq!(
            detail.upstream_path(&[("invoice_id", "x")], Some("ignored=1")),
            "/invoices/x"
        );
    }

    #[test]
    fn empty_query_appends_nothing() {
        let ep = ENDPOINTS
            .iter()
            .find(|e| e.path == "/invoices" && e.forward_query)
            .unwrap();
        assert_eq!(ep.upstream_path(&[], Some("")), "/invoices");
        assert_eq!(ep.upstream_path(&[], None), "/invoices");
    }

    #[test]
    fn transfers_drop_the_inbound_cora_prefix() {
        let ep = endpoint("/cora/transfers/{transfer_id}");
        assert_eq!(
            ep.upstream_path(&[("transfer_id", "t-9")], None),
            "/transfers/t-9"
        );
        let listing = endpoint("/cora/transfers");
        assert_eq!(listing.upstream_path(&[], None), "/transfers");
    }

    #[test]
    fn wildcard_relays_the_suffix_with_query() {
        let ep = ENDPOINTS.last().unwrap();
        assert_eq!(
            ep.upstream_path(&[("path", "businesses/X/balance")], Some("limit=5")),
            "/businesses/X/balance?limit=5"
        );
    }
}
