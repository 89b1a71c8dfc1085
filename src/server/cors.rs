//! Cross-origin policy built from the `[cors]` config table.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::CorsConfig;

impl CorsConfig {
    fn wildcard_origin(&self) -> bool {
        self.allow_origins.iter().any(|o| o == "*")
    }

    /// Build the tower-http layer for this policy.
    ///
    /// A disabled policy yields a layer that adds no CORS headers, so
    /// browsers reject every cross-origin request. Entries that do not
    /// parse as an origin, method or header name are skipped with a warning.
    /// Credentials are never allowed together with a wildcard origin.
    pub fn layer(&self) -> CorsLayer {
        if !self.enabled {
            return CorsLayer::new();
        }

        let origin = if self.wildcard_origin() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(parse_all::<HeaderValue>("origin", &self.allow_origins))
        };

        let layer = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(parse_all::<Method>("method", &self.allow_methods))
            .allow_headers(parse_all::<HeaderName>("header", &self.allow_headers))
            .max_age(Duration::from_secs(self.max_age));

        if self.allow_credentials && !self.wildcard_origin() {
            layer.allow_credentials(true)
        } else {
            if self.allow_credentials {
                tracing::warn!("ignoring allow_credentials with a wildcard origin");
            }
            layer
        }
    }
}

fn parse_all<T: std::str::FromStr>(what: &str, items: &[String]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match item.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(kind = what, value = %item, "skipping invalid CORS entry");
                None
            }
        })
        .collect()
}
