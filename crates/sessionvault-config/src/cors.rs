//! Browser origins allowed to call the API with credentials.

use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
        Self::from_list(&raw)
    }

    /// Parse a comma-separated origin list.
    ///
    /// Token cookies ride on credentialed requests, where browsers refuse a
    /// wildcard origin, so `*` entries are dropped. Trailing slashes are
    /// removed because the `Origin` header never carries one.
    pub fn from_list(raw: &str) -> Self {
        let mut allowed_origins: Vec<String> = Vec::new();
        for origin in raw.split(',').map(str::trim) {
            let origin = origin.trim_end_matches('/');
            if origin.is_empty() || origin == "*" {
                continue;
            }
            if !allowed_origins.iter().any(|o| o == origin) {
                allowed_origins.push(origin.to_string());
            }
        }

        if allowed_origins.is_empty() {
            tracing::warn!("No usable CORS origins configured; cross-origin requests will be refused");
        }

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins() {
        let config = CorsConfig::from_list(DEFAULT_ORIGINS);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_origins_are_normalized() {
        let config = CorsConfig::from_list(
            " https://app.example.com/ ,,*, https://app.example.com,https://admin.example.com",
        );
        assert_eq!(
            config.allowed_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
    }

    #[test]
    fn test_wildcard_only_allows_nothing() {
        assert!(CorsConfig::from_list("*").allowed_origins.is_empty());
    }
}
