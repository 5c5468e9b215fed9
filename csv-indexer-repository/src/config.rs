//! Connection configuration for search index providers.

use std::time::Duration;

/// Default request timeout applied to every call against the backend.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest number of documents accepted in a single upload call.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Configuration for connecting to the search index backend.
///
/// Controls the endpoint, optional credentials, the per-request timeout and
/// the upper bound on batch uploads.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Backend URL (e.g., "http://localhost:9200").
    pub url: String,
    /// Optional basic-auth username and password.
    pub credentials: Option<(String, String)>,
    /// Timeout applied to each request.
    pub request_timeout: Duration,
    /// Maximum number of documents allowed in a single upload call.
    pub max_batch_size: usize,
}

impl ConnectionConfig {
    /// Create a config for the given URL with default timeout and batch limit.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Attach basic-auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::new("http://localhost:9200");
        assert_eq!(config.url, "http://localhost:9200");
        assert!(config.credentials.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_batch_size, 1000);
    }

    #[test]
    fn test_builders() {
        let config = ConnectionConfig::new("https://search:9200")
            .with_credentials("admin", "secret")
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(
            config.credentials,
            Some(("admin".to_string(), "secret".to_string()))
        );
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
