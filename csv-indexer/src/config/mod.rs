//! Configuration for the index rebuild.
//!
//! Values come from environment variables (optionally loaded from `.env`), with
//! defaults suited to a local OpenSearch node.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;

use crate::schema::INDEX_NAME;
use crate::source::DEFAULT_DELIMITER;
use crate::IndexingError;
use csv_indexer_repository::config::{DEFAULT_REQUEST_TIMEOUT, MAX_BATCH_SIZE};

/// Default source file.
const DEFAULT_SOURCE_FILE: &str = "USGS_WA_Features_Descriptions.txt";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Settings for one rebuild run.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub source_path: PathBuf,
    pub delimiter: u8,
    pub opensearch_url: String,
    pub credentials: Option<(String, String)>,
    pub index_name: String,
    pub batch_size: usize,
    pub request_timeout: Duration,
    /// Offset attached to source timestamps that carry none.
    pub timestamp_offset: FixedOffset,
}

impl IndexerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SOURCE_FILE`: Delimited source path (default: USGS_WA_Features_Descriptions.txt)
    /// - `SOURCE_DELIMITER`: Single-byte delimiter, `\t` for tab (default: `|`)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: Optional basic-auth credentials
    /// - `INDEX_NAME`: Target index (default: features)
    /// - `BATCH_SIZE`: Documents per upload, 1 to 1000 (default: 1000)
    /// - `REQUEST_TIMEOUT_SECS`: Per-call timeout in seconds (default: 30)
    /// - `TIMESTAMP_OFFSET_MINUTES`: Offset east of UTC for timestamps (default: 0)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexingError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let source_path = get("SOURCE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_FILE));

        let delimiter = match lookup("SOURCE_DELIMITER").filter(|v| !v.is_empty()) {
            Some(raw) => parse_delimiter(&raw)?,
            None => DEFAULT_DELIMITER,
        };

        let opensearch_url =
            get("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());

        let password = lookup("OPENSEARCH_PASSWORD").filter(|v| !v.is_empty());
        let credentials = match (get("OPENSEARCH_USERNAME"), password) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(IndexingError::config(
                    "OPENSEARCH_USERNAME is set but OPENSEARCH_PASSWORD is not",
                ))
            }
            (None, Some(_)) => {
                return Err(IndexingError::config(
                    "OPENSEARCH_PASSWORD is set but OPENSEARCH_USERNAME is not",
                ))
            }
        };

        let index_name = get("INDEX_NAME").unwrap_or_else(|| INDEX_NAME.to_string());

        let batch_size = match get("BATCH_SIZE") {
            Some(raw) => parse_number::<usize>("BATCH_SIZE", &raw)?,
            None => MAX_BATCH_SIZE,
        };
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            return Err(IndexingError::config(format!(
                "BATCH_SIZE must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, batch_size
            )));
        }

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => match parse_number::<u64>("REQUEST_TIMEOUT_SECS", &raw)? {
                0 => {
                    return Err(IndexingError::config(
                        "REQUEST_TIMEOUT_SECS must be greater than 0",
                    ))
                }
                secs => Duration::from_secs(secs),
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let offset_minutes = match get("TIMESTAMP_OFFSET_MINUTES") {
            Some(raw) => parse_number::<i32>("TIMESTAMP_OFFSET_MINUTES", &raw)?,
            None => 0,
        };
        let timestamp_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                IndexingError::config(format!(
                    "TIMESTAMP_OFFSET_MINUTES out of range: {}",
                    offset_minutes
                ))
            })?;

        Ok(Self {
            source_path,
            delimiter,
            opensearch_url,
            credentials,
            index_name,
            batch_size,
            request_timeout,
            timestamp_offset,
        })
    }

    /// Replace the source path, e.g. with a command line argument.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }
}

fn parse_delimiter(raw: &str) -> Result<u8, IndexingError> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(IndexingError::config(format!(
                "SOURCE_DELIMITER must be a single ASCII character, got {:?}",
                raw
            ))),
        },
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, IndexingError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| IndexingError::config(format!("Invalid {} {:?}: {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<IndexerConfig, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IndexerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(
            config.source_path,
            PathBuf::from("USGS_WA_Features_Descriptions.txt")
        );
        assert_eq!(config.delimiter, b'|');
        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert!(config.credentials.is_none());
        assert_eq!(config.index_name, "features");
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.timestamp_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("SOURCE_FILE", "/data/features.csv"),
            ("SOURCE_DELIMITER", ","),
            ("OPENSEARCH_URL", "https://search.internal:9200"),
            ("OPENSEARCH_USERNAME", "admin"),
            ("OPENSEARCH_PASSWORD", "secret"),
            ("INDEX_NAME", "features_v2"),
            ("BATCH_SIZE", "250"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("TIMESTAMP_OFFSET_MINUTES", "-480"),
        ])
        .unwrap();

        assert_eq!(config.source_path, PathBuf::from("/data/features.csv"));
        assert_eq!(config.delimiter, b',');
        assert_eq!(
            config.credentials,
            Some(("admin".to_string(), "secret".to_string()))
        );
        assert_eq!(config.index_name, "features_v2");
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.timestamp_offset.local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn test_tab_delimiter() {
        assert_eq!(config(&[("SOURCE_DELIMITER", "\\t")]).unwrap().delimiter, b'\t');
        assert_eq!(config(&[("SOURCE_DELIMITER", "\t")]).unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_invalid_values() {
        let cases: &[&[(&str, &str)]] = &[
            &[("BATCH_SIZE", "0")],
            &[("BATCH_SIZE", "1001")],
            &[("BATCH_SIZE", "many")],
            &[("REQUEST_TIMEOUT_SECS", "0")],
            &[("SOURCE_DELIMITER", "||")],
            &[("TIMESTAMP_OFFSET_MINUTES", "100000")],
            &[("OPENSEARCH_USERNAME", "admin")],
            &[("OPENSEARCH_PASSWORD", "secret")],
        ];

        for vars in cases {
            assert!(
                matches!(config(vars), Err(IndexingError::ConfigError(_))),
                "expected config error for {:?}",
                vars
            );
        }
    }

    #[test]
    fn test_with_source_path() {
        let config = config(&[]).unwrap().with_source_path("other.txt");
        assert_eq!(config.source_path, PathBuf::from("other.txt"));
    }
}
