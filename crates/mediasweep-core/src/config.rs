//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env`) and
//! cover the storage backend, the cleanup timeout and log output.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

/// Log output format for binaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    environment: String,
    storage_backend: StorageBackend,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    aws_region: Option<String>,
    local_storage_path: Option<String>,
    cleanup_timeout_secs: u64,
    log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let cleanup_timeout_secs = match var("CLEANUP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| {
                anyhow::anyhow!("CLEANUP_TIMEOUT_SECS must be a whole number of seconds")
            })?,
            None => 0,
        };

        let log_format = match var("LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("text") | None => LogFormat::Text,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                ))
            }
        };

        let config = Config {
            environment,
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            cleanup_timeout_secs,
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration for a local storage root, used by tools and tests.
    pub fn local(path: impl Into<String>) -> Self {
        Config {
            environment: "development".to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: Some(path.into()),
            cleanup_timeout_secs: 0,
            log_format: LogFormat::Text,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    /// Upper bound for one cleanup invocation; `None` when unbounded.
    pub fn cleanup_timeout(&self) -> Option<Duration> {
        match self.cleanup_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn s3_is_the_default_backend() {
        let config = config_from(&[("S3_BUCKET", "media"), ("AWS_REGION", "eu-west-1")]).unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::S3);
        assert_eq!(config.s3_bucket(), Some("media"));
        assert_eq!(config.s3_region(), None);
        assert_eq!(config.aws_region(), Some("eu-west-1"));
        assert_eq!(config.environment(), "development");
        assert_eq!(config.cleanup_timeout(), None);
        assert_eq!(config.log_format(), LogFormat::Text);
    }

    #[test]
    fn s3_requires_bucket_and_region() {
        let err = config_from(&[("S3_REGION", "us-east-1")]).unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));

        let err = config_from(&[("S3_BUCKET", "media")]).unwrap_err();
        assert!(err.to_string().contains("S3_REGION or AWS_REGION"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let err = config_from(&[("S3_BUCKET", "  "), ("S3_REGION", "us-east-1")]).unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn local_backend_requires_path() {
        let err = config_from(&[("STORAGE_BACKEND", "local")]).unwrap_err();
        assert!(err.to_string().contains("LOCAL_STORAGE_PATH"));

        let config = config_from(&[
            ("STORAGE_BACKEND", "LOCAL"),
            ("LOCAL_STORAGE_PATH", "/var/lib/media"),
        ])
        .unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(config.local_storage_path(), Some("/var/lib/media"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = config_from(&[("STORAGE_BACKEND", "ftp")]).unwrap_err();
        assert!(err.to_string().contains("Invalid storage backend"));
    }

    #[test]
    fn cleanup_timeout_and_log_format() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/media"),
            ("CLEANUP_TIMEOUT_SECS", "30"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.cleanup_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.log_format(), LogFormat::Json);

        let err = config_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/media"),
            ("CLEANUP_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("CLEANUP_TIMEOUT_SECS"));
    }
}
