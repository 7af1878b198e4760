//! Centralised error type for the registry.
//!
//! File-level failures (`FileMissing`, `NoSource`, `Io`, `Parse`) are
//! recoverable per provider; `SchemaViolation` fails the whole provider load.
//! Out-of-range coordinates and negative latency are not errors at all, see
//! `validator::ViolationKind`.

use crate::model::Provider;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("no data source configured for {0}")]
    NoSource(Provider),

    #[error("data file for {provider} not found: {}", path.display())]
    FileMissing { provider: Provider, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON for {provider} in {}: {source}", path.display())]
    Parse {
        provider: Provider,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema violation in {provider} dataset: {reason}")]
    SchemaViolation { provider: Provider, reason: String },

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RegistryError {
    /// Failures that only affect the provider whose file could not be read.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegistryError::NoSource(_)
                | RegistryError::FileMissing { .. }
                | RegistryError::Io { .. }
                | RegistryError::Parse { .. }
        )
    }

    pub(crate) fn schema(provider: Provider, reason: impl Into<String>) -> Self {
        RegistryError::SchemaViolation {
            provider,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_level_errors_are_recoverable() {
        let missing = RegistryError::FileMissing {
            provider: Provider::Aws,
            path: PathBuf::from("data/aws/nodes.json"),
        };
        assert!(missing.is_recoverable());
        assert!(RegistryError::NoSource(Provider::Azure).is_recoverable());

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parse = RegistryError::Parse {
            provider: Provider::Aws,
            path: PathBuf::from("x.json"),
            source: parse_err,
        };
        assert!(parse.is_recoverable());
    }

    #[test]
    fn test_schema_violation_is_fatal() {
        let err = RegistryError::schema(Provider::TencentCloud, "node 3: missing field `name`");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "schema violation in tencent_cloud dataset: node 3: missing field `name`"
        );
    }
}
