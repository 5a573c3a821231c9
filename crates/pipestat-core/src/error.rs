//! Error taxonomy for component resolution.

/// Errors produced while reading inputs or resolving components.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid component pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid pipeline records: {0}")]
    InvalidRecords(String),

    #[error("pipeline record {index} is missing string field '{field}'")]
    MalformedRecord { index: usize, field: &'static str },

    #[error(
        "some components were not found in pipeline history: {}",
        .components.join(",")
    )]
    UnresolvedComponents { components: Vec<String> },

    #[error("invalid {kind}: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_components_lists_names() {
        let err = ResolveError::UnresolvedComponents {
            components: vec!["search".to_string(), "billing".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("not found in pipeline history"));
        assert!(msg.contains("search,billing"));
    }

    #[test]
    fn test_malformed_record_names_index_and_field() {
        let err = ResolveError::MalformedRecord {
            index: 3,
            field: "status",
        };
        let msg = err.to_string();
        assert!(msg.contains("record 3"));
        assert!(msg.contains("'status'"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "pipestat.toml missing");
        let err: ResolveError = io.into();
        assert!(matches!(err, ResolveError::Io(_)));
        assert!(err.to_string().contains("pipestat.toml missing"));
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").expect_err("unbalanced group must fail");
        let err = ResolveError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().contains("'('"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
