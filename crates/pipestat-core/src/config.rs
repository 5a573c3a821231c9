//! Runtime configuration loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. An explicit path (`--config`); failures are errors
//! 2. `$PIPESTAT_CONFIG`
//! 3. `./pipestat.toml` in the current working directory
//! 4. Built-in defaults
//!
//! Sources 2 and 3 fall back to the next source with a warning when they
//! cannot be loaded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ResolveError, Result};
use crate::policy::UnresolvedPolicy;
use crate::render::OutputFormat;
use crate::status::StatusRules;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "PIPESTAT_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pipestat.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipestatConfig {
    /// Policy for components missing from pipeline history.
    pub mode: UnresolvedPolicy,

    /// Output format for matched components.
    pub format: OutputFormat,

    /// Highlight statuses with ANSI colour in text output.
    pub color: bool,

    pub statuses: StatusRules,
}

impl Default for PipestatConfig {
    fn default() -> Self {
        Self {
            mode: UnresolvedPolicy::default(),
            format: OutputFormat::default(),
            color: true,
            statuses: StatusRules::default(),
        }
    }
}

impl PipestatConfig {
    /// Load configuration using the standard search order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(explicit, from_env.as_deref(), Path::new(LOCAL_CONFIG_FILE))
    }

    /// Search order with every source passed in.
    pub fn load_from(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        local: &Path,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        if let Some(path) = from_env {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(config) => {
                        info!(path = %path.display(), "loaded config from {}", CONFIG_ENV);
                        return Ok(config);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to load config from {}, falling back", CONFIG_ENV);
                    }
                }
            } else {
                warn!(path = %path.display(), "{} points to a non-existent file, falling back", CONFIG_ENV);
            }
        }

        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "loaded local config");
                    return Ok(config);
                }
                Err(e) => {
                    warn!(path = %local.display(), error = %e, "failed to load local config, using defaults");
                }
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|e| ResolveError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCategory;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create config");
        file.write_all(body.as_bytes()).expect("write config");
        path
    }

    #[test]
    fn test_defaults() {
        let config = PipestatConfig::default();
        assert_eq!(config.mode, UnresolvedPolicy::Strict);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.color);
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = PipestatConfig::parse("mode = \"lenient\"\n").expect("parse");
        assert_eq!(config.mode, UnresolvedPolicy::Lenient);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.statuses, StatusRules::default());
    }

    #[test]
    fn test_parse_full_file() {
        let config = PipestatConfig::parse(
            r#"
mode = "strict"
format = "json"
color = false

[statuses]
failure = ["broken"]
in_progress = ["building"]
"#,
        )
        .expect("parse");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.color);
        assert_eq!(config.statuses.classify("Building"), StatusCategory::InProgress);
        assert_eq!(config.statuses.classify("Failed"), StatusCategory::Other);
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert!(PipestatConfig::parse("mode = \"maybe\"").is_err());
    }

    #[test]
    fn test_explicit_path_wins_and_errors_propagate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let explicit = write_config(&dir, "explicit.toml", "format = \"json\"");
        let local = write_config(&dir, "pipestat.toml", "mode = \"lenient\"");

        let config =
            PipestatConfig::load_from(Some(&explicit), None, &local).expect("load explicit");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.mode, UnresolvedPolicy::Strict);

        let missing = dir.path().join("missing.toml");
        let err = PipestatConfig::load_from(Some(&missing), None, &local)
            .expect_err("missing explicit file must fail");
        assert!(matches!(err, ResolveError::Io(_)));

        let broken = write_config(&dir, "broken.toml", "mode = [");
        let err = PipestatConfig::load_from(Some(&broken), None, &local)
            .expect_err("unparseable explicit file must fail");
        assert!(matches!(err, ResolveError::Config(_)));
    }

    #[test]
    fn test_env_then_local_then_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let from_env = write_config(&dir, "env.toml", "color = false");
        let local = write_config(&dir, "pipestat.toml", "mode = \"lenient\"");

        let config = PipestatConfig::load_from(None, Some(&from_env), &local).expect("env");
        assert!(!config.color);
        assert_eq!(config.mode, UnresolvedPolicy::Strict);

        let gone = dir.path().join("gone.toml");
        let config = PipestatConfig::load_from(None, Some(&gone), &local).expect("local");
        assert_eq!(config.mode, UnresolvedPolicy::Lenient);

        let config = PipestatConfig::load_from(None, None, &gone).expect("defaults");
        assert_eq!(config, PipestatConfig::default());
    }

    #[test]
    fn test_broken_local_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = write_config(&dir, "pipestat.toml", "mode = [");
        let config = PipestatConfig::load_from(None, None, &local).expect("defaults");
        assert_eq!(config, PipestatConfig::default());
    }
}
