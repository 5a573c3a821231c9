//! Output renderers for resolution results.
//!
//! - JSON: `{"<component>": {"pipeline": .., "status": ..}}` for machines
//! - Text: one `<pipeline>\t<status>` line per matched component

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};
use crate::model::ResolutionResult;
use crate::status::StatusRules;

/// Output format for matched components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ResolveError::InvalidValue {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}

pub fn render_json(result: &ResolutionResult) -> Result<String> {
    Ok(serde_json::to_string(result)?)
}

pub fn render_json_pretty(result: &ResolutionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render matched components in pipeline-record order.
///
/// When `color` is set the status is wrapped in its category's ANSI style.
pub fn render_text(result: &ResolutionResult, rules: &StatusRules, color: bool) -> String {
    let mut out = String::new();
    for (_, entry) in result.matched_in_record_order() {
        let status = if color {
            rules.classify(&entry.status).paint(&entry.status)
        } else {
            entry.status.clone()
        };
        out.push_str(&entry.pipeline);
        out.push('\t');
        out.push_str(&status);
        out.push('\n');
    }
    out
}

/// Diagnostic line naming the components that were not found.
pub fn render_unmatched(unmatched: &[String]) -> Option<String> {
    if unmatched.is_empty() {
        return None;
    }
    Some(format!(
        "some components were not found in pipeline history: {}",
        unmatched.join(",")
    ))
}
