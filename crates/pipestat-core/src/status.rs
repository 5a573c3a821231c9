//! Status categories and their display styles.

use serde::{Deserialize, Serialize};

/// Coarse category of a pipeline status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Failure,
    InProgress,
    Other,
}

impl StatusCategory {
    /// ANSI SGR sequence that clears any style.
    pub const RESET: &'static str = "\x1b[0m";

    /// ANSI SGR sequence used to highlight statuses of this category.
    pub fn style(&self) -> &'static str {
        match self {
            StatusCategory::Failure => "\x1b[1;31m",
            StatusCategory::InProgress => "\x1b[33m",
            StatusCategory::Other => "\x1b[32m",
        }
    }

    /// Wrap `text` in this category's style.
    pub fn paint(&self, text: &str) -> String {
        format!("{}{}{}", self.style(), text, Self::RESET)
    }
}

/// Status names assigned to the failure and in-progress categories.
///
/// Comparison is case-insensitive; anything unlisted is [`StatusCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRules {
    pub failure: Vec<String>,
    pub in_progress: Vec<String>,
}

impl Default for StatusRules {
    fn default() -> Self {
        Self {
            failure: ["failed", "failure", "error", "canceled", "cancelled"]
                .into_iter()
                .map(String::from)
                .collect(),
            in_progress: [
                "running",
                "inprogress",
                "in_progress",
                "pending",
                "queued",
                "notstarted",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl StatusRules {
    pub fn classify(&self, status: &str) -> StatusCategory {
        let status = status.trim();
        let listed = |names: &[String]| names.iter().any(|n| n.eq_ignore_ascii_case(status));

        if listed(self.failure.as_slice()) {
            StatusCategory::Failure
        } else if listed(self.in_progress.as_slice()) {
            StatusCategory::InProgress
        } else {
            StatusCategory::Other
        }
    }
}
