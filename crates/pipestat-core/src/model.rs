//! Component patterns, pipeline records and resolution results.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ResolveError, Result};

/// The unique set of component patterns, in first-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSet {
    patterns: Vec<String>,
}

impl ComponentSet {
    /// Build a set from patterns; repeated patterns collapse into the first one.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let patterns = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Self { patterns }
    }

    /// Parse a newline-separated component list.
    ///
    /// Blank lines are skipped: an empty pattern would match every pipeline.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .filter(|line| !line.trim().is_empty()),
        )
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}

/// One pipeline run: its identifier and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRecord {
    pub pipeline: String,
    pub status: String,
}

impl PipelineRecord {
    pub fn new(pipeline: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            status: status.into(),
        }
    }

    fn from_value(index: usize, value: &Value) -> Result<Self> {
        let field = |name: &'static str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(ResolveError::MalformedRecord { index, field: name })
        };
        Ok(Self {
            pipeline: field("pipeline")?,
            status: field("status")?,
        })
    }
}

/// Decode a JSON array of `{"pipeline": .., "status": ..}` objects, keeping order.
///
/// Fields other than `pipeline` and `status` are ignored.
pub fn parse_records(json: &str) -> Result<Vec<PipelineRecord>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ResolveError::InvalidRecords(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ResolveError::InvalidRecords(
            "expected a JSON array of pipeline records".to_string(),
        ));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| PipelineRecord::from_value(index, item))
        .collect()
}

/// The pipeline run a component resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntry {
    pub pipeline: String,
    pub status: String,

    /// Position of the matching record in the input sequence.
    #[serde(skip)]
    pub record_index: usize,
}

/// Outcome of one resolution pass.
///
/// Every pattern of the input set is either a key of `matched` or an element
/// of `unmatched`, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Component pattern to the first pipeline run that matched it.
    #[serde(flatten)]
    pub matched: BTreeMap<String, ResolvedEntry>,

    /// Patterns with no matching run, in declaration order.
    #[serde(skip)]
    pub unmatched: Vec<String>,
}

impl ResolutionResult {
    /// Whether every component was found.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Matched components ordered by the position of their pipeline record.
    pub fn matched_in_record_order(&self) -> Vec<(&str, &ResolvedEntry)> {
        let mut entries: Vec<_> = self
            .matched
            .iter()
            .map(|(pattern, entry)| (pattern.as_str(), entry))
            .collect();
        entries.sort_by_key(|(_, entry)| entry.record_index);
        entries
    }
}
