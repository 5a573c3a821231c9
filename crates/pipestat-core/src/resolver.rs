//! Resolve components to their most recent pipeline run.
//!
//! Each component pattern is a regular expression anchored at the start of
//! the pipeline identifier, so `auth` matches `auth-service-42` but not
//! `legacy-auth`. Records are scanned in input order and the first record to
//! match a pattern wins; a record binds at most one pattern.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{ResolveError, Result};
use crate::model::{ComponentSet, PipelineRecord, ResolutionResult, ResolvedEntry};

/// A component pattern compiled for prefix matching.
///
/// The pattern is compiled exactly as written; anchoring happens at match
/// time so pattern text can never escape it.
#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    fn compile(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| ResolveError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// True when the pattern matches a prefix of `pipeline`.
    ///
    /// Leftmost-first search reports a match starting at 0 whenever one exists.
    fn matches(&self, pipeline: &str) -> bool {
        self.regex.find(pipeline).is_some_and(|m| m.start() == 0)
    }
}

/// Matches component patterns against pipeline history.
///
/// Holds no state between calls; one resolver can be reused for any number
/// of record lists.
#[derive(Debug, Clone)]
pub struct Resolver {
    patterns: Vec<CompiledPattern>,
}

impl Resolver {
    /// Compile every pattern of `components`.
    ///
    /// Fails on the first pattern that is not a valid regular expression.
    pub fn new(components: &ComponentSet) -> Result<Self> {
        let patterns = components
            .iter()
            .map(CompiledPattern::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Number of component patterns this resolver looks for.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Scan `records` in order and bind each pattern to its first match.
    ///
    /// When several remaining patterns match the same record, the one
    /// declared first takes it and the others keep looking.
    pub fn resolve(&self, records: &[PipelineRecord]) -> ResolutionResult {
        let mut remaining: Vec<&CompiledPattern> = self.patterns.iter().collect();
        let mut matched = BTreeMap::new();

        for (record_index, record) in records.iter().enumerate() {
            if remaining.is_empty() {
                break;
            }

            let Some(position) = remaining.iter().position(|p| p.matches(&record.pipeline))
            else {
                continue;
            };

            let pattern = remaining.remove(position);
            debug!(
                component = %pattern.source,
                pipeline = %record.pipeline,
                status = %record.status,
                "component matched"
            );
            matched.insert(
                pattern.source.clone(),
                ResolvedEntry {
                    pipeline: record.pipeline.clone(),
                    status: record.status.clone(),
                    record_index,
                },
            );
        }

        let unmatched: Vec<String> = remaining.into_iter().map(|p| p.source.clone()).collect();

        info!(
            components = self.patterns.len(),
            records = records.len(),
            matched = matched.len(),
            unmatched = unmatched.len(),
            "resolution finished"
        );

        ResolutionResult { matched, unmatched }
    }
}

/// Compile `components` and resolve them against `records` in one step.
pub fn resolve(components: &ComponentSet, records: &[PipelineRecord]) -> Result<ResolutionResult> {
    Ok(Resolver::new(components)?.resolve(records))
}
