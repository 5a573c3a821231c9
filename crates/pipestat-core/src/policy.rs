//! What to do when some components have no pipeline run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ResolveError, Result};
use crate::model::ResolutionResult;

/// Policy applied to components left unmatched after a full scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Missing components are an error.
    #[default]
    Strict,

    /// Missing components are reported as a warning only.
    Lenient,
}

impl UnresolvedPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            UnresolvedPolicy::Strict => "strict",
            UnresolvedPolicy::Lenient => "lenient",
        }
    }
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnresolvedPolicy {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(UnresolvedPolicy::Strict),
            "lenient" => Ok(UnresolvedPolicy::Lenient),
            _ => Err(ResolveError::InvalidValue {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

/// How a finished resolution should be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every component was found.
    Complete,

    /// Some components are missing but the policy tolerates it.
    Incomplete { missing: Vec<String> },
}

impl ResolutionResult {
    /// Apply `policy` to the unmatched components.
    ///
    /// The matched half of the result is never affected; callers print it
    /// before acting on the returned outcome.
    pub fn enforce(&self, policy: UnresolvedPolicy) -> Result<Outcome> {
        if self.unmatched.is_empty() {
            return Ok(Outcome::Complete);
        }

        match policy {
            UnresolvedPolicy::Strict => Err(ResolveError::UnresolvedComponents {
                components: self.unmatched.clone(),
            }),
            UnresolvedPolicy::Lenient => {
                warn!(
                    missing = %self.unmatched.join(","),
                    "components not found in pipeline history"
                );
                Ok(Outcome::Incomplete {
                    missing: self.unmatched.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts WARN events seen while installed.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings(f: impl FnOnce()) -> usize {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        tracing::subscriber::with_default(subscriber, f);
        warnings.load(Ordering::SeqCst)
    }

    fn with_missing(missing: &[&str]) -> ResolutionResult {
        ResolutionResult {
            unmatched: missing.iter().map(|s| s.to_string()).collect(),
            ..ResolutionResult::default()
        }
    }

    #[test]
    fn test_complete_passes_under_both_policies() {
        let result = with_missing(&[]);
        assert_eq!(
            result.enforce(UnresolvedPolicy::Strict).expect("strict"),
            Outcome::Complete
        );
        assert_eq!(
            result.enforce(UnresolvedPolicy::Lenient).expect("lenient"),
            Outcome::Complete
        );
    }

    #[test]
    fn test_strict_fails_on_missing() {
        let err = with_missing(&["search"])
            .enforce(UnresolvedPolicy::Strict)
            .expect_err("strict must fail");
        match err {
            ResolveError::UnresolvedComponents { components } => {
                assert_eq!(components, vec!["search".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_reports_missing() {
        let outcome = with_missing(&["search", "billing"])
            .enforce(UnresolvedPolicy::Lenient)
            .expect("lenient never fails");
        assert_eq!(
            outcome,
            Outcome::Incomplete {
                missing: vec!["search".to_string(), "billing".to_string()]
            }
        );
    }

    #[test]
    fn test_lenient_emits_warning_event() {
        let missing = with_missing(&["search"]);
        let warnings = count_warnings(|| {
            missing
                .enforce(UnresolvedPolicy::Lenient)
                .expect("lenient never fails");
        });
        assert_eq!(warnings, 1);

        let complete = with_missing(&[]);
        let warnings = count_warnings(|| {
            complete
                .enforce(UnresolvedPolicy::Lenient)
                .expect("lenient never fails");
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "Strict".parse::<UnresolvedPolicy>().expect("parse"),
            UnresolvedPolicy::Strict
        );
        assert_eq!(
            "lenient".parse::<UnresolvedPolicy>().expect("parse"),
            UnresolvedPolicy::Lenient
        );
        assert!("warn".parse::<UnresolvedPolicy>().is_err());
        assert_eq!(UnresolvedPolicy::default(), UnresolvedPolicy::Strict);
        assert_eq!(UnresolvedPolicy::Lenient.to_string(), "lenient");
    }
}
