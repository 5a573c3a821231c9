//! pipestat core library
//!
//! Reports the latest pipeline run of each component:
//! - Parses component patterns and pipeline run history
//! - Resolves each component to the first run whose identifier it prefixes
//! - Applies a strict or lenient policy to components that were not found

pub mod config;
pub mod error;
pub mod model;
pub mod policy;
pub mod render;
pub mod resolver;
pub mod status;
pub mod telemetry;

pub use config::PipestatConfig;
pub use error::{ResolveError, Result};
pub use model::{parse_records, ComponentSet, PipelineRecord, ResolutionResult, ResolvedEntry};
pub use policy::{Outcome, UnresolvedPolicy};
pub use render::{render_json, render_json_pretty, render_text, render_unmatched, OutputFormat};
pub use resolver::{resolve, Resolver};
pub use status::{StatusCategory, StatusRules};
pub use telemetry::init_tracing;
