//! pipestat - latest pipeline status per component
//!
//! ```text
//! pipestat $'auth\nbilling' '[{"pipeline": "auth-service-42", "status": "Succeeded"}]'
//! pipestat --components-file components.txt --pipelines-file runs.json --format json
//! az pipelines runs list | pipestat --components-file components.txt --pipelines-file -
//! ```
//!
//! Matched components are printed first. Components that were not found
//! fail the run in `strict` mode and only warn in `lenient` mode.

use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, Level};

use pipestat_core::{
    parse_records, render_json, render_json_pretty, render_text, render_unmatched, ComponentSet,
    OutputFormat, PipestatConfig, ResolutionResult, Resolver, UnresolvedPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "pipestat")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report the latest pipeline run of each component", long_about = None)]
struct Cli {
    /// Newline-separated component patterns, then a JSON array of
    /// {"pipeline", "status"} records (newest first). Omit whichever one
    /// is given as a file.
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Read component patterns from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    components_file: Option<PathBuf>,

    /// Read pipeline records from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    pipelines_file: Option<PathBuf>,

    /// What to do with components missing from the history: strict or lenient
    #[arg(short, long, env = "PIPESTAT_MODE")]
    mode: Option<UnresolvedPolicy>,

    /// Output format: text or json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Disable coloured statuses in text output
    #[arg(long)]
    no_color: bool,

    /// Config file (default: $PIPESTAT_CONFIG, then ./pipestat.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

/// Raw component and pipeline text, wherever it came from.
#[derive(Debug, PartialEq, Eq)]
struct Inputs {
    components: String,
    pipelines: String,
}

impl Inputs {
    fn collect(cli: &Cli) -> Result<Self> {
        if is_stdin(cli.components_file.as_deref()) && is_stdin(cli.pipelines_file.as_deref()) {
            bail!("only one of --components-file and --pipelines-file can read stdin");
        }

        let expected = usize::from(cli.components_file.is_none())
            + usize::from(cli.pipelines_file.is_none());
        if cli.inputs.len() != expected {
            bail!(
                "expected {} positional input(s) but got {}",
                expected,
                cli.inputs.len()
            );
        }

        let mut positional = cli.inputs.iter().cloned();
        let components = match &cli.components_file {
            Some(path) => read_source(path)?,
            None => positional.next().unwrap_or_default(),
        };
        let pipelines = match &cli.pipelines_file {
            Some(path) => read_source(path)?,
            None => positional.next().unwrap_or_default(),
        };

        Ok(Self {
            components,
            pipelines,
        })
    }
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.is_some_and(|p| p == Path::new("-"))
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Effective settings: CLI flags override the config file.
#[derive(Debug)]
struct Settings {
    mode: UnresolvedPolicy,
    format: OutputFormat,
    pretty: bool,
    color: bool,
    config: PipestatConfig,
}

impl Settings {
    fn new(cli: &Cli, config: PipestatConfig, stdout_is_terminal: bool) -> Self {
        Self {
            mode: cli.mode.unwrap_or(config.mode),
            format: cli.format.unwrap_or(config.format),
            pretty: cli.pretty,
            color: config.color && !cli.no_color && stdout_is_terminal,
            config,
        }
    }
}

/// Resolve `inputs` and render the matched components.
///
/// Returns the rendered output together with the result, so the caller can
/// print what succeeded before applying the unresolved-component policy.
fn run(inputs: &Inputs, settings: &Settings) -> Result<(String, ResolutionResult)> {
    let components = ComponentSet::parse(&inputs.components);
    let records = parse_records(&inputs.pipelines).context("Failed to parse pipeline records")?;
    debug!(
        components = components.len(),
        records = records.len(),
        "inputs loaded"
    );

    let resolver = Resolver::new(&components).context("Failed to compile component patterns")?;
    let result = resolver.resolve(&records);

    let output = match settings.format {
        OutputFormat::Json if settings.pretty => render_json_pretty(&result)? + "\n",
        OutputFormat::Json => render_json(&result)? + "\n",
        OutputFormat::Text => render_text(&result, &settings.config.statuses, settings.color),
    };

    Ok((output, result))
}

/// Print the matched output, then apply the unresolved-component policy.
///
/// Strict mode returns the unresolved error only after the output is
/// written; lenient mode writes a warning to `stderr` and succeeds.
fn report<O: Write, E: Write>(
    output: &str,
    result: &ResolutionResult,
    mode: UnresolvedPolicy,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<()> {
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write output")?;

    result.enforce(mode)?;
    if let Some(warning) = render_unmatched(&result.unmatched) {
        writeln!(stderr, "warning: {}", warning).context("Failed to write warning")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    pipestat_core::init_tracing(cli.json_logs, level);

    let config = PipestatConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let settings = Settings::new(&cli, config, std::io::stdout().is_terminal());
    let inputs = Inputs::collect(&cli)?;

    let (output, result) = run(&inputs, &settings)?;
    report(
        &output,
        &result,
        settings.mode,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
}
