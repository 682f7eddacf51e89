use clap::{Parser, Subcommand, ValueEnum};
use podwatch_core::{events_from_document, EventRecord, Finding, FindingSink};
use podwatch_rules::{UnschedulablePodEvaluator, UnschedulablePodParams, Verdict};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "podwatch", about = "Alert on pods stuck in an unschedulable state")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate events and print a finding for each persistently unschedulable pod
    Evaluate {
        /// Events document (Event, list of Events, or EventList); stdin if omitted or '-'
        events: Option<PathBuf>,
        #[command(flatten)]
        params: ParamsArgs,
        /// Output format for findings
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
    /// Print the effective action parameters
    Params {
        #[command(flatten)]
        params: ParamsArgs,
    },
}

#[derive(clap::Args)]
struct ParamsArgs {
    /// Params file: bare params or a playbook containing the unschedulable_pod action
    #[arg(long, env = "PODWATCH_PARAMS")]
    params: Option<PathBuf>,
    /// Only alert on pods in this namespace
    #[arg(long, env = "PODWATCH_NAMESPACE")]
    namespace: Option<String>,
    /// Minutes a pod must stay unschedulable before alerting
    #[arg(long, env = "PODWATCH_GRACE_MINUTES", allow_negative_numbers = true)]
    grace_minutes: Option<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One JSON object per line
    Json,
    /// YAML documents separated by '---'
    Yaml,
}

fn main() -> miette::Result<()> {
    // Logs go to stderr; stdout carries findings only
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            events,
            params,
            output,
        } => run_evaluate(events.as_deref(), &params, output),
        Commands::Params { params } => run_params(&params),
    }
}

/// Evaluate every event in the document and print findings
fn run_evaluate(
    events_path: Option<&Path>,
    args: &ParamsArgs,
    output: OutputFormat,
) -> miette::Result<()> {
    let params = resolve_params(args)?;
    info!(
        "Evaluating events (namespace: {}, grace: {} minutes)",
        params.namespace.as_deref().unwrap_or("<all>"),
        params.grace_minutes
    );

    let events = read_events(events_path)?;
    let evaluator = UnschedulablePodEvaluator::new(params);

    let mut findings: Vec<Finding> = Vec::new();
    for (idx, event) in events.iter().enumerate() {
        match evaluator.check(Some(event)) {
            Verdict::Match(finding) => {
                info!("Event #{} matched: {}", idx, finding.title);
                findings.add_finding(finding);
            }
            Verdict::Skip { predicate, reason } => {
                debug!("Event #{} skipped by {}: {}", idx, predicate, reason);
            }
            Verdict::NoEvent => {}
        }
    }

    for finding in &findings {
        print_finding(finding, output)?;
    }

    info!(
        "Evaluated {} events, produced {} findings",
        events.len(),
        findings.len()
    );

    Ok(())
}

/// Print the params that would be applied
fn run_params(args: &ParamsArgs) -> miette::Result<()> {
    let params = resolve_params(args)?;
    let yaml = podwatch_core::to_yaml(&params)?;
    print!("{}", yaml);
    Ok(())
}

/// Load params from file (if given), then apply command-line overrides
fn resolve_params(args: &ParamsArgs) -> miette::Result<UnschedulablePodParams> {
    let mut params = match &args.params {
        Some(path) => {
            debug!("Loading params from {}", path.display());
            UnschedulablePodParams::load(path)?
        }
        None => UnschedulablePodParams::default(),
    };

    if let Some(namespace) = &args.namespace {
        params.namespace = Some(namespace.clone());
    }
    if let Some(grace_minutes) = args.grace_minutes {
        params.grace_minutes = grace_minutes;
    }

    params.validate()?;
    Ok(params)
}

/// Read the events document from a file or stdin
fn read_events(path: Option<&Path>) -> miette::Result<Vec<EventRecord>> {
    let data = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            miette::miette!("Failed to read events from '{}': {}", path.display(), e)
        })?,
        _ => {
            let mut data = String::new();
            std::io::stdin()
                .read_to_string(&mut data)
                .map_err(|e| miette::miette!("Failed to read events from stdin: {}", e))?;
            data
        }
    };

    let events = events_from_document(&data)?;
    debug!("Read {} events", events.len());
    Ok(events)
}

fn print_finding(finding: &Finding, output: OutputFormat) -> miette::Result<()> {
    match output {
        OutputFormat::Json => println!("{}", podwatch_core::to_json(finding)?),
        OutputFormat::Yaml => print!("---\n{}", podwatch_core::to_yaml(finding)?),
    }
    Ok(())
}
