//! `tutorial-dag` CLI entry-point.
//!
//! Available sub-commands:
//! - `show`     — print the tutorial workflow as JSON.
//! - `validate` — validate a workflow JSON file.
//! - `order`    — list tasks in execution order.
//! - `submit`   — hand a workflow to the in-process engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orchestrator::{MockOrchestrator, Orchestrator};
use tracing::info;
use tracing_subscriber::EnvFilter;
use workflow::{tutorial_workflow, validate_workflow, WorkflowSpec};

#[derive(Parser)]
#[command(
    name = "tutorial-dag",
    about = "Declare the tutorial workflow and hand it to an orchestration engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tutorial workflow definition as JSON.
    Show {
        /// Single-line output instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },
    /// Validate a workflow definition JSON file.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// List tasks in execution order with their upstream tasks.
    Order {
        /// Workflow JSON file; the tutorial workflow when omitted.
        #[arg(env = "TUTORIAL_DAG_FILE")]
        path: Option<PathBuf>,
    },
    /// Submit a workflow to the in-process engine.
    Submit {
        /// Workflow JSON file; the tutorial workflow when omitted.
        #[arg(env = "TUTORIAL_DAG_FILE")]
        path: Option<PathBuf>,
    },
}

fn load(path: &Path) -> Result<WorkflowSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    let spec = serde_json::from_str(&content)
        .with_context(|| format!("invalid workflow JSON in {}", path.display()))?;
    Ok(spec)
}

fn load_or_tutorial(path: Option<&Path>) -> Result<WorkflowSpec> {
    match path {
        Some(path) => load(path),
        None => Ok(tutorial_workflow()?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Show { compact } => {
            let spec = tutorial_workflow()?;
            let json = if compact {
                serde_json::to_string(&spec)?
            } else {
                serde_json::to_string_pretty(&spec)?
            };
            println!("{json}");
        }
        Command::Validate { path } => {
            let spec = load(&path)?;
            match validate_workflow(&spec) {
                Ok(order) => {
                    println!("✅ Workflow '{}' is valid. Execution order: {order:?}", spec.id);
                }
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Order { path } => {
            let spec = load_or_tutorial(path.as_deref())?;
            let order = validate_workflow(&spec)?;
            for task_id in &order {
                let upstream = spec.upstream_of(task_id);
                let placeholders = spec
                    .task(task_id)
                    .map(|t| t.placeholders())
                    .unwrap_or_default();
                println!(
                    "{task_id}\tafter: {}\tplaceholders: {}",
                    if upstream.is_empty() { "-".to_string() } else { upstream.join(", ") },
                    if placeholders.is_empty() { "-".to_string() } else { placeholders.join(", ") },
                );
            }
        }
        Command::Submit { path } => {
            let spec = load_or_tutorial(path.as_deref())?;
            let engine = MockOrchestrator::accepting();
            info!("Submitting workflow '{}'", spec.id);
            let submission = engine
                .submit(&spec)
                .await
                .with_context(|| format!("failed to submit workflow '{}'", spec.id))?;
            println!(
                "Submitted '{}' as {} at {}",
                submission.workflow_id, submission.id, submission.submitted_at
            );
        }
    }

    Ok(())
}
