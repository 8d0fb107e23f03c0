use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quarry_config::{ConnectionsFile, WorkflowDef};
use quarry_hook::ConnectionRegistry;
use quarry_workflow::Workflow;
use quarry_workflow_executor::WorkflowExecutor;

/// Quarry - load warehouse fact tables from workflow definitions
#[derive(Parser)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.quarry)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Path to the connections file (default: <data-dir>/connections.json)
  #[arg(long, global = true)]
  connections: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a workflow or task
  Run {
    #[command(subcommand)]
    target: RunTarget,
  },

  /// Print the statement each task would submit, without running it
  Render {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },

  /// Check a workflow and the connections it references
  Validate {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },
}

#[derive(Subcommand)]
enum RunTarget {
  /// Run an entire workflow
  Workflow {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },

  /// Run a single task from a workflow, ignoring its dependencies
  Task {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,

    /// The task ID to execute
    #[arg(long)]
    task: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
    .init();

  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".quarry"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::Run { target }) => match target {
      RunTarget::Workflow { workflow_file } => rt.block_on(run_workflow(
        workflow_file,
        cli.connections.as_deref(),
        &data_dir,
      ))?,
      RunTarget::Task {
        workflow_file,
        task,
      } => rt.block_on(run_task(
        workflow_file,
        task,
        cli.connections.as_deref(),
        &data_dir,
      ))?,
    },
    Some(Commands::Render { workflow_file }) => rt.block_on(render(workflow_file))?,
    Some(Commands::Validate { workflow_file }) => rt.block_on(validate(
      workflow_file,
      cli.connections.as_deref(),
      &data_dir,
    ))?,
    None => {
      println!("quarry - use --help to see available commands");
    }
  }

  Ok(())
}

async fn run_workflow(
  workflow_file: PathBuf,
  connections_file: Option<&Path>,
  data_dir: &Path,
) -> Result<()> {
  let workflow = load_workflow(&workflow_file).await?;
  let connections = load_connections(connections_file, data_dir).await?;

  let executor = WorkflowExecutor::new(Arc::new(connections));
  let result = executor
    .execute(&workflow, cancel_on_ctrl_c())
    .await
    .context("workflow execution failed")?;

  println!("{}", serde_json::to_string_pretty(&result)?);

  Ok(())
}

async fn run_task(
  workflow_file: PathBuf,
  task_id: String,
  connections_file: Option<&Path>,
  data_dir: &Path,
) -> Result<()> {
  let workflow = load_workflow(&workflow_file).await?;
  let connections = load_connections(connections_file, data_dir).await?;

  let executor = WorkflowExecutor::new(Arc::new(connections));
  let result = executor
    .execute_task(&workflow, &task_id, cancel_on_ctrl_c())
    .await
    .context("task execution failed")?;

  println!("{}", serde_json::to_string_pretty(&result)?);

  Ok(())
}

async fn render(workflow_file: PathBuf) -> Result<()> {
  let workflow = load_workflow(&workflow_file).await?;

  for task_id in workflow.execution_order()? {
    let Some(node) = workflow.get_node(&task_id) else {
      continue;
    };
    println!("-- {} ({})", task_id, node.task.type_name());
    match node.task.render() {
      Some(statement) => println!("{};\n", statement),
      None => println!("-- nothing to render\n"),
    }
  }

  Ok(())
}

async fn validate(
  workflow_file: PathBuf,
  connections_file: Option<&Path>,
  data_dir: &Path,
) -> Result<()> {
  let workflow = load_workflow(&workflow_file).await?;
  let connections = load_connections(connections_file, data_dir).await?;

  let missing: Vec<&str> = workflow
    .conn_ids()
    .into_iter()
    .filter(|id| !connections.contains(id))
    .collect();
  if !missing.is_empty() {
    bail!("workflow references unknown connections: {}", missing.join(", "));
  }

  println!(
    "workflow '{}' is valid: {} task(s), connections: {}",
    workflow.workflow_id,
    workflow.nodes.len(),
    workflow.conn_ids().join(", ")
  );

  Ok(())
}

async fn load_workflow(workflow_file: &Path) -> Result<Workflow> {
  let content = tokio::fs::read_to_string(workflow_file)
    .await
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let def: WorkflowDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  let workflow = Workflow::from_def(def)
    .with_context(|| format!("invalid workflow: {}", workflow_file.display()))?;

  info!(
    workflow_id = %workflow.workflow_id,
    name = %workflow.name,
    tasks = workflow.nodes.len(),
    "loaded workflow"
  );

  Ok(workflow)
}

/// Load connections from the connections file and `QUARRY_CONN_*` variables.
///
/// An explicit file must exist; the default file is optional.
async fn load_connections(
  connections_file: Option<&Path>,
  data_dir: &Path,
) -> Result<ConnectionRegistry> {
  let mut file = match connections_file {
    Some(path) => read_connections(path).await?,
    None => {
      let default_path = data_dir.join("connections.json");
      if tokio::fs::try_exists(&default_path).await.unwrap_or(false) {
        read_connections(&default_path).await?
      } else {
        ConnectionsFile::default()
      }
    }
  };

  file
    .merge_env(std::env::vars_os())
    .context("invalid connection in environment")?;

  let registry =
    ConnectionRegistry::from_defs(&file.connections).context("failed to register connections")?;
  if registry.is_empty() {
    warn!("no connections configured");
  } else {
    info!(connections = ?registry.conn_ids(), "loaded connections");
  }

  Ok(registry)
}

async fn read_connections(path: &Path) -> Result<ConnectionsFile> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read connections file: {}", path.display()))?;

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse connections file: {}", path.display()))
}

/// A token cancelled when the process receives Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
  let cancel = CancellationToken::new();
  let trigger = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, cancelling");
      trigger.cancel();
    }
  });
  cancel
}
