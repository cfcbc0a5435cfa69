mod diagram;
mod history;
mod serve;
mod tasks;

use anyhow::{Result, bail};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::core::config::HistoryConfig;
use crate::core::diagram::DotRenderer;
use crate::core::history::HistoryService;
use crate::core::store::SqliteHistoryStore;
use crate::core::terminal::GuideSection;
use crate::logging;

fn print_help() {
    GuideSection::new("Queries")
        .command("history <instance-id>", "Print the execution history")
        .command(
            "diagram <instance-id>",
            "Render the diagram with the taken path (Graphviz DOT, not PNG)",
        )
        .command("tasks --assignee <name>", "List historic tasks assigned to someone")
        .command("task <task-id>", "Show a single historic task")
        .print();

    GuideSection::new("Server")
        .command("serve", "Expose history, tasks and DOT diagrams over HTTP")
        .print();

    GuideSection::new("Options")
        .text("--config <file>          Config file (default: ~/.flowtrail/flowtrail.toml)")
        .text("--db <file>              History database (overrides [store] path)")
        .text("--verbose, -v            Debug logging")
        .blank()
        .text("history:  --json                 Emit JSON instead of a table")
        .text("tasks:    --assignee, -a <name>  Assignee to list tasks for; --json as above")
        .text("task:     --json                 Emit JSON instead of a table")
        .text("diagram:  --out, -o <file>       Write to a file instead of stdout")
        .text("serve:    --host <h> --port <p>  Bind address")
        .print();

    println!(
        "\n {} {} <command> [options]\n",
        style("Usage:").bold(),
        style("flowtrail").green()
    );
}

/// Flags accepted by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GlobalFlags {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub verbose: bool,
}

/// Split global flags out of `args`; everything else is returned in order.
pub(crate) fn parse_global_flags(args: &[String]) -> (GlobalFlags, Vec<String>) {
    let mut flags = GlobalFlags::default();
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--db" => {
                if i + 1 < args.len() {
                    flags.db = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                flags.verbose = true;
                i += 1;
            }
            _ => {
                rest.push(args[i].clone());
                i += 1;
            }
        }
    }
    (flags, rest)
}

/// First argument after `start` that is not a flag.
pub(crate) fn positional(args: &[String], start: usize) -> Option<String> {
    args.iter().skip(start).find(|a| !a.starts_with('-')).cloned()
}

/// Load config, start logging and open the store behind a history service.
pub(crate) async fn open_service(flags: &GlobalFlags) -> Result<(HistoryConfig, Arc<HistoryService>)> {
    let loaded = HistoryConfig::load(flags.config.as_deref()).await?;
    logging::init_logging(&loaded.config.log.level, flags.verbose);
    loaded.log_summary();
    let config = loaded.config;

    let db_path = flags.db.clone().unwrap_or_else(|| config.store_path());
    let store = Arc::new(SqliteHistoryStore::open(&db_path).await?);
    info!("Using history store {}", store.path().display());

    let service = HistoryService::new(store.clone(), store, Arc::new(DotRenderer), &config);
    Ok((config, Arc::new(service)))
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let (flags, args) = parse_global_flags(&args);

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "history" => {
            let parsed = history::parse_history_args(&args, 2);
            let Some(instance_id) = parsed.instance_id else {
                bail!("history needs a process instance id");
            };
            history::run_history(&flags, &instance_id, parsed.json).await
        }
        "diagram" => {
            let parsed = diagram::parse_diagram_args(&args, 2);
            let Some(instance_id) = parsed.instance_id else {
                bail!("diagram needs a process instance id");
            };
            diagram::run_diagram(&flags, &instance_id, parsed.out).await
        }
        "tasks" => {
            let parsed = tasks::parse_tasks_args(&args, 2);
            let Some(assignee) = parsed.assignee else {
                bail!("tasks needs --assignee <name>");
            };
            tasks::run_tasks(&flags, &assignee, parsed.json).await
        }
        "task" => {
            let parsed = tasks::parse_task_args(&args, 2);
            let Some(task_id) = parsed.task_id else {
                bail!("task needs a task id");
            };
            tasks::run_task(&flags, &task_id, parsed.json).await
        }
        "serve" => serve::run_serve(&flags, &args).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => {
            print_help();
            bail!("Unknown command: {}", other)
        }
    }
}
