use anyhow::Result;

use super::{GlobalFlags, open_service, positional};
use crate::core::terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TasksArgs {
    pub assignee: Option<String>,
    pub json: bool,
}

pub(crate) fn parse_tasks_args(args: &[String], start: usize) -> TasksArgs {
    let mut assignee = None;
    let mut json = false;
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--assignee" | "-a" => {
                if i + 1 < args.len() {
                    assignee = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--json" => {
                json = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    TasksArgs { assignee, json }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskArgs {
    pub task_id: Option<String>,
    pub json: bool,
}

pub(crate) fn parse_task_args(args: &[String], start: usize) -> TaskArgs {
    TaskArgs {
        task_id: positional(args, start),
        json: args.iter().skip(start).any(|a| a == "--json"),
    }
}

pub async fn run_tasks(flags: &GlobalFlags, assignee: &str, json: bool) -> Result<()> {
    let (_, service) = open_service(flags).await?;
    let tasks = service.tasks_by_assignee(assignee).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "assignee": assignee,
                "tasks": tasks,
            }))?
        );
    } else {
        terminal::print_task_table(&format!("Tasks assigned to {}", assignee), &tasks);
    }
    Ok(())
}

pub async fn run_task(flags: &GlobalFlags, task_id: &str, json: bool) -> Result<()> {
    let (_, service) = open_service(flags).await?;
    let task = service.task_by_id(task_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        terminal::print_task_table(&format!("Task {}", task_id), std::slice::from_ref(&task));
    }
    Ok(())
}
