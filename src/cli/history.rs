use anyhow::Result;

use super::{GlobalFlags, open_service, positional};
use crate::core::terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryArgs {
    pub instance_id: Option<String>,
    pub json: bool,
}

pub(crate) fn parse_history_args(args: &[String], start: usize) -> HistoryArgs {
    HistoryArgs {
        instance_id: positional(args, start),
        json: args.iter().skip(start).any(|a| a == "--json"),
    }
}

pub async fn run_history(flags: &GlobalFlags, instance_id: &str, json: bool) -> Result<()> {
    let (_, service) = open_service(flags).await?;
    let history = service.get_process_history(instance_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "instance_id": instance_id,
                "history": history,
            }))?
        );
    } else {
        terminal::print_history_table(instance_id, &history);
    }
    Ok(())
}
