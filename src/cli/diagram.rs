use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use super::{GlobalFlags, open_service};
use crate::core::terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagramArgs {
    pub instance_id: Option<String>,
    pub out: Option<PathBuf>,
}

pub(crate) fn parse_diagram_args(args: &[String], start: usize) -> DiagramArgs {
    let mut instance_id = None;
    let mut out = None;
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                if i + 1 < args.len() {
                    out = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            other => {
                if instance_id.is_none() && !other.starts_with('-') {
                    instance_id = Some(other.to_string());
                }
                i += 1;
            }
        }
    }
    DiagramArgs { instance_id, out }
}

pub async fn run_diagram(flags: &GlobalFlags, instance_id: &str, out: Option<PathBuf>) -> Result<()> {
    let (_, service) = open_service(flags).await?;
    let diagram = service.get_process_diagram(instance_id).await?;

    match out {
        Some(path) => {
            tokio::fs::write(&path, &diagram.bytes).await?;
            terminal::print_success(&format!(
                "Diagram for {} written to {} ({})",
                instance_id,
                path.display(),
                diagram.content_type
            ));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&diagram.bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_diagram_args_reads_out_file() {
        let parsed = parse_diagram_args(
            &args(&["flowtrail", "diagram", "-o", "leave.dot", "proc-1"]),
            2,
        );
        assert_eq!(parsed.instance_id.as_deref(), Some("proc-1"));
        assert_eq!(parsed.out, Some(PathBuf::from("leave.dot")));
    }

    #[test]
    fn out_value_is_not_taken_as_instance_id() {
        let parsed = parse_diagram_args(&args(&["flowtrail", "diagram", "--out", "x.dot"]), 2);
        assert!(parsed.instance_id.is_none());
    }
}
