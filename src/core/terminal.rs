use console::{Emoji, style};

use crate::core::history::types::EntryOrigin;
use crate::core::history::{HistoryEntry, TaskRecord};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_link(label: &str, url: &str) {
    println!(
        "  {} {}: {}",
        GLOBE,
        style(label).bold(),
        style(url).underlined().cyan()
    );
}

/// A titled block of help lines.
pub struct GuideSection {
    title: String,
    lines: Vec<String>,
}

impl GuideSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            lines: Vec::new(),
        }
    }

    pub fn command(mut self, name: &str, description: &str) -> Self {
        self.lines.push(format!(
            "  {} {}",
            style(format!("{:<24}", name)).green(),
            description
        ));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.lines.push(format!("  {}", text));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(String::new());
        self
    }

    pub fn print(&self) {
        println!("\n{} {}", SPARKLE, style(&self.title).bold());
        for line in &self.lines {
            println!("{}", line);
        }
    }
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_duration(ms: Option<i64>) -> String {
    match ms {
        None => "-".to_string(),
        Some(ms) if ms < 1000 => format!("{}ms", ms),
        Some(ms) if ms < 60_000 => format!("{:.1}s", ms as f64 / 1000.0),
        Some(ms) => {
            let secs = ms / 1000;
            format!("{}m{:02}s", secs / 60, secs % 60)
        }
    }
}

/// One display row per entry: time, name, status, assignee, duration.
pub(crate) fn history_rows(entries: &[HistoryEntry]) -> Vec<[String; 5]> {
    entries
        .iter()
        .map(|e| {
            [
                e.start_time.format(TIME_FORMAT).to_string(),
                e.task_name.clone(),
                e.status_label.clone().unwrap_or_else(|| "-".to_string()),
                e.assignee.clone().unwrap_or_else(|| "-".to_string()),
                format_duration(e.duration_ms),
            ]
        })
        .collect()
}

/// One display row per task: id, name, started, ended, assignee, duration.
pub(crate) fn task_rows(tasks: &[TaskRecord]) -> Vec<[String; 6]> {
    tasks
        .iter()
        .map(|t| {
            [
                t.task_id.clone(),
                t.name.clone(),
                t.start_time.format(TIME_FORMAT).to_string(),
                t.end_time
                    .map(|e| e.format(TIME_FORMAT).to_string())
                    .unwrap_or_else(|| "running".to_string()),
                t.assignee.clone().unwrap_or_else(|| "-".to_string()),
                format_duration(t.duration_ms),
            ]
        })
        .collect()
}

fn column_widths<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> [usize; N] {
    let mut widths = headers.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

fn pad_cells<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| format!("{:<w$}", cell.as_ref(), w = *w))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn print_history_table(instance_id: &str, entries: &[HistoryEntry]) {
    println!(
        "\n{} {} {}",
        SPARKLE,
        style("History of").bold(),
        style(instance_id).bold().cyan()
    );
    if entries.is_empty() {
        print_info("No history recorded for this process instance.");
        return;
    }

    let headers = ["STARTED", "STEP", "STATUS", "ASSIGNEE", "DURATION"];
    let rows = history_rows(entries);
    let widths = column_widths(headers, &rows);
    println!("  {}", style(pad_cells(&headers, &widths)).bold().dim());

    for (entry, row) in entries.iter().zip(rows.iter()) {
        let line = pad_cells(row, &widths);
        match entry.origin {
            EntryOrigin::Activity => println!("  {}", style(line).magenta()),
            EntryOrigin::Task => println!("  {}", line),
        }
        for comment in &entry.comments {
            println!("      {} {}", style("»").dim(), style(comment).italic());
        }
    }
}

pub fn print_task_table(title: &str, tasks: &[TaskRecord]) {
    println!("\n{} {}", SPARKLE, style(title).bold().cyan());
    if tasks.is_empty() {
        print_info("No tasks found.");
        return;
    }

    let headers = ["TASK", "NAME", "STARTED", "ENDED", "ASSIGNEE", "DURATION"];
    let rows = task_rows(tasks);
    let widths = column_widths(headers, &rows);
    println!("  {}", style(pad_cells(&headers, &widths)).bold().dim());
    for row in &rows {
        println!("  {}", pad_cells(row, &widths));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(duration_ms: Option<i64>, status: Option<&str>) -> HistoryEntry {
        HistoryEntry {
            process_instance_id: "proc-1".to_string(),
            task_name: "Manager approval".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 5, 6, 8, 5, 0).unwrap(),
            end_time: None,
            duration_ms,
            assignee: None,
            due_date: None,
            status_label: status.map(str::to_string),
            comments: Vec::new(),
            origin: EntryOrigin::Task,
        }
    }

    #[test]
    fn durations_are_humanized() {
        assert_eq!(format_duration(None), "-");
        assert_eq!(format_duration(Some(250)), "250ms");
        assert_eq!(format_duration(Some(1500)), "1.5s");
        assert_eq!(format_duration(Some(125_000)), "2m05s");
    }

    #[test]
    fn rows_fill_missing_fields_with_dash() {
        let rows = history_rows(&[entry(None, None), entry(Some(2000), Some("approved"))]);
        assert_eq!(
            rows[0],
            [
                "2024-05-06 08:05:00".to_string(),
                "Manager approval".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]
        );
        assert_eq!(rows[1][2], "approved");
        assert_eq!(rows[1][4], "2.0s");
    }

    #[test]
    fn task_rows_mark_unfinished_tasks_as_running() {
        let task = TaskRecord {
            task_id: "t-2".to_string(),
            task_definition_key: "approve".to_string(),
            name: "Manager approval".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 5, 6, 8, 5, 0).unwrap(),
            end_time: None,
            duration_ms: None,
            assignee: Some("bob".to_string()),
            due_date: None,
        };

        let rows = task_rows(&[task]);

        assert_eq!(rows[0][0], "t-2");
        assert_eq!(rows[0][3], "running");
        assert_eq!(rows[0][4], "bob");
        assert_eq!(rows[0][5], "-");
    }

    #[test]
    fn columns_widen_to_longest_cell() {
        let rows = vec![["a".to_string(), "longer".to_string()]];
        let widths = column_widths(["ID", "NAME"], &rows);
        assert_eq!(widths, [2, 6]);
        assert_eq!(pad_cells(&rows[0], &widths), "a   longer");
    }
}
