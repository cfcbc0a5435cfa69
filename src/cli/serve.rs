use anyhow::Result;
use console::style;

use super::{GlobalFlags, open_service};
use crate::core::terminal::{self, GuideSection};
use crate::interfaces::web::ApiServer;

pub(crate) fn parse_serve_flags(
    args: &[String],
    start: usize,
    mut host: String,
    mut port: u16,
) -> (String, u16) {
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(port);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--host" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    (host, port)
}

pub async fn run_serve(flags: &GlobalFlags, args: &[String]) -> Result<()> {
    let (config, service) = open_service(flags).await?;
    let (host, port) = parse_serve_flags(args, 2, config.server.host.clone(), config.server.port);

    let content_type = service.content_type();
    let server = ApiServer::new(service, host, port);
    let base = format!("http://{}", server.address());

    GuideSection::new("flowtrail API")
        .text("Serving process history, tasks and diagrams.")
        .text("Diagrams are Graphviz DOT source, not PNG images.")
        .print();
    terminal::print_link(
        "History",
        &format!("{}/api/processes/<instance-id>/history", base),
    );
    terminal::print_link(
        "Diagram",
        &format!("{}/api/processes/<instance-id>/diagram", base),
    );
    terminal::print_status("Format", &format!("diagrams are served as {}", content_type));
    terminal::print_link("Tasks", &format!("{}/api/tasks?assignee=<name>", base));
    terminal::print_link("Task", &format!("{}/api/tasks/<task-id>", base));
    terminal::print_status(
        "Stop",
        &format!("press {} to shut down", style("Ctrl+C").bold().yellow()),
    );
    println!();

    server.run().await?;
    terminal::print_info("Server stopped.");
    Ok(())
}
