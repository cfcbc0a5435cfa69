pub mod processes;
pub mod tasks;
