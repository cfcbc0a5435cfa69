pub mod config;
pub mod diagram;
pub mod highlight;
pub mod history;
pub mod store;
pub mod terminal;
