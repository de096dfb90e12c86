// Library surface for the binary and the headless integration tests.
// Terminal setup, logging, and the CLI stay in main.rs.
pub mod app_dirs;
pub mod config;
pub mod input;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timeout;
pub mod typing;
pub mod ui;
