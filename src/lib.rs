pub mod app;
pub mod command;
pub mod command_handler;
pub mod config;
pub mod file_io;
pub mod logging;
pub mod state;
