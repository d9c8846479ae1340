pub mod cli;
pub mod clipboard;
pub mod config;
pub mod handlers;
pub mod media;
pub mod prompt;
pub mod render;
pub mod session;
pub mod state;
pub mod utils;
