pub mod config;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod sheet;
pub mod stderr_buffer;
pub mod tui;
