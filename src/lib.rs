pub mod classify;
pub mod command;
pub mod config;
pub mod format;
pub mod logger;
pub mod metrics;
pub mod model;
pub mod sample_data;
pub mod tui;
pub mod view;
