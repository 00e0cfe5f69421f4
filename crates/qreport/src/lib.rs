#![forbid(unsafe_code)]

pub mod availability;
pub mod cli;
pub mod clipping;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod report;
pub mod schema;
pub mod utils;
pub mod view;

pub use cli::app::{Cli, Command};
