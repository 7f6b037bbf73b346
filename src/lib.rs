pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod panels;
pub mod ui;

pub use error::{Error, Result};

/// Version of repolens
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
