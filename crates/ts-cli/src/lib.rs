//! Timesheet assistant CLI library.
//!
//! Turns free-text work notes into billing data: duration, 6-minute units,
//! date, description, and the matter the work belongs to.

mod cli;
pub mod commands;
mod config;
pub mod matters;

pub use cli::{Cli, Commands};
pub use config::{AiConfig, Config};
