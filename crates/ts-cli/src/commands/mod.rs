//! CLI subcommand implementations.

pub mod matters;
pub mod parse;
pub mod resolve;
pub mod units;
pub mod util;
