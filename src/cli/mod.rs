//! CLI module
//!
//! Command-line front end: one positional URI, records printed as JSON
//! lines on stdout, failures reported on stderr.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{parse_header_arg, parse_query_arg, Runner};
