//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Print every record of a paginated REST collection as JSON lines
#[derive(Parser, Debug)]
#[command(name = "rest-collection")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// First page URI (may come from --config instead)
    pub uri: Option<String>,

    /// Options file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Query parameter, `key=value` (repeatable)
    #[arg(short, long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// Request header, `name:value` (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    pub header: Vec<String>,

    /// Read records from this path, e.g. `response.items`
    #[arg(long)]
    pub records_path: Option<String>,

    /// Stop after this many records
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Pretty-print each record
    #[arg(long)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
