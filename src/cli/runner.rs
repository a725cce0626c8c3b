//! CLI runner - streams records to stdout

use crate::cli::commands::Cli;
use crate::config::{PaginateOptions, Target};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use futures::StreamExt;
use std::io::{self, Write};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Stream the collection to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let count = self.write_records(&mut out).await?;
        info!("Wrote {count} records");
        Ok(())
    }

    /// Stream the collection to `out`, one JSON document per line
    pub async fn write_records<W: Write>(&self, out: &mut W) -> Result<u64> {
        let options = self.options()?;
        let mut records = crate::paginate(Target::Options(options), PaginateOptions::new())?
            .records()
            .take(self.cli.max_records.unwrap_or(usize::MAX));

        let mut count = 0;
        while let Some(record) = records.next().await {
            let record = record?;
            let line = if self.cli.pretty {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string(&record)?
            };
            writeln!(out, "{line}")?;
            count += 1;
        }
        out.flush()?;
        Ok(count)
    }

    /// Options file overlaid with command-line arguments
    pub fn options(&self) -> Result<PaginateOptions> {
        let base = match &self.cli.config {
            Some(path) => {
                debug!("Loading options from {}", path.display());
                PaginateOptions::from_file(path)?
            }
            None => PaginateOptions::new(),
        };

        let mut overlay = PaginateOptions::new();
        overlay.uri.clone_from(&self.cli.uri);
        overlay.records_path.clone_from(&self.cli.records_path);
        for arg in &self.cli.query {
            let (key, value) = parse_query_arg(arg)?;
            overlay = overlay.query(key, value);
        }
        for arg in &self.cli.header {
            let (name, value) = parse_header_arg(arg)?;
            overlay = overlay.header(name, value);
        }

        let options = base.merge(overlay);
        if options.uri.is_none() {
            return Err(Error::config("No URI given (pass it as an argument or in --config)"));
        }
        Ok(options)
    }
}

/// Parse `key=value`; integer and boolean values keep their JSON type
pub fn parse_query_arg(arg: &str) -> Result<(String, JsonValue)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| Error::invalid_value("query", format!("expected KEY=VALUE, got '{arg}'")))?;
    if key.is_empty() {
        return Err(Error::invalid_value("query", format!("empty key in '{arg}'")));
    }

    let value = if let Ok(n) = value.parse::<i64>() {
        JsonValue::from(n)
    } else if let Ok(b) = value.parse::<bool>() {
        JsonValue::from(b)
    } else {
        JsonValue::from(value)
    };
    Ok((key.to_string(), value))
}

/// Parse `name:value`
pub fn parse_header_arg(arg: &str) -> Result<(String, String)> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| Error::invalid_value("header", format!("expected NAME:VALUE, got '{arg}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_value("header", format!("empty name in '{arg}'")));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
