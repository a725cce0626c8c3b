//! YAML options loader
//!
//! Only the declarative subset of [`PaginateOptions`] can be written in a
//! file. Extractors, resolvers and transports are code.

use super::options::PaginateOptions;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpTransportConfig;
use crate::types::{QueryParams, StringMap};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// On-disk shape of pagination options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    /// First page URI
    #[serde(default)]
    pub uri: Option<String>,
    /// Initial query parameters
    #[serde(default, alias = "qs")]
    pub query_params: QueryParams,
    /// Request headers
    #[serde(default)]
    pub headers: StringMap,
    /// Parse bodies as JSON
    #[serde(default)]
    pub json: Option<bool>,
    /// Fixed records path
    #[serde(default)]
    pub records_path: Option<String>,
    /// Marker query parameter
    #[serde(default)]
    pub marker_param: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User-Agent header
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl OptionsFile {
    /// Convert into builder options
    pub fn into_options(self) -> PaginateOptions {
        let http = if self.timeout_secs.is_some() || self.user_agent.is_some() {
            let mut builder = HttpTransportConfig::builder();
            if let Some(secs) = self.timeout_secs {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            if let Some(agent) = self.user_agent {
                builder = builder.user_agent(agent);
            }
            Some(builder.build())
        } else {
            None
        };

        PaginateOptions {
            uri: self.uri,
            query_params: self.query_params,
            headers: self.headers,
            json: self.json,
            records_path: self.records_path,
            marker_param: self.marker_param,
            http,
            ..Default::default()
        }
    }
}

impl PaginateOptions {
    /// Parse options from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: OptionsFile = serde_yaml::from_str(content)?;
        Ok(file.into_options())
    }

    /// Load options from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        debug!("Loading options from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }
}
