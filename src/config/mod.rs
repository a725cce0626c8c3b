//! Configuration module
//!
//! Caller options for a paginated sequence and their validated form.
//!
//! # Overview
//!
//! The config module provides:
//! - `PaginateOptions` - Optional overlay supplied by the caller
//! - `PaginateConfig` - Immutable, validated options with defaults applied
//! - `Target` - A URI or a full options value to paginate
//! - YAML loading of the declarative option subset
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_collection::config::PaginateOptions;
//!
//! let config = PaginateOptions::new()
//!     .uri("https://api.example.com/items")
//!     .query("limit", 100)
//!     .header("Authorization", "Bearer token")
//!     .build()?;
//! ```

mod loader;
mod options;

pub use loader::OptionsFile;
pub use options::{
    PaginateConfig, PaginateOptions, Target, DEFAULT_ACCEPT, DEFAULT_ACCEPT_ENCODING,
};
