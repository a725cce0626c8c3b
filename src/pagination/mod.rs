//! Pagination module
//!
//! Supports: Link header, body envelope links (Facebook/Graph, JSON:API
//! style `meta`, Google, OData v2-v4), AWS markers, page number query strings
//!
//! # Overview
//!
//! After every page a [`NextPageResolver`] inspects the response and returns
//! a [`NextPage`] descriptor. The engine applies it to the [`RequestState`]
//! cursor; resolvers never mutate the cursor themselves.

mod resolvers;
mod types;

pub use resolvers::{parse_next_link, HeuristicResolver, DEFAULT_MARKER_PARAM};
pub use types::{NextPage, NextPageResolver, RequestState};
