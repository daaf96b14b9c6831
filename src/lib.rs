//! Paginated to-do list library.
//!
//! The server side exposes a count-aware paginated to-do store over HTTP;
//! the client side keeps a page window of records in sync with it.

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
