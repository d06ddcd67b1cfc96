//! # scanlist
//!
//! Command-line front end for the listing backend. The domain model lives
//! in the `listing` crate; this crate adds configuration, a `reqwest`
//! implementation of [`listing::ListingApi`], and the draft builder behind
//! `scanlist create`.

pub mod config;
pub mod draft;
pub mod error;
pub mod http;

pub use config::{Config, Timeouts};
pub use error::CliError;
pub use http::HttpBackend;
