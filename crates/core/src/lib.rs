//! Catalog data model and feed plumbing for the competitive-intelligence
//! dashboard.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feeds;
pub mod snapshot;

pub use catalog::*;
pub use config::Config;
pub use error::*;
pub use snapshot::Snapshot;
