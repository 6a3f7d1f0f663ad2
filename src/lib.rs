//! memcat - the in-memory schema catalog of a multi-tenant database
//!
//! This library holds the live schema tree that DDL handlers mutate and
//! query planning reads:
//! - Namespaces, databases and tables, each independently lockable
//! - Credentials, tokens and scopes used by authentication
//! - Field, index and row access rule definitions on tables
//! - Snapshot export and restore for a persistence layer

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use error::{Error, Result};
