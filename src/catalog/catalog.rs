//! Catalog root
//!
//! The root maps namespace names to namespace nodes. One instance is
//! constructed by whatever owns the database server and shared by reference
//! with every collaborator that reads or changes the schema.

use super::database::Database;
use super::namespace::Namespace;
use super::registry::{self, Registry};
use super::table::Table;
use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Root of the schema tree
#[derive(Debug)]
pub struct Catalog {
    config: Arc<CatalogConfig>,
    namespaces: RwLock<Registry<Namespace>>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create a new empty catalog with the given config
    pub fn with_config(config: CatalogConfig) -> Self {
        let namespaces = Registry::with_capacity(config.initial_capacity);
        Self {
            config: Arc::new(config),
            namespaces: RwLock::new(namespaces),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Get or create a namespace
    pub fn namespace(&self, name: &str) -> Arc<Namespace> {
        let (ns, created) = registry::get_or_create(
            &self.namespaces,
            |r| r,
            |r| r,
            name,
            || Namespace::new(name, self.config.clone()),
        );
        if created {
            debug!(ns = %name, "namespace created");
        }
        ns
    }

    /// Look up a namespace without creating it
    pub fn namespace_if_exists(&self, name: &str) -> Option<Arc<Namespace>> {
        registry::get_if_exists(&self.namespaces, |r| r, name)
    }

    /// Detach a namespace. Holders of the returned node may keep using it.
    pub fn remove_namespace(&self, name: &str) -> Option<Arc<Namespace>> {
        let removed = registry::remove(&self.namespaces, |r| r, name);
        if removed.is_some() {
            debug!(ns = %name, "namespace removed");
        }
        removed
    }

    /// Check if a namespace exists
    pub fn namespace_exists(&self, name: &str) -> bool {
        self.namespaces.read().contains(name)
    }

    /// List all namespace names
    pub fn list_namespaces(&self) -> Vec<String> {
        self.namespaces.read().names()
    }

    /// All namespace nodes, sorted by name
    pub fn namespaces(&self) -> Vec<Arc<Namespace>> {
        self.namespaces.read().values()
    }

    /// Resolve a namespace, failing if it does not exist
    pub fn lookup_namespace(&self, ns: &str) -> Result<Arc<Namespace>> {
        self.namespace_if_exists(ns)
            .ok_or_else(|| Error::not_found("namespace", ns))
    }

    /// Resolve a database path, failing at the first missing level
    pub fn lookup_database(&self, ns: &str, db: &str) -> Result<Arc<Database>> {
        self.lookup_namespace(ns)?
            .database_if_exists(db)
            .ok_or_else(|| Error::not_found("database", db))
    }

    /// Resolve a table path, failing at the first missing level
    pub fn lookup_table(&self, ns: &str, db: &str, tb: &str) -> Result<Arc<Table>> {
        self.lookup_database(ns, db)?
            .table_if_exists(tb)
            .ok_or_else(|| Error::not_found("table", tb))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_namespace_get_or_create() {
        let catalog = Catalog::new();
        let first = catalog.namespace("acme");
        let second = catalog.namespace("acme");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.list_namespaces(), vec!["acme"]);
    }

    #[test]
    fn test_namespace_if_exists() {
        let catalog = Catalog::new();
        assert!(catalog.namespace_if_exists("acme").is_none());
        assert!(!catalog.namespace_exists("acme"));
        assert!(catalog.list_namespaces().is_empty());

        let ns = catalog.namespace("acme");
        let found = catalog.namespace_if_exists("acme").unwrap();
        assert!(Arc::ptr_eq(&ns, &found));
        assert!(catalog.namespace_exists("acme"));
    }

    #[test]
    fn test_remove_namespace() {
        let catalog = Catalog::new();
        let ns = catalog.namespace("acme");
        ns.database("prod");

        let removed = catalog.remove_namespace("acme").unwrap();
        assert!(Arc::ptr_eq(&ns, &removed));
        assert!(catalog.namespace_if_exists("acme").is_none());
        assert_eq!(removed.list_databases(), vec!["prod"]);
        assert!(catalog.remove_namespace("acme").is_none());
    }

    #[test]
    fn test_lookup_table_reports_missing_level() {
        let catalog = Catalog::new();
        catalog.namespace("acme").database("prod").table("users");

        assert!(catalog.lookup_table("acme", "prod", "users").is_ok());

        let err = catalog.lookup_table("other", "prod", "users").unwrap_err();
        assert_eq!(err.to_string(), "Catalog error: namespace 'other' not found");

        let err = catalog.lookup_table("acme", "dev", "users").unwrap_err();
        assert_eq!(err.to_string(), "Catalog error: database 'dev' not found");

        let err = catalog.lookup_table("acme", "prod", "orders").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "table", .. }));

        assert!(catalog.namespace_if_exists("other").is_none());
    }

    #[test]
    fn test_config_reaches_new_nodes() {
        let config = CatalogConfig::new().default_session_duration(Duration::from_secs(900));
        let catalog = Catalog::with_config(config);
        let sc = catalog.namespace("acme").database("prod").scope("account");
        assert_eq!(sc.session_duration(), Some(Duration::from_secs(900)));
    }
}
