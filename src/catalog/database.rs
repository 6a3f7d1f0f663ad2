//! Database nodes
//!
//! A database owns database-level credentials, tokens, scopes and tables.

use super::access::AccessCredential;
use super::registry::{self, Registry};
use super::scope::Scope;
use super::table::Table;
use super::token::Token;
use crate::config::CatalogConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct DatabaseState {
    accesses: Registry<AccessCredential>,
    tokens: Registry<Token>,
    scopes: Registry<Scope>,
    tables: Registry<Table>,
}

/// A database in a namespace
#[derive(Debug)]
pub struct Database {
    name: String,
    config: Arc<CatalogConfig>,
    state: RwLock<DatabaseState>,
}

impl Database {
    pub(crate) fn new(name: impl Into<String>, config: Arc<CatalogConfig>) -> Self {
        let capacity = config.initial_capacity;
        Self {
            name: name.into(),
            config,
            state: RwLock::new(DatabaseState {
                accesses: Registry::with_capacity(capacity),
                tokens: Registry::with_capacity(capacity),
                scopes: Registry::with_capacity(capacity),
                tables: Registry::with_capacity(capacity),
            }),
        }
    }

    /// The database name, fixed at creation
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========== Access credentials ==========

    /// Get or create a credential
    pub fn access(&self, user: &str) -> Arc<AccessCredential> {
        let (ac, created) = registry::get_or_create(
            &self.state,
            |s| &s.accesses,
            |s| &mut s.accesses,
            user,
            || AccessCredential::new(user),
        );
        if created {
            debug!(db = %self.name, ac = %user, "credential created");
        }
        ac
    }

    /// Get a credential by name, without creating it
    pub fn access_if_exists(&self, user: &str) -> Option<Arc<AccessCredential>> {
        registry::get_if_exists(&self.state, |s| &s.accesses, user)
    }

    /// Drop a credential, returning the detached node
    pub fn remove_access(&self, user: &str) -> Option<Arc<AccessCredential>> {
        let removed = registry::remove(&self.state, |s| &mut s.accesses, user);
        if removed.is_some() {
            debug!(db = %self.name, ac = %user, "credential removed");
        }
        removed
    }

    /// Check if a credential exists
    pub fn access_exists(&self, user: &str) -> bool {
        self.state.read().accesses.contains(user)
    }

    /// List all credential names
    pub fn list_accesses(&self) -> Vec<String> {
        self.state.read().accesses.names()
    }

    /// All credential nodes, sorted by name
    pub fn accesses(&self) -> Vec<Arc<AccessCredential>> {
        self.state.read().accesses.values()
    }

    // ========== Tokens ==========

    /// Get or create a token
    pub fn token(&self, name: &str) -> Arc<Token> {
        let algorithm = self.config.default_token_algorithm;
        let (tk, created) = registry::get_or_create(
            &self.state,
            |s| &s.tokens,
            |s| &mut s.tokens,
            name,
            || Token::new(name, algorithm),
        );
        if created {
            debug!(db = %self.name, tk = %name, "token created");
        }
        tk
    }

    /// Get a token by name, without creating it
    pub fn token_if_exists(&self, name: &str) -> Option<Arc<Token>> {
        registry::get_if_exists(&self.state, |s| &s.tokens, name)
    }

    /// Drop a token, returning the detached node
    pub fn remove_token(&self, name: &str) -> Option<Arc<Token>> {
        let removed = registry::remove(&self.state, |s| &mut s.tokens, name);
        if removed.is_some() {
            debug!(db = %self.name, tk = %name, "token removed");
        }
        removed
    }

    /// Check if a token exists
    pub fn token_exists(&self, name: &str) -> bool {
        self.state.read().tokens.contains(name)
    }

    /// List all token names
    pub fn list_tokens(&self) -> Vec<String> {
        self.state.read().tokens.names()
    }

    /// All token nodes, sorted by name
    pub fn tokens(&self) -> Vec<Arc<Token>> {
        self.state.read().tokens.values()
    }

    // ========== Scopes ==========

    /// Get or create a scope
    pub fn scope(&self, name: &str) -> Arc<Scope> {
        let (sc, created) = registry::get_or_create(
            &self.state,
            |s| &s.scopes,
            |s| &mut s.scopes,
            name,
            || Scope::new(name, self.config.clone()),
        );
        if created {
            debug!(db = %self.name, sc = %name, "scope created");
        }
        sc
    }

    /// Get a scope by name, without creating it
    pub fn scope_if_exists(&self, name: &str) -> Option<Arc<Scope>> {
        registry::get_if_exists(&self.state, |s| &s.scopes, name)
    }

    /// Drop a scope, returning the detached node
    pub fn remove_scope(&self, name: &str) -> Option<Arc<Scope>> {
        let removed = registry::remove(&self.state, |s| &mut s.scopes, name);
        if removed.is_some() {
            debug!(db = %self.name, sc = %name, "scope removed");
        }
        removed
    }

    /// Check if a scope exists
    pub fn scope_exists(&self, name: &str) -> bool {
        self.state.read().scopes.contains(name)
    }

    /// List all scope names
    pub fn list_scopes(&self) -> Vec<String> {
        self.state.read().scopes.names()
    }

    /// All scope nodes, sorted by name
    pub fn scopes(&self) -> Vec<Arc<Scope>> {
        self.state.read().scopes.values()
    }

    // ========== Tables ==========

    /// Get or create a table
    pub fn table(&self, name: &str) -> Arc<Table> {
        let (tb, created) = registry::get_or_create(
            &self.state,
            |s| &s.tables,
            |s| &mut s.tables,
            name,
            || Table::new(name, &self.config),
        );
        if created {
            debug!(db = %self.name, tb = %name, "table created");
        }
        tb
    }

    /// Get a table by name, without creating it
    pub fn table_if_exists(&self, name: &str) -> Option<Arc<Table>> {
        registry::get_if_exists(&self.state, |s| &s.tables, name)
    }

    /// Drop a table, returning the detached node
    pub fn remove_table(&self, name: &str) -> Option<Arc<Table>> {
        let removed = registry::remove(&self.state, |s| &mut s.tables, name);
        if removed.is_some() {
            debug!(db = %self.name, tb = %name, "table removed");
        }
        removed
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.state.read().tables.contains(name)
    }

    /// List all table names
    pub fn list_tables(&self) -> Vec<String> {
        self.state.read().tables.names()
    }

    /// All table nodes, sorted by name
    pub fn tables(&self) -> Vec<Arc<Table>> {
        self.state.read().tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{Algorithm, DataType};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn database(name: &str) -> Database {
        Database::new(name, Arc::new(CatalogConfig::default()))
    }

    #[test]
    fn test_create_and_get_table() {
        let db = database("test");
        let tb = db.table("users");

        assert_eq!(tb.name(), "users");
        assert!(db.table_exists("users"));
        let found = db.table_if_exists("users").unwrap();
        assert!(Arc::ptr_eq(&tb, &found));
    }

    #[test]
    fn test_drop_table() {
        let db = database("test");
        db.table("test");
        assert!(db.table_exists("test"));

        assert!(db.remove_table("test").is_some());
        assert!(!db.table_exists("test"));
        assert!(db.remove_table("test").is_none());
    }

    #[test]
    fn test_scope_and_database_tokens_are_separate() {
        let db = database("test");
        let db_token = db.token("jwt");
        let sc_token = db.scope("account").token("jwt");

        assert!(!Arc::ptr_eq(&db_token, &sc_token));
        db_token.define(Algorithm::Hs256, b"db".to_vec());
        assert_eq!(sc_token.key(), Vec::<u8>::new());

        db.remove_token("jwt");
        assert!(db.scope("account").token_if_exists("jwt").is_some());
    }

    #[test]
    fn test_listing_is_sorted() {
        let db = database("test");
        for name in ["orders", "accounts", "items"] {
            db.table(name);
        }
        db.access("root");
        db.scope("account");

        assert_eq!(db.list_tables(), vec!["accounts", "items", "orders"]);
        assert_eq!(db.list_accesses(), vec!["root"]);
        assert_eq!(db.list_scopes(), vec!["account"]);
        assert!(db.list_tokens().is_empty());
    }

    #[test]
    fn test_locked_table_does_not_block_sibling() {
        let db = Arc::new(database("test"));
        let a = db.table("a");

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = thread::spawn(move || {
            a.with_write_lock(|| {
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        });
        entered_rx.recv().unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let worker = {
            let db = db.clone();
            thread::spawn(move || {
                let b = db.table("b");
                b.field("y").set_data_type(DataType::String).unwrap();
                b.index("idx_y").define(vec!["y".to_string()], true).unwrap();
                assert!(b.field_exists("y"));
                assert!(db.table_exists("a"));
                db.table("c");
                done_tx.send(()).unwrap();
            })
        };

        let finished = done_rx.recv_timeout(Duration::from_secs(5));
        release_tx.send(()).unwrap();
        holder.join().unwrap();
        worker.join().unwrap();

        assert!(finished.is_ok(), "sibling table was blocked by a locked table");
        assert_eq!(db.list_tables(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_exists_checks() {
        let db = database("test");
        db.access("root");
        db.token("jwt");
        db.scope("account");

        assert!(db.access_exists("root"));
        assert!(db.token_exists("jwt"));
        assert!(db.scope_exists("account"));
        assert!(!db.scope_exists("admin"));
        assert!(!db.table_exists("users"));
    }
}
