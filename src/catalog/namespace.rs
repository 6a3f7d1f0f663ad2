//! Namespace nodes
//!
//! A namespace owns namespace-level credentials, tokens and databases.

use super::access::AccessCredential;
use super::database::Database;
use super::registry::{self, Registry};
use super::token::Token;
use crate::config::CatalogConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct NamespaceState {
    accesses: Registry<AccessCredential>,
    tokens: Registry<Token>,
    databases: Registry<Database>,
}

/// A tenant namespace
#[derive(Debug)]
pub struct Namespace {
    name: String,
    config: Arc<CatalogConfig>,
    state: RwLock<NamespaceState>,
}

impl Namespace {
    pub(crate) fn new(name: impl Into<String>, config: Arc<CatalogConfig>) -> Self {
        let capacity = config.initial_capacity;
        Self {
            name: name.into(),
            config,
            state: RwLock::new(NamespaceState {
                accesses: Registry::with_capacity(capacity),
                tokens: Registry::with_capacity(capacity),
                databases: Registry::with_capacity(capacity),
            }),
        }
    }

    /// The namespace name, fixed at creation
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
            debug!(ns = %self.name, ac = %user, "credential created");
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
            debug!(ns = %self.name, ac = %user, "credential removed");
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
            debug!(ns = %self.name, tk = %name, "token created");
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
            debug!(ns = %self.name, tk = %name, "token removed");
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

    // ========== Databases ==========

    /// Get or create a database
    pub fn database(&self, name: &str) -> Arc<Database> {
        let (db, created) = registry::get_or_create(
            &self.state,
            |s| &s.databases,
            |s| &mut s.databases,
            name,
            || Database::new(name, self.config.clone()),
        );
        if created {
            debug!(ns = %self.name, db = %name, "database created");
        }
        db
    }

    /// Get a database by name, without creating it
    pub fn database_if_exists(&self, name: &str) -> Option<Arc<Database>> {
        registry::get_if_exists(&self.state, |s| &s.databases, name)
    }

    /// Drop a database, returning the detached node
    pub fn remove_database(&self, name: &str) -> Option<Arc<Database>> {
        let removed = registry::remove(&self.state, |s| &mut s.databases, name);
        if removed.is_some() {
            debug!(ns = %self.name, db = %name, "database removed");
        }
        removed
    }

    /// Check if a database exists
    pub fn database_exists(&self, name: &str) -> bool {
        self.state.read().databases.contains(name)
    }

    /// List all database names
    pub fn list_databases(&self) -> Vec<String> {
        self.state.read().databases.names()
    }

    /// All database nodes, sorted by name
    pub fn databases(&self) -> Vec<Arc<Database>> {
        self.state.read().databases.values()
    }
}
