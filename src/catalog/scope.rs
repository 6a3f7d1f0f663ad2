//! Scopes
//!
//! A scope is a database-level authentication policy: signup and signin
//! rules, a session duration and its own set of tokens. Scope tokens are a
//! separate name space from the database's tokens.

use super::registry::{self, Registry};
use super::token::Token;
use super::types::Expr;
use crate::config::CatalogConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Mutable attributes of a scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeAttrs {
    /// Hash used for code-based authentication
    pub code: Vec<u8>,
    /// How long issued sessions remain valid
    pub session: Option<Duration>,
    pub signup: Option<Expr>,
    pub signin: Option<Expr>,
}

#[derive(Debug)]
struct ScopeState {
    attrs: ScopeAttrs,
    tokens: Registry<Token>,
}

/// An authentication scope
#[derive(Debug)]
pub struct Scope {
    name: String,
    config: Arc<CatalogConfig>,
    state: RwLock<ScopeState>,
}

impl Scope {
    pub(crate) fn new(name: impl Into<String>, config: Arc<CatalogConfig>) -> Self {
        let state = ScopeState {
            attrs: ScopeAttrs {
                session: config.default_session_duration,
                ..ScopeAttrs::default()
            },
            tokens: Registry::with_capacity(config.initial_capacity),
        };
        Self {
            name: name.into(),
            config,
            state: RwLock::new(state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> ScopeAttrs {
        self.state.read().attrs.clone()
    }

    pub fn session_duration(&self) -> Option<Duration> {
        self.state.read().attrs.session
    }

    pub fn set_session_duration(&self, session: Option<Duration>) {
        self.state.write().attrs.session = session;
        trace!(sc = %self.name, ?session, "scope session set");
    }

    pub fn signup(&self) -> Option<Expr> {
        self.state.read().attrs.signup.clone()
    }

    pub fn signin(&self) -> Option<Expr> {
        self.state.read().attrs.signin.clone()
    }

    pub fn code(&self) -> Vec<u8> {
        self.state.read().attrs.code.clone()
    }

    /// Apply several attribute changes under one write lock.
    ///
    /// `f` runs while the scope's lock is held, and the lock is not
    /// reentrant: `f` must not call any method on this scope or it deadlocks.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ScopeAttrs),
    {
        f(&mut self.state.write().attrs);
        trace!(sc = %self.name, "scope updated");
    }

    // ========== Tokens ==========

    /// Get or create a scope token
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
            debug!(sc = %self.name, tk = %name, "scope token created");
        }
        tk
    }

    /// Get a scope token by name, without creating it
    pub fn token_if_exists(&self, name: &str) -> Option<Arc<Token>> {
        registry::get_if_exists(&self.state, |s| &s.tokens, name)
    }

    /// Drop a scope token, returning the detached node
    pub fn remove_token(&self, name: &str) -> Option<Arc<Token>> {
        let removed = registry::remove(&self.state, |s| &mut s.tokens, name);
        if removed.is_some() {
            debug!(sc = %self.name, tk = %name, "scope token removed");
        }
        removed
    }

    /// Check if a scope token exists
    pub fn token_exists(&self, name: &str) -> bool {
        self.state.read().tokens.contains(name)
    }

    /// List all scope token names
    pub fn list_tokens(&self) -> Vec<String> {
        self.state.read().tokens.names()
    }

    /// All scope token nodes, sorted by name
    pub fn tokens(&self) -> Vec<Arc<Token>> {
        self.state.read().tokens.values()
    }
}
