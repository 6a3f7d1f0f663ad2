//! Tokens
//!
//! Named signing keys, held by namespaces, databases and scopes.

use super::types::Algorithm;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Mutable attributes of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttrs {
    pub algorithm: Algorithm,
    /// Shared secret or public key, depending on the algorithm
    pub key: Vec<u8>,
}

/// A named token definition
#[derive(Debug)]
pub struct Token {
    name: String,
    attrs: RwLock<TokenAttrs>,
}

impl Token {
    pub fn new(name: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            name: name.into(),
            attrs: RwLock::new(TokenAttrs {
                algorithm,
                key: Vec::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> TokenAttrs {
        self.attrs.read().clone()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.attrs.read().algorithm
    }

    pub fn key(&self) -> Vec<u8> {
        self.attrs.read().key.clone()
    }

    /// Set algorithm and key together
    pub fn define(&self, algorithm: Algorithm, key: impl Into<Vec<u8>>) {
        let mut attrs = self.attrs.write();
        attrs.algorithm = algorithm;
        attrs.key = key.into();
        trace!(tk = %self.name, %algorithm, "token defined");
    }

    pub fn set_key(&self, key: impl Into<Vec<u8>>) {
        self.attrs.write().key = key.into();
        trace!(tk = %self.name, "token key set");
    }
}
