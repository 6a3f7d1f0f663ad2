//! Access credentials
//!
//! A stored user with hashed secrets, defined at namespace or database level.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Hashed secrets of a credential, always read and written together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secrets {
    /// Password hash
    pub pass: Vec<u8>,
    /// Hash used for code-based authentication
    pub code: Vec<u8>,
}

/// A user credential
#[derive(Debug)]
pub struct AccessCredential {
    user: String,
    secrets: RwLock<Secrets>,
}

impl AccessCredential {
    /// Create a credential with empty secrets
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secrets: RwLock::new(Secrets::default()),
        }
    }

    /// The user name, fixed at creation
    pub fn user(&self) -> &str {
        &self.user
    }

    /// A consistent copy of both secrets
    pub fn secrets(&self) -> Secrets {
        self.secrets.read().clone()
    }

    pub fn pass(&self) -> Vec<u8> {
        self.secrets.read().pass.clone()
    }

    pub fn code(&self) -> Vec<u8> {
        self.secrets.read().code.clone()
    }

    pub fn set_pass(&self, pass: impl Into<Vec<u8>>) {
        self.secrets.write().pass = pass.into();
        trace!(user = %self.user, "credential password set");
    }

    pub fn set_code(&self, code: impl Into<Vec<u8>>) {
        self.secrets.write().code = code.into();
        trace!(user = %self.user, "credential code set");
    }

    /// Replace both secrets under one write lock
    pub fn rotate(&self, pass: impl Into<Vec<u8>>, code: impl Into<Vec<u8>>) {
        let mut secrets = self.secrets.write();
        secrets.pass = pass.into();
        secrets.code = code.into();
        trace!(user = %self.user, "credential rotated");
    }

    /// Check a password hash against the stored one
    pub fn verify_pass(&self, pass: &[u8]) -> bool {
        let secrets = self.secrets.read();
        !secrets.pass.is_empty() && secrets.pass == pass
    }
}
