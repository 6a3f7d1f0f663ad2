//! Row access rules
//!
//! Table permissions: which record operations a rule governs and whether
//! they are denied, allowed, or allowed where an expression holds.

use super::types::Expr;
use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// A record operation a rule can govern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Select,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Select => write!(f, "SELECT"),
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SELECT" => Ok(Operation::Select),
            "CREATE" => Ok(Operation::Create),
            "UPDATE" => Ok(Operation::Update),
            "DELETE" => Ok(Operation::Delete),
            _ => Err(Error::UnknownVariant {
                kind: "operation",
                value: s.to_string(),
            }),
        }
    }
}

/// What a rule grants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    #[default]
    None,
    Full,
    Where(Expr),
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::None => write!(f, "NONE"),
            Permission::Full => write!(f, "FULL"),
            Permission::Where(expr) => write!(f, "WHERE {}", expr),
        }
    }
}

/// Mutable attributes of a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAttrs {
    pub operations: Vec<Operation>,
    pub permission: Permission,
}

/// A row access rule on a table
#[derive(Debug)]
pub struct RowAccessRule {
    name: String,
    attrs: RwLock<RuleAttrs>,
}

impl RowAccessRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: RwLock::new(RuleAttrs::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> RuleAttrs {
        self.attrs.read().clone()
    }

    pub fn permission(&self) -> Permission {
        self.attrs.read().permission.clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.attrs.read().operations.clone()
    }

    /// Set the governed operations and the permission together
    pub fn define(&self, operations: Vec<Operation>, permission: Permission) {
        let mut unique = Vec::with_capacity(operations.len());
        for op in operations {
            if !unique.contains(&op) {
                unique.push(op);
            }
        }
        let mut attrs = self.attrs.write();
        attrs.operations = unique;
        attrs.permission = permission;
        trace!(ru = %self.name, permission = %attrs.permission, "rule defined");
    }

    pub fn applies_to(&self, operation: Operation) -> bool {
        self.attrs.read().operations.contains(&operation)
    }
}
