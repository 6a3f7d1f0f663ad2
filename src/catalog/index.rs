//! Index definitions

use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// Mutable attributes of an index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAttrs {
    /// Indexed columns, in key order
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexAttrs {
    pub fn validate(&self, index: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for col in &self.columns {
            if col.is_empty() {
                return Err(Error::InvalidIndex {
                    index: index.to_string(),
                    reason: "empty column name".to_string(),
                });
            }
            if !seen.insert(col.as_str()) {
                return Err(Error::InvalidIndex {
                    index: index.to_string(),
                    reason: format!("column '{}' listed twice", col),
                });
            }
        }
        Ok(())
    }
}

/// An index on a table
#[derive(Debug)]
pub struct IndexDefinition {
    name: String,
    attrs: RwLock<IndexAttrs>,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: RwLock::new(IndexAttrs::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> IndexAttrs {
        self.attrs.read().clone()
    }

    pub fn columns(&self) -> Vec<String> {
        self.attrs.read().columns.clone()
    }

    pub fn is_unique(&self) -> bool {
        self.attrs.read().unique
    }

    pub fn set_unique(&self, unique: bool) {
        self.attrs.write().unique = unique;
    }

    /// Set columns and uniqueness together
    pub fn define(&self, columns: Vec<String>, unique: bool) -> Result<()> {
        let next = IndexAttrs { columns, unique };
        next.validate(&self.name)?;
        *self.attrs.write() = next;
        trace!(ix = %self.name, unique, "index defined");
        Ok(())
    }

    /// Check if the index covers a column
    pub fn covers(&self, column: &str) -> bool {
        self.attrs.read().columns.iter().any(|c| c == column)
    }
}
