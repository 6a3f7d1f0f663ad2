//! Field definitions
//!
//! The declared type and constraints of one table field. Constraint data is
//! stored here; evaluating it against records is the executor's job.

use super::types::{DataType, Expr, Value};
use crate::error::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Mutable attributes of a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAttrs {
    /// Declared type
    pub data_type: DataType,
    /// Allowed values; empty means unrestricted
    pub enum_values: Vec<Value>,
    /// Expression computing the field's value
    pub computed: Option<Expr>,
    /// Lower numeric bound
    pub min: Option<f64>,
    /// Upper numeric bound
    pub max: Option<f64>,
    /// Pattern values must match
    pub pattern: Option<String>,
    /// Value used when none is given
    pub default: Option<Value>,
    pub not_null: bool,
    pub read_only: bool,
    pub mandatory: bool,
    /// Validate values on write
    pub validate: bool,
}

impl FieldAttrs {
    /// Check that the attributes are consistent with each other
    pub fn validate(&self, field: &str) -> Result<()> {
        for (side, bound) in [("min", self.min), ("max", self.max)] {
            if let Some(bound) = bound {
                if !bound.is_finite() {
                    return Err(Error::InvalidBounds {
                        field: field.to_string(),
                        reason: format!("{} {} is not finite", side, bound),
                    });
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(Error::InvalidBounds {
                    field: field.to_string(),
                    reason: format!("min {} is greater than max {}", min, max),
                });
            }
        }
        if let Some(default) = &self.default {
            self.data_type.check(default)?;
        }
        for value in &self.enum_values {
            self.data_type.check(value)?;
        }
        Ok(())
    }
}

/// A field of a table
#[derive(Debug)]
pub struct FieldDefinition {
    name: String,
    attrs: RwLock<FieldAttrs>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: RwLock::new(FieldAttrs::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A consistent copy of all attributes
    pub fn attrs(&self) -> FieldAttrs {
        self.attrs.read().clone()
    }

    /// Apply several attribute changes as one.
    ///
    /// The changes are made to a copy which is validated before it replaces
    /// the stored attributes; on error nothing is written.
    ///
    /// `f` runs under this field's write lock, which is not reentrant: it must
    /// not call back into this field (e.g. `fd.bounds()`) or it deadlocks.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut FieldAttrs),
    {
        let mut attrs = self.attrs.write();
        let mut next = attrs.clone();
        f(&mut next);
        next.validate(&self.name)?;
        *attrs = next;
        trace!(fd = %self.name, "field updated");
        Ok(())
    }

    pub fn data_type(&self) -> DataType {
        self.attrs.read().data_type
    }

    /// Change the declared type; existing default and enum values must conform
    pub fn set_data_type(&self, data_type: DataType) -> Result<()> {
        self.update(|a| a.data_type = data_type)
    }

    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        let attrs = self.attrs.read();
        (attrs.min, attrs.max)
    }

    pub fn set_bounds(&self, min: Option<f64>, max: Option<f64>) -> Result<()> {
        self.update(|a| {
            a.min = min;
            a.max = max;
        })
    }

    pub fn enum_values(&self) -> Vec<Value> {
        self.attrs.read().enum_values.clone()
    }

    pub fn set_enum_values(&self, values: Vec<Value>) -> Result<()> {
        self.update(|a| a.enum_values = values)
    }

    pub fn default_value(&self) -> Option<Value> {
        self.attrs.read().default.clone()
    }

    pub fn set_default_value(&self, value: Option<Value>) -> Result<()> {
        self.update(|a| a.default = value)
    }

    pub fn computed(&self) -> Option<Expr> {
        self.attrs.read().computed.clone()
    }

    pub fn pattern(&self) -> Option<String> {
        self.attrs.read().pattern.clone()
    }

    pub fn is_not_null(&self) -> bool {
        self.attrs.read().not_null
    }

    pub fn is_read_only(&self) -> bool {
        self.attrs.read().read_only
    }

    pub fn is_mandatory(&self) -> bool {
        self.attrs.read().mandatory
    }

    /// Whether values are validated on write
    pub fn validates_on_write(&self) -> bool {
        self.attrs.read().validate
    }

    /// Check a value against the declared type and enum set
    pub fn accepts(&self, value: &Value) -> bool {
        let attrs = self.attrs.read();
        if matches!(value, Value::Null) {
            return !attrs.not_null;
        }
        value.is_finite()
            && value.conforms_to(&attrs.data_type)
            && (attrs.enum_values.is_empty() || attrs.enum_values.contains(value))
    }
}
