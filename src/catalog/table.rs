//! Table nodes
//!
//! A table owns its row access rules, field definitions and index
//! definitions. One lock guards the three mappings and the table's own flags.

use super::field::FieldDefinition;
use super::index::IndexDefinition;
use super::registry::{self, Registry};
use super::rule::RowAccessRule;
use crate::config::CatalogConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct TableState {
    schemafull: bool,
    drop: bool,
    rules: Registry<RowAccessRule>,
    fields: Registry<FieldDefinition>,
    indexes: Registry<IndexDefinition>,
}

/// A table in a database
#[derive(Debug)]
pub struct Table {
    name: String,
    state: RwLock<TableState>,
}

impl Table {
    pub(crate) fn new(name: impl Into<String>, config: &CatalogConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            name: name.into(),
            state: RwLock::new(TableState {
                schemafull: false,
                drop: false,
                rules: Registry::with_capacity(capacity),
                fields: Registry::with_capacity(capacity),
                indexes: Registry::with_capacity(capacity),
            }),
        }
    }

    /// The table name, fixed at creation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether only defined fields may be stored
    pub fn is_schemafull(&self) -> bool {
        self.state.read().schemafull
    }

    /// Set the schemafull flag
    pub fn set_schemafull(&self, schemafull: bool) {
        self.state.write().schemafull = schemafull;
    }

    /// Whether writes to the table are discarded
    pub fn is_drop(&self) -> bool {
        self.state.read().drop
    }

    /// Set the drop flag
    pub fn set_drop(&self, drop: bool) {
        self.state.write().drop = drop;
    }

    // ========== Row access rules ==========

    /// Get or create a row access rule
    pub fn rule(&self, name: &str) -> Arc<RowAccessRule> {
        let (ru, created) = registry::get_or_create(
            &self.state,
            |s| &s.rules,
            |s| &mut s.rules,
            name,
            || RowAccessRule::new(name),
        );
        if created {
            debug!(tb = %self.name, ru = %name, "rule created");
        }
        ru
    }

    /// Get a row access rule by name
    pub fn rule_if_exists(&self, name: &str) -> Option<Arc<RowAccessRule>> {
        registry::get_if_exists(&self.state, |s| &s.rules, name)
    }

    /// Drop a row access rule, returning the detached node
    pub fn remove_rule(&self, name: &str) -> Option<Arc<RowAccessRule>> {
        let removed = registry::remove(&self.state, |s| &mut s.rules, name);
        if removed.is_some() {
            debug!(tb = %self.name, ru = %name, "rule removed");
        }
        removed
    }

    /// Check if a row access rule exists
    pub fn rule_exists(&self, name: &str) -> bool {
        self.state.read().rules.contains(name)
    }

    /// List all row access rule names
    pub fn list_rules(&self) -> Vec<String> {
        self.state.read().rules.names()
    }

    /// All row access rule nodes, sorted by name
    pub fn rules(&self) -> Vec<Arc<RowAccessRule>> {
        self.state.read().rules.values()
    }

    // ========== Fields ==========

    /// Get or create a field
    pub fn field(&self, name: &str) -> Arc<FieldDefinition> {
        let (fd, created) = registry::get_or_create(
            &self.state,
            |s| &s.fields,
            |s| &mut s.fields,
            name,
            || FieldDefinition::new(name),
        );
        if created {
            debug!(tb = %self.name, fd = %name, "field created");
        }
        fd
    }

    /// Get a field by name
    pub fn field_if_exists(&self, name: &str) -> Option<Arc<FieldDefinition>> {
        registry::get_if_exists(&self.state, |s| &s.fields, name)
    }

    /// Drop a field, returning the detached node
    pub fn remove_field(&self, name: &str) -> Option<Arc<FieldDefinition>> {
        let removed = registry::remove(&self.state, |s| &mut s.fields, name);
        if removed.is_some() {
            debug!(tb = %self.name, fd = %name, "field removed");
        }
        removed
    }

    /// Check if a field exists
    pub fn field_exists(&self, name: &str) -> bool {
        self.state.read().fields.contains(name)
    }

    /// List all field names
    pub fn list_fields(&self) -> Vec<String> {
        self.state.read().fields.names()
    }

    /// All field nodes, sorted by name
    pub fn fields(&self) -> Vec<Arc<FieldDefinition>> {
        self.state.read().fields.values()
    }

    // ========== Indexes ==========

    /// Get or create an index
    pub fn index(&self, name: &str) -> Arc<IndexDefinition> {
        let (ix, created) = registry::get_or_create(
            &self.state,
            |s| &s.indexes,
            |s| &mut s.indexes,
            name,
            || IndexDefinition::new(name),
        );
        if created {
            debug!(tb = %self.name, ix = %name, "index created");
        }
        ix
    }

    /// Get an index by name
    pub fn index_if_exists(&self, name: &str) -> Option<Arc<IndexDefinition>> {
        registry::get_if_exists(&self.state, |s| &s.indexes, name)
    }

    /// Drop an index, returning the detached node
    pub fn remove_index(&self, name: &str) -> Option<Arc<IndexDefinition>> {
        let removed = registry::remove(&self.state, |s| &mut s.indexes, name);
        if removed.is_some() {
            debug!(tb = %self.name, ix = %name, "index removed");
        }
        removed
    }

    /// Check if an index exists
    pub fn index_exists(&self, name: &str) -> bool {
        self.state.read().indexes.contains(name)
    }

    /// List all index names
    pub fn list_indexes(&self) -> Vec<String> {
        self.state.read().indexes.names()
    }

    /// All index nodes, sorted by name
    pub fn indexes(&self) -> Vec<Arc<IndexDefinition>> {
        self.state.read().indexes.values()
    }

    /// Indexes that include the given column
    pub fn indexes_on(&self, column: &str) -> Vec<Arc<IndexDefinition>> {
        self.indexes()
            .into_iter()
            .filter(|ix| ix.covers(column))
            .collect()
    }

    /// Human-readable summary of the table's definitions
    pub fn describe(&self) -> String {
        let (schemafull, rules, fields, indexes) = {
            let state = self.state.read();
            (
                state.schemafull,
                state.rules.values(),
                state.fields.values(),
                state.indexes.values(),
            )
        };

        let mut info = format!(
            "Table: {}{}\n",
            self.name,
            if schemafull { " [SCHEMAFULL]" } else { "" }
        );

        if !fields.is_empty() {
            info.push_str("Fields:\n");
            for fd in fields {
                let attrs = fd.attrs();
                let mut flags = Vec::new();
                if attrs.not_null {
                    flags.push("NOT NULL".to_string());
                }
                if attrs.read_only {
                    flags.push("READONLY".to_string());
                }
                if attrs.mandatory {
                    flags.push("MANDATORY".to_string());
                }
                if attrs.validate {
                    flags.push("VALIDATE".to_string());
                }
                if let Some(min) = attrs.min {
                    flags.push(format!("MIN {}", min));
                }
                if let Some(max) = attrs.max {
                    flags.push(format!("MAX {}", max));
                }
                if let Some(pattern) = &attrs.pattern {
                    flags.push(format!("MATCH '{}'", pattern));
                }
                if !attrs.enum_values.is_empty() {
                    let values: Vec<String> =
                        attrs.enum_values.iter().map(|v| v.to_string()).collect();
                    flags.push(format!("ENUM ({})", values.join(", ")));
                }
                if let Some(computed) = &attrs.computed {
                    flags.push(format!("VALUE {}", computed));
                }
                if let Some(default) = &attrs.default {
                    flags.push(format!("DEFAULT {}", default));
                }

                let flags_str = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", "))
                };
                info.push_str(&format!("  {} {}{}\n", fd.name(), attrs.data_type, flags_str));
            }
        }

        if !indexes.is_empty() {
            info.push_str("Indexes:\n");
            for ix in indexes {
                let attrs = ix.attrs();
                info.push_str(&format!(
                    "  {} ({}){}\n",
                    ix.name(),
                    attrs.columns.join(", "),
                    if attrs.unique { " UNIQUE" } else { "" }
                ));
            }
        }

        if !rules.is_empty() {
            info.push_str("Rules:\n");
            for ru in rules {
                let attrs = ru.attrs();
                let ops: Vec<String> = attrs.operations.iter().map(|o| o.to_string()).collect();
                info.push_str(&format!(
                    "  {} FOR {} {}\n",
                    ru.name(),
                    ops.join(", "),
                    attrs.permission
                ));
            }
        }

        info
    }

    /// Run `f` while holding this table's write lock
    #[cfg(test)]
    pub(crate) fn with_write_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _state = self.state.write();
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::rule::{Operation, Permission};
    use crate::catalog::types::{DataType, Expr, Value};

    fn table(name: &str) -> Table {
        Table::new(name, &CatalogConfig::default())
    }

    #[test]
    fn test_field_get_or_create() {
        let tb = table("person");
        let first = tb.field("age");
        let second = tb.field("age");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(tb.list_fields(), vec!["age"]);
    }

    #[test]
    fn test_lookup_does_not_create() {
        let tb = table("person");
        assert!(tb.field_if_exists("age").is_none());
        assert!(tb.index_if_exists("idx").is_none());
        assert!(tb.rule_if_exists("ru").is_none());
        assert!(!tb.field_exists("age"));
        assert!(!tb.index_exists("idx"));
        assert!(!tb.rule_exists("ru"));
        assert!(tb.list_fields().is_empty());
    }

    #[test]
    fn test_removed_field_stays_valid() {
        let tb = table("person");
        let fd = tb.field("age");
        fd.set_data_type(DataType::Integer).unwrap();

        let removed = tb.remove_field("age").unwrap();
        assert!(Arc::ptr_eq(&fd, &removed));
        assert!(tb.field_if_exists("age").is_none());
        assert_eq!(fd.data_type(), DataType::Integer);
        fd.set_bounds(Some(0.0), None).unwrap();

        let recreated = tb.field("age");
        assert!(!Arc::ptr_eq(&fd, &recreated));
        assert_eq!(recreated.data_type(), DataType::Any);
    }

    #[test]
    fn test_table_flags() {
        let tb = table("log");
        assert!(!tb.is_schemafull());
        tb.set_schemafull(true);
        tb.set_drop(true);
        assert!(tb.is_schemafull());
        assert!(tb.is_drop());
    }

    #[test]
    fn test_indexes_on() {
        let tb = table("person");
        tb.index("idx_email")
            .define(vec!["email".to_string()], true)
            .unwrap();
        tb.index("idx_name")
            .define(vec!["last".to_string(), "first".to_string()], false)
            .unwrap();

        let on_email = tb.indexes_on("email");
        assert_eq!(on_email.len(), 1);
        assert_eq!(on_email[0].name(), "idx_email");
        assert!(tb.indexes_on("age").is_empty());
    }

    #[test]
    fn test_describe() {
        let tb = table("person");
        tb.set_schemafull(true);
        tb.field("age")
            .update(|a| {
                a.data_type = DataType::Integer;
                a.min = Some(0.0);
                a.max = Some(150.0);
                a.default = Some(Value::Int(0));
            })
            .unwrap();
        tb.index("idx_age")
            .define(vec!["age".to_string()], false)
            .unwrap();
        tb.rule("public")
            .define(vec![Operation::Select], Permission::Full);

        let info = tb.describe();
        assert!(info.starts_with("Table: person [SCHEMAFULL]\n"));
        assert!(info.contains("  age int [MIN 0, MAX 150, DEFAULT 0]\n"));
        assert!(info.contains("  idx_age (age)\n"));
        assert!(info.contains("  public FOR SELECT FULL\n"));
    }

    #[test]
    fn test_describe_lists_every_field_attribute() {
        let tb = table("person");
        tb.field("status")
            .update(|a| {
                a.data_type = DataType::String;
                a.enum_values = vec![Value::Str("active".into()), Value::Str("banned".into())];
                a.pattern = Some("^[a-z]+$".to_string());
                a.validate = true;
            })
            .unwrap();
        tb.field("slug")
            .update(|a| {
                a.data_type = DataType::String;
                a.computed = Some(Expr::new("string::slug(name)"));
            })
            .unwrap();
        assert!(tb.field_exists("slug"));

        let info = tb.describe();
        assert!(info.contains(
            "  status string [VALIDATE, MATCH '^[a-z]+$', ENUM ('active', 'banned')]\n"
        ));
        assert!(info.contains("  slug string [VALUE string::slug(name)]\n"));
    }
}
