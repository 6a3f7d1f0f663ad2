//! Catalog snapshots
//!
//! Export the whole tree as plain data and apply such data back onto a
//! catalog. Export takes each node's read lock in turn, top-down, and never
//! holds more than the lock of the node being copied. Entries are sorted by
//! name so equal catalogs produce equal snapshots.

use super::access::Secrets;
use super::catalog::Catalog;
use super::database::Database;
use super::field::FieldAttrs;
use super::index::IndexAttrs;
use super::namespace::Namespace;
use super::rule::RuleAttrs;
use super::scope::ScopeAttrs;
use super::table::Table;
use super::token::{Token, TokenAttrs};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A named leaf record and its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<A> {
    pub name: String,
    pub attrs: A,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub namespaces: Vec<NamespaceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSnapshot {
    pub name: String,
    pub accesses: Vec<Entry<Secrets>>,
    pub tokens: Vec<Entry<TokenAttrs>>,
    pub databases: Vec<DatabaseSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub name: String,
    pub accesses: Vec<Entry<Secrets>>,
    pub tokens: Vec<Entry<TokenAttrs>>,
    pub scopes: Vec<ScopeSnapshot>,
    pub tables: Vec<TableSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    pub name: String,
    pub attrs: ScopeAttrs,
    pub tokens: Vec<Entry<TokenAttrs>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub name: String,
    pub schemafull: bool,
    pub drop: bool,
    pub rules: Vec<Entry<RuleAttrs>>,
    pub fields: Vec<Entry<FieldAttrs>>,
    pub indexes: Vec<Entry<IndexAttrs>>,
}

impl CatalogSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every field and index definition in the snapshot
    pub fn validate(&self) -> Result<()> {
        for ns in &self.namespaces {
            for db in &ns.databases {
                for tb in &db.tables {
                    for fd in &tb.fields {
                        if let Err(e) = fd.attrs.validate(&fd.name) {
                            warn!(ns = %ns.name, db = %db.name, tb = %tb.name, fd = %fd.name, error = %e, "rejected field in snapshot");
                            return Err(e);
                        }
                    }
                    for ix in &tb.indexes {
                        if let Err(e) = ix.attrs.validate(&ix.name) {
                            warn!(ns = %ns.name, db = %db.name, tb = %tb.name, ix = %ix.name, error = %e, "rejected index in snapshot");
                            return Err(e);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn tokens(tokens: Vec<Arc<Token>>) -> Vec<Entry<TokenAttrs>> {
    tokens
        .into_iter()
        .map(|tk| Entry {
            name: tk.name().to_string(),
            attrs: tk.attrs(),
        })
        .collect()
}

fn export_namespace(ns: &Namespace) -> NamespaceSnapshot {
    NamespaceSnapshot {
        name: ns.name().to_string(),
        accesses: ns
            .accesses()
            .into_iter()
            .map(|ac| Entry {
                name: ac.user().to_string(),
                attrs: ac.secrets(),
            })
            .collect(),
        tokens: tokens(ns.tokens()),
        databases: ns
            .databases()
            .iter()
            .map(|db| export_database(db))
            .collect(),
    }
}

fn export_database(db: &Database) -> DatabaseSnapshot {
    DatabaseSnapshot {
        name: db.name().to_string(),
        accesses: db
            .accesses()
            .into_iter()
            .map(|ac| Entry {
                name: ac.user().to_string(),
                attrs: ac.secrets(),
            })
            .collect(),
        tokens: tokens(db.tokens()),
        scopes: db
            .scopes()
            .into_iter()
            .map(|sc| ScopeSnapshot {
                name: sc.name().to_string(),
                attrs: sc.attrs(),
                tokens: tokens(sc.tokens()),
            })
            .collect(),
        tables: db.tables().iter().map(|tb| export_table(tb)).collect(),
    }
}

fn export_table(tb: &Table) -> TableSnapshot {
    TableSnapshot {
        name: tb.name().to_string(),
        schemafull: tb.is_schemafull(),
        drop: tb.is_drop(),
        rules: tb
            .rules()
            .into_iter()
            .map(|ru| Entry {
                name: ru.name().to_string(),
                attrs: ru.attrs(),
            })
            .collect(),
        fields: tb
            .fields()
            .into_iter()
            .map(|fd| Entry {
                name: fd.name().to_string(),
                attrs: fd.attrs(),
            })
            .collect(),
        indexes: tb
            .indexes()
            .into_iter()
            .map(|ix| Entry {
                name: ix.name().to_string(),
                attrs: ix.attrs(),
            })
            .collect(),
    }
}

fn apply_table(tb: &Table, snapshot: &TableSnapshot) -> Result<()> {
    tb.set_schemafull(snapshot.schemafull);
    tb.set_drop(snapshot.drop);
    for ru in &snapshot.rules {
        tb.rule(&ru.name)
            .define(ru.attrs.operations.clone(), ru.attrs.permission.clone());
    }
    for fd in &snapshot.fields {
        let attrs = fd.attrs.clone();
        tb.field(&fd.name).update(|a| *a = attrs)?;
    }
    for ix in &snapshot.indexes {
        tb.index(&ix.name)
            .define(ix.attrs.columns.clone(), ix.attrs.unique)?;
    }
    Ok(())
}

fn apply_database(db: &Database, snapshot: &DatabaseSnapshot) -> Result<()> {
    for ac in &snapshot.accesses {
        db.access(&ac.name)
            .rotate(ac.attrs.pass.clone(), ac.attrs.code.clone());
    }
    for tk in &snapshot.tokens {
        db.token(&tk.name)
            .define(tk.attrs.algorithm, tk.attrs.key.clone());
    }
    for sc in &snapshot.scopes {
        let scope = db.scope(&sc.name);
        let attrs = sc.attrs.clone();
        scope.update(|a| *a = attrs);
        for tk in &sc.tokens {
            scope
                .token(&tk.name)
                .define(tk.attrs.algorithm, tk.attrs.key.clone());
        }
    }
    for tb in &snapshot.tables {
        apply_table(&db.table(&tb.name), tb)?;
    }
    Ok(())
}

fn apply_namespace(ns: &Namespace, snapshot: &NamespaceSnapshot) -> Result<()> {
    for ac in &snapshot.accesses {
        ns.access(&ac.name)
            .rotate(ac.attrs.pass.clone(), ac.attrs.code.clone());
    }
    for tk in &snapshot.tokens {
        ns.token(&tk.name)
            .define(tk.attrs.algorithm, tk.attrs.key.clone());
    }
    for db in &snapshot.databases {
        apply_database(&ns.database(&db.name), db)?;
    }
    Ok(())
}

impl Catalog {
    /// Export the whole tree
    pub fn snapshot(&self) -> CatalogSnapshot {
        let snapshot = CatalogSnapshot {
            namespaces: self
                .namespaces()
                .iter()
                .map(|ns| export_namespace(ns))
                .collect(),
        };
        debug!(namespaces = snapshot.namespaces.len(), "catalog exported");
        snapshot
    }

    /// Apply a snapshot on top of the current tree.
    ///
    /// Nodes missing from the catalog are created and existing ones take the
    /// snapshot's attributes; nodes absent from the snapshot are left alone.
    /// The snapshot is validated first, so an invalid one changes nothing.
    pub fn restore(&self, snapshot: &CatalogSnapshot) -> Result<()> {
        snapshot.validate()?;
        for ns in &snapshot.namespaces {
            apply_namespace(&self.namespace(&ns.name), ns)?;
        }
        debug!(namespaces = snapshot.namespaces.len(), "catalog restored");
        Ok(())
    }
}
