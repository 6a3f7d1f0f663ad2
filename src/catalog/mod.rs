//! Catalog module
//!
//! The schema tree, from the root down to leaf records:
//! [`Catalog`] - [`Namespace`] - [`Database`] - [`Table`] - [`FieldDefinition`].
//!
//! Every node carries its own lock. Looking up or creating a child takes the
//! parent's lock; reading or changing a node's attributes takes the node's
//! own lock. Locks are always taken root to leaf and a parent's lock is
//! released before a child's is acquired.

mod registry;

pub mod access;
pub mod catalog;
pub mod database;
pub mod field;
pub mod index;
pub mod namespace;
pub mod rule;
pub mod scope;
pub mod snapshot;
pub mod table;
pub mod token;
pub mod types;

pub use access::{AccessCredential, Secrets};
pub use catalog::Catalog;
pub use database::Database;
pub use field::{FieldAttrs, FieldDefinition};
pub use index::{IndexAttrs, IndexDefinition};
pub use namespace::Namespace;
pub use rule::{Operation, Permission, RowAccessRule, RuleAttrs};
pub use scope::{Scope, ScopeAttrs};
pub use snapshot::CatalogSnapshot;
pub use table::Table;
pub use token::{Token, TokenAttrs};
pub use types::{Algorithm, DataType, Expr, Value};
