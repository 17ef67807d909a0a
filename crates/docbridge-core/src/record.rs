//! Parent-record contract.
//!
//! The relational mapper owns record loading and persistence; docbridge only
//! needs field access by name plus enough static metadata to resolve
//! templated relation options. Records are shared as `Arc<RwLock<_>>`
//! handles so a relation can hold a non-owning back-reference to its parent
//! without keeping it alive.

use std::sync::{Arc, RwLock, Weak};

use crate::value::Value;

/// Object-safe field access on a relational record.
///
/// This is the surface the relation accessor sees: it reads the inner-key
/// field lazily (the parent's key may only become known mid-transaction)
/// and never calls back into the relational mapper's own persistence.
pub trait RecordFields: Send + Sync {
    /// Read a field by column name. `None` for unknown fields.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Write a field by column name.
    fn set_field(&mut self, name: &str, value: Value);

    /// The current primary key value, if assigned.
    fn primary_key_value(&self) -> Option<Value>;
}

/// Static metadata for a record type that declares cross-store relations.
pub trait Record: RecordFields {
    /// Role name used by option templating (e.g. `"photo"`).
    const ROLE: &'static str;

    /// Primary key column name.
    const PRIMARY_KEY: &'static str;
}

/// A shared, owning handle to a parent record.
pub type RecordHandle = Arc<RwLock<dyn RecordFields>>;

/// A non-owning handle held by relation accessors.
///
/// The relation must never extend the parent's lifetime; a dropped parent
/// surfaces as a relation error on the next access.
pub type WeakRecordHandle = Weak<RwLock<dyn RecordFields>>;

/// Wrap a record into a shared handle.
pub fn record_handle<R: RecordFields + 'static>(record: R) -> Arc<RwLock<R>> {
    Arc::new(RwLock::new(record))
}
