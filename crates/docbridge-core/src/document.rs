//! Document-entity contract.
//!
//! The document mapper owns the typed entity; docbridge moves raw field
//! data in and out of it. `from_raw(RawDocument::new())` must produce a
//! valid stub instance: non-nullable relations hand these out when no
//! document exists yet, and callers are allowed to mutate and save them.

use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::value::{ObjectId, RawDocument, Value};

/// Trait for types that map to documents in one collection.
pub trait Document: Sized + Send + Sync {
    /// The name of the collection this document lives in.
    const COLLECTION: &'static str;

    /// Construct an instance from raw field data.
    ///
    /// An empty map yields a stub instance with all defaults and no id.
    /// Fields beyond the declared ones must be preserved so that extended
    /// document types survive a pack/from_raw cycle intact.
    fn from_raw(data: RawDocument) -> Result<Self>;

    /// Pack this instance back into raw field data, including `_id` when
    /// one is assigned.
    fn pack(&self) -> RawDocument;

    /// The document id, if this instance has been persisted or seeded.
    fn id(&self) -> Option<ObjectId>;

    /// Assign the document id (done once, just before first insert).
    fn set_id(&mut self, id: ObjectId);

    /// Read a field by name.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Write a field by name (used to stamp the outer key).
    fn set_field(&mut self, name: &str, value: Value);
}

/// A shared handle to a materialized document instance.
///
/// The relation accessor materializes a document at most once and hands the
/// same handle back on every access, so mutations through any clone are
/// visible everywhere.
pub type DocumentHandle<D> = Arc<RwLock<D>>;

/// Wrap a document into a shared handle.
pub fn document_handle<D: Document>(document: D) -> DocumentHandle<D> {
    Arc::new(RwLock::new(document))
}
