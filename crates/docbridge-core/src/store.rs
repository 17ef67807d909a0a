//! Document store client contract.
//!
//! The bridge only ever issues two filter shapes against the document
//! store: a single-field equality (the accessor's lazy load) and a
//! single-field `$in` set (the batch loader). Everything else, wire
//! protocol and sessions and retries included, belongs to the client
//! implementation.
//!
//! All operations are blocking: they complete before returning, and the
//! caller serializes access. The store is shared process-wide as
//! `Arc<dyn DocumentStore>`; this layer neither pools nor synchronizes it.

use std::sync::Arc;

use crate::error::Result;
use crate::value::{ObjectId, RawDocument, Value, doc_id};

/// A filter over one field of a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the given value.
    Eq(String, Value),
    /// Field equals any of the given values.
    In(String, Vec<Value>),
}

impl Filter {
    /// The field this filter constrains.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Filter::Eq(field, _) | Filter::In(field, _) => field,
        }
    }

    /// Evaluate the filter against a raw document.
    ///
    /// Provided so in-memory store implementations and tests share one
    /// matching rule with whatever the client compiles the filter to.
    #[must_use]
    pub fn matches(&self, document: &RawDocument) -> bool {
        match self {
            Filter::Eq(field, value) => document.get(field) == Some(value),
            Filter::In(field, values) => document
                .get(field)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
        }
    }
}

/// Blocking operations against one document store.
pub trait DocumentStore: Send + Sync {
    /// Fetch raw documents matching `filter`, up to `limit` if given.
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<RawDocument>>;

    /// Insert one document. The document must carry an `_id`; inserting an
    /// existing id is a `Duplicate` store error.
    fn insert_one(&self, collection: &str, document: &RawDocument) -> Result<()>;

    /// Replace the fields of the document with the given id. Missing id is
    /// a `NotFound` store error.
    fn update_one(&self, collection: &str, id: &ObjectId, document: &RawDocument) -> Result<()>;

    /// Delete the document with the given id, if present.
    fn delete_one(&self, collection: &str, id: &ObjectId) -> Result<()>;
}

/// Shared handle to the process-wide store client.
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Restore a snapshot verbatim: overwrite the surviving document when one
/// with the snapshot's id still exists, re-insert it otherwise.
///
/// Rollback paths use this so a partially completed execute (document
/// already written, later step failed) and a fully completed one converge
/// on the same restored state.
pub fn restore_document(store: &dyn DocumentStore, collection: &str, snapshot: &RawDocument) -> Result<()> {
    let Some(id) = doc_id(snapshot) else {
        return Ok(());
    };
    match store.update_one(collection, id, snapshot) {
        Err(e) if e.is_not_found() => store.insert_one(collection, snapshot),
        other => other,
    }
}
