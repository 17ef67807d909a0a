//! Batch loader for cross-store has-one relations.
//!
//! Resolves the relation for a whole page of parent rows with a single
//! `$in` query instead of one lookup per row. The loader is stateless
//! between loads; per-load bookkeeping lives in the
//! [`ReferenceCollector`] it hands out.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use docbridge_core::{
    Document, DocumentHandle, Error, Filter, RawDocument, Result, StoreHandle, Value,
    document_handle,
};
use docbridge_schema::RelationSchema;
use tracing::debug;

use crate::collector::ReferenceCollector;

/// Options passed to a loader at query-build time.
pub type LoaderOptions = BTreeMap<String, Value>;

/// Batch loader for one `document:one` relation.
pub struct HasDocumentLoader<D: Document> {
    schema: RelationSchema,
    store: StoreHandle,
    _marker: PhantomData<fn() -> D>,
}

impl<D: Document> std::fmt::Debug for HasDocumentLoader<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HasDocumentLoader")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl<D: Document> Clone for HasDocumentLoader<D> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<D: Document> HasDocumentLoader<D> {
    /// Create a loader for a resolved relation schema.
    #[must_use]
    pub fn new(schema: RelationSchema, store: StoreHandle) -> Self {
        Self {
            schema,
            store,
            _marker: PhantomData,
        }
    }

    /// Contextualize the loader for one query.
    ///
    /// The document side has no joins, ordering or constraining to
    /// configure, so any option at all is a declaration error.
    pub fn with_context(&self, options: &LoaderOptions) -> Result<Self> {
        if !options.is_empty() {
            let names: Vec<&str> = options.keys().map(String::as_str).collect();
            return Err(Error::config(format!(
                "document relation loader does not support any options, got [{}]",
                names.join(", ")
            )));
        }
        Ok(self.clone())
    }

    /// The resolved key configuration this loader queries with.
    #[must_use]
    pub const fn schema(&self) -> &RelationSchema {
        &self.schema
    }

    /// Create a collector wired to this relation's key pair.
    #[must_use]
    pub fn create_collector(&self) -> ReferenceCollector {
        ReferenceCollector::new(self.schema.inner_key.clone(), self.schema.outer_key.clone())
    }

    /// Fetch and route documents for every reference the collector holds.
    ///
    /// No references means no query at all.
    pub fn load_into(&self, collector: &mut ReferenceCollector) -> Result<()> {
        let references = collector.references();
        if references.is_empty() {
            debug!(
                collection = D::COLLECTION,
                rows = collector.len(),
                "No references collected, skipping document query"
            );
            return Ok(());
        }

        debug!(
            collection = D::COLLECTION,
            outer_key = %self.schema.outer_key,
            references = references.len(),
            rows = collector.len(),
            "Batch loading related documents"
        );
        let filter = Filter::In(self.schema.outer_key.clone(), references.to_vec());
        let documents = self.store.find(D::COLLECTION, &filter, None)?;
        for document in documents {
            collector.attach(document)?;
        }
        Ok(())
    }

    /// Resolve the relation for `rows` in one pass, yielding one optional
    /// typed handle per row, in row order.
    pub fn load_rows(&self, rows: &[RawDocument]) -> Result<Vec<Option<DocumentHandle<D>>>> {
        let mut collector = self.create_collector();
        for row in rows {
            collector.push_row(row);
        }
        self.load_into(&mut collector)?;

        collector
            .take()
            .into_iter()
            .map(|slot| {
                slot.map(|raw| D::from_raw(raw).map(document_handle))
                    .transpose()
            })
            .collect()
    }
}
