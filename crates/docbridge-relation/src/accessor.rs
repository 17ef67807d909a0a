//! Lazy relation accessor.
//!
//! [`HasDocumentRelation`] is the per-record runtime object behind a
//! `document:one` declaration. It loads the related document at most once,
//! on first access, and hands out one shared handle for the lifetime of
//! the parent. Writes are never issued directly: mutations queue a
//! [`Command`] whose execute/rollback/complete hooks keep the document
//! store consistent with the relational transaction driving them.
//!
//! The accessor holds its parent weakly. The relational mapper owns the
//! record; a dropped parent surfaces as an error instead of a leak.

use std::sync::{Arc, RwLock};

use docbridge_core::{
    Command, Document, DocumentHandle, Error, Filter, ObjectId, RawDocument, RecordHandle,
    RelationErrorKind, Result, StoreHandle, Value, WeakRecordHandle, doc_id, document_handle,
    restore_document,
};
use docbridge_schema::RelationSchema;
use tracing::debug;

/// Load progress of one relation slot. Forward-only: once loaded, a slot
/// never returns to [`LoadState::Unloaded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never resolved; first access triggers the store query.
    Unloaded,
    /// Resolved, no related document exists.
    LoadedEmpty,
    /// Resolved to a materialized document instance.
    LoadedPresent,
}

struct RelationState<D> {
    load: LoadState,
    /// Raw form of the document as last seen in the store. `None` while no
    /// stored counterpart exists. Rollback restores this verbatim.
    snapshot: Option<RawDocument>,
    instance: Option<DocumentHandle<D>>,
}

/// Runtime accessor for one `document:one` relation slot.
pub struct HasDocumentRelation<D: Document> {
    schema: RelationSchema,
    store: StoreHandle,
    parent: Option<WeakRecordHandle>,
    state: Arc<RwLock<RelationState<D>>>,
}

impl<D: Document + 'static> HasDocumentRelation<D> {
    /// Create an unbound prototype. Every access fails until
    /// [`Self::bind_context`] attaches it to a record.
    #[must_use]
    pub fn new(schema: RelationSchema, store: StoreHandle) -> Self {
        Self {
            schema,
            store,
            parent: None,
            state: Arc::new(RwLock::new(RelationState {
                load: LoadState::Unloaded,
                snapshot: None,
                instance: None,
            })),
        }
    }

    /// Bind a fresh accessor to `parent`, optionally seeded with data a
    /// batch loader already fetched.
    ///
    /// Seeding with an empty map marks the relation as loaded-and-absent;
    /// seeding with fields materializes the instance without ever querying
    /// the store.
    pub fn bind_context(&self, parent: &RecordHandle, data: Option<RawDocument>) -> Result<Self> {
        let state = match data {
            None => RelationState {
                load: LoadState::Unloaded,
                snapshot: None,
                instance: None,
            },
            Some(raw) if raw.is_empty() => RelationState {
                load: LoadState::LoadedEmpty,
                snapshot: None,
                instance: None,
            },
            Some(raw) => RelationState {
                load: LoadState::LoadedPresent,
                instance: Some(document_handle(D::from_raw(raw.clone())?)),
                snapshot: Some(raw),
            },
        };
        Ok(Self {
            schema: self.schema.clone(),
            store: self.store.clone(),
            parent: Some(Arc::downgrade(parent)),
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// The resolved key configuration of this relation.
    #[must_use]
    pub const fn schema(&self) -> &RelationSchema {
        &self.schema
    }

    /// Current load progress.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.state.read().expect("lock poisoned").load
    }

    /// Check whether the relation has been resolved.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.load_state() != LoadState::Unloaded
    }

    /// Check whether a related document exists, loading if necessary.
    ///
    /// A non-nullable relation whose stub has not been requested yet still
    /// reports `false` here.
    pub fn has_related(&self) -> Result<bool> {
        self.ensure_loaded()?;
        Ok(self.state.read().expect("lock poisoned").instance.is_some())
    }

    /// The related document, loading on first call.
    ///
    /// Every call returns the same shared handle. A nullable relation with
    /// no document yields `None`; a non-nullable one materializes an empty
    /// stub the caller may fill in and save.
    pub fn get_related(&self) -> Result<Option<DocumentHandle<D>>> {
        self.ensure_loaded()?;
        let mut state = self.state.write().expect("lock poisoned");
        if let Some(instance) = &state.instance {
            return Ok(Some(instance.clone()));
        }
        if self.schema.nullable {
            return Ok(None);
        }
        let stub = document_handle(D::from_raw(RawDocument::new())?);
        state.instance = Some(stub.clone());
        state.load = LoadState::LoadedPresent;
        Ok(Some(stub))
    }

    /// Replace the related document, or clear it with `None`.
    ///
    /// Clearing a non-nullable relation fails before any store access.
    /// Otherwise the relation is loaded first so the queued command knows
    /// which stored document the assignment supersedes.
    pub fn set_related(&self, value: Option<D>) -> Result<()> {
        if value.is_none() && !self.schema.nullable {
            return Err(Error::relation(
                RelationErrorKind::NonNullable,
                "unable to set null value for non nullable relation",
            ));
        }
        self.ensure_loaded()?;
        let mut state = self.state.write().expect("lock poisoned");
        match value {
            Some(document) => {
                state.instance = Some(document_handle(document));
                state.load = LoadState::LoadedPresent;
            }
            None => {
                state.instance = None;
                state.load = LoadState::LoadedEmpty;
            }
        }
        Ok(())
    }

    /// Queue the persistence work for this relation slot.
    ///
    /// Returns `None` when the relation was never loaded: an untouched
    /// slot has nothing to persist. The execute hook reads the parent's
    /// inner key at execution time, not now, so a parent key assigned by
    /// an earlier command in the same transaction is picked up.
    pub fn queue_command(&self) -> Result<Option<Command>> {
        if !self.is_loaded() {
            return Ok(None);
        }
        let parent = self
            .parent
            .clone()
            .ok_or_else(|| unbound_error(&self.schema))?;

        let exec_state = self.state.clone();
        let exec_store = self.store.clone();
        let exec_schema = self.schema.clone();
        let execute = move || -> Result<()> {
            let state = exec_state.read().expect("lock poisoned");
            let snapshot_id = state.snapshot.as_ref().and_then(doc_id).copied();
            match &state.instance {
                Some(instance) => {
                    let record = parent.upgrade().ok_or_else(|| {
                        Error::relation(
                            RelationErrorKind::ParentDropped,
                            "parent record was dropped before its relation was persisted",
                        )
                    })?;
                    let inner_value = record
                        .read()
                        .expect("lock poisoned")
                        .get_field(&exec_schema.inner_key);
                    let inner_value = match inner_value {
                        None | Some(Value::Null) => {
                            return Err(Error::relation(
                                RelationErrorKind::Unbound,
                                format!(
                                    "parent record has no value for inner key '{}'",
                                    exec_schema.inner_key
                                ),
                            ));
                        }
                        Some(value) => value,
                    };

                    {
                        let mut document = instance.write().expect("lock poisoned");
                        document.set_field(&exec_schema.outer_key, inner_value);
                        match document.id() {
                            Some(id) => {
                                exec_store.update_one(D::COLLECTION, &id, &document.pack())?;
                            }
                            None => {
                                document.set_id(ObjectId::new());
                                exec_store.insert_one(D::COLLECTION, &document.pack())?;
                            }
                        }
                    }

                    let new_id = instance.read().expect("lock poisoned").id();
                    if let Some(old_id) = snapshot_id {
                        if new_id != Some(old_id) {
                            // Assignment replaced the stored document
                            exec_store.delete_one(D::COLLECTION, &old_id)?;
                        }
                    }
                }
                None => {
                    if let Some(old_id) = snapshot_id {
                        debug!(
                            collection = D::COLLECTION,
                            id = %old_id,
                            "Deleting detached related document"
                        );
                        exec_store.delete_one(D::COLLECTION, &old_id)?;
                    }
                }
            }
            Ok(())
        };

        let roll_state = self.state.clone();
        let roll_store = self.store.clone();
        let rollback = move || -> Result<()> {
            let state = roll_state.read().expect("lock poisoned");
            let snapshot_id = state.snapshot.as_ref().and_then(doc_id).copied();
            let instance_id = state
                .instance
                .as_ref()
                .and_then(|i| i.read().expect("lock poisoned").id());
            match (&state.snapshot, instance_id) {
                (Some(snapshot), Some(new_id)) => {
                    if Some(new_id) != snapshot_id {
                        // Remove the replacement before reviving the original
                        roll_store.delete_one(D::COLLECTION, &new_id)?;
                    }
                    restore_document(roll_store.as_ref(), D::COLLECTION, snapshot)
                }
                (Some(snapshot), None) => {
                    restore_document(roll_store.as_ref(), D::COLLECTION, snapshot)
                }
                (None, Some(new_id)) => roll_store.delete_one(D::COLLECTION, &new_id),
                (None, None) => Ok(()),
            }
        };

        let done_state = self.state.clone();
        let complete = move || -> Result<()> {
            let mut state = done_state.write().expect("lock poisoned");
            let packed = state
                .instance
                .as_ref()
                .map(|i| i.read().expect("lock poisoned").pack());
            state.load = if packed.is_some() {
                LoadState::LoadedPresent
            } else {
                LoadState::LoadedEmpty
            };
            state.snapshot = packed;
            Ok(())
        };

        Ok(Some(
            Command::new(execute)
                .on_rollback(rollback)
                .on_complete(complete)
                .describe("sync document relation"),
        ))
    }

    /// Resolve the relation if it is still [`LoadState::Unloaded`].
    ///
    /// A parent without an inner-key value cannot reference anything, so
    /// the slot resolves to empty without touching the store.
    fn ensure_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        let inner_value = self.parent_inner_value()?;
        let mut state = self.state.write().expect("lock poisoned");
        if state.load != LoadState::Unloaded {
            return Ok(());
        }
        match inner_value {
            None | Some(Value::Null) => {
                debug!(
                    collection = D::COLLECTION,
                    inner_key = %self.schema.inner_key,
                    "Parent has no inner key value, relation resolves to empty"
                );
                state.load = LoadState::LoadedEmpty;
            }
            Some(value) => {
                let filter = Filter::Eq(self.schema.outer_key.clone(), value);
                let mut found = self.store.find(D::COLLECTION, &filter, Some(1))?;
                match found.pop() {
                    Some(raw) => {
                        state.instance = Some(document_handle(D::from_raw(raw.clone())?));
                        state.snapshot = Some(raw);
                        state.load = LoadState::LoadedPresent;
                    }
                    None => state.load = LoadState::LoadedEmpty,
                }
            }
        }
        Ok(())
    }

    fn parent_inner_value(&self) -> Result<Option<Value>> {
        let weak = self
            .parent
            .as_ref()
            .ok_or_else(|| unbound_error(&self.schema))?;
        let record = weak.upgrade().ok_or_else(|| {
            Error::relation(
                RelationErrorKind::ParentDropped,
                "parent record was dropped while its relation was in use",
            )
        })?;
        let value = record
            .read()
            .expect("lock poisoned")
            .get_field(&self.schema.inner_key);
        Ok(value)
    }
}

fn unbound_error(schema: &RelationSchema) -> Error {
    Error::relation(
        RelationErrorKind::Unbound,
        format!(
            "relation accessor ({} -> {}) is not bound to a parent record",
            schema.inner_key, schema.outer_key
        ),
    )
}
