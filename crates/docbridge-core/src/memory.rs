//! In-memory document store.
//!
//! A reference [`DocumentStore`] backed by a mutex-guarded map, used as the
//! test double throughout the workspace and as a starting point for real
//! client implementations. Documents are stored packed; identity is the
//! `_id` field.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Error, Result, StoreErrorKind};
use crate::store::{DocumentStore, Filter};
use crate::value::{ObjectId, RawDocument, doc_id};

/// A process-local document store keyed by collection name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<RawDocument>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .expect("lock poisoned")
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Check whether `collection` holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Fetch one document by id.
    #[must_use]
    pub fn get(&self, collection: &str, id: &ObjectId) -> Option<RawDocument> {
        self.collections
            .lock()
            .expect("lock poisoned")
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc_id(doc) == Some(id)).cloned())
    }
}

impl DocumentStore for MemoryStore {
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<RawDocument>> {
        let collections = self.collections.lock().expect("lock poisoned");
        let docs = collections.get(collection).map_or(&[][..], Vec::as_slice);
        let mut matched: Vec<RawDocument> = docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        if let Some(limit) = limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    fn insert_one(&self, collection: &str, document: &RawDocument) -> Result<()> {
        let Some(id) = doc_id(document) else {
            return Err(Error::store(
                StoreErrorKind::Backend,
                format!("cannot insert into '{collection}': document has no _id"),
            ));
        };
        let mut collections = self.collections.lock().expect("lock poisoned");
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|doc| doc_id(doc) == Some(id)) {
            return Err(Error::store(
                StoreErrorKind::Duplicate,
                format!("document '{id}' already exists in '{collection}'"),
            ));
        }
        docs.push(document.clone());
        Ok(())
    }

    fn update_one(&self, collection: &str, id: &ObjectId, document: &RawDocument) -> Result<()> {
        let mut collections = self.collections.lock().expect("lock poisoned");
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|doc| doc_id(doc) == Some(id)) {
            Some(slot) => {
                *slot = document.clone();
                Ok(())
            }
            None => Err(Error::store(
                StoreErrorKind::NotFound,
                format!("no document '{id}' in '{collection}'"),
            )),
        }
    }

    fn delete_one(&self, collection: &str, id: &ObjectId) -> Result<()> {
        let mut collections = self.collections.lock().expect("lock poisoned");
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|doc| doc_id(doc) != Some(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ID_FIELD, Value};

    fn doc(id: ObjectId, key: i64) -> RawDocument {
        let mut doc = RawDocument::new();
        doc.insert(ID_FIELD.to_string(), Value::ObjectId(id));
        doc.insert("photo_id".to_string(), Value::Int(key));
        doc
    }

    #[test]
    fn test_insert_find_roundtrip() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert_one("metadata", &doc(id, 7)).unwrap();

        let found = store
            .find(
                "metadata",
                &Filter::Eq("photo_id".into(), Value::Int(7)),
                Some(1),
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(doc_id(&found[0]), Some(&id));
    }

    #[test]
    fn test_insert_requires_id() {
        let store = MemoryStore::new();
        let err = store.insert_one("metadata", &RawDocument::new()).unwrap_err();
        assert!(err.to_string().contains("no _id"));
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert_one("metadata", &doc(id, 1)).unwrap();
        let err = store.insert_one("metadata", &doc(id, 2)).unwrap_err();
        assert!(matches!(err, Error::Store(ref e) if e.kind == StoreErrorKind::Duplicate));
    }

    #[test]
    fn test_update_replaces_fields() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert_one("metadata", &doc(id, 1)).unwrap();
        store.update_one("metadata", &id, &doc(id, 9)).unwrap();

        let stored = store.get("metadata", &id).unwrap();
        assert_eq!(stored.get("photo_id"), Some(&Value::Int(9)));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        let err = store.update_one("metadata", &id, &doc(id, 1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store.insert_one("metadata", &doc(id, 1)).unwrap();
        store.delete_one("metadata", &id).unwrap();
        store.delete_one("metadata", &id).unwrap();
        assert!(store.is_empty("metadata"));
    }

    #[test]
    fn test_find_honors_limit() {
        let store = MemoryStore::new();
        for key in 0..3 {
            store.insert_one("metadata", &doc(ObjectId::new(), key)).unwrap();
        }
        let found = store
            .find(
                "metadata",
                &Filter::In(
                    "photo_id".into(),
                    vec![Value::Int(0), Value::Int(1), Value::Int(2)],
                ),
                Some(2),
            )
            .unwrap();
        assert_eq!(found.len(), 2);
    }
}
