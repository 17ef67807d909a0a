//! Shared fixtures: a relational `Photo` record and the `Metadata`
//! document family it relates to.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use docbridge::prelude::*;
use docbridge::{MemoryStore, StoreHandle};

pub struct Photo {
    pub id: Option<i64>,
    pub filename: String,
}

impl RecordFields for Photo {
    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "filename" => Some(Value::from(self.filename.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "id" => self.id = value.as_i64(),
            "filename" => self.filename = value.as_str().unwrap_or_default().to_string(),
            _ => {}
        }
    }

    fn primary_key_value(&self) -> Option<Value> {
        self.id.map(Value::from)
    }
}

impl Record for Photo {
    const ROLE: &'static str = "photo";
    const PRIMARY_KEY: &'static str = "id";
}

pub fn photo(id: Option<i64>, filename: &str) -> RecordHandle {
    record_handle(Photo {
        id,
        filename: filename.to_string(),
    })
}

/// Document side of the relation. Unmapped fields are kept in `extra` so
/// documents written by extended types survive a load/save cycle.
#[derive(Debug)]
pub struct Metadata {
    pub id: Option<ObjectId>,
    pub photo_id: Option<i64>,
    pub keywords: Vec<String>,
    pub extra: RawDocument,
}

impl Metadata {
    pub fn with_keywords(keywords: &[&str]) -> Self {
        Self {
            id: None,
            photo_id: None,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            extra: RawDocument::new(),
        }
    }
}

impl Document for Metadata {
    const COLLECTION: &'static str = "metadata";

    fn from_raw(mut data: RawDocument) -> Result<Self> {
        let id = data
            .remove(ID_FIELD)
            .and_then(|v| v.as_object_id().copied());
        let photo_id = data.remove("photo_id").and_then(|v| v.as_i64());
        let keywords = data
            .remove("keywords")
            .and_then(|v| {
                v.as_array().map(|items| {
                    items
                        .iter()
                        .filter_map(|k| k.as_str().map(str::to_string))
                        .collect()
                })
            })
            .unwrap_or_default();
        Ok(Self {
            id,
            photo_id,
            keywords,
            extra: data,
        })
    }

    fn pack(&self) -> RawDocument {
        let mut doc = self.extra.clone();
        if let Some(id) = self.id {
            doc.insert(ID_FIELD.to_string(), Value::ObjectId(id));
        }
        doc.insert("photo_id".to_string(), Value::from(self.photo_id));
        doc.insert(
            "keywords".to_string(),
            Value::Array(
                self.keywords
                    .iter()
                    .map(|k| Value::from(k.clone()))
                    .collect(),
            ),
        );
        doc
    }

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "photo_id" => Some(Value::from(self.photo_id)),
            _ => self.extra.get(name).cloned(),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "photo_id" => self.photo_id = value.as_i64(),
            "keywords" => {
                self.keywords = value
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|k| k.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
            }
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }
}

/// Extended document type stored in the same collection as `Metadata`.
pub struct IptcMetadata {
    pub id: Option<ObjectId>,
    pub photo_id: Option<i64>,
    pub headline: String,
    pub keywords: Vec<String>,
}

impl Document for IptcMetadata {
    const COLLECTION: &'static str = "metadata";

    fn from_raw(data: RawDocument) -> Result<Self> {
        let base = Metadata::from_raw(data)?;
        Ok(Self {
            headline: base
                .extra
                .get("headline")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            id: base.id,
            photo_id: base.photo_id,
            keywords: base.keywords,
        })
    }

    fn pack(&self) -> RawDocument {
        let mut doc = RawDocument::new();
        if let Some(id) = self.id {
            doc.insert(ID_FIELD.to_string(), Value::ObjectId(id));
        }
        doc.insert("photo_id".to_string(), Value::from(self.photo_id));
        doc.insert("headline".to_string(), Value::from(self.headline.clone()));
        doc.insert(
            "keywords".to_string(),
            Value::Array(
                self.keywords
                    .iter()
                    .map(|k| Value::from(k.clone()))
                    .collect(),
            ),
        );
        doc
    }

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "photo_id" => Some(Value::from(self.photo_id)),
            "headline" => Some(Value::from(self.headline.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match name {
            "photo_id" => self.photo_id = value.as_i64(),
            "headline" => self.headline = value.as_str().unwrap_or_default().to_string(),
            _ => {}
        }
    }
}

/// The relation as a record would declare it, compiled with defaults.
pub fn metadata_schema(nullable: bool) -> RelationSchema {
    let definition = RelationDefinition::new(
        "metadata",
        Metadata::COLLECTION,
        Photo::ROLE,
        Photo::PRIMARY_KEY,
    )
    .nullable(nullable);
    HasDocumentSchema::new(definition)
        .resolve()
        .expect("default declaration resolves")
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// `MemoryStore` wrapper counting `find` calls, for asserting how many
/// queries a code path issues.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    finds: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }
}

impl DocumentStore for CountingStore {
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<RawDocument>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(collection, filter, limit)
    }

    fn insert_one(&self, collection: &str, document: &RawDocument) -> Result<()> {
        self.inner.insert_one(collection, document)
    }

    fn update_one(&self, collection: &str, id: &ObjectId, document: &RawDocument) -> Result<()> {
        self.inner.update_one(collection, id, document)
    }

    fn delete_one(&self, collection: &str, id: &ObjectId) -> Result<()> {
        self.inner.delete_one(collection, id)
    }
}

pub fn seed_metadata(store: &MemoryStore, photo_id: i64, keywords: &[&str]) -> ObjectId {
    let id = ObjectId::new();
    let mut doc = RawDocument::new();
    doc.insert(ID_FIELD.to_string(), Value::ObjectId(id));
    doc.insert("photo_id".to_string(), Value::Int(photo_id));
    doc.insert(
        "keywords".to_string(),
        Value::Array(keywords.iter().map(|k| Value::from(*k)).collect()),
    );
    store.insert_one(Metadata::COLLECTION, &doc).unwrap();
    id
}

pub fn bind_relation(
    store: StoreHandle,
    nullable: bool,
    parent: &RecordHandle,
) -> HasDocumentRelation<Metadata> {
    HasDocumentRelation::new(metadata_schema(nullable), store)
        .bind_context(parent, None)
        .expect("binding without preload cannot fail")
}

pub fn keywords_of(handle: &DocumentHandle<Metadata>) -> Vec<String> {
    handle.read().unwrap().keywords.clone()
}
