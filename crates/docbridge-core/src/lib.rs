//! Core types and contracts for the docbridge relation bridge.
//!
//! This crate provides the foundational abstractions shared by the schema
//! descriptor and the relation runtime:
//!
//! - `Value`, `RawDocument` and `ObjectId` for document field data
//! - `Record` / `Document` contracts for the two mapped sides
//! - `DocumentStore` client trait (blocking, equality/`$in` filters only)
//! - `Command` and `Transaction` for deferred, rollback-capable writes

pub mod command;
pub mod document;
pub mod error;
pub mod memory;
pub mod record;
pub mod store;
pub mod transaction;
pub mod value;

pub use command::Command;
pub use document::{Document, DocumentHandle, document_handle};
pub use memory::MemoryStore;
pub use error::{
    ConfigError, Error, RelationError, RelationErrorKind, Result, StoreError, StoreErrorKind,
};
pub use record::{Record, RecordFields, RecordHandle, WeakRecordHandle, record_handle};
pub use store::{DocumentStore, Filter, StoreHandle, restore_document};
pub use transaction::Transaction;
pub use value::{ID_FIELD, ObjectId, ParseObjectIdError, RawDocument, Value, doc_id};
