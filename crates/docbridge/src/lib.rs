//! docbridge - cross-store has-one relations between a relational record
//! mapper and a document store.
//!
//! A record living in a relational database can declare a `document:one`
//! relation whose target is a document in an independently managed
//! document store. docbridge provides:
//!
//! - Schema compilation with templated key defaults (`innerKey` from the
//!   record's primary key, `outerKey` as `<role>_<innerKey>`)
//! - A lazy per-record accessor with load-once semantics and a shared
//!   instance handle
//! - Queued persistence commands with rollback and post-commit hooks, so
//!   document writes ride along the relational transaction
//! - A batch loader resolving the relation for a whole result page with a
//!   single `$in` query
//!
//! # Quick Start
//!
//! ```ignore
//! use docbridge::prelude::*;
//!
//! // Declare the relation on the record's schema
//! let definition = RelationDefinition::new("metadata", "metadata", "photo", "id");
//! let schema = HasDocumentSchema::new(definition).resolve()?;
//!
//! // Bind an accessor for one loaded record
//! let prototype = HasDocumentRelation::<Metadata>::new(schema, store.clone());
//! let relation = prototype.bind_context(&photo, None)?;
//!
//! // Lazy access; the same handle comes back every time
//! if let Some(metadata) = relation.get_related()? {
//!     metadata.write().expect("lock poisoned").keywords.push("sunset".into());
//! }
//!
//! // Persist alongside the record's own commands
//! let mut tx = Transaction::new();
//! if let Some(command) = relation.queue_command()? {
//!     tx.push(command);
//! }
//! tx.run()?;
//! ```

pub use docbridge_core::{
    Command,
    ConfigError,
    Document,
    DocumentHandle,
    DocumentStore,
    Error,
    Filter,
    ID_FIELD,
    MemoryStore,
    ObjectId,
    ParseObjectIdError,
    RawDocument,
    Record,
    RecordFields,
    RecordHandle,
    RelationError,
    RelationErrorKind,
    Result,
    StoreError,
    StoreErrorKind,
    StoreHandle,
    Transaction,
    Value,
    WeakRecordHandle,
    doc_id,
    document_handle,
    record_handle,
    restore_document,
};

pub use docbridge_schema::{
    DOCUMENT_ONE, HasDocumentSchema, PackedRelation, RelationDefinition, RelationRegistry,
    RelationRoles, RelationSchema, TemplateContext, default_registry, resolve_template,
};

pub use docbridge_relation::{
    HasDocumentLoader, HasDocumentRelation, LoadState, LoaderOptions, ReferenceCollector,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use docbridge::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Command,
        Document,
        DocumentHandle,
        DocumentStore,
        Error,
        Filter,
        HasDocumentLoader,
        HasDocumentRelation,
        HasDocumentSchema,
        ID_FIELD,
        LoadState,
        ObjectId,
        RawDocument,
        Record,
        RecordFields,
        RecordHandle,
        RelationDefinition,
        RelationSchema,
        Result,
        StoreHandle,
        Transaction,
        Value,
        document_handle,
        record_handle,
    };
}
