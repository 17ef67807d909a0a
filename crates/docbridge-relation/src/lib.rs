//! Runtime layer for the docbridge relation bridge.
//!
//! Two entry points cover the two access patterns:
//!
//! - [`HasDocumentRelation`]: per-record lazy accessor with queued,
//!   rollback-capable persistence
//! - [`HasDocumentLoader`]: batch loader resolving a relation for many
//!   parent rows with one `$in` query, via a [`ReferenceCollector`]

pub mod accessor;
pub mod collector;
pub mod loader;

pub use accessor::{HasDocumentRelation, LoadState};
pub use collector::ReferenceCollector;
pub use loader::{HasDocumentLoader, LoaderOptions};
