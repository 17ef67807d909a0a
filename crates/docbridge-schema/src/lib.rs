//! Schema layer for the docbridge relation bridge.
//!
//! Compiles relation declarations into their packed runtime form:
//!
//! - [`template`]: `{source:*}` / `{option:*}` placeholder resolution
//! - [`definition`]: [`RelationDefinition`] and the [`HasDocumentSchema`]
//!   descriptor with its key defaults
//! - [`packed`]: the serialized [`PackedRelation`] contract
//! - [`registry`]: tag to schema/loader/accessor routing

pub mod definition;
pub mod packed;
pub mod registry;
pub mod template;

pub use definition::{DOCUMENT_ONE, HasDocumentSchema, RelationDefinition};
pub use packed::{PackedRelation, RelationSchema};
pub use registry::{RelationRegistry, RelationRoles, default_registry};
pub use template::{TemplateContext, resolve_template};
