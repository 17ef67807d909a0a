//! Packed relation schema.
//!
//! The packed form is the serialized contract consumed by the relation
//! runtime and the batch loader. Field names are fixed by that contract
//! and must survive a serialize/deserialize round trip unchanged.

use serde::{Deserialize, Serialize};

/// Resolved key configuration for one cross-store has-one relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSchema {
    /// Whether the related document may be absent.
    pub nullable: bool,
    /// Field on the source record whose value links the pair.
    #[serde(rename = "innerKey")]
    pub inner_key: String,
    /// Field on the target document holding the source key value.
    #[serde(rename = "outerKey")]
    pub outer_key: String,
}

/// A fully packed relation: discriminator tag, target class and schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedRelation {
    /// Relation type tag, routes to the registered schema/loader/accessor.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Target document type name.
    #[serde(rename = "class")]
    pub target: String,
    /// Resolved key configuration.
    pub schema: RelationSchema,
}
