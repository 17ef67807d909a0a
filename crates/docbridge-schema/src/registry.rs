//! Relation type registry.
//!
//! Maps a relation type tag to the three role names wired in for it:
//! schema descriptor, batch loader and runtime accessor. Integration
//! layers consult the registry when hydrating packed relations, so a tag
//! can only be claimed once.

use std::collections::BTreeMap;

use docbridge_core::{Error, Result};

use crate::definition::DOCUMENT_ONE;

/// The three implementation roles registered for one relation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRoles {
    /// Schema descriptor type name.
    pub schema: &'static str,
    /// Batch loader type name.
    pub loader: &'static str,
    /// Runtime accessor type name.
    pub access: &'static str,
}

/// Registry of relation type tags to their implementation roles.
#[derive(Debug, Default)]
pub struct RelationRegistry {
    entries: BTreeMap<&'static str, RelationRoles>,
}

impl RelationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `tag` for `roles`. Fails if the tag is already taken.
    pub fn register(&mut self, tag: &'static str, roles: RelationRoles) -> Result<()> {
        if self.entries.contains_key(tag) {
            return Err(Error::config(format!(
                "relation type '{tag}' is already registered"
            )));
        }
        self.entries.insert(tag, roles);
        Ok(())
    }

    /// Look up the roles registered for `tag`.
    #[must_use]
    pub fn roles(&self, tag: &str) -> Option<&RelationRoles> {
        self.entries.get(tag)
    }

    /// All registered tags, in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

/// Registry pre-populated with the `document:one` relation type.
pub fn default_registry() -> RelationRegistry {
    let mut registry = RelationRegistry::new();
    let result = registry.register(
        DOCUMENT_ONE,
        RelationRoles {
            schema: "HasDocumentSchema",
            loader: "HasDocumentLoader",
            access: "HasDocumentRelation",
        },
    );
    debug_assert!(result.is_ok(), "fresh registry cannot hold the tag yet");
    registry
}
