//! Relation declaration and schema compilation.
//!
//! A [`RelationDefinition`] is what a record declares: a relation name, a
//! target document type and raw (possibly templated) options. The
//! [`HasDocumentSchema`] descriptor compiles that declaration into a
//! [`RelationSchema`] by filling defaults and resolving templates, with
//! the inner key resolved before the outer key so the outer-key default
//! can reference it.

use std::collections::BTreeMap;

use docbridge_core::{Error, Result};
use tracing::debug;

use crate::packed::{PackedRelation, RelationSchema};
use crate::template::{TemplateContext, resolve_template};

/// Type tag of the cross-store has-one relation.
pub const DOCUMENT_ONE: &str = "document:one";

/// A relation as declared on a source record, before compilation.
#[derive(Debug, Clone)]
pub struct RelationDefinition {
    name: String,
    target: String,
    source_role: String,
    source_primary_key: String,
    nullable: Option<bool>,
    options: BTreeMap<String, String>,
}

impl RelationDefinition {
    /// Declare a relation `name` from the record identified by
    /// `source_role` / `source_primary_key` to the document type `target`.
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        source_role: impl Into<String>,
        source_primary_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            source_role: source_role.into(),
            source_primary_key: source_primary_key.into(),
            nullable: None,
            options: BTreeMap::new(),
        }
    }

    /// Override the nullability default.
    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Set a raw option value; may itself contain template placeholders.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Relation name as declared on the record.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target document type name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Resolves relation options against defaults, caching each resolved
/// value so later templates can reference earlier options.
struct RelationOptions {
    context: TemplateContext,
    templates: BTreeMap<&'static str, &'static str>,
}

impl RelationOptions {
    fn new(definition: &RelationDefinition, defaults: &[(&'static str, &'static str)]) -> Self {
        let mut context =
            TemplateContext::new(&definition.source_role, &definition.source_primary_key);
        context.options = definition.options.clone();
        Self {
            context,
            templates: defaults.iter().copied().collect(),
        }
    }

    /// Resolve the named option, preferring a declared value over the
    /// default template. The result is recorded in the context so that
    /// subsequent `{option:<name>}` references see it.
    fn define(&mut self, name: &'static str) -> Result<String> {
        let template = match self.context.options.get(name) {
            Some(declared) => declared.clone(),
            None => (*self.templates.get(name).ok_or_else(|| {
                Error::config(format!("relation option '{name}' has no default template"))
            })?)
            .to_string(),
        };
        let resolved = resolve_template(&template, &self.context)?;
        self.context.set_option(name, resolved.clone());
        Ok(resolved)
    }
}

/// Schema descriptor for the `document:one` relation type.
///
/// Declares no relational tables or columns of its own: the document side
/// lives in an independently managed store, so compilation produces only
/// the packed key configuration.
#[derive(Debug, Clone)]
pub struct HasDocumentSchema {
    definition: RelationDefinition,
}

impl HasDocumentSchema {
    /// Relation type tag this descriptor compiles.
    pub const TYPE_TAG: &'static str = DOCUMENT_ONE;
    /// Default nullability when the declaration does not set one.
    pub const DEFAULT_NULLABLE: bool = true;
    /// Default inner key template.
    pub const INNER_KEY_TEMPLATE: &'static str = "{source:primaryKey}";
    /// Default outer key template; references the resolved inner key.
    pub const OUTER_KEY_TEMPLATE: &'static str = "{source:role}_{option:innerKey}";

    /// Wrap a declaration for compilation.
    #[must_use]
    pub const fn new(definition: RelationDefinition) -> Self {
        Self { definition }
    }

    /// The wrapped declaration.
    #[must_use]
    pub const fn definition(&self) -> &RelationDefinition {
        &self.definition
    }

    /// Relational tables contributed by this relation: none. The target
    /// collection is owned by the document store.
    #[must_use]
    pub fn declare_tables(&self) -> Vec<String> {
        Vec::new()
    }

    /// Compile the declaration into a resolved key configuration.
    pub fn resolve(&self) -> Result<RelationSchema> {
        let mut options = RelationOptions::new(
            &self.definition,
            &[
                ("innerKey", Self::INNER_KEY_TEMPLATE),
                ("outerKey", Self::OUTER_KEY_TEMPLATE),
            ],
        );

        // Inner key first: the outer key default references it.
        let inner_key = options.define("innerKey")?;
        let outer_key = options.define("outerKey")?;

        if inner_key.is_empty() || outer_key.is_empty() {
            return Err(Error::config(format!(
                "relation '{}' resolved to an empty key (innerKey='{inner_key}', outerKey='{outer_key}')",
                self.definition.name
            )));
        }

        let schema = RelationSchema {
            nullable: self.definition.nullable.unwrap_or(Self::DEFAULT_NULLABLE),
            inner_key,
            outer_key,
        };
        debug!(
            relation = %self.definition.name,
            target = %self.definition.target,
            inner_key = %schema.inner_key,
            outer_key = %schema.outer_key,
            nullable = schema.nullable,
            "Resolved document relation schema"
        );
        Ok(schema)
    }

    /// Compile and pack the relation for the runtime contract.
    pub fn pack(&self) -> Result<PackedRelation> {
        Ok(PackedRelation {
            type_tag: Self::TYPE_TAG.to_string(),
            target: self.definition.target.clone(),
            schema: self.resolve()?,
        })
    }
}
