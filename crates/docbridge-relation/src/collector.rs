//! Reference collection for batch loading.
//!
//! The collector walks parent result rows once, recording each row's
//! inner-key value, and exposes the deduplicated reference set for a single
//! `$in` query. Fetched documents are then routed back to their rows by
//! outer-key equality. A to-one relation admits exactly one document per
//! row; a second match is reported as an error rather than silently
//! overwriting the first.

use docbridge_core::{Error, RawDocument, RelationErrorKind, Result, Value};

struct RowSlot {
    reference: Option<Value>,
    document: Option<RawDocument>,
}

/// Gathers inner-key references from parent rows and fans fetched
/// documents back out to them.
pub struct ReferenceCollector {
    inner_key: String,
    outer_key: String,
    rows: Vec<RowSlot>,
    references: Vec<Value>,
}

impl ReferenceCollector {
    /// Create a collector for the given key pair.
    #[must_use]
    pub fn new(inner_key: impl Into<String>, outer_key: impl Into<String>) -> Self {
        Self {
            inner_key: inner_key.into(),
            outer_key: outer_key.into(),
            rows: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Record one parent row. A missing or null inner-key value yields a
    /// row without a reference; it never reaches the query and resolves to
    /// no document.
    pub fn push_row(&mut self, row: &RawDocument) {
        let reference = match row.get(&self.inner_key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        };
        if let Some(value) = &reference {
            // Value has no Ord/Hash (doubles), so dedup by linear scan.
            if !self.references.contains(value) {
                self.references.push(value.clone());
            }
        }
        self.rows.push(RowSlot {
            reference,
            document: None,
        });
    }

    /// The deduplicated reference values, in first-seen order.
    #[must_use]
    pub fn references(&self) -> &[Value] {
        &self.references
    }

    /// Number of rows recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether no rows were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Route one fetched document to the rows it references.
    ///
    /// Fails when a row already holds a document: two matches for one
    /// to-one reference mean the data violates the relation's shape.
    pub fn attach(&mut self, document: RawDocument) -> Result<()> {
        let Some(outer_value) = document.get(&self.outer_key) else {
            return Err(Error::config(format!(
                "fetched document has no outer key field '{}'",
                self.outer_key
            )));
        };

        let mut routed = 0usize;
        let outer_value = outer_value.clone();
        for slot in self
            .rows
            .iter_mut()
            .filter(|slot| slot.reference.as_ref() == Some(&outer_value))
        {
            if slot.document.is_some() {
                return Err(Error::relation(
                    RelationErrorKind::DuplicateMatch,
                    format!(
                        "multiple documents match to-one reference {}={:?}",
                        self.outer_key, outer_value
                    ),
                ));
            }
            slot.document = Some(document.clone());
            routed += 1;
        }

        if routed == 0 {
            tracing::debug!(
                outer_key = %self.outer_key,
                "Fetched document matched no collected row"
            );
        }
        Ok(())
    }

    /// Consume the collector, yielding one optional document per recorded
    /// row, in push order.
    #[must_use]
    pub fn take(self) -> Vec<Option<RawDocument>> {
        self.rows.into_iter().map(|slot| slot.document).collect()
    }
}
