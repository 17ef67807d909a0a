//! Option templating.
//!
//! Relation options may be declared as templates over a fixed set of
//! placeholders (`{source:role}`, `{source:primaryKey}` and
//! `{option:<name>}`), resolved against the declaring record's metadata
//! at schema-compile time. There is no open-ended expression evaluation:
//! anything outside these three kinds is a configuration error.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use docbridge_core::{Error, Result};
use regex::Regex;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{(source|option):([A-Za-z][A-Za-z0-9_]*)\}").expect("placeholder regex")
    })
}

fn leftover_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^{}]*\}").expect("leftover regex"))
}

/// Resolution environment for one relation declaration.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// Source record role name (e.g. `"photo"`).
    pub role: String,
    /// Source record primary key column (e.g. `"id"`).
    pub primary_key: String,
    /// Already-known option values, by option name.
    pub options: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Create a context from the source record's metadata.
    pub fn new(role: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            primary_key: primary_key.into(),
            options: BTreeMap::new(),
        }
    }

    /// Record a resolved option value for later `{option:<name>}` lookups.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.insert(name.into(), value.into());
    }
}

/// Resolve every placeholder in `template` against `ctx`.
///
/// Fails with a configuration error on an unknown `source` field, an
/// undefined option, or any brace expression left over after resolution.
pub fn resolve_template(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder_re().captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let namespace = caps.get(1).map_or("", |m| m.as_str());
        let name = caps.get(2).map_or("", |m| m.as_str());

        let replacement = match namespace {
            "source" => match name {
                "role" => ctx.role.clone(),
                "primaryKey" => ctx.primary_key.clone(),
                other => {
                    return Err(Error::config(format!(
                        "unknown source placeholder '{{source:{other}}}'"
                    )));
                }
            },
            "option" => ctx.options.get(name).cloned().ok_or_else(|| {
                Error::config(format!("option '{name}' is not defined for this relation"))
            })?,
            _ => unreachable!("regex restricts namespaces"),
        };

        out.push_str(&template[last..whole.start()]);
        out.push_str(&replacement);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    if let Some(stray) = leftover_re().find(&out) {
        return Err(Error::config(format!(
            "unresolved placeholder '{}' in template '{template}'",
            stray.as_str()
        )));
    }

    Ok(out)
}
