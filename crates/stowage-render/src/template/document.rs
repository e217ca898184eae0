//! Template document synthesis.
//!
//! A render call compiles exactly one template document. It is assembled as an
//! explicit structure, [`TemplateDocument`], made of named [`Definition`]s and a
//! single [`Dispatch`], and only turned into MiniJinja source by its `Display`
//! implementation. Structure and syntax stay separate, so documents can be
//! inspected in tests without running the engine.
//!
//! Every registry entry becomes a macro taking `row`. The dispatch then either
//! iterates the payload through one of them, calls the custom format macro once,
//! or JSON-encodes the payload.
//!
//! ```text
//! {% macro tpl_volume_fields(row) %}{{ row.id }}\t{{ row.name }}...{% endmacro -%}
//! {% if data %}{{ "ID\tName\tStatus\tSize" }}
//! {% endif %}{% for row in sort(data, "name") %}{{ tpl_volume_fields(row) }}
//! {% endfor %}
//! ```

use std::collections::HashSet;
use std::fmt;

use super::registry::{names, TemplateMetadata, TemplateRegistry};
use crate::error::RenderError;
use crate::mode::Strategy;

/// Parameters of a row macro.
const ROW_PARAMS: &[&str] = &["row"];

/// Parameters of the custom format macro.
const CUSTOM_PARAMS: &[&str] = &["data", "config", "client"];

/// A named sub-template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Logical template name.
    pub name: String,
    /// Macro identifier used in the emitted source.
    pub ident: String,
    pub params: &'static [&'static str],
    pub body: String,
}

/// Where iterated rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSource {
    /// Payload elements in their original order.
    AsIs,
    /// Payload elements stably sorted by an attribute path.
    SortedBy(String),
}

/// The top-level part of a document that produces output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Optional header line, then one macro call per element.
    Rows {
        header: Option<String>,
        source: RowSource,
        ident: String,
    },
    /// One macro call against the whole payload.
    Once { ident: String },
    /// JSON encoding of the whole payload.
    Encode { pretty: bool },
}

/// A complete template document for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    pub definitions: Vec<Definition>,
    pub dispatch: Dispatch,
}

impl TemplateDocument {
    /// Looks up a definition by logical name.
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

/// Builds the document for `strategy`.
///
/// All registry entries are always defined, whichever one the dispatch uses.
/// Definitions end in `-%}` so the newlines separating them never reach the
/// output.
///
/// # Errors
///
/// Returns [`RenderError::TemplateNotFound`] when a built-in strategy names a
/// template the registry does not have.
pub fn synthesize(
    registry: &TemplateRegistry,
    strategy: &Strategy,
    quiet: bool,
) -> Result<TemplateDocument, RenderError> {
    let mut idents = HashSet::new();
    let mut definitions: Vec<Definition> = registry
        .entries()
        .map(|entry| Definition {
            name: entry.name().to_string(),
            ident: unique_ident(entry.name(), &mut idents),
            params: ROW_PARAMS,
            body: entry.row_template(),
        })
        .collect();

    let dispatch = match strategy {
        Strategy::Json => Dispatch::Encode { pretty: false },
        Strategy::PrettyJson => Dispatch::Encode { pretty: true },
        Strategy::Custom { body } => {
            let ident = unique_ident(names::CUSTOM, &mut idents);
            definitions.push(Definition {
                name: names::CUSTOM.to_string(),
                ident: ident.clone(),
                params: CUSTOM_PARAMS,
                body: body.clone(),
            });
            Dispatch::Once { ident }
        }
        Strategy::Builtin { name } => {
            let entry = registry
                .get(name)
                .ok_or_else(|| RenderError::TemplateNotFound(name.clone()))?;
            let ident = definitions
                .iter()
                .find(|d| &d.name == name)
                .map(|d| d.ident.clone())
                .ok_or_else(|| RenderError::TemplateNotFound(name.clone()))?;
            rows_dispatch(entry, ident, quiet)
        }
    };

    Ok(TemplateDocument {
        definitions,
        dispatch,
    })
}

fn rows_dispatch(entry: &TemplateMetadata, ident: String, quiet: bool) -> Dispatch {
    let header = if quiet { None } else { entry.header() };
    let source = match entry.sort_by() {
        Some(key) => RowSource::SortedBy(key.to_string()),
        None => RowSource::AsIs,
    };
    Dispatch::Rows {
        header,
        source,
        ident,
    }
}

/// Derives a macro identifier from a logical name.
fn unique_ident(name: &str, taken: &mut HashSet<String>) -> String {
    let mut base = String::from("tpl_");
    let mut last_underscore = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            base.push('_');
            last_underscore = true;
        }
    }
    while base.ends_with('_') && base.len() > "tpl_".len() {
        base.pop();
    }

    let mut ident = base.clone();
    let mut n = 2;
    while !taken.insert(ident.clone()) {
        ident = format!("{}_{}", base, n);
        n += 1;
    }
    ident
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{% macro {}({}) %}}{}{{% endmacro -%}}",
            self.ident,
            self.params.join(", "),
            self.body
        )
    }
}

/// Quotes text as a template string literal.
///
/// JSON string escapes are a subset of the template language's, so labels and
/// keys never turn into template syntax.
fn string_literal(text: &str) -> Result<String, fmt::Error> {
    serde_json::to_string(text).map_err(|_| fmt::Error)
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Rows {
                header,
                source,
                ident,
            } => {
                if let Some(header) = header {
                    write!(
                        f,
                        "{{% if data %}}{{{{ {} }}}}\n{{% endif %}}",
                        string_literal(header)?
                    )?;
                }
                let source = match source {
                    RowSource::AsIs => "rows(data)".to_string(),
                    RowSource::SortedBy(key) => format!("sort(data, {})", string_literal(key)?),
                };
                write!(
                    f,
                    "{{% for row in {} %}}{{{{ {}(row) }}}}\n{{% endfor %}}",
                    source, ident
                )
            }
            Dispatch::Once { ident } => {
                write!(f, "{{{{ {}({}) }}}}", ident, CUSTOM_PARAMS.join(", "))
            }
            Dispatch::Encode { pretty: false } => f.write_str("{{ data | json }}\n"),
            Dispatch::Encode { pretty: true } => f.write_str("{{ data | jsonp }}\n"),
        }
    }
}

impl fmt::Display for TemplateDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for definition in &self.definitions {
            writeln!(f, "{}", definition)?;
        }
        write!(f, "{}", self.dispatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::registry::{Field, TemplateMetadata};

    fn builtin(name: &str) -> Strategy {
        Strategy::Builtin {
            name: name.to_string(),
        }
    }

    #[test]
    fn defines_every_registry_entry() {
        let registry = TemplateRegistry::builtin();
        let doc = synthesize(&registry, &builtin(names::VOLUME_FIELDS), false).unwrap();
        assert_eq!(doc.definitions.len(), registry.len());
        for entry in registry.entries() {
            assert!(doc.definition(entry.name()).is_some(), "{}", entry.name());
        }
    }

    #[test]
    fn builtin_dispatch_has_header_and_sort() {
        let registry = TemplateRegistry::builtin();
        let doc = synthesize(&registry, &builtin(names::VOLUME_FIELDS), false).unwrap();
        assert_eq!(
            doc.dispatch,
            Dispatch::Rows {
                header: Some("ID\tName\tStatus\tSize".to_string()),
                source: RowSource::SortedBy("name".to_string()),
                ident: "tpl_volume_fields".to_string(),
            }
        );
    }

    #[test]
    fn quiet_drops_header() {
        let registry = TemplateRegistry::builtin();
        let doc = synthesize(&registry, &builtin(names::VOLUME_FIELDS), true).unwrap();
        assert!(matches!(doc.dispatch, Dispatch::Rows { header: None, .. }));
    }

    #[test]
    fn literal_entry_iterates_as_is() {
        let registry = TemplateRegistry::builtin();
        let doc = synthesize(&registry, &builtin(names::STRING_SLICE), false).unwrap();
        assert_eq!(
            doc.dispatch,
            Dispatch::Rows {
                header: None,
                source: RowSource::AsIs,
                ident: "tpl_string_slice".to_string(),
            }
        );
    }

    #[test]
    fn custom_adds_reserved_definition_and_calls_once() {
        let registry = TemplateRegistry::builtin();
        let strategy = Strategy::Custom {
            body: "{{ data | length }}".to_string(),
        };
        let doc = synthesize(&registry, &strategy, false).unwrap();
        let custom = doc.definition(names::CUSTOM).unwrap();
        assert_eq!(custom.body, "{{ data | length }}");
        assert_eq!(
            doc.dispatch,
            Dispatch::Once {
                ident: "tpl_custom".to_string()
            }
        );
    }

    #[test]
    fn json_strategies_encode() {
        let registry = TemplateRegistry::builtin();
        let doc = synthesize(&registry, &Strategy::Json, true).unwrap();
        assert_eq!(doc.dispatch, Dispatch::Encode { pretty: false });
        assert!(doc.definition(names::CUSTOM).is_none());
        let doc = synthesize(&registry, &Strategy::PrettyJson, false).unwrap();
        assert_eq!(doc.dispatch, Dispatch::Encode { pretty: true });
    }

    #[test]
    fn unknown_template_name() {
        let registry = TemplateRegistry::builtin();
        let err = synthesize(&registry, &builtin("disk fields"), false).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(name) if name == "disk fields"));
    }

    #[test]
    fn identifiers_are_sanitized_and_unique() {
        let mut taken = HashSet::new();
        assert_eq!(unique_ident("volume+path fields", &mut taken), "tpl_volume_path_fields");
        assert_eq!(unique_ident("volume path fields", &mut taken), "tpl_volume_path_fields_2");
        assert_eq!(unique_ident("!!", &mut taken), "tpl_");
    }

    #[test]
    fn serializes_to_minijinja_source() {
        let registry = TemplateRegistry::builder()
            .entry(
                TemplateMetadata::fields("disk", [Field::attr("Name", "name")]).sorted_by("name"),
            )
            .build()
            .unwrap();
        let doc = synthesize(&registry, &builtin("disk"), false).unwrap();
        assert_eq!(
            doc.to_string(),
            "{% macro tpl_disk(row) %}{{ row.name }}{% endmacro -%}\n\
             {% if data %}{{ \"Name\" }}\n{% endif %}\
             {% for row in sort(data, \"name\") %}{{ tpl_disk(row) }}\n{% endfor %}"
        );
    }

    #[test]
    fn header_and_sort_key_are_string_literals() {
        let registry = TemplateRegistry::builder()
            .entry(
                TemplateMetadata::fields("odd", [Field::attr("{{ x }}\\", "name")])
                    .sorted_by("a\"b"),
            )
            .build()
            .unwrap();
        let source = synthesize(&registry, &builtin("odd"), false)
            .unwrap()
            .to_string();
        assert!(source.contains(r#"{% if data %}{{ "{{ x }}\\" }}"#), "{source}");
        assert!(source.contains(r#"sort(data, "a\"b")"#), "{source}");
    }

    #[test]
    fn serializes_custom_call() {
        let registry = TemplateRegistry::builder().build().unwrap();
        let strategy = Strategy::Custom {
            body: "x".to_string(),
        };
        let doc = synthesize(&registry, &strategy, false).unwrap();
        assert_eq!(
            doc.to_string(),
            "{% macro tpl_custom(data, config, client) %}x{% endmacro -%}\n\
             {{ tpl_custom(data, config, client) }}"
        );
    }
}
