//! Built-in template metadata.
//!
//! A [`TemplateRegistry`] is an immutable table of [`TemplateMetadata`] entries,
//! keyed by logical template name. Each entry either carries a literal row
//! template (`format`) or an ordered list of [`Field`]s from which a header and
//! a row template are synthesized.
//!
//! The table is built once and shared by reference; nothing mutates it while
//! rendering.
//!
//! ```rust
//! use stowage_render::template::{names, TemplateRegistry};
//!
//! let registry = TemplateRegistry::builtin();
//! let volumes = registry.get(names::VOLUME_FIELDS).unwrap();
//! assert_eq!(volumes.header().as_deref(), Some("ID\tName\tStatus\tSize"));
//! assert_eq!(volumes.sort_by(), Some("name"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;
use crate::payload::{PayloadShape, RecordKind};

/// Logical names of the built-in templates.
pub mod names {
    /// Generic fallback for unrecognized payloads.
    ///
    /// A sequence prints one line per item. A map prints one line per value
    /// in key order and drops the keys. Any other value prints once.
    pub const OBJECT: &str = "object";
    /// Sorted list of plain strings.
    pub const STRING_SLICE: &str = "string slice";
    pub const VOLUME_ID: &str = "volume id";
    pub const VOLUME_FIELDS: &str = "volume fields";
    pub const VOLUME_WITH_PATH_FIELDS: &str = "volume+path fields";
    pub const SNAPSHOT_FIELDS: &str = "snapshot fields";
    pub const SERVICE_FIELDS: &str = "service fields";
    pub const INSTANCE_FIELDS: &str = "instance fields";
    pub const MOUNT_FIELDS: &str = "mount fields";
    /// Reserved for the one-off custom format template.
    pub const CUSTOM: &str = "custom";
}

/// Column separator used in headers and row templates.
pub const COLUMN_SEPARATOR: &str = "\t";

/// Returns the default template name for a payload shape.
///
/// Single records have no default of their own: they are rendered through
/// the list template of their kind.
pub fn default_template(shape: PayloadShape) -> &'static str {
    match shape {
        PayloadShape::List(RecordKind::Volume) => names::VOLUME_FIELDS,
        PayloadShape::List(RecordKind::VolumeWithPath) => names::VOLUME_WITH_PATH_FIELDS,
        PayloadShape::List(RecordKind::Snapshot) => names::SNAPSHOT_FIELDS,
        PayloadShape::Map(RecordKind::Service) => names::SERVICE_FIELDS,
        PayloadShape::Map(RecordKind::Instance) => names::INSTANCE_FIELDS,
        PayloadShape::List(RecordKind::Mount) => names::MOUNT_FIELDS,
        PayloadShape::Strings => names::STRING_SLICE,
        _ => names::OBJECT,
    }
}

/// One column of a table template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Direct attribute access on the row, e.g. `row.name`.
    Attr { label: String, path: String },
    /// A template snippet evaluated against `row`.
    Computed { label: String, expr: String },
}

impl Field {
    /// A column showing `row.<path>` under `label`.
    pub fn attr(label: impl Into<String>, path: impl Into<String>) -> Self {
        Field::Attr {
            label: label.into(),
            path: path.into(),
        }
    }

    /// A column rendered by a template snippet.
    pub fn computed(label: impl Into<String>, expr: impl Into<String>) -> Self {
        Field::Computed {
            label: label.into(),
            expr: expr.into(),
        }
    }

    /// The header label.
    pub fn label(&self) -> &str {
        match self {
            Field::Attr { label, .. } | Field::Computed { label, .. } => label,
        }
    }

    /// The template snippet producing this column's cell.
    pub fn expression(&self) -> String {
        match self {
            Field::Attr { path, .. } => format!("{{{{ row.{} }}}}", path),
            Field::Computed { expr, .. } => expr.clone(),
        }
    }
}

/// Parses `path` or `label=expression`.
///
/// A bare path is used as its own label.
impl FromStr for Field {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((label, expr)) if !label.is_empty() && !expr.is_empty() => {
                Ok(Field::computed(label, expr))
            }
            None if !s.is_empty() => Ok(Field::attr(s, s)),
            _ => Err(RenderError::Registry(format!("invalid field spec `{}`", s))),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Attr { label, path } if label == path => write!(f, "{}", path),
            Field::Attr { label, path } => write!(f, "{}={{{{ row.{} }}}}", label, path),
            Field::Computed { label, expr } => write!(f, "{}={}", label, expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Literal(String),
    Fields(Vec<Field>),
}

/// How one kind of value renders by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMetadata {
    name: String,
    layout: Layout,
    sort_by: Option<String>,
}

impl TemplateMetadata {
    /// An entry rendering each element with a literal template.
    pub fn literal(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: Layout::Literal(format.into()),
            sort_by: None,
        }
    }

    /// An entry rendering each element as tab-separated columns.
    pub fn fields(name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            name: name.into(),
            layout: Layout::Fields(fields.into_iter().collect()),
            sort_by: None,
        }
    }

    /// Sorts elements by the given attribute path before rendering.
    pub fn sorted_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// The literal format, if this entry has one.
    pub fn format(&self) -> Option<&str> {
        match &self.layout {
            Layout::Literal(format) => Some(format),
            Layout::Fields(_) => None,
        }
    }

    /// The declared columns. Empty for literal entries.
    pub fn field_list(&self) -> &[Field] {
        match &self.layout {
            Layout::Literal(_) => &[],
            Layout::Fields(fields) => fields,
        }
    }

    /// Column labels joined by the separator, if this entry has columns.
    pub fn header(&self) -> Option<String> {
        let fields = self.field_list();
        if fields.is_empty() {
            return None;
        }
        Some(
            fields
                .iter()
                .map(Field::label)
                .collect::<Vec<_>>()
                .join(COLUMN_SEPARATOR),
        )
    }

    /// Template body rendering a single element bound to `row`.
    pub fn row_template(&self) -> String {
        match &self.layout {
            Layout::Literal(format) => format.clone(),
            Layout::Fields(fields) => fields
                .iter()
                .map(Field::expression)
                .collect::<Vec<_>>()
                .join(COLUMN_SEPARATOR),
        }
    }
}

/// Immutable table of template metadata.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<TemplateMetadata>,
}

impl TemplateRegistry {
    /// Starts an empty registry.
    pub fn builder() -> TemplateRegistryBuilder {
        TemplateRegistryBuilder::default()
    }

    /// The built-in table for storage records.
    pub fn builtin() -> Self {
        let entries = vec![
            TemplateMetadata::literal(names::OBJECT, "{{ row }}"),
            TemplateMetadata::literal(names::STRING_SLICE, "{{ row }}"),
            TemplateMetadata::fields(names::VOLUME_ID, [Field::attr("ID", "id")]).sorted_by("id"),
            TemplateMetadata::fields(
                names::VOLUME_FIELDS,
                [
                    Field::attr("ID", "id"),
                    Field::attr("Name", "name"),
                    Field::computed("Status", "{{ row | volume_status }}"),
                    Field::attr("Size", "size"),
                ],
            )
            .sorted_by("name"),
            TemplateMetadata::fields(
                names::VOLUME_WITH_PATH_FIELDS,
                [
                    Field::attr("ID", "id"),
                    Field::attr("Name", "name"),
                    Field::computed("Status", "{{ row | volume_status }}"),
                    Field::attr("Size", "size"),
                    Field::attr("Path", "path"),
                ],
            )
            .sorted_by("name"),
            TemplateMetadata::fields(
                names::SNAPSHOT_FIELDS,
                [
                    Field::attr("ID", "id"),
                    Field::attr("Name", "name"),
                    Field::attr("Status", "status"),
                    Field::attr("VolumeID", "volumeID"),
                ],
            )
            .sorted_by("name"),
            TemplateMetadata::fields(
                names::INSTANCE_FIELDS,
                [
                    Field::computed("ID", "{{ row.instanceID.id }}"),
                    Field::attr("Name", "name"),
                    Field::computed("Provider", "{{ row.providerName }}"),
                    Field::attr("Region", "region"),
                ],
            )
            .sorted_by("name"),
            TemplateMetadata::fields(
                names::SERVICE_FIELDS,
                [
                    Field::attr("Name", "name"),
                    Field::computed("Driver", "{{ row.driver.name }}"),
                ],
            )
            .sorted_by("name"),
            TemplateMetadata::fields(
                names::MOUNT_FIELDS,
                [
                    Field::attr("ID", "id"),
                    Field::computed("Device", "{{ row.source }}"),
                    Field::attr("MountPoint", "mountPoint"),
                ],
            )
            .sorted_by("source"),
        ];
        Self { entries }
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TemplateMetadata> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &TemplateMetadata> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for custom registries.
///
/// ```rust
/// use stowage_render::template::{Field, TemplateMetadata, TemplateRegistry};
///
/// let registry = TemplateRegistry::builder()
///     .entry(TemplateMetadata::fields("disk", ["Name".parse::<Field>().unwrap()]))
///     .build()
///     .unwrap();
/// assert!(registry.get("disk").is_some());
/// ```
#[derive(Debug, Default)]
pub struct TemplateRegistryBuilder {
    entries: Vec<TemplateMetadata>,
}

impl TemplateRegistryBuilder {
    /// Starts from the built-in entries.
    pub fn with_builtins(mut self) -> Self {
        self.entries.extend(TemplateRegistry::builtin().entries);
        self
    }

    /// Adds an entry.
    pub fn entry(mut self, entry: TemplateMetadata) -> Self {
        self.entries.push(entry);
        self
    }

    /// Validates and freezes the table.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, on the reserved name `custom`, and on field
    /// entries without columns.
    pub fn build(self) -> Result<TemplateRegistry, RenderError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.name == names::CUSTOM {
                return Err(RenderError::Registry(format!(
                    "`{}` is reserved for custom formats",
                    names::CUSTOM
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(RenderError::Registry(format!(
                    "duplicate template `{}`",
                    entry.name
                )));
            }
            if matches!(&entry.layout, Layout::Fields(f) if f.is_empty()) {
                return Err(RenderError::Registry(format!(
                    "template `{}` declares no fields",
                    entry.name
                )));
            }
        }
        Ok(TemplateRegistry {
            entries: self.entries,
        })
    }
}
