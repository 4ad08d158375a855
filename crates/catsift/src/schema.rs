//! Schema registration and introspection.
//!
//! A [`ModelDescription`] is an explicit, declarative registration of a
//! model's columns, built once at process start. [`ModelDescription::introspect`]
//! turns it into an immutable [`Catalog`]: the ordered set of filterable
//! attributes with their semantic kinds, plus the filter-field listing
//! exposed to callers. Requests share the catalog read-only; nothing in it
//! mutates after startup.

use std::collections::HashMap;

use serde::Serialize;

/// Declared physical representation of a column.
///
/// This is what the registration step states about storage; the semantic
/// [`AttributeKind`] is derived from it during introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Integer scalar.
    Integer,
    /// Floating-point scalar.
    Float,
    /// Plain text.
    Text,
    /// Precomputed full-text search vector over a document.
    TextSearchVector,
    /// Open-ended key/value map.
    KeyValueMap,
}

/// Semantic kind of a filterable attribute.
///
/// The kind decides which predicate semantics apply to a filter value,
/// independent of the literal's runtime shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeKind {
    /// Comparison-operator filtering over integer/float scalars.
    Numeric,
    /// Exact or `~`-substring matching over plain text.
    Text,
    /// Whole-document relevance matching; no substring semantics.
    FullTextIndexed,
    /// Key-membership and key-content filtering over a key/value map.
    SemiStructuredMap,
}

impl AttributeKind {
    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::Numeric => "numeric",
            AttributeKind::Text => "text",
            AttributeKind::FullTextIndexed => "fulltext",
            AttributeKind::SemiStructuredMap => "map",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One column registration in a [`ModelDescription`].
///
/// The marker methods flag columns that must never surface as filters:
/// foreign-key columns, computed/derived columns, and internal bookkeeping
/// handles.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    storage: Storage,
    foreign_key: bool,
    derived: bool,
    internal: bool,
}

impl Column {
    /// Registers a column with its declared storage.
    pub fn new(name: impl Into<String>, storage: Storage) -> Self {
        Column {
            name: name.into(),
            storage,
            foreign_key: false,
            derived: false,
            internal: false,
        }
    }

    /// Marks this column as a foreign-key reference to another model.
    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    /// Marks this column as computed/derived (not persisted).
    pub fn derived(mut self) -> Self {
        self.derived = true;
        self
    }

    /// Marks this column as internal bookkeeping (e.g. a metadata handle).
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    fn excluded(&self) -> bool {
        self.foreign_key || self.derived || self.internal
    }

    fn kind(&self) -> AttributeKind {
        // Priority order: full-text beats map beats numeric beats text.
        match self.storage {
            Storage::TextSearchVector => AttributeKind::FullTextIndexed,
            Storage::KeyValueMap => AttributeKind::SemiStructuredMap,
            Storage::Integer | Storage::Float => AttributeKind::Numeric,
            Storage::Text => AttributeKind::Text,
        }
    }
}

/// Static metadata for one filterable attribute.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    /// Attribute name, as it appears in filter arguments.
    pub name: String,
    /// Semantic kind deciding predicate semantics.
    pub kind: AttributeKind,
    storage: Storage,
}

/// Declarative description of one model, built at process start.
#[derive(Debug, Clone, Default)]
pub struct ModelDescription {
    name: String,
    columns: Vec<Column>,
}

impl ModelDescription {
    /// Starts a description for the named model.
    pub fn new(name: impl Into<String>) -> Self {
        ModelDescription {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column registration.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Walks the description and produces the immutable attribute catalog.
    ///
    /// Excluded columns (foreign-key, derived, internal) are dropped;
    /// every remaining column becomes one [`AttributeDescriptor`] with its
    /// kind derived from the declared storage. Pure function of the
    /// description.
    pub fn introspect(self) -> Catalog {
        let mut attributes = Vec::new();
        let mut index = HashMap::new();
        let mut full_text_default = None;

        for column in self.columns {
            if column.excluded() {
                continue;
            }
            let kind = column.kind();
            if kind == AttributeKind::FullTextIndexed && full_text_default.is_none() {
                full_text_default = Some(attributes.len());
            }
            index.insert(column.name.clone(), attributes.len());
            attributes.push(AttributeDescriptor {
                name: column.name,
                kind,
                storage: column.storage,
            });
        }

        Catalog {
            model: self.name,
            attributes,
            index,
            full_text_default,
        }
    }
}

/// Immutable catalog of one model's filterable attributes.
///
/// Built once by [`ModelDescription::introspect`] and shared read-only by
/// every request; `Catalog` is `Send + Sync` and typically lives in a
/// `Lazy` static or is injected by reference into request handlers.
#[derive(Debug, Clone)]
pub struct Catalog {
    model: String,
    attributes: Vec<AttributeDescriptor>,
    index: HashMap<String, usize>,
    full_text_default: Option<usize>,
}

impl Catalog {
    /// Returns the model name this catalog describes.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the filterable attributes in registration order.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Looks up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Returns the attribute the `search` control argument targets: the
    /// first full-text-indexed attribute, if the model has one.
    pub fn full_text_default(&self) -> Option<&AttributeDescriptor> {
        self.full_text_default.map(|i| &self.attributes[i])
    }

    /// Returns the callable filter surface: one entry per filterable
    /// attribute followed by the reserved control arguments.
    pub fn filter_fields(&self) -> Vec<FilterField> {
        let mut fields: Vec<FilterField> = self
            .attributes
            .iter()
            .map(|attr| FilterField {
                name: attr.name.clone(),
                arg_type: match attr.storage {
                    Storage::Integer => ArgType::Int,
                    Storage::Float => ArgType::Float,
                    _ => ArgType::String,
                },
            })
            .collect();

        fields.push(FilterField::control("distinct", ArgType::Boolean));
        fields.push(FilterField::control("op", ArgType::String));
        fields.push(FilterField::control("jsonkey", ArgType::String));
        fields.push(FilterField::control("search", ArgType::String));
        fields.push(FilterField::control("first", ArgType::Int));
        fields.push(FilterField::control("last", ArgType::Int));
        fields.push(FilterField::control("before", ArgType::Cursor));
        fields.push(FilterField::control("after", ArgType::Cursor));
        fields
    }
}

/// Expected argument type for one entry of the filter surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    Int,
    Float,
    String,
    Boolean,
    Cursor,
}

/// One entry of the filter surface exposed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct FilterField {
    /// Argument name.
    pub name: String,
    /// Expected argument type.
    #[serde(rename = "type")]
    pub arg_type: ArgType,
}

impl FilterField {
    fn control(name: &str, arg_type: ArgType) -> Self {
        FilterField {
            name: name.to_string(),
            arg_type,
        }
    }
}
