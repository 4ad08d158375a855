//! Request argument classification.
//!
//! A request arrives as a flat, ordered set of named arguments. The
//! classifier splits it into [`ControlArgs`] (pagination, distinct,
//! operator selection, map-key selection, full-text shorthand) and one
//! [`FilterArg`] per recognized attribute filter. Classification is
//! deliberately lenient: unknown attribute names are ignored and an
//! unrecognized `op` token falls back to `eq`, so additive schema changes
//! never break existing callers.

use tracing::debug;

use crate::op::Op;
use crate::schema::{AttributeKind, Catalog};
use crate::value::ArgValue;

/// Argument names that are always control, never attribute filters.
pub const RESERVED_ARGS: [&str; 8] = [
    "first", "last", "before", "after", "distinct", "op", "jsonkey", "search",
];

/// Separator splitting a compound argument name into attribute and map key.
const KEY_SEPARATOR: &str = "__";

/// Ordered set of named arguments for one request.
///
/// # Example
///
/// ```
/// use catsift::Args;
///
/// let args = Args::new()
///     .set("reactants", "CO")
///     .set("year", 2015i64)
///     .set("op", "ge")
///     .set("first", 10i64);
/// assert_eq!(args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Args {
    entries: Vec<(String, ArgValue)>,
}

impl Args {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Args::default()
    }

    /// Appends a named argument.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Control arguments parsed once per request.
#[derive(Debug, Clone, Default)]
pub struct ControlArgs {
    /// Keep the first n edges of the window.
    pub first: Option<u64>,
    /// Keep the last n edges of the window.
    pub last: Option<u64>,
    /// Opaque cursor bounding the window start (exclusive).
    pub after: Option<String>,
    /// Opaque cursor bounding the window end (exclusive).
    pub before: Option<String>,
    /// De-duplicate on the filtered attributes' compared expressions.
    pub distinct: bool,
    /// Comparison operator for numeric filters.
    pub op: Op,
    /// Default map key applied to map filters without an inline key.
    pub json_key: Option<String>,
    /// Full-text query routed to the model's full-text attribute.
    pub search: Option<String>,
}

/// One recognized per-attribute filter.
#[derive(Debug, Clone)]
pub struct FilterArg {
    /// Attribute name resolved against the catalog.
    pub attribute: String,
    /// The attribute's semantic kind.
    pub kind: AttributeKind,
    /// Map key targeted by this filter, already resolved: the inline
    /// `attr__key` part wins over the global `jsonkey` control.
    pub map_key: Option<String>,
    /// The caller-supplied literal.
    pub value: ArgValue,
}

/// Classifies one request's arguments against the catalog.
///
/// Returns the control arguments and the recognized filters in argument
/// order. Never fails: malformed control values are treated as absent,
/// unknown attributes are dropped, and a full-text `search` on a model
/// without a full-text attribute is ignored.
pub fn classify(catalog: &Catalog, args: &Args) -> (ControlArgs, Vec<FilterArg>) {
    let mut control = ControlArgs::default();

    for (name, value) in args.iter() {
        match name {
            "first" => control.first = non_negative(value),
            "last" => control.last = non_negative(value),
            "after" => control.after = value.as_text().map(str::to_string),
            "before" => control.before = value.as_text().map(str::to_string),
            "distinct" => control.distinct = value.as_bool().unwrap_or(control.distinct),
            "op" => {
                if let Some(token) = value.as_text() {
                    match Op::parse(token) {
                        Some(op) => control.op = op,
                        None => {
                            debug!(token, "unrecognized op token, falling back to eq");
                        }
                    }
                }
            }
            "jsonkey" => control.json_key = value.as_text().map(str::to_string),
            "search" => control.search = value.as_text().map(str::to_string),
            _ => {}
        }
    }

    let mut filters = Vec::new();
    for (name, value) in args.iter() {
        if RESERVED_ARGS.contains(&name) {
            continue;
        }

        let (attribute, inline_key) = match name.split_once(KEY_SEPARATOR) {
            Some((attr, key)) => (attr, Some(key.to_string())),
            None => (name, None),
        };

        let Some(descriptor) = catalog.get(attribute) else {
            debug!(attribute, "ignoring unknown filter attribute");
            continue;
        };

        filters.push(FilterArg {
            attribute: descriptor.name.clone(),
            kind: descriptor.kind,
            map_key: inline_key.or_else(|| control.json_key.clone()),
            value: value.clone(),
        });
    }

    if let Some(query) = &control.search {
        match catalog.full_text_default() {
            Some(descriptor) => filters.push(FilterArg {
                attribute: descriptor.name.clone(),
                kind: descriptor.kind,
                map_key: None,
                value: ArgValue::Text(query.clone()),
            }),
            None => {
                debug!(
                    model = catalog.model(),
                    "ignoring search argument, model has no full-text attribute"
                );
            }
        }
    }

    (control, filters)
}

fn non_negative(value: &ArgValue) -> Option<u64> {
    match value {
        ArgValue::Int(n) => Some((*n).max(0) as u64),
        _ => None,
    }
}
