//! Catsift - schema-driven filter compilation and cursor pagination.
//!
//! Catsift lets callers filter, search, and paginate over a model without
//! hand-writing predicates per field. A model registers its columns once
//! at startup; the resulting catalog knows which attributes are
//! filterable and what semantic kind each has. At request time a flat set
//! of named arguments compiles into predicates matched to each
//! attribute's kind, and the filtered rows come back as a
//! cursor-paginated, total-counted connection envelope.
//!
//! # Quick Start
//!
//! ```rust
//! use catsift::{
//!     Args, Column, KeyValueMap, ModelDescription, Number, Row, Storage, Value, VecSource,
//! };
//!
//! // Rows are plain structs exposing fields through the Row trait.
//! #[derive(Clone)]
//! struct Reaction {
//!     id: u64,
//!     energy: f64,
//!     reactants: KeyValueMap,
//! }
//!
//! impl Row for Reaction {
//!     fn value(&self, attribute: &str) -> Value<'_> {
//!         match attribute {
//!             "reaction_energy" => Value::Number(Number::F64(self.energy)),
//!             "reactants" => Value::Map(&self.reactants),
//!             _ => Value::Absent,
//!         }
//!     }
//!
//!     fn row_id(&self) -> u64 {
//!         self.id
//!     }
//! }
//!
//! // Register the model once at startup.
//! let catalog = ModelDescription::new("reactions")
//!     .column(Column::new("reaction_energy", Storage::Float))
//!     .column(Column::new("reactants", Storage::KeyValueMap))
//!     .introspect();
//!
//! let mut reactants = KeyValueMap::new();
//! reactants.insert("COstar".to_string(), "1".to_string());
//! let source = VecSource::new(vec![Reaction { id: 1, energy: 0.7, reactants }]);
//!
//! // "CO" widens to CO / COgas / COstar on the reactants attribute.
//! let args = Args::new().set("reactants", "CO").set("first", 10i64);
//! let connection = catsift::resolve(&catalog, &source, &args).unwrap();
//! assert_eq!(connection.total_count, 1);
//! assert_eq!(connection.edges.len(), 1);
//! ```
//!
//! # Attribute kinds and filter semantics
//!
//! | Kind | Filter semantics |
//! |------|------------------|
//! | `Numeric` | comparison under the `op` control argument (`eq` default) |
//! | `Text` | exact equality, or case-insensitive substring with a `~` prefix |
//! | `FullTextIndexed` | whole-document term matching, no substring semantics |
//! | `SemiStructuredMap` | key membership, `+`-split OR terms, keyed content lookup |
//!
//! A bare `~` value matches everything - useful for requesting
//! distinctness without constraining values. On the `reactants` and
//! `products` attributes a bare key term widens to the `gas`/`star`
//! suffixed forms.
//!
//! # Leniency
//!
//! The surface is public and best-effort by design: unknown attribute
//! names are ignored, an unrecognized `op` token falls back to `eq`, and
//! undecodable cursors are treated as absent. The two errors a request
//! can surface are a kind/literal type mismatch and a row-source failure
//! after its bounded retries.

mod args;
mod connection;
mod error;
mod op;
mod ordering;
mod predicate;
mod schema;
mod traits;
mod value;

// Re-export public API
pub use args::{classify, Args, ControlArgs, FilterArg, RESERVED_ARGS};
pub use connection::{resolve, resolve_with, Connection, Edge, ExecOptions, PageInfo};
pub use error::{FilterError, Result};
pub use op::Op;
pub use predicate::{compile, compile_all, Predicate};
pub use schema::{
    ArgType, AttributeDescriptor, AttributeKind, Catalog, Column, FilterField, ModelDescription,
    Storage,
};
pub use traits::{Row, RowSource, SourceError, VecSource};
pub use value::{ArgValue, KeyValueMap, Number, Value};
