//! Traits connecting rows and row sources to the engine.
//!
//! [`Row`] is the accessor seam: queryable structs expose field values to
//! the engine through it. [`RowSource`] abstracts the backing store the
//! resolver fetches the base row set from.

use crate::value::Value;

/// Trait for types the engine can filter and paginate.
///
/// # Example
///
/// ```
/// use catsift::{KeyValueMap, Number, Row, Value};
///
/// struct Reaction {
///     id: u64,
///     composition: String,
///     reactants: KeyValueMap,
/// }
///
/// impl Row for Reaction {
///     fn value(&self, attribute: &str) -> Value<'_> {
///         match attribute {
///             "id" => Value::Number(Number::U64(self.id)),
///             "chemical_composition" => Value::Text(&self.composition),
///             "reactants" => Value::Map(&self.reactants),
///             _ => Value::Absent,
///         }
///     }
///
///     fn row_id(&self) -> u64 {
///         self.id
///     }
/// }
/// ```
pub trait Row {
    /// Returns the value of an attribute for predicate evaluation.
    ///
    /// Attributes the row does not expose return [`Value::Absent`]; an
    /// absent value never satisfies a positive predicate.
    fn value(&self, attribute: &str) -> Value<'_>;

    /// Returns a stable primary-key identifier for this row.
    ///
    /// Pagination orders rows by this id, so it must be unique within one
    /// source and stable across repeated fetches for cursors to stay
    /// valid.
    fn row_id(&self) -> u64;
}

/// Error reported by a row source fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError(pub String);

impl SourceError {
    /// Creates a source error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        SourceError(message.into())
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SourceError {}

/// The base-query seam: where the unfiltered row set comes from.
///
/// Implementations wrap whatever backs the model — an in-memory table, a
/// pooled store connection, a snapshot. Fetches are read-only, so the
/// resolver may retry a failed fetch up to its configured attempt bound.
pub trait RowSource<R: Row> {
    /// Fetches the full base row set.
    fn fetch(&self) -> Result<Vec<R>, SourceError>;
}

/// In-memory row source over an owned vector.
#[derive(Debug, Clone, Default)]
pub struct VecSource<R> {
    rows: Vec<R>,
}

impl<R> VecSource<R> {
    /// Wraps a vector of rows.
    pub fn new(rows: Vec<R>) -> Self {
        VecSource { rows }
    }

    /// Returns the number of rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the source holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Row + Clone> RowSource<R> for VecSource<R> {
    fn fetch(&self) -> Result<Vec<R>, SourceError> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[derive(Debug, Clone)]
    struct Item {
        id: u64,
        name: String,
    }

    impl Row for Item {
        fn value(&self, attribute: &str) -> Value<'_> {
            match attribute {
                "id" => Value::Number(Number::U64(self.id)),
                "name" => Value::Text(&self.name),
                _ => Value::Absent,
            }
        }

        fn row_id(&self) -> u64 {
            self.id
        }
    }

    #[test]
    fn row_accessor_returns_absent_for_unknown_attribute() {
        let item = Item {
            id: 1,
            name: "co".to_string(),
        };
        assert_eq!(item.value("name"), Value::Text("co"));
        assert_eq!(item.value("nope"), Value::Absent);
        assert_eq!(item.row_id(), 1);
    }

    #[test]
    fn vec_source_fetches_all_rows() {
        let source = VecSource::new(vec![
            Item {
                id: 1,
                name: "a".to_string(),
            },
            Item {
                id: 2,
                name: "b".to_string(),
            },
        ]);
        assert_eq!(source.len(), 2);
        assert!(!source.is_empty());

        let rows = source.fetch().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "b");
    }

    #[test]
    fn source_error_displays_message() {
        let err = SourceError::new("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
