//! Deterministic value ordering for distinct-on grouping.
//!
//! Pagination itself orders rows by their primary key; the keys here give
//! the distinct pass a total, deterministic order over the compared
//! expressions of the filtered attributes.

use std::cmp::Ordering;

use crate::value::Number;

/// Owned, comparable snapshot of one compared expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Number(Number),
    Text(String),
    Absent,
}

impl SortKey {
    /// Compares two keys under a total order.
    ///
    /// Numbers before text, absent values last; a NaN comparison falls
    /// back to equal to keep the order total.
    pub(crate) fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.compare(*b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Absent, SortKey::Absent) => Ordering::Equal,
            (SortKey::Absent, _) => Ordering::Greater,
            (_, SortKey::Absent) => Ordering::Less,
        }
    }
}

/// Compares two key tuples lexicographically.
pub(crate) fn compare_keys(a: &[SortKey], b: &[SortKey]) -> Ordering {
    for (ka, kb) in a.iter().zip(b.iter()) {
        let ordering = ka.compare(kb);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}
