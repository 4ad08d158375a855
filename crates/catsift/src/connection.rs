//! Connection resolution: execution, distinct, and cursor windowing.
//!
//! [`resolve`] ties the pipeline together: classify the request's
//! arguments, compile the predicates, fetch the base rows (with bounded
//! retry), AND-evaluate the predicates, apply the distinct pass, then
//! window the ordered result into the `edges`/`pageInfo`/`totalCount`
//! envelope.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, warn};

use crate::args::{classify, Args, ControlArgs, FilterArg};
use crate::error::{FilterError, Result};
use crate::ordering::{compare_keys, SortKey};
use crate::predicate::{compile_all, serialize_map};
use crate::schema::Catalog;
use crate::traits::{Row, RowSource};
use crate::value::Value;

/// Prefix of the opaque window cursors.
///
/// Cursors identify a position in the ordered, filtered window; they are
/// opaque to callers and only valid within one consistent query
/// definition.
const CURSOR_PREFIX: &str = "row:";

/// One node of the result window with its position cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<R> {
    /// The row itself.
    pub node: R,
    /// Opaque cursor naming this edge's position.
    pub cursor: String,
}

/// Window summary of a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Edges exist past the end of the returned window.
    pub has_next_page: bool,
    /// Edges exist before the start of the returned window.
    pub has_previous_page: bool,
    /// Cursor of the first returned edge.
    pub start_cursor: Option<String>,
    /// Cursor of the last returned edge.
    pub end_cursor: Option<String>,
}

/// Cursor-paginated, total-counted result envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<R> {
    /// The returned window of rows.
    pub edges: Vec<Edge<R>>,
    /// Window summary.
    pub page_info: PageInfo,
    /// Size of the filtered (and de-duplicated) set before windowing.
    pub total_count: u64,
}

/// Execution options for the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Maximum row-source fetch attempts per request. Fetches are
    /// read-only, so repeating one is idempotent; values below 1 behave
    /// as 1.
    pub max_attempts: u32,
}

impl Default for ExecOptions {
    fn default() -> Self {
        ExecOptions { max_attempts: 1 }
    }
}

/// Resolves a request with default execution options (single fetch
/// attempt).
pub fn resolve<R, S>(catalog: &Catalog, source: &S, args: &Args) -> Result<Connection<R>>
where
    R: Row,
    S: RowSource<R>,
{
    resolve_with(catalog, source, args, ExecOptions::default())
}

/// Resolves a request: classify, compile, fetch, filter, de-duplicate,
/// count, window.
///
/// Compilation happens before any I/O, so a `TypeMismatch` never costs a
/// fetch. `total_count` reflects the filtered set after the distinct pass
/// and before windowing.
pub fn resolve_with<R, S>(
    catalog: &Catalog,
    source: &S,
    args: &Args,
    options: ExecOptions,
) -> Result<Connection<R>>
where
    R: Row,
    S: RowSource<R>,
{
    let (control, filters) = classify(catalog, args);
    let predicates = compile_all(&filters, control.op)?;

    let fetched = fetch_with_retry(source, options)?;
    let mut rows: Vec<R> = fetched
        .into_iter()
        .filter(|row| predicates.iter().all(|p| p.matches(row)))
        .collect();

    if control.distinct && !filters.is_empty() {
        rows = distinct_on(rows, &filters);
    } else {
        rows.sort_by_key(Row::row_id);
    }

    Ok(window(rows, &control))
}

fn fetch_with_retry<R, S>(source: &S, options: ExecOptions) -> Result<Vec<R>>
where
    R: Row,
    S: RowSource<R>,
{
    let attempts = options.max_attempts.max(1);
    let mut message = String::new();
    for attempt in 1..=attempts {
        match source.fetch() {
            Ok(rows) => return Ok(rows),
            Err(err) => {
                warn!(attempt, attempts, error = %err, "row source fetch failed");
                message = err.to_string();
            }
        }
    }
    Err(FilterError::Source { attempts, message })
}

/// Distinct-on pass: order by the compared expressions of the filtered
/// attributes (row id as tiebreaker) and keep the first row per
/// expression tuple. The result stays in expression order.
fn distinct_on<R: Row>(rows: Vec<R>, filters: &[FilterArg]) -> Vec<R> {
    let mut keyed: Vec<(Vec<SortKey>, R)> = rows
        .into_iter()
        .map(|row| (expression_keys(&row, filters), row))
        .collect();
    keyed.sort_by(|a, b| {
        compare_keys(&a.0, &b.0).then_with(|| a.1.row_id().cmp(&b.1.row_id()))
    });
    keyed.dedup_by(|a, b| compare_keys(&a.0, &b.0) == Ordering::Equal);
    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Snapshot of the compared expressions one row exposes for the filtered
/// attributes: the content at the resolved key for keyed map filters, the
/// serialized map otherwise, the plain value for everything else.
fn expression_keys<R: Row>(row: &R, filters: &[FilterArg]) -> Vec<SortKey> {
    filters
        .iter()
        .map(|arg| match row.value(&arg.attribute) {
            Value::Number(n) => SortKey::Number(n),
            Value::Text(t) => SortKey::Text(t.to_string()),
            Value::Map(map) => match &arg.map_key {
                Some(key) => map
                    .get(key)
                    .map(|content| SortKey::Text(content.clone()))
                    .unwrap_or(SortKey::Absent),
                None => SortKey::Text(serialize_map(map)),
            },
            Value::Absent => SortKey::Absent,
        })
        .collect()
}

/// Applies the relay-style window over the ordered, filtered rows.
fn window<R: Row>(rows: Vec<R>, control: &ControlArgs) -> Connection<R> {
    let total = rows.len();
    let mut start = 0usize;
    let mut end = total;

    if let Some(cursor) = &control.after {
        match decode_cursor(cursor) {
            Some(offset) => start = offset.saturating_add(1).min(total),
            None => debug!(cursor = %cursor, "ignoring undecodable after cursor"),
        }
    }
    if let Some(cursor) = &control.before {
        match decode_cursor(cursor) {
            Some(offset) => end = offset.min(end),
            None => debug!(cursor = %cursor, "ignoring undecodable before cursor"),
        }
    }
    if end < start {
        end = start;
    }
    if let Some(first) = control.first {
        let first = usize::try_from(first).unwrap_or(usize::MAX);
        end = end.min(start.saturating_add(first));
    }
    if let Some(last) = control.last {
        let last = usize::try_from(last).unwrap_or(usize::MAX);
        start = end - last.min(end - start);
    }

    let page_info = PageInfo {
        has_next_page: end < total,
        has_previous_page: start > 0,
        start_cursor: (start < end).then(|| encode_cursor(start)),
        end_cursor: (start < end).then(|| encode_cursor(end - 1)),
    };

    let edges = rows
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(offset, node)| Edge {
            cursor: encode_cursor(offset),
            node,
        })
        .collect();

    Connection {
        edges,
        page_info,
        total_count: total as u64,
    }
}

fn encode_cursor(offset: usize) -> String {
    format!("{CURSOR_PREFIX}{offset}")
}

fn decode_cursor(cursor: &str) -> Option<usize> {
    cursor.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}
