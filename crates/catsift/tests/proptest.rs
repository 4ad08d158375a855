//! Property-based tests for classification, windowing, and distinct.

use proptest::prelude::*;

use catsift::{
    resolve, Args, Catalog, Column, Connection, KeyValueMap, ModelDescription, Number, Row,
    Storage, Value, VecSource,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct Sample {
    id: u64,
    name: String,
    score: i64,
    tags: KeyValueMap,
}

impl Row for Sample {
    fn value(&self, attribute: &str) -> Value<'_> {
        match attribute {
            "name" => Value::Text(&self.name),
            "score" => Value::Number(Number::I64(self.score)),
            "tags" => Value::Map(&self.tags),
            _ => Value::Absent,
        }
    }

    fn row_id(&self) -> u64 {
        self.id
    }
}

fn catalog() -> Catalog {
    ModelDescription::new("samples")
        .column(Column::new("name", Storage::Text))
        .column(Column::new("score", Storage::Integer))
        .column(Column::new("tags", Storage::KeyValueMap))
        .introspect()
}

fn samples_strategy() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(
        (
            "[a-z]{1,8}",
            -100i64..100,
            prop::collection::btree_map("[a-z]{1,4}", "[a-z0-9]{1,4}", 0..4),
        ),
        0..40,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, score, tags))| Sample {
                id: i as u64 + 1,
                name,
                score,
                tags,
            })
            .collect()
    })
}

fn ids(connection: &Connection<Sample>) -> Vec<u64> {
    connection.edges.iter().map(|e| e.node.id).collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// The window never exceeds `first`, and the total never shrinks
    /// below the window.
    #[test]
    fn first_bounds_the_window(
        samples in samples_strategy(),
        first in 0i64..50,
    ) {
        let source = VecSource::new(samples.clone());
        let args = Args::new().set("first", first);
        let conn = resolve(&catalog(), &source, &args).unwrap();

        prop_assert!(conn.edges.len() as i64 <= first);
        prop_assert_eq!(conn.total_count as usize, samples.len());
    }

    /// The window never exceeds `last`.
    #[test]
    fn last_bounds_the_window(
        samples in samples_strategy(),
        last in 0i64..50,
    ) {
        let source = VecSource::new(samples);
        let args = Args::new().set("last", last);
        let conn = resolve(&catalog(), &source, &args).unwrap();

        prop_assert!(conn.edges.len() as i64 <= last);
    }

    /// Walking forward with a fixed page size visits every row exactly
    /// once, in order.
    #[test]
    fn forward_pagination_partitions_the_set(
        samples in samples_strategy(),
        page in 1i64..8,
    ) {
        let source = VecSource::new(samples.clone());
        let catalog = catalog();

        let mut seen = Vec::new();
        let mut after: Option<String> = None;
        let mut rounds = 0;

        loop {
            let mut args = Args::new().set("first", page);
            if let Some(cursor) = &after {
                args = args.set("after", cursor.clone());
            }
            let conn = resolve(&catalog, &source, &args).unwrap();
            seen.extend(ids(&conn));

            if !conn.page_info.has_next_page {
                break;
            }
            after = conn.page_info.end_cursor.clone();
            prop_assert!(after.is_some());

            rounds += 1;
            prop_assert!(rounds <= samples.len() + 1, "pagination failed to terminate");
        }

        let expected: Vec<u64> = (1..=samples.len() as u64).collect();
        prop_assert_eq!(seen, expected);
    }

    /// Distinct can only shrink the filtered set.
    #[test]
    fn distinct_never_increases_total_count(samples in samples_strategy()) {
        let source = VecSource::new(samples);
        let catalog = catalog();

        let plain = resolve(&catalog, &source, &Args::new().set("name", "~")).unwrap();
        let distinct = resolve(
            &catalog,
            &source,
            &Args::new().set("name", "~").set("distinct", true),
        )
        .unwrap();

        prop_assert!(distinct.total_count <= plain.total_count);
    }

    /// A bare wildcard filter is a no-op: same rows as no filter at all.
    #[test]
    fn bare_wildcard_equals_unfiltered(samples in samples_strategy()) {
        let source = VecSource::new(samples);
        let catalog = catalog();

        let unfiltered = resolve(&catalog, &source, &Args::new()).unwrap();
        let wildcard = resolve(&catalog, &source, &Args::new().set("name", "~")).unwrap();
        let map_wildcard = resolve(&catalog, &source, &Args::new().set("tags", "~")).unwrap();

        prop_assert_eq!(ids(&unfiltered), ids(&wildcard));
        prop_assert_eq!(ids(&unfiltered), ids(&map_wildcard));
    }

    /// Arbitrary unknown attribute names and op tokens never fail a
    /// request whose literals are strings.
    #[test]
    fn classification_is_lenient(
        samples in samples_strategy(),
        attribute in "[a-z_]{1,12}".prop_filter("numeric attributes reject strings", |s| s != "score"),
        token in "[a-z=<>!]{0,3}",
        needle in "~?[a-z]{0,6}",
    ) {
        let source = VecSource::new(samples.clone());
        let args = Args::new()
            .set(attribute, needle)
            .set("op", token)
            .set("name", "~");

        let conn = resolve(&catalog(), &source, &args);
        prop_assert!(conn.is_ok());
        prop_assert!(conn.unwrap().total_count as usize <= samples.len());
    }

    /// Filtering composes with windowing: every returned row satisfies
    /// the substring filter.
    #[test]
    fn returned_rows_satisfy_the_filter(
        samples in samples_strategy(),
        needle in "[a-z]{1,2}",
        first in 1i64..10,
    ) {
        let source = VecSource::new(samples);
        let args = Args::new()
            .set("name", format!("~{needle}"))
            .set("first", first);
        let conn = resolve(&catalog(), &source, &args).unwrap();

        for edge in &conn.edges {
            prop_assert!(edge.node.name.contains(needle.as_str()));
        }
    }
}
