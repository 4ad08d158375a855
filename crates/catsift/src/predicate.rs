//! Predicate compilation and evaluation.
//!
//! [`compile`] turns one classified [`FilterArg`] into zero or more
//! [`Predicate`] fragments according to the attribute's kind. Fragments
//! from different arguments combine with AND at resolution time; fragments
//! for the terms of a single `+`-split map argument combine with OR inside
//! one [`Predicate::AnyOf`].

use crate::args::FilterArg;
use crate::error::{FilterError, Result};
use crate::op::Op;
use crate::schema::AttributeKind;
use crate::traits::Row;
use crate::value::{KeyValueMap, Number};

/// Sentinel prefix requesting substring semantics on text values.
const WILDCARD: char = '~';

/// Separator splitting a map filter value into independent OR-ed terms.
const TERM_SEPARATOR: char = '+';

/// Attributes whose bare key terms widen to the suffixed species forms.
const AUTO_SUFFIX_ATTRIBUTES: [&str; 2] = ["reactants", "products"];

/// Reserved species suffix tokens. A term containing either is taken
/// literally; a term containing neither widens to all three forms.
const SUFFIX_TOKENS: [&str; 2] = ["gas", "star"];

/// One compiled filter fragment, evaluated against a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Operator comparison between a numeric attribute and a literal.
    NumberCmp {
        attribute: String,
        op: Op,
        operand: Number,
    },
    /// Exact text equality.
    TextEq { attribute: String, operand: String },
    /// Case-insensitive substring match; the needle is stored lowercased.
    TextContains { attribute: String, needle: String },
    /// Whole-document relevance match: every query term must occur as a
    /// word in the document.
    FullText { attribute: String, query: String },
    /// Map possesses the given key.
    HasKey { attribute: String, key: String },
    /// Content at a map key equals the operand exactly.
    KeyTextEq {
        attribute: String,
        key: String,
        operand: String,
    },
    /// Content at a map key contains the lowercased needle.
    KeyTextContains {
        attribute: String,
        key: String,
        needle: String,
    },
    /// Serialized form of the whole map contains the lowercased needle.
    MapContains { attribute: String, needle: String },
    /// Disjunction of fragments; satisfied when any arm matches.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// Evaluates this fragment against one row.
    ///
    /// An absent field value never satisfies a fragment, including the
    /// negated comparison operators.
    pub fn matches<R: Row>(&self, row: &R) -> bool {
        match self {
            Predicate::NumberCmp {
                attribute,
                op,
                operand,
            } => match row.value(attribute).as_number() {
                Some(n) => n.compare(*operand).map(|o| op.eval(o)).unwrap_or(false),
                None => false,
            },
            Predicate::TextEq { attribute, operand } => {
                row.value(attribute).as_text() == Some(operand.as_str())
            }
            Predicate::TextContains { attribute, needle } => row
                .value(attribute)
                .as_text()
                .is_some_and(|t| t.to_lowercase().contains(needle)),
            Predicate::FullText { attribute, query } => row
                .value(attribute)
                .as_text()
                .is_some_and(|doc| document_matches(doc, query)),
            Predicate::HasKey { attribute, key } => row
                .value(attribute)
                .as_map()
                .is_some_and(|m| m.contains_key(key)),
            Predicate::KeyTextEq {
                attribute,
                key,
                operand,
            } => row
                .value(attribute)
                .as_map()
                .and_then(|m| m.get(key))
                .is_some_and(|content| content == operand),
            Predicate::KeyTextContains {
                attribute,
                key,
                needle,
            } => row
                .value(attribute)
                .as_map()
                .and_then(|m| m.get(key))
                .is_some_and(|content| content.to_lowercase().contains(needle)),
            Predicate::MapContains { attribute, needle } => row
                .value(attribute)
                .as_map()
                .is_some_and(|m| serialize_map(m).to_lowercase().contains(needle)),
            Predicate::AnyOf(arms) => arms.iter().any(|p| p.matches(row)),
        }
    }
}

/// Compiles one classified filter into its predicate fragments.
///
/// `op` is the request's resolved comparison operator; it only affects
/// numeric attributes. The returned fragments are ANDed into the query by
/// the resolver; an empty vector means the filter degenerated to a no-op
/// (the bare `~` wildcard).
pub fn compile(arg: &FilterArg, op: Op) -> Result<Vec<Predicate>> {
    match arg.kind {
        AttributeKind::Numeric => {
            let operand = arg.value.as_number().ok_or_else(|| mismatch(arg, "number"))?;
            Ok(vec![Predicate::NumberCmp {
                attribute: arg.attribute.clone(),
                op,
                operand,
            }])
        }
        AttributeKind::Text => {
            let text = expect_text(arg)?;
            Ok(match strip_wildcard(text) {
                Some("") => Vec::new(),
                Some(needle) => vec![Predicate::TextContains {
                    attribute: arg.attribute.clone(),
                    needle: needle.to_lowercase(),
                }],
                None => vec![Predicate::TextEq {
                    attribute: arg.attribute.clone(),
                    operand: text.to_string(),
                }],
            })
        }
        AttributeKind::FullTextIndexed => {
            let text = expect_text(arg)?;
            Ok(vec![Predicate::FullText {
                attribute: arg.attribute.clone(),
                query: text.to_string(),
            }])
        }
        AttributeKind::SemiStructuredMap => {
            let text = expect_text(arg)?;
            match &arg.map_key {
                Some(key) => Ok(compile_keyed_map(arg, key, text)),
                None => Ok(compile_map_membership(arg, text)),
            }
        }
    }
}

/// Compiles every classified filter, concatenating the fragments.
pub fn compile_all(filters: &[FilterArg], op: Op) -> Result<Vec<Predicate>> {
    let mut predicates = Vec::new();
    for arg in filters {
        predicates.extend(compile(arg, op)?);
    }
    Ok(predicates)
}

/// Map filter with a resolved key: narrow to maps possessing the key,
/// then compare the content at that key under the text rules.
fn compile_keyed_map(arg: &FilterArg, key: &str, value: &str) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::HasKey {
        attribute: arg.attribute.clone(),
        key: key.to_string(),
    }];
    match strip_wildcard(value) {
        Some("") => {}
        Some(needle) => predicates.push(Predicate::KeyTextContains {
            attribute: arg.attribute.clone(),
            key: key.to_string(),
            needle: needle.to_lowercase(),
        }),
        None => predicates.push(Predicate::KeyTextEq {
            attribute: arg.attribute.clone(),
            key: key.to_string(),
            operand: value.to_string(),
        }),
    }
    predicates
}

/// Map filter without a key: a key-membership query. The value splits on
/// `+` into independent terms; the terms' fragments OR together.
fn compile_map_membership(arg: &FilterArg, value: &str) -> Vec<Predicate> {
    let mut arms = Vec::new();
    for term in value.split(TERM_SEPARATOR) {
        match strip_wildcard(term) {
            Some("") => {}
            Some(needle) => arms.push(Predicate::MapContains {
                attribute: arg.attribute.clone(),
                needle: needle.to_lowercase(),
            }),
            None => arms.push(key_membership(arg, term)),
        }
    }
    match arms.len() {
        0 => Vec::new(),
        1 => arms,
        _ => vec![Predicate::AnyOf(arms)],
    }
}

/// Membership test for one literal key term, widened to the suffixed
/// species forms on the conventional attributes.
fn key_membership(arg: &FilterArg, term: &str) -> Predicate {
    let bare = Predicate::HasKey {
        attribute: arg.attribute.clone(),
        key: term.to_string(),
    };
    let widens = AUTO_SUFFIX_ATTRIBUTES.contains(&arg.attribute.as_str())
        && !SUFFIX_TOKENS.iter().any(|suffix| term.contains(suffix));
    if !widens {
        return bare;
    }
    let mut arms = vec![bare];
    for suffix in SUFFIX_TOKENS {
        arms.push(Predicate::HasKey {
            attribute: arg.attribute.clone(),
            key: format!("{term}{suffix}"),
        });
    }
    Predicate::AnyOf(arms)
}

/// Returns the remainder after the wildcard sentinel, or `None` for a
/// non-wildcard value. `Some("")` is the bare `~` match-all.
fn strip_wildcard(value: &str) -> Option<&str> {
    value.strip_prefix(WILDCARD)
}

fn expect_text<'a>(arg: &'a FilterArg) -> Result<&'a str> {
    arg.value.as_text().ok_or_else(|| mismatch(arg, "string"))
}

fn mismatch(arg: &FilterArg, expected: &'static str) -> FilterError {
    FilterError::TypeMismatch {
        attribute: arg.attribute.clone(),
        expected,
        actual: arg.value.type_name(),
    }
}

/// Whole-document term matching: every whitespace-separated query term
/// must occur as a word of the document, case-insensitively.
fn document_matches(document: &str, query: &str) -> bool {
    let document = document.to_lowercase();
    query.split_whitespace().all(|term| {
        let term = term.to_lowercase();
        document
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == term)
    })
}

/// Deterministic textual form of a map, used by the `~` whole-map match.
pub(crate) fn serialize_map(map: &KeyValueMap) -> String {
    serde_json::to_string(map).unwrap_or_default()
}
