//! Comparison operators for numeric filters.
//!
//! The [`Op`] enum is the closed set of comparisons a request can select
//! through the `op` control argument. Parsing is lenient: an unrecognized
//! token resolves to [`Op::Eq`] at the classification boundary rather than
//! failing the request.

use std::cmp::Ordering;

/// Comparison operator applied between a numeric attribute and its filter
/// literal.
///
/// Each operator has a word token and a symbolic alias on the wire:
///
/// | Op | tokens |
/// |----|--------|
/// | `Eq` | `eq`, `=` |
/// | `Ne` | `ne`, `!=` |
/// | `Gt` | `gt`, `>` |
/// | `Ge` | `ge`, `>=` |
/// | `Lt` | `lt`, `<` |
/// | `Le` | `le`, `<=` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Equal. The default when no `op` argument is supplied.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
}

impl Op {
    /// Parses a wire token into an operator.
    ///
    /// Accepts the word tokens and their symbolic aliases. Returns `None`
    /// for anything else; the classifier maps that to [`Op::Eq`].
    pub fn parse(token: &str) -> Option<Op> {
        match token {
            "eq" | "=" => Some(Op::Eq),
            "ne" | "!=" => Some(Op::Ne),
            "gt" | ">" => Some(Op::Gt),
            "ge" | ">=" => Some(Op::Ge),
            "lt" | "<" => Some(Op::Lt),
            "le" | "<=" => Some(Op::Le),
            _ => None,
        }
    }

    /// Evaluates this operator given an ordering between field and operand.
    pub fn eval(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Ge => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Le => ordering != Ordering::Greater,
        }
    }

    /// Returns the word token for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::Gt => "gt",
            Op::Ge => "ge",
            Op::Lt => "lt",
            Op::Le => "le",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word_tokens() {
        assert_eq!(Op::parse("eq"), Some(Op::Eq));
        assert_eq!(Op::parse("ne"), Some(Op::Ne));
        assert_eq!(Op::parse("gt"), Some(Op::Gt));
        assert_eq!(Op::parse("ge"), Some(Op::Ge));
        assert_eq!(Op::parse("lt"), Some(Op::Lt));
        assert_eq!(Op::parse("le"), Some(Op::Le));
    }

    #[test]
    fn parse_symbolic_aliases() {
        assert_eq!(Op::parse("="), Some(Op::Eq));
        assert_eq!(Op::parse("!="), Some(Op::Ne));
        assert_eq!(Op::parse(">"), Some(Op::Gt));
        assert_eq!(Op::parse(">="), Some(Op::Ge));
        assert_eq!(Op::parse("<"), Some(Op::Lt));
        assert_eq!(Op::parse("<="), Some(Op::Le));
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        assert_eq!(Op::parse("bogus"), None);
        assert_eq!(Op::parse("EQ"), None);
        assert_eq!(Op::parse("=="), None);
        assert_eq!(Op::parse(""), None);
    }

    #[test]
    fn default_is_eq() {
        assert_eq!(Op::default(), Op::Eq);
    }

    #[test]
    fn eval_orderings() {
        assert!(Op::Eq.eval(Ordering::Equal));
        assert!(!Op::Eq.eval(Ordering::Less));

        assert!(Op::Ne.eval(Ordering::Less));
        assert!(Op::Ne.eval(Ordering::Greater));
        assert!(!Op::Ne.eval(Ordering::Equal));

        assert!(Op::Gt.eval(Ordering::Greater));
        assert!(!Op::Gt.eval(Ordering::Equal));

        assert!(Op::Ge.eval(Ordering::Greater));
        assert!(Op::Ge.eval(Ordering::Equal));
        assert!(!Op::Ge.eval(Ordering::Less));

        assert!(Op::Lt.eval(Ordering::Less));
        assert!(!Op::Lt.eval(Ordering::Equal));

        assert!(Op::Le.eval(Ordering::Less));
        assert!(Op::Le.eval(Ordering::Equal));
        assert!(!Op::Le.eval(Ordering::Greater));
    }

    #[test]
    fn display_uses_word_tokens() {
        assert_eq!(Op::Eq.to_string(), "eq");
        assert_eq!(Op::Ge.to_string(), "ge");
        assert_eq!(Op::Le.to_string(), "le");
    }
}
