//! Backend-agnostic filter and ordering expressions.
//!
//! Stores translate these into their own query language; the in-memory
//! store evaluates them directly with [`Predicate::matches`].

use std::cmp::Ordering;

use super::schema::{FieldSource, Value};

/// Primary key field name shared by every entity
pub const ID_FIELD: &str = "id";

/// A boolean filter over entity fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals value
    Eq(&'static str, Value),
    /// Field is set and differs from value
    Ne(&'static str, Value),
    /// Text field contains the needle, ignoring case
    Contains(&'static str, String),
    /// Every branch holds (vacuously true when empty)
    And(Vec<Predicate>),
    /// At least one branch holds (false when empty)
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Conjoin predicates, collapsing the trivial cases.
    pub fn all(mut predicates: Vec<Predicate>) -> Option<Predicate> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Predicate::And(predicates)),
        }
    }

    /// Disjoin predicates, collapsing the trivial cases.
    pub fn any(mut predicates: Vec<Predicate>) -> Option<Predicate> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Predicate::Or(predicates)),
        }
    }

    /// Evaluate the predicate against a record.
    ///
    /// Missing (NULL) fields never satisfy a comparison, as in SQL.
    pub fn matches<S: FieldSource + ?Sized>(&self, source: &S) -> bool {
        match self {
            Predicate::Eq(field, expected) => source.field(field).as_ref() == Some(expected),
            Predicate::Ne(field, expected) => match source.field(field) {
                Some(actual) => actual != *expected,
                None => false,
            },
            Predicate::Contains(field, needle) => match source.field(field) {
                Some(Value::Text(text)) => text.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Predicate::And(branches) => branches.iter().all(|p| p.matches(source)),
            Predicate::Or(branches) => branches.iter().any(|p| p.matches(source)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Parse a query string direction; anything unrecognised is ascending.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" | "-1" => Direction::Desc,
            _ => Direction::Asc,
        }
    }
}

/// Ordering of a result set by one field, ties broken by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: &'static str,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new(field: &'static str, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: &'static str) -> Self {
        Self::new(field, Direction::Asc)
    }

    /// Compare two records under this ordering (NULLs first when ascending).
    pub fn compare<S: FieldSource + ?Sized>(&self, a: &S, b: &S) -> Ordering {
        let primary = compare_values(a.field(self.field), b.field(self.field));
        let primary = match self.direction {
            Direction::Asc => primary,
            Direction::Desc => primary.reverse(),
        };
        primary.then_with(|| compare_values(a.field(ID_FIELD), b.field(ID_FIELD)))
    }
}

fn compare_values(a: Option<Value>, b: Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Row(HashMap<&'static str, Value>);

    impl FieldSource for Row {
        fn field(&self, name: &str) -> Option<Value> {
            self.0.get(name).cloned()
        }
    }

    fn row(id: i64, name: &str, active: bool) -> Row {
        Row(HashMap::from([
            ("id", Value::Integer(id)),
            ("name", Value::Text(name.to_string())),
            ("isActive", Value::Boolean(active)),
        ]))
    }

    #[test]
    fn test_eq_and_ne() {
        let r = row(1, "Alpha", true);
        assert!(Predicate::Eq("name", "Alpha".into()).matches(&r));
        assert!(!Predicate::Eq("name", "alpha".into()).matches(&r));
        assert!(Predicate::Ne("id", 2.into()).matches(&r));
        assert!(!Predicate::Ne("id", 1.into()).matches(&r));
    }

    #[test]
    fn test_null_never_matches() {
        let r = row(1, "Alpha", true);
        assert!(!Predicate::Eq("description", "x".into()).matches(&r));
        assert!(!Predicate::Ne("description", "x".into()).matches(&r));
    }

    #[test]
    fn test_contains_ignores_case() {
        let r = row(1, "Support Bot", true);
        assert!(Predicate::Contains("name", "bot".into()).matches(&r));
        assert!(Predicate::Contains("name", "SUPP".into()).matches(&r));
        assert!(!Predicate::Contains("name", "sales".into()).matches(&r));
        // Only text fields can contain anything
        assert!(!Predicate::Contains("isActive", "true".into()).matches(&r));
    }

    #[test]
    fn test_empty_combinators() {
        let r = row(1, "Alpha", true);
        assert!(Predicate::And(vec![]).matches(&r));
        assert!(!Predicate::Or(vec![]).matches(&r));
        assert_eq!(Predicate::all(vec![]), None);
        assert_eq!(
            Predicate::any(vec![Predicate::Eq("id", 1.into())]),
            Some(Predicate::Eq("id", 1.into()))
        );
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("desc"), Direction::Desc);
        assert_eq!(Direction::parse("DESC"), Direction::Desc);
        assert_eq!(Direction::parse("-1"), Direction::Desc);
        assert_eq!(Direction::parse("asc"), Direction::Asc);
        assert_eq!(Direction::parse("sideways"), Direction::Asc);
    }

    #[test]
    fn test_sort_breaks_ties_by_id() {
        let a = row(2, "Same", true);
        let b = row(1, "Same", true);
        let order = SortOrder::new("name", Direction::Desc);
        assert_eq!(order.compare(&a, &b), Ordering::Greater);
        assert_eq!(SortOrder::asc("id").compare(&b, &a), Ordering::Less);
    }
}
