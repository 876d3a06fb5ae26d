//! Filter operation tree.

use std::fmt;

use serde_json::Value;

/// A node in a SCIM filter expression tree.
///
/// Leaf variants hold an attribute key and the value it is compared
/// against; combinators own their children. Nodes are immutable once built
/// and render themselves to filter text through [`Display`](fmt::Display):
///
/// ```rust
/// use uaa::filter::Operation;
///
/// let op = Operation::or(
///     Operation::equals("id", "42"),
///     Operation::greater_than("age", 30),
/// )
/// .precedence();
///
/// assert_eq!(op.to_string(), r#"(id eq "42" or age gt 30)"#);
/// ```
///
/// Keys and values are not validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Operation {
    /// `key eq value`
    Equals(String, Value),
    /// `key lt value`
    LessThan(String, Value),
    /// `key gt value`
    GreaterThan(String, Value),
    /// `key le value`
    LessEqual(String, Value),
    /// `key ge value`
    GreaterEqual(String, Value),
    /// `key sw "prefix"`
    StartsWith(String, String),
    /// `key co "substring"`
    Contains(String, String),
    /// `key pr`
    Present(String),
    /// `left and right`
    And(Box<Operation>, Box<Operation>),
    /// `left or right`
    Or(Box<Operation>, Box<Operation>),
    /// `(inner)`
    Precedence(Box<Operation>),
    /// The empty filter. Renders as nothing and is the identity for the
    /// combinators.
    #[default]
    Null,
}

impl Operation {
    /// Creates an `eq` predicate.
    pub fn equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Operation::Equals(key.into(), value.into())
    }

    /// Creates an `lt` predicate.
    pub fn less_than(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Operation::LessThan(key.into(), value.into())
    }

    /// Creates a `gt` predicate.
    pub fn greater_than(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Operation::GreaterThan(key.into(), value.into())
    }

    /// Creates an `le` predicate.
    pub fn less_equal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Operation::LessEqual(key.into(), value.into())
    }

    /// Creates a `ge` predicate.
    pub fn greater_equal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Operation::GreaterEqual(key.into(), value.into())
    }

    /// Creates an `sw` predicate.
    pub fn starts_with(key: impl Into<String>, prefix: impl Into<String>) -> Self {
        Operation::StartsWith(key.into(), prefix.into())
    }

    /// Creates a `co` predicate.
    pub fn contains(key: impl Into<String>, substring: impl Into<String>) -> Self {
        Operation::Contains(key.into(), substring.into())
    }

    /// Creates a `pr` predicate.
    pub fn present(key: impl Into<String>) -> Self {
        Operation::Present(key.into())
    }

    /// Joins two operations with `and`.
    pub fn and(left: Operation, right: Operation) -> Self {
        Operation::And(Box::new(left), Box::new(right))
    }

    /// Joins two operations with `or`.
    pub fn or(left: Operation, right: Operation) -> Self {
        Operation::Or(Box::new(left), Box::new(right))
    }

    /// Wraps this operation in parentheses.
    ///
    /// Wrapping an operation that is already a [`Operation::Precedence`]
    /// returns it unchanged.
    #[must_use]
    pub fn precedence(self) -> Self {
        match self {
            Operation::Precedence(_) => self,
            other => Operation::Precedence(Box::new(other)),
        }
    }

    /// Returns `true` if this operation renders as the empty filter.
    pub fn is_null(&self) -> bool {
        match self {
            Operation::Null => true,
            Operation::And(left, right) | Operation::Or(left, right) => {
                left.is_null() && right.is_null()
            },
            Operation::Precedence(inner) => inner.is_null(),
            _ => false,
        }
    }

    /// Returns `true` for `and`/`or` nodes.
    pub fn is_combinator(&self) -> bool {
        matches!(self, Operation::And(..) | Operation::Or(..))
    }

    /// Renders the operation to filter text.
    ///
    /// Returns `None` for the empty filter.
    pub fn render(&self) -> Option<String> {
        if self.is_null() { None } else { Some(self.to_string()) }
    }
}

fn write_join(
    f: &mut fmt::Formatter<'_>,
    left: &Operation,
    operator: &str,
    right: &Operation,
) -> fmt::Result {
    match (left.is_null(), right.is_null()) {
        (true, true) => Ok(()),
        (true, false) => write!(f, "{}", right),
        (false, true) => write!(f, "{}", left),
        (false, false) => write!(f, "{} {} {}", left, operator, right),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // serde_json renders strings quoted and escaped, other scalars raw.
        match self {
            Operation::Equals(key, value) => write!(f, "{} eq {}", key, value),
            Operation::LessThan(key, value) => write!(f, "{} lt {}", key, value),
            Operation::GreaterThan(key, value) => write!(f, "{} gt {}", key, value),
            Operation::LessEqual(key, value) => write!(f, "{} le {}", key, value),
            Operation::GreaterEqual(key, value) => write!(f, "{} ge {}", key, value),
            Operation::StartsWith(key, prefix) => {
                write!(f, "{} sw {}", key, Value::from(prefix.as_str()))
            },
            Operation::Contains(key, substring) => {
                write!(f, "{} co {}", key, Value::from(substring.as_str()))
            },
            Operation::Present(key) => write!(f, "{} pr", key),
            Operation::And(left, right) => write_join(f, left, "and", right),
            Operation::Or(left, right) => write_join(f, left, "or", right),
            Operation::Precedence(inner) if inner.is_null() => Ok(()),
            Operation::Precedence(inner) => write!(f, "({})", inner),
            Operation::Null => Ok(()),
        }
    }
}
