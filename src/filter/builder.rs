//! Stack-based filter request builder.

use serde_json::Value;

use super::{FilterRequest, Operation};
use crate::{Error, Result};

/// The combinator used to join operations left on the stack at
/// [`build()`](FilterRequestBuilder::build) time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Join with `and`.
    #[default]
    And,
    /// Join with `or`.
    Or,
}

impl Combinator {
    /// Joins two operations with this combinator.
    pub fn join(self, left: Operation, right: Operation) -> Operation {
        match self {
            Combinator::And => Operation::and(left, right),
            Combinator::Or => Operation::or(left, right),
        }
    }
}

/// Builds a [`FilterRequest`] from predicates pushed onto an operation stack.
///
/// Predicate methods push a leaf; [`and()`](Self::and) and [`or()`](Self::or)
/// pop the two topmost operations (the earlier push becomes the left
/// operand) and push the combined node; [`precedence()`](Self::precedence)
/// parenthesizes the top of the stack. Anything still on the stack at
/// [`build()`](Self::build) is joined left-to-right with the default
/// combinator.
///
/// A builder is single-use: every call after `build()` fails with
/// [`ErrorKind::BuilderReuse`](crate::ErrorKind::BuilderReuse).
///
/// ## Example
///
/// ```rust
/// use uaa::filter::FilterRequestBuilder;
///
/// # fn main() -> uaa::Result<()> {
/// let request = FilterRequestBuilder::new()
///     .equals("id", "42")?
///     .greater_than("age", 30)?
///     .or()?
///     .precedence()?
///     .present("emails")?
///     .attributes(["id", "userName"])?
///     .count(50)?
///     .build()?;
///
/// assert_eq!(request.filter(), Some(r#"(id eq "42" or age gt 30) and emails pr"#));
/// assert_eq!(request.count(), 50);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FilterRequestBuilder {
    default_combinator: Combinator,
    stack: Vec<Operation>,
    attributes: Option<Vec<String>>,
    start: u32,
    count: u32,
    built: bool,
}

impl FilterRequestBuilder {
    /// Creates a builder that joins leftover operations with `and`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that joins leftover operations with `combinator`.
    pub fn with_default_combinator(combinator: Combinator) -> Self {
        Self { default_combinator: combinator, ..Self::default() }
    }

    /// The canonical "match everything" request.
    pub fn show_all() -> FilterRequest {
        FilterRequest::show_all()
    }

    /// Returns `true` once [`build()`](Self::build) has been called.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Returns the number of operations waiting on the stack.
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    fn ensure_active(&self) -> Result<()> {
        if self.built { Err(Error::builder_reuse()) } else { Ok(()) }
    }

    fn push(&mut self, operation: Operation) -> Result<&mut Self> {
        self.ensure_active()?;
        self.stack.push(operation);
        Ok(self)
    }

    /// Pushes `key eq value`.
    pub fn equals(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self> {
        self.push(Operation::equals(key, value))
    }

    /// Pushes `key lt value`.
    pub fn less_than(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.push(Operation::less_than(key, value))
    }

    /// Pushes `key gt value`.
    pub fn greater_than(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.push(Operation::greater_than(key, value))
    }

    /// Pushes `key le value`.
    pub fn less_than_or_equals(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.push(Operation::less_equal(key, value))
    }

    /// Pushes `key ge value`.
    pub fn greater_than_or_equals(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        self.push(Operation::greater_equal(key, value))
    }

    /// Pushes `key sw "prefix"`.
    pub fn starts_with(
        &mut self,
        key: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<&mut Self> {
        self.push(Operation::starts_with(key, prefix))
    }

    /// Pushes `key co "substring"`.
    pub fn contains(
        &mut self,
        key: impl Into<String>,
        substring: impl Into<String>,
    ) -> Result<&mut Self> {
        self.push(Operation::contains(key, substring))
    }

    /// Pushes `key pr`.
    pub fn present(&mut self, key: impl Into<String>) -> Result<&mut Self> {
        self.push(Operation::present(key))
    }

    /// Replaces the two topmost operations with their conjunction.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InsufficientOperands`](crate::ErrorKind::InsufficientOperands)
    /// if fewer than two operations are pending.
    pub fn and(&mut self) -> Result<&mut Self> {
        self.combine(Combinator::And)
    }

    /// Replaces the two topmost operations with their disjunction.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InsufficientOperands`](crate::ErrorKind::InsufficientOperands)
    /// if fewer than two operations are pending.
    pub fn or(&mut self) -> Result<&mut Self> {
        self.combine(Combinator::Or)
    }

    fn combine(&mut self, combinator: Combinator) -> Result<&mut Self> {
        self.ensure_active()?;

        if self.stack.len() < 2 {
            return Err(Error::insufficient_operands(format!(
                "need at least two operations to join, found {}",
                self.stack.len()
            )));
        }

        let (Some(right), Some(left)) = (self.stack.pop(), self.stack.pop()) else {
            return Err(Error::insufficient_operands("need at least two operations to join"));
        };
        self.stack.push(combinator.join(left, right));
        Ok(self)
    }

    /// Parenthesizes the topmost operation. A no-op if it is already
    /// parenthesized.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::EmptyStack`](crate::ErrorKind::EmptyStack) if no
    /// operation is pending.
    pub fn precedence(&mut self) -> Result<&mut Self> {
        self.ensure_active()?;

        let top = self
            .stack
            .pop()
            .ok_or_else(|| Error::empty_stack("need an operation to set precedence"))?;
        self.stack.push(top.precedence());
        Ok(self)
    }

    /// Restricts the returned attributes.
    pub fn attributes<I, S>(&mut self, attributes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_active()?;
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        Ok(self)
    }

    /// Sets the 1-based index of the first result.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument) if
    /// `start` is zero. Omit the call to leave it unset.
    pub fn start(&mut self, start: u32) -> Result<&mut Self> {
        self.ensure_active()?;
        if start == 0 {
            return Err(Error::invalid_argument("start must be positive"));
        }
        self.start = start;
        Ok(self)
    }

    /// Sets the page size.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument) if
    /// `count` is zero. Omit the call to leave it unset.
    pub fn count(&mut self, count: u32) -> Result<&mut Self> {
        self.ensure_active()?;
        if count == 0 {
            return Err(Error::invalid_argument("count must be positive"));
        }
        self.count = count;
        Ok(self)
    }

    /// Joins pending operations and finalizes the builder.
    ///
    /// The returned request has no filter text when nothing was pushed.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BuilderReuse`](crate::ErrorKind::BuilderReuse) if the
    /// builder was already built.
    pub fn build(&mut self) -> Result<FilterRequest> {
        self.ensure_active()?;

        let combinator = self.default_combinator;
        let mut pending = std::mem::take(&mut self.stack).into_iter();
        let root = match pending.next() {
            Some(first) => pending.fold(first, |acc, next| combinator.join(acc, next)),
            None => Operation::Null,
        };
        self.built = true;

        Ok(FilterRequest::new(
            root.render(),
            self.attributes.take(),
            self.start,
            self.count,
        ))
    }
}
