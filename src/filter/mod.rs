//! SCIM filter construction.
//!
//! - [`Operation`]: immutable expression tree, rendered via `Display`
//! - [`FilterRequestBuilder`]: stack-based, single-use builder
//! - [`FilterRequest`]: finalized filter text, attributes and pagination
//!
//! ## Grammar
//!
//! ```text
//! <key> eq|lt|gt|le|ge|sw|co <value>    string values are double-quoted
//! <key> pr
//! <expr> and|or <expr>                  left-associative
//! (<expr>)                              only where precedence() was applied
//! ```
//!
//! ## Example
//!
//! ```rust
//! use uaa::filter::FilterRequestBuilder;
//!
//! # fn main() -> uaa::Result<()> {
//! let request = FilterRequestBuilder::new()
//!     .starts_with("userName", "adm")?
//!     .present("emails")?
//!     .build()?;
//!
//! assert_eq!(request.filter(), Some(r#"userName sw "adm" and emails pr"#));
//! # Ok(())
//! # }
//! ```

mod builder;
mod operation;
mod request;

pub use builder::{Combinator, FilterRequestBuilder};
pub use operation::Operation;
pub use request::FilterRequest;
