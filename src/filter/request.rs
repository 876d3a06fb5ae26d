//! Finalized filter requests and their query-string mapping.

use url::Url;

/// A finalized search request: filter text, attribute projection and
/// pagination window.
///
/// Produced by [`FilterRequestBuilder::build()`](super::FilterRequestBuilder::build)
/// and immutable afterwards. Zero for `start` or `count` means "unset".
///
/// ## Query Mapping
///
/// | Field        | Parameter    | Sent when         |
/// |--------------|--------------|-------------------|
/// | `attributes` | `attributes` | non-empty         |
/// | `filter`     | `filter`     | non-blank         |
/// | `start`      | `startIndex` | positive          |
/// | `count`      | `count`      | positive          |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    filter: Option<String>,
    attributes: Option<Vec<String>>,
    start: u32,
    count: u32,
}

impl FilterRequest {
    /// Creates a request from its parts.
    ///
    /// A blank filter or an empty attribute list is treated as absent.
    pub fn new(
        filter: Option<String>,
        attributes: Option<Vec<String>>,
        start: u32,
        count: u32,
    ) -> Self {
        Self {
            filter: filter.filter(|f| !f.trim().is_empty()),
            attributes: attributes.filter(|a| !a.is_empty()),
            start,
            count,
        }
    }

    /// Creates a request with only a filter expression.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self::new(Some(filter.into()), None, 0, 0)
    }

    /// The canonical "match everything" request: no filter, no projection,
    /// no pagination bounds.
    pub fn show_all() -> Self {
        Self::default()
    }

    /// Returns `true` if this request matches everything.
    pub fn is_show_all(&self) -> bool {
        *self == Self::show_all()
    }

    /// Returns the filter text.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Returns the requested attributes.
    pub fn attributes(&self) -> Option<&[String]> {
        self.attributes.as_deref()
    }

    /// Returns the 1-based start index, or zero when unset.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Returns the page size, or zero when unset.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the query parameters for this request, in the order
    /// `attributes`, `filter`, `startIndex`, `count`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);

        if let Some(attributes) = &self.attributes {
            pairs.push(("attributes", attributes.join(",")));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if self.start > 0 {
            pairs.push(("startIndex", self.start.to_string()));
        }
        if self.count > 0 {
            pairs.push(("count", self.count.to_string()));
        }

        pairs
    }

    /// Appends this request's query parameters to `url`.
    ///
    /// Leaves the URL untouched when there is nothing to append.
    pub fn apply_to(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(pairs);
    }
}
