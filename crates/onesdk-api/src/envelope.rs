//! Response envelope shared by every endpoint.

use serde::Deserialize;

/// Raw response wrapper: `{ docs, total, limit, offset, page, pages }`.
///
/// Single-item lookups use the same shape with at most one document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope<T> {
    /// Documents on this page.
    pub docs: Vec<T>,
    /// Total number of documents in the collection.
    #[serde(default)]
    pub total: u64,
    /// Page size in effect.
    #[serde(default)]
    pub limit: u64,
    /// Zero-based offset of the first document on this page.
    #[serde(default)]
    pub offset: u64,
    /// One-based current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Total page count under the current limit and filter.
    #[serde(default = "first_page")]
    pub pages: u32,
}

const fn first_page() -> u32 {
    1
}

impl<T> Envelope<T> {
    /// Whether the server reports a page after this one.
    ///
    /// `pages` is trusted as reported; `pages == 0` means no next page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }
}
