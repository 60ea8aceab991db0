//! Request parameters for paginated endpoints.

/// Default page number when none is given.
pub const DEFAULT_PAGE: u32 = 1;

/// Pagination, sorting and filtering options for list endpoints.
///
/// `filter` uses the API's own query grammar (`name=Gandalf`,
/// `race!=Orc,Goblin`, `budgetInMillions<100`, ...) and is sent as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginatedParams {
    /// Maximum number of documents per page (`None` = server default).
    pub limit: Option<u32>,
    /// One-based page number (`None` = first page).
    pub page: Option<u32>,
    /// Sort expression, e.g. `"name:asc"`.
    pub sort: Option<String>,
    /// Raw filter expression.
    pub filter: Option<String>,
}

impl PaginatedParams {
    /// Creates empty parameters (server defaults, first page).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the sort specification.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets the raw filter expression.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Returns a copy with `page` filled in (defaults to 1).
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            page: Some(self.page.unwrap_or(DEFAULT_PAGE)),
            ..self.clone()
        }
    }

    /// Filter fragment to splice after `?`, if any.
    pub(crate) fn raw_filter(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }

    /// Encoded query pairs in the order `limit`, `page`, `sort`.
    ///
    /// The filter is never part of this list.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = Vec::with_capacity(3);
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(ref sort) = self.sort
            && !sort.is_empty()
        {
            query.push(("sort", sort.clone()));
        }
        query
    }
}
