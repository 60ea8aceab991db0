//! Page-number pagination over list endpoints.
//!
//! A [`PageRequest`] is an immutable descriptor (path + normalized
//! parameters). Fetching it yields a [`Page`], which carries the descriptor
//! of the following page; [`Page::next`] fetches that descriptor. There is
//! no shared cursor, so pages can be fetched in any order and any number of
//! times.
#![allow(clippy::future_not_send)]

use std::fmt;

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::api::LocalTransport;
use crate::envelope::Envelope;
use crate::error::{OneApiError, Result};
use crate::params::{DEFAULT_PAGE, PaginatedParams};

/// Descriptor of one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Resource path, e.g. `/movie` or `/book/{id}/chapter`.
    path: String,
    /// Parameters with `page` always set.
    params: PaginatedParams,
}

impl PageRequest {
    /// Creates a descriptor; `page` defaults to 1.
    #[must_use]
    pub fn new(path: impl Into<String>, params: &PaginatedParams) -> Self {
        Self {
            path: path.into(),
            params: params.normalized(),
        }
    }

    /// Resource path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Normalized parameters.
    #[must_use]
    pub const fn params(&self) -> &PaginatedParams {
        &self.params
    }

    /// Requested page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.params.page.unwrap_or(DEFAULT_PAGE)
    }

    /// Same request for another page; limit, sort and filter are kept.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            path: self.path.clone(),
            params: PaginatedParams {
                page: Some(page),
                ..self.params.clone()
            },
        }
    }
}

/// One fetched page of a collection.
///
/// Borrows the transport so that [`Page::next`] needs no arguments.
pub struct Page<'c, C, T> {
    transport: &'c C,
    items: Vec<T>,
    total: u64,
    limit: u64,
    offset: u64,
    page_number: u32,
    pages: u32,
    request: PageRequest,
    next_request: PageRequest,
}

impl<C, T: fmt::Debug> fmt::Debug for Page<'_, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("items", &self.items)
            .field("total", &self.total)
            .field("page_number", &self.page_number)
            .field("pages", &self.pages)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl<C, T> Page<'_, C, T> {
    /// Documents on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its documents.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Whether the server reports a page after this one (`page < pages`).
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page_number < self.pages
    }

    /// Page number reported by the server.
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Total page count reported by the server.
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }

    /// Total document count reported by the server.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Page size reported by the server.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Offset of the first document reported by the server.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Request that produced this page.
    #[must_use]
    pub const fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Request [`Page::next`] will send.
    #[must_use]
    pub const fn next_request(&self) -> &PageRequest {
        &self.next_request
    }
}

impl<'c, C, T> Page<'c, C, T>
where
    C: LocalTransport + Sync,
    T: DeserializeOwned + Send,
{
    /// Fetches the following page.
    ///
    /// Every call is a new request and returns a new page; nothing prevents
    /// calling it when [`Page::has_next`] is `false`, in which case the
    /// server's answer for the past-the-end page is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn next(&self) -> Result<Page<'c, C, T>> {
        fetch_page(self.transport, self.next_request.clone()).await
    }

    /// Turns this page into a stream of itself and every following page.
    ///
    /// Pages are fetched lazily as the stream is polled. The stream ends
    /// after the first page with `has_next == false`, or after the first
    /// error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Self>> + 'c
    where
        T: 'c,
    {
        stream::try_unfold(Cursor::Ready(self), |cursor| async move {
            let page = match cursor {
                Cursor::Ready(page) => page,
                Cursor::Fetch(transport, request) => fetch_page(transport, request).await?,
                Cursor::Done => return Ok(None),
            };
            let following = if page.has_next() {
                Cursor::Fetch(page.transport, page.next_request.clone())
            } else {
                Cursor::Done
            };
            Ok::<_, OneApiError>(Some((page, following)))
        })
    }
}

/// Stream state for [`Page::into_stream`].
enum Cursor<'c, C, T> {
    /// Already fetched, yield next.
    Ready(Page<'c, C, T>),
    /// Fetch this request, then yield it.
    Fetch(&'c C, PageRequest),
    /// Last page was yielded.
    Done,
}

/// Fetches one page and prepares the request for the page after it.
///
/// The filter is passed as the raw query fragment; `limit`, `page` and
/// `sort` are encoded. The next request is this request with `page` set to
/// the server's page number plus one.
///
/// # Errors
///
/// Returns an error if the request fails.
#[instrument(skip_all, fields(path = request.path(), page = request.page()))]
pub async fn fetch_page<'c, C, T>(
    transport: &'c C,
    request: PageRequest,
) -> Result<Page<'c, C, T>>
where
    C: LocalTransport + Sync,
    T: DeserializeOwned + Send,
{
    let params = request.params();
    let query = params.query_pairs();
    let envelope: Envelope<T> = transport
        .get_envelope(request.path(), params.raw_filter(), &query)
        .await?;

    let has_next = envelope.has_next();
    let next_request = request.with_page(envelope.page.saturating_add(1));

    tracing::debug!(
        page = envelope.page,
        pages = envelope.pages,
        fetched = envelope.docs.len(),
        has_next,
        "page fetched"
    );

    Ok(Page {
        transport,
        items: envelope.docs,
        total: envelope.total,
        limit: envelope.limit,
        offset: envelope.offset,
        page_number: envelope.page,
        pages: envelope.pages,
        request,
        next_request,
    })
}

/// Fetches `request` and every following page, concatenating the documents.
///
/// # Errors
///
/// Returns the first error encountered; documents fetched before it are
/// discarded.
#[instrument(skip_all, fields(path = request.path()))]
pub async fn collect_all<C, T>(transport: &C, request: PageRequest) -> Result<Vec<T>>
where
    C: LocalTransport + Sync,
    T: DeserializeOwned + Send,
{
    let first = fetch_page(transport, request).await?;
    first
        .into_stream()
        .try_fold(Vec::new(), |mut all, page| async move {
            tracing::info!(
                page = page.page_number(),
                pages = page.pages(),
                fetched = page.items().len(),
                "page completed"
            );
            all.extend(page.into_items());
            Ok(all)
        })
        .await
}
