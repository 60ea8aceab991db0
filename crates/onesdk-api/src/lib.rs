//! Client library for The One API (`https://the-one-api.dev/v2`).
//!
//! Fetches single documents by ID and walks paginated collections of
//! books, movies, characters, quotes and chapters. A raw filter string is
//! passed to the server unencoded; every other error condition surfaces as
//! an [`OneApiError`].

mod api;
mod client;
mod endpoints;
mod envelope;
mod error;
mod lookup;
mod pagination;
mod params;
mod types;

pub use api::{LocalTransport, Transport};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, OneApiClient, OneApiClientBuilder};
pub use endpoints::{
    BOOK_PATH, CHAPTER_PATH, CHARACTER_PATH, ClientPage, MOVIE_PATH, QUOTE_PATH,
};
pub use envelope::Envelope;
#[allow(clippy::module_name_repetitions)]
pub use error::{OneApiError, Result};
pub use lookup::fetch_one;
pub use pagination::{Page, PageRequest, collect_all, fetch_page};
pub use params::{DEFAULT_PAGE, PaginatedParams};
pub use types::{Book, Chapter, Character, Movie, Quote};
