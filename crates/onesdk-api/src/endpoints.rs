//! Per-entity bindings of The One API resource paths.

use crate::client::OneApiClient;
use crate::error::Result;
use crate::lookup::fetch_one;
use crate::pagination::{Page, PageRequest, fetch_page};
use crate::params::PaginatedParams;
use crate::types::{Book, Chapter, Character, Movie, Quote};

/// `/book`
pub const BOOK_PATH: &str = "/book";
/// `/movie`
pub const MOVIE_PATH: &str = "/movie";
/// `/character`
pub const CHARACTER_PATH: &str = "/character";
/// `/quote`
pub const QUOTE_PATH: &str = "/quote";
/// `/chapter`
pub const CHAPTER_PATH: &str = "/chapter";

/// A page of documents fetched through [`OneApiClient`].
pub type ClientPage<'c, T> = Page<'c, OneApiClient, T>;

impl OneApiClient {
    /// Fetches a book by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no book is returned.
    pub async fn book(&self, id: &str) -> Result<Book> {
        fetch_one(self, BOOK_PATH, id).await
    }

    /// Fetches a movie by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no movie is returned.
    pub async fn movie(&self, id: &str) -> Result<Movie> {
        fetch_one(self, MOVIE_PATH, id).await
    }

    /// Fetches a character by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no character is returned.
    pub async fn character(&self, id: &str) -> Result<Character> {
        fetch_one(self, CHARACTER_PATH, id).await
    }

    /// Fetches a quote by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no quote is returned.
    pub async fn quote(&self, id: &str) -> Result<Quote> {
        fetch_one(self, QUOTE_PATH, id).await
    }

    /// Fetches a chapter by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no chapter is returned.
    pub async fn chapter(&self, id: &str) -> Result<Chapter> {
        fetch_one(self, CHAPTER_PATH, id).await
    }

    /// Lists books.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn books(&self, params: &PaginatedParams) -> Result<ClientPage<'_, Book>> {
        fetch_page(self, PageRequest::new(BOOK_PATH, params)).await
    }

    /// Lists the chapters of a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn book_chapters(
        &self,
        book_id: &str,
        params: &PaginatedParams,
    ) -> Result<ClientPage<'_, Chapter>> {
        let path = format!("{BOOK_PATH}/{book_id}{CHAPTER_PATH}");
        fetch_page(self, PageRequest::new(path, params)).await
    }

    /// Lists movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn movies(&self, params: &PaginatedParams) -> Result<ClientPage<'_, Movie>> {
        fetch_page(self, PageRequest::new(MOVIE_PATH, params)).await
    }

    /// Lists the quotes of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn movie_quotes(
        &self,
        movie_id: &str,
        params: &PaginatedParams,
    ) -> Result<ClientPage<'_, Quote>> {
        let path = format!("{MOVIE_PATH}/{movie_id}{QUOTE_PATH}");
        fetch_page(self, PageRequest::new(path, params)).await
    }

    /// Lists characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn characters(&self, params: &PaginatedParams) -> Result<ClientPage<'_, Character>> {
        fetch_page(self, PageRequest::new(CHARACTER_PATH, params)).await
    }

    /// Lists the quotes of a character.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn character_quotes(
        &self,
        character_id: &str,
        params: &PaginatedParams,
    ) -> Result<ClientPage<'_, Quote>> {
        let path = format!("{CHARACTER_PATH}/{character_id}{QUOTE_PATH}");
        fetch_page(self, PageRequest::new(path, params)).await
    }

    /// Lists quotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn quotes(&self, params: &PaginatedParams) -> Result<ClientPage<'_, Quote>> {
        fetch_page(self, PageRequest::new(QUOTE_PATH, params)).await
    }

    /// Lists chapters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn chapters(&self, params: &PaginatedParams) -> Result<ClientPage<'_, Chapter>> {
        fetch_page(self, PageRequest::new(CHAPTER_PATH, params)).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::OneApiError;

    fn client_for(server: &MockServer) -> OneApiClient {
        let base_url = format!("{}/v2/", server.uri());
        OneApiClient::builder("test-token")
            .base_url(base_url.parse().unwrap())
            .build()
            .unwrap()
    }

    async fn mount_page(server: &MockServer, route: &str, page: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_movie_returns_single_doc_unchanged() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../fixtures/one_api/movie_single.json");
        Mock::given(method("GET"))
            .and(path("/v2/movie/5cd95395de30eff6ebccde5c"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;
        let expected: crate::envelope::Envelope<Movie> = serde_json::from_str(json_body).unwrap();

        // Act
        let movie = client_for(&mock_server)
            .movie("5cd95395de30eff6ebccde5c")
            .await
            .unwrap();

        // Assert
        assert_eq!(movie, expected.docs[0]);
        assert_eq!(movie.name, "The Fellowship of the Ring");
    }

    #[tokio::test]
    async fn test_movies_page_by_page_through_next() {
        // Arrange
        let mock_server = MockServer::start().await;
        let route = "/v2/movie";
        let bodies = [
            include_str!("../../../fixtures/one_api/movies_page1.json"),
            include_str!("../../../fixtures/one_api/movies_page2.json"),
            include_str!("../../../fixtures/one_api/movies_page3.json"),
        ];
        for (page, body) in ["1", "2", "3"].into_iter().zip(bodies) {
            mount_page(&mock_server, route, page, body).await;
        }
        let client = client_for(&mock_server);

        // Act
        let page1 = client.movies(&PaginatedParams::new().limit(1)).await.unwrap();
        let page2 = page1.next().await.unwrap();
        let page3 = page2.next().await.unwrap();

        // Assert
        assert_eq!(page1.items()[0].name, "The Lord of the Rings Series");
        assert!(page1.has_next());
        assert_eq!(page2.items()[0].name, "The Hobbit Series");
        assert!(page2.has_next());
        assert_eq!(page3.items()[0].name, "The Unexpected Journey");
        assert!(!page3.has_next());
        for request in mock_server.received_requests().await.unwrap() {
            assert!(request.url.query().unwrap().contains("limit=1"));
        }
    }

    #[tokio::test]
    async fn test_movies_started_mid_collection_continue_with_next_page() {
        // Arrange
        let mock_server = MockServer::start().await;
        let route = "/v2/movie";
        mount_page(
            &mock_server,
            route,
            "2",
            include_str!("../../../fixtures/one_api/movies_page2.json"),
        )
        .await;
        mount_page(
            &mock_server,
            route,
            "3",
            include_str!("../../../fixtures/one_api/movies_page3.json"),
        )
        .await;
        let client = client_for(&mock_server);

        // Act
        let page2 = client
            .movies(&PaginatedParams::new().limit(1).page(2))
            .await
            .unwrap();
        let page3 = page2.next().await.unwrap();

        // Assert
        assert_eq!(page2.page_number(), 2);
        assert_eq!(page3.items()[0].name, "The Unexpected Journey");
        assert!(!page3.has_next());
        let queries: Vec<String> = mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| String::from(r.url.query().unwrap()))
            .collect();
        assert_eq!(queries, vec!["limit=1&page=2", "limit=1&page=3"]);
    }

    #[tokio::test]
    async fn test_movie_quotes_uses_nested_path() {
        // Arrange
        let mock_server = MockServer::start().await;
        mount_page(
            &mock_server,
            "/v2/movie/5cd95395de30eff6ebccde5c/quote",
            "1",
            include_str!("../../../fixtures/one_api/movie_quotes.json"),
        )
        .await;

        // Act
        let client = client_for(&mock_server);
        let page = client
            .movie_quotes("5cd95395de30eff6ebccde5c", &PaginatedParams::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.items()[1].character, "5cd99d4bde30eff6ebccfbe6");
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn test_book_chapters_uses_nested_path() {
        // Arrange
        let mock_server = MockServer::start().await;
        mount_page(
            &mock_server,
            "/v2/book/5cf5805fb53e011a64671582/chapter",
            "1",
            include_str!("../../../fixtures/one_api/book_chapters.json"),
        )
        .await;

        // Act
        let client = client_for(&mock_server);
        let page = client
            .book_chapters("5cf5805fb53e011a64671582", &PaginatedParams::new().limit(2))
            .await
            .unwrap();

        // Assert
        assert_eq!(page.items()[0].chapter_name, "A Long-expected Party");
        assert_eq!(page.pages(), 11);
        assert_eq!(page.next_request().page(), 2);
    }

    #[tokio::test]
    async fn test_character_quotes_filter_is_raw() {
        // Arrange
        let mock_server = MockServer::start().await;
        mount_page(
            &mock_server,
            "/v2/character/5cd99d4bde30eff6ebccfbe6/quote",
            "1",
            include_str!("../../../fixtures/one_api/movie_quotes.json"),
        )
        .await;
        let params = PaginatedParams::new()
            .limit(1)
            .filter("movie=5cd95395de30eff6ebccde5c");

        // Act
        client_for(&mock_server)
            .character_quotes("5cd99d4bde30eff6ebccfbe6", &params)
            .await
            .unwrap();

        // Assert
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(
            requests[0].url.query(),
            Some("movie=5cd95395de30eff6ebccde5c&limit=1&page=1")
        );
    }

    #[tokio::test]
    async fn test_books_and_character_bindings() {
        // Arrange
        let mock_server = MockServer::start().await;
        mount_page(
            &mock_server,
            "/v2/book",
            "1",
            include_str!("../../../fixtures/one_api/books_page1.json"),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/v2/character/5cd99d4bde30eff6ebccfbe6"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/one_api/character_single.json"
            )))
            .mount(&mock_server)
            .await;
        let client = client_for(&mock_server);

        // Act
        let books = client.books(&PaginatedParams::new().limit(2)).await.unwrap();
        let aragorn = client.character("5cd99d4bde30eff6ebccfbe6").await.unwrap();

        // Assert
        assert_eq!(books.items()[1].name, "The Two Towers");
        assert_eq!(books.total(), 3);
        assert!(books.has_next());
        assert_eq!(aragorn.spouse.as_deref(), Some("Arwen"));
    }

    #[tokio::test]
    async fn test_every_list_binding_hits_its_path() {
        // Arrange
        let mock_server = MockServer::start().await;
        let empty = r#"{"docs":[],"total":0,"limit":1000,"offset":0,"page":1,"pages":0}"#;
        for route in ["/v2/quote", "/v2/chapter", "/v2/character"] {
            mount_page(&mock_server, route, "1", empty).await;
        }
        let client = client_for(&mock_server);
        let params = PaginatedParams::new();

        // Act
        let quotes = client.quotes(&params).await.unwrap();
        let chapters = client.chapters(&params).await.unwrap();
        let characters = client.characters(&params).await.unwrap();

        // Assert
        assert!(quotes.items().is_empty() && !quotes.has_next());
        assert!(chapters.items().is_empty() && !chapters.has_next());
        assert!(characters.items().is_empty() && !characters.has_next());
    }

    #[tokio::test]
    async fn test_single_bindings_map_empty_docs_to_not_found() {
        // Arrange
        let mock_server = MockServer::start().await;
        let empty = r#"{"docs":[],"total":0,"limit":1000,"offset":0,"page":1,"pages":1}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(empty))
            .mount(&mock_server)
            .await;
        let client = client_for(&mock_server);

        // Act
        let book = client.book("nope").await;
        let quote = client.quote("nope").await;
        let chapter = client.chapter("nope").await;

        // Assert
        assert!(matches!(book, Err(OneApiError::NotFound { ref path }) if path == "/book/nope"));
        assert!(matches!(quote, Err(OneApiError::NotFound { ref path }) if path == "/quote/nope"));
        assert!(
            matches!(chapter, Err(OneApiError::NotFound { ref path }) if path == "/chapter/nope")
        );
    }

    #[tokio::test]
    async fn test_status_classification_is_shared_by_all_bindings() {
        // Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/movie/movieId"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/movie"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/movie/movieId/quote"))
            .respond_with(ResponseTemplate::new(555))
            .mount(&mock_server)
            .await;
        let client = client_for(&mock_server);
        let params = PaginatedParams::new();

        // Act
        let single = client.movie("movieId").await;
        let list = client.movies(&params).await;
        let nested = client.movie_quotes("movieId", &params).await;

        // Assert
        assert!(single.unwrap_err().is_auth());
        assert!(list.unwrap_err().is_rate_limited());
        match nested.unwrap_err() {
            OneApiError::Remote { status, .. } => assert_eq!(status.as_u16(), 555),
            other => panic!("unexpected error: {other}"),
        }
    }
}
