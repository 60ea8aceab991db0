//! `OneApiClient` - The One API HTTP transport.

use std::fmt;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::api::LocalTransport;
use crate::envelope::Envelope;
use crate::error::{OneApiError, Result};

/// Default base URL for The One API v2.
pub const DEFAULT_BASE_URL: &str = "https://the-one-api.dev/v2/";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The One API client.
///
/// Immutable after construction. The bearer token lives in the HTTP
/// client's default headers, so cloning is cheap and clones share the
/// connection pool.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct OneApiClient {
    /// HTTP client (Authorization header preset).
    http_client: Client,
    /// Base URL for API requests, always ending in `/`.
    base_url: Url,
}

/// Builder for `OneApiClient`.
#[allow(clippy::module_name_repetitions)]
pub struct OneApiClientBuilder {
    api_token: String,
    base_url: Option<Url>,
    user_agent: Option<String>,
}

impl fmt::Debug for OneApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneApiClientBuilder")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl OneApiClientBuilder {
    /// Creates a new builder.
    const fn new(api_token: String) -> Self {
        Self {
            api_token,
            base_url: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    ///
    /// A trailing `/` is added when missing so that resource paths are
    /// appended rather than replacing the last segment.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (default: `onesdk-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// The token itself is not checked; a bad token surfaces as
    /// [`OneApiError::Auth`] on the first request.
    ///
    /// # Errors
    ///
    /// - The token contains characters not allowed in a header.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OneApiClient> {
        let base_url = if let Some(url) = self.base_url {
            with_trailing_slash(url)
        } else {
            Url::parse(DEFAULT_BASE_URL).map_err(|source| OneApiError::InvalidUrl {
                path: String::from(DEFAULT_BASE_URL),
                source,
            })?
        };

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_token))
            .map_err(OneApiError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()?;

        Ok(OneApiClient {
            http_client,
            base_url,
        })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl OneApiClient {
    /// Creates a client for the public API with the given token.
    ///
    /// # Errors
    ///
    /// See [`OneApiClientBuilder::build`].
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::builder(api_token).build()
    }

    /// Creates a new builder.
    #[must_use]
    pub fn builder(api_token: impl Into<String>) -> OneApiClientBuilder {
        OneApiClientBuilder::new(api_token.into())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the request URL: raw fragment right after `?`, encoded pairs
    /// after it.
    fn request_url(&self, path: &str, raw_query: Option<&str>) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| OneApiError::InvalidUrl {
                path: String::from(path),
                source,
            })?;
        url.set_query(raw_query);
        Ok(url)
    }
}

impl LocalTransport for OneApiClient {
    /// Sends one GET; no retries.
    #[instrument(skip_all, fields(path = path))]
    async fn get_envelope<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        raw_query: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>> {
        let url = self.request_url(path, raw_query)?;
        let request = self.http_client.get(url).query(query).build()?;

        tracing::debug!(url = %request.url(), "The One API request");

        let response = self.http_client.execute(request).await?;
        let status = response.status();

        tracing::debug!(status = status.as_u16(), "The One API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OneApiError::from_status(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| OneApiError::Decode {
            path: String::from(path),
            source,
        })
    }
}
