//! `Transport` trait definition.
#![allow(clippy::future_not_send)]

use serde::de::DeserializeOwned;

use crate::envelope::Envelope;
use crate::error::Result;

/// One round trip to The One API.
///
/// Abstracts the HTTP layer for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Sends one GET for `path` and decodes the response envelope.
    ///
    /// `raw_query` is placed right after `?` without encoding; `query` pairs
    /// are form-encoded and appended after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a valid envelope.
    async fn get_envelope<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        raw_query: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>>;
}
