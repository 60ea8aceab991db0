//! Single-document lookup by ID.
#![allow(clippy::future_not_send)]

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::api::LocalTransport;
use crate::envelope::Envelope;
use crate::error::{OneApiError, Result};

/// Fetches `{path}/{id}` and returns its only document.
///
/// The ID is not validated; whatever the server answers for a malformed ID
/// is passed through.
///
/// # Errors
///
/// Returns [`OneApiError::NotFound`] when the envelope holds no document,
/// or any transport error.
#[instrument(skip_all, fields(path = path, id = id))]
pub async fn fetch_one<C, T>(transport: &C, path: &str, id: &str) -> Result<T>
where
    C: LocalTransport + Sync,
    T: DeserializeOwned + Send,
{
    let item_path = format!("{}/{id}", path.trim_end_matches('/'));
    let envelope: Envelope<T> = transport.get_envelope(&item_path, None, &[]).await?;
    envelope
        .docs
        .into_iter()
        .next()
        .ok_or(OneApiError::NotFound { path: item_path })
}
