//! Client side of the favorites system.
//!
//! Everything a front end needs to stay in sync with the service: a
//! favorites client that falls back to a local cache, an auth client, a
//! reducer-driven state store with effects and selectors, and a debounced
//! favorite toggle.

pub mod auth;
pub mod favorites;
pub mod storage;
pub mod store;
pub mod toggle;

use anyhow::anyhow;
use reqwest::{Response, Url};
use serde::Deserialize;
use thiserror::Error;

/// Default API root the client talks to.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// A non-2xx answer from the service.
///
/// Displays as the server's own message so it can be shown to users as is.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Passes 2xx responses through and turns anything else into [`ApiError`].
pub(crate) async fn expect_success(response: Response) -> anyhow::Result<Response> {
    // ---
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    Err(ApiError {
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Parses the API root, e.g. `http://localhost:3000/api`.
pub(crate) fn parse_api_root(base_url: &str) -> anyhow::Result<Url> {
    // ---
    let url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("{url} cannot be used as an API root"));
    }
    Ok(url)
}

/// Joins path segments onto the API root, percent-encoding each one.
pub(crate) fn endpoint(root: &Url, segments: &[&str]) -> Url {
    // ---
    let mut url = root.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
