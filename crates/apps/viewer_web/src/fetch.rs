//! gloo-net driver for the three pages endpoints.

use std::collections::BTreeMap;

use gloo_net::http::Request;

use foundation::geo::GeoBounds;
use pages::decode::{decode_pages, decode_thumbnails, decode_views};
use pages::endpoints::ApiBase;
use pages::records::{PageId, PageSummary, Thumbnail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Http(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(msg) => write!(f, "request failed: {msg}"),
            FetchError::Status(code) => write!(f, "unexpected status: {code}"),
            FetchError::Decode(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

async fn get_text(url: &str) -> Result<String, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Http(e.to_string()))?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }
    response
        .text()
        .await
        .map_err(|e| FetchError::Http(e.to_string()))
}

pub async fn fetch_pages(
    api: &ApiBase,
    bounds: &GeoBounds,
) -> Result<Vec<PageSummary>, FetchError> {
    let text = get_text(&api.pages_url(bounds)).await?;
    decode_pages(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

pub async fn fetch_views(
    api: &ApiBase,
    ids: &[PageId],
) -> Result<BTreeMap<PageId, u64>, FetchError> {
    let text = get_text(&api.views_url(ids)).await?;
    decode_views(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

pub async fn fetch_thumbnails(
    api: &ApiBase,
    ids: &[PageId],
    width: u32,
) -> Result<BTreeMap<PageId, Thumbnail>, FetchError> {
    let text = get_text(&api.thumbnails_url(ids, width)).await?;
    decode_thumbnails(&text).map_err(|e| FetchError::Decode(e.to_string()))
}
