use std::collections::BTreeMap;

use crate::records::{PageId, PageSummary, Thumbnail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    Decode(String),
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::Decode(msg) => write!(f, "response decode failed: {msg}"),
        }
    }
}

impl std::error::Error for WireError {}

/// Decodes the `GET /api/v1/pages` response: an array of page summaries.
pub fn decode_pages(json: &str) -> Result<Vec<PageSummary>, WireError> {
    serde_json::from_str(json).map_err(|e| WireError::Decode(e.to_string()))
}

/// Decodes the `GET /api/v1/pages/views` response: id → monthly view count.
pub fn decode_views(json: &str) -> Result<BTreeMap<PageId, u64>, WireError> {
    serde_json::from_str(json).map_err(|e| WireError::Decode(e.to_string()))
}

/// Decodes the `GET /api/v1/pages/thumbnails` response: id → thumbnail.
pub fn decode_thumbnails(json: &str) -> Result<BTreeMap<PageId, Thumbnail>, WireError> {
    serde_json::from_str(json).map_err(|e| WireError::Decode(e.to_string()))
}
