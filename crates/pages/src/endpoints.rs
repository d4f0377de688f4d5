use foundation::geo::GeoBounds;

use crate::records::PageId;

/// Base URL of the pages gateway, e.g. `http://localhost:9876`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    base_url: String,
}

impl ApiBase {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/v1/pages?bbox=<N|W|S|E>`
    pub fn pages_url(&self, bounds: &GeoBounds) -> String {
        format!("{}/api/v1/pages?bbox={}", self.base_url, bounds.bbox_param())
    }

    /// `GET /api/v1/pages/views?ids=<csv>`
    pub fn views_url(&self, ids: &[PageId]) -> String {
        format!("{}/api/v1/pages/views?ids={}", self.base_url, ids_csv(ids))
    }

    /// `GET /api/v1/pages/thumbnails?ids=<csv>&width=<n>`
    pub fn thumbnails_url(&self, ids: &[PageId], width: u32) -> String {
        format!(
            "{}/api/v1/pages/thumbnails?ids={}&width={}",
            self.base_url,
            ids_csv(ids),
            width
        )
    }
}

pub fn ids_csv(ids: &[PageId]) -> String {
    let mut out = String::new();
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&id.to_string());
    }
    out
}
