use std::collections::BTreeMap;

use foundation::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// Numeric article identifier.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wire shape of one element of `GET /api/v1/pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub pageid: PageId,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
}

/// Wire shape of one `GET /api/v1/pages/thumbnails` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Enriched record held for the lifetime of one search result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub id: PageId,
    pub title: String,
    pub position: GeoPoint,
    pub views: u64,
    pub thumbnail: Option<Thumbnail>,
}

impl PageRecord {
    /// A bare record straight off the pages endpoint: no views, no thumbnail.
    pub fn from_summary(summary: PageSummary) -> Self {
        Self {
            id: summary.pageid,
            title: summary.title,
            position: GeoPoint::new(summary.lat, summary.lon),
            views: 0,
            thumbnail: None,
        }
    }
}

/// Merges the views lookup into `records`; ids missing from the lookup get 0.
pub fn apply_views(records: &mut [PageRecord], views: &BTreeMap<PageId, u64>) {
    for record in records.iter_mut() {
        record.views = views.get(&record.id).copied().unwrap_or(0);
    }
}

/// Merges the thumbnails lookup into `records`; ids missing from the lookup
/// keep no thumbnail.
pub fn apply_thumbnails(records: &mut [PageRecord], thumbnails: &BTreeMap<PageId, Thumbnail>) {
    for record in records.iter_mut() {
        record.thumbnail = thumbnails.get(&record.id).cloned();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::{PageId, PageRecord, PageSummary, Thumbnail, apply_thumbnails, apply_views};

    fn summary(id: u64) -> PageSummary {
        PageSummary {
            pageid: PageId(id),
            title: format!("Article {id}"),
            lat: 45.75,
            lon: 21.22,
        }
    }

    #[test]
    fn from_summary_starts_unenriched() {
        let record = PageRecord::from_summary(summary(7));
        assert_eq!(record.id, PageId(7));
        assert_eq!(record.views, 0);
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.position.lat_deg, 45.75);
    }

    #[test]
    fn apply_views_defaults_missing_ids_to_zero() {
        let mut records = vec![
            PageRecord::from_summary(summary(1)),
            PageRecord::from_summary(summary(2)),
        ];
        let views = BTreeMap::from([(PageId(1), 1234)]);
        apply_views(&mut records, &views);
        assert_eq!(records[0].views, 1234);
        assert_eq!(records[1].views, 0);
    }

    #[test]
    fn apply_thumbnails_leaves_missing_ids_bare() {
        let mut records = vec![
            PageRecord::from_summary(summary(1)),
            PageRecord::from_summary(summary(2)),
        ];
        let thumb = Thumbnail {
            source: "https://example.org/a.jpg".to_string(),
            width: 200,
            height: 133,
        };
        let thumbnails = BTreeMap::from([(PageId(2), thumb.clone())]);
        apply_thumbnails(&mut records, &thumbnails);
        assert_eq!(records[0].thumbnail, None);
        assert_eq!(records[1].thumbnail, Some(thumb));
    }
}
