use std::collections::BTreeMap;

use pages::records::{PageId, PageRecord};

/// Markers for the current search result set.
///
/// Records keep their response order for iteration; lookups go through an
/// id index. The whole set is swapped out on each committed search.
#[derive(Debug, Default)]
pub struct MarkerStore {
    records: Vec<PageRecord>,
    by_id: BTreeMap<PageId, usize>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the result set.
    ///
    /// Duplicate ids keep the first occurrence.
    pub fn replace(&mut self, records: Vec<PageRecord>) {
        self.records.clear();
        self.by_id.clear();
        for record in records {
            if self.by_id.contains_key(&record.id) {
                continue;
            }
            self.by_id.insert(record.id, self.records.len());
            self.records.push(record);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn get(&self, id: PageId) -> Option<&PageRecord> {
        self.by_id.get(&id).map(|idx| &self.records[*idx])
    }

    /// Iterates records in response order.
    pub fn iter(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.iter()
    }
}
