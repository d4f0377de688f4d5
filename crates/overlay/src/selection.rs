use pages::records::PageId;

use crate::store::MarkerStore;

/// Single-selection mirror between a clicked marker and the detail panel.
///
/// Invariant: a selected id always references a record currently in the
/// store. `select` refuses unknown ids and `revalidate` drops a selection
/// whose record left the collection.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SingleSelection {
    current: Option<PageId>,
}

impl SingleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<PageId> {
        self.current
    }

    pub fn is_selected(&self, id: PageId) -> bool {
        self.current == Some(id)
    }

    /// Selects `id` if the store holds it.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, store: &MarkerStore, id: PageId) -> bool {
        if !store.contains(id) || self.current == Some(id) {
            return false;
        }
        self.current = Some(id);
        true
    }

    /// Returns `true` if there was a selection to clear.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Drops a selection whose id is no longer in the store.
    ///
    /// Returns `true` if the selection was cleared.
    pub fn revalidate(&mut self, store: &MarkerStore) -> bool {
        match self.current {
            Some(id) if !store.contains(id) => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use foundation::geo::GeoPoint;
    use pages::records::{PageId, PageRecord};

    use super::SingleSelection;
    use crate::store::MarkerStore;

    fn records(ids: &[u64]) -> Vec<PageRecord> {
        ids.iter()
            .map(|id| PageRecord {
                id: PageId(*id),
                title: format!("Article {id}"),
                position: GeoPoint::new(45.75, 21.22),
                views: 0,
                thumbnail: None,
            })
            .collect()
    }

    fn store_with(ids: &[u64]) -> MarkerStore {
        let mut store = MarkerStore::new();
        store.replace(records(ids));
        store
    }

    #[test]
    fn select_requires_membership() {
        let store = store_with(&[1, 2]);
        let mut sel = SingleSelection::new();

        assert!(!sel.select(&store, PageId(99)));
        assert_eq!(sel.selected(), None);

        assert!(sel.select(&store, PageId(2)));
        assert!(sel.is_selected(PageId(2)));
        assert!(!sel.select(&store, PageId(2)));
    }

    #[test]
    fn clear_reports_whether_something_was_selected() {
        let store = store_with(&[1]);
        let mut sel = SingleSelection::new();
        assert!(!sel.clear());
        sel.select(&store, PageId(1));
        assert!(sel.clear());
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn revalidate_drops_ids_that_left_the_store() {
        let mut store = store_with(&[1, 2]);
        let mut sel = SingleSelection::new();
        sel.select(&store, PageId(1));

        store.replace(records(&[3, 4]));
        assert!(sel.revalidate(&store));
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn revalidate_keeps_ids_that_survive_replacement() {
        let mut store = store_with(&[1, 2]);
        let mut sel = SingleSelection::new();
        sel.select(&store, PageId(2));

        store.replace(records(&[2, 3]));
        assert!(!sel.revalidate(&store));
        assert_eq!(sel.selected(), Some(PageId(2)));
    }
}
