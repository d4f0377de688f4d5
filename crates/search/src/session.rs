use std::collections::BTreeMap;

use foundation::geo::GeoBounds;
use pages::records::{
    PageId, PageRecord, PageSummary, Thumbnail, apply_thumbnails, apply_views,
};

use crate::counters::SearchCounters;
use crate::gate::{GateState, SearchGate};

/// Identifies one search attempt; responses carry it back so a superseded
/// search cannot overwrite a newer one's result set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// A network request the driver must perform next.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchCommand {
    Pages {
        generation: Generation,
        bounds: GeoBounds,
    },
    Views {
        generation: Generation,
        ids: Vec<PageId>,
    },
    Thumbnails {
        generation: Generation,
        ids: Vec<PageId>,
        width: u32,
    },
}

/// A fetch outcome as seen by the session.
///
/// The driver logs the concrete failure; the session only needs to know
/// that the payload is missing.
pub type FetchResult<T> = Result<T, FetchFailed>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FetchFailed;

#[derive(Debug, Clone, PartialEq)]
pub enum BeginError {
    ZoomTooLow { zoom: f64, zoom_begin: f64 },
    SearchInFlight,
}

impl std::fmt::Display for BeginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeginError::ZoomTooLow { zoom, zoom_begin } => {
                write!(f, "zoom {zoom} below search threshold {zoom_begin}")
            }
            BeginError::SearchInFlight => write!(f, "a search is already in flight"),
        }
    }
}

impl std::error::Error for BeginError {}

/// Outcome of feeding one response into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Drive the next fetch.
    Continue(FetchCommand),
    /// The result set is complete; replace the markers with it.
    Commit(Vec<PageRecord>),
    /// The response belonged to a superseded search; drop it.
    Stale,
    /// The base fetch failed; the previous marker set is kept.
    Failed,
}

/// Sans-IO search workflow: base fetch, then views, then thumbnails.
///
/// `begin` hands out the first command; the driver performs it and feeds
/// the outcome back, looping on `Step::Continue` until the session
/// commits or fails. All state transitions happen here so the workflow
/// is testable without a network.
#[derive(Debug)]
pub struct SearchSession {
    gate: SearchGate,
    thumb_width: u32,
    counters: SearchCounters,
    next_generation: u64,
    in_flight: Option<InFlight>,
}

#[derive(Debug)]
struct InFlight {
    generation: Generation,
    records: Vec<PageRecord>,
}

impl SearchSession {
    pub fn new(zoom_begin: f64, thumb_width: u32) -> Self {
        Self {
            gate: SearchGate::new(zoom_begin),
            thumb_width,
            counters: SearchCounters::new(),
            next_generation: 0,
            in_flight: None,
        }
    }

    pub fn gate_state(&self, zoom: f64) -> GateState {
        self.gate.state(zoom)
    }

    pub fn counters(&self) -> &SearchCounters {
        &self.counters
    }

    /// Starts a search over `bounds` if the gate allows it at `zoom`.
    pub fn begin(&mut self, bounds: GeoBounds, zoom: f64) -> Result<FetchCommand, BeginError> {
        match self.gate.state(zoom) {
            GateState::Searching => Err(BeginError::SearchInFlight),
            GateState::BelowZoom => Err(BeginError::ZoomTooLow {
                zoom,
                zoom_begin: self.gate.zoom_begin(),
            }),
            GateState::Ready => {
                self.next_generation += 1;
                let generation = Generation(self.next_generation);
                self.gate.set_searching(true);
                self.in_flight = Some(InFlight {
                    generation,
                    records: Vec::new(),
                });
                self.counters.searches_started += 1;
                Ok(FetchCommand::Pages { generation, bounds })
            }
        }
    }

    pub fn on_pages(
        &mut self,
        generation: Generation,
        outcome: FetchResult<Vec<PageSummary>>,
    ) -> Step {
        if !self.is_current(generation) {
            self.counters.stale_responses += 1;
            return Step::Stale;
        }

        match outcome {
            Err(FetchFailed) => {
                self.counters.fetch_failures += 1;
                self.counters.searches_failed += 1;
                self.finish();
                Step::Failed
            }
            Ok(summaries) if summaries.is_empty() => {
                self.counters.searches_committed += 1;
                self.finish();
                Step::Commit(Vec::new())
            }
            Ok(summaries) => {
                let records: Vec<PageRecord> =
                    summaries.into_iter().map(PageRecord::from_summary).collect();
                let ids: Vec<PageId> = records.iter().map(|r| r.id).collect();
                if let Some(in_flight) = self.in_flight.as_mut() {
                    in_flight.records = records;
                }
                Step::Continue(FetchCommand::Views { generation, ids })
            }
        }
    }

    /// A views failure degrades to zero counts; the search continues.
    pub fn on_views(
        &mut self,
        generation: Generation,
        outcome: FetchResult<BTreeMap<PageId, u64>>,
    ) -> Step {
        if !self.is_current(generation) {
            self.counters.stale_responses += 1;
            return Step::Stale;
        }

        let views = match outcome {
            Ok(views) => views,
            Err(FetchFailed) => {
                self.counters.fetch_failures += 1;
                BTreeMap::new()
            }
        };

        let width = self.thumb_width;
        let Some(in_flight) = self.in_flight.as_mut() else {
            return Step::Stale;
        };
        apply_views(&mut in_flight.records, &views);
        let ids: Vec<PageId> = in_flight.records.iter().map(|r| r.id).collect();
        Step::Continue(FetchCommand::Thumbnails {
            generation,
            ids,
            width,
        })
    }

    /// A thumbnails failure commits the records without thumbnails.
    pub fn on_thumbnails(
        &mut self,
        generation: Generation,
        outcome: FetchResult<BTreeMap<PageId, Thumbnail>>,
    ) -> Step {
        if !self.is_current(generation) {
            self.counters.stale_responses += 1;
            return Step::Stale;
        }

        let thumbnails = match outcome {
            Ok(thumbnails) => thumbnails,
            Err(FetchFailed) => {
                self.counters.fetch_failures += 1;
                BTreeMap::new()
            }
        };

        let Some(mut in_flight) = self.in_flight.take() else {
            return Step::Stale;
        };
        apply_thumbnails(&mut in_flight.records, &thumbnails);
        self.gate.set_searching(false);
        self.counters.searches_committed += 1;
        Step::Commit(in_flight.records)
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
    }

    fn finish(&mut self) {
        self.in_flight = None;
        self.gate.set_searching(false);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use foundation::geo::GeoBounds;
    use pages::records::{PageId, PageSummary, Thumbnail};

    use super::{BeginError, FetchCommand, FetchFailed, SearchSession, Step};
    use crate::gate::GateState;

    fn bounds() -> GeoBounds {
        GeoBounds::new(45.8, 21.1, 45.7, 21.3)
    }

    fn summary(id: u64) -> PageSummary {
        PageSummary {
            pageid: PageId(id),
            title: format!("Article {id}"),
            lat: 45.75,
            lon: 21.22,
        }
    }

    fn session() -> SearchSession {
        SearchSession::new(15.0, 200)
    }

    #[test]
    fn begin_is_refused_below_the_zoom_threshold() {
        let mut s = session();
        match s.begin(bounds(), 14.0) {
            Err(BeginError::ZoomTooLow { zoom_begin, .. }) => assert_eq!(zoom_begin, 15.0),
            other => panic!("expected ZoomTooLow, got {other:?}"),
        }
    }

    #[test]
    fn begin_is_refused_while_a_search_is_in_flight() {
        let mut s = session();
        s.begin(bounds(), 16.0).expect("first begin");
        assert_eq!(s.begin(bounds(), 16.0), Err(BeginError::SearchInFlight));
        assert_eq!(s.gate_state(16.0), GateState::Searching);
    }

    #[test]
    fn full_search_runs_pages_then_views_then_thumbnails() {
        let mut s = session();
        let cmd = s.begin(bounds(), 16.0).expect("begin");
        let generation = match cmd {
            FetchCommand::Pages { generation, bounds: b } => {
                assert_eq!(b.bbox_param(), "45.8|21.1|45.7|21.3");
                generation
            }
            other => panic!("expected Pages, got {other:?}"),
        };

        let step = s.on_pages(generation, Ok(vec![summary(1), summary(2)]));
        let generation = match step {
            Step::Continue(FetchCommand::Views { generation, ids }) => {
                assert_eq!(ids, vec![PageId(1), PageId(2)]);
                generation
            }
            other => panic!("expected Views, got {other:?}"),
        };

        let step = s.on_views(generation, Ok(BTreeMap::from([(PageId(1), 42)])));
        let generation = match step {
            Step::Continue(FetchCommand::Thumbnails {
                generation,
                ids,
                width,
            }) => {
                assert_eq!(ids, vec![PageId(1), PageId(2)]);
                assert_eq!(width, 200);
                generation
            }
            other => panic!("expected Thumbnails, got {other:?}"),
        };

        let thumb = Thumbnail {
            source: "https://example.org/t.jpg".to_string(),
            width: 200,
            height: 150,
        };
        let step = s.on_thumbnails(generation, Ok(BTreeMap::from([(PageId(2), thumb.clone())])));
        match step {
            Step::Commit(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].views, 42);
                assert_eq!(records[1].views, 0);
                assert_eq!(records[0].thumbnail, None);
                assert_eq!(records[1].thumbnail, Some(thumb));
            }
            other => panic!("expected Commit, got {other:?}"),
        }

        assert_eq!(s.gate_state(16.0), GateState::Ready);
        assert_eq!(s.counters().searches_committed, 1);
    }

    #[test]
    fn empty_pages_response_commits_immediately() {
        let mut s = session();
        let generation = match s.begin(bounds(), 16.0).expect("begin") {
            FetchCommand::Pages { generation, .. } => generation,
            other => panic!("expected Pages, got {other:?}"),
        };
        assert_eq!(s.on_pages(generation, Ok(Vec::new())), Step::Commit(Vec::new()));
        assert_eq!(s.gate_state(16.0), GateState::Ready);
    }

    #[test]
    fn pages_failure_fails_the_search() {
        let mut s = session();
        let generation = match s.begin(bounds(), 16.0).expect("begin") {
            FetchCommand::Pages { generation, .. } => generation,
            other => panic!("expected Pages, got {other:?}"),
        };
        assert_eq!(s.on_pages(generation, Err(FetchFailed)), Step::Failed);
        assert_eq!(s.gate_state(16.0), GateState::Ready);
        assert_eq!(s.counters().searches_failed, 1);
    }

    #[test]
    fn views_failure_degrades_to_zero_counts() {
        let mut s = session();
        let generation = match s.begin(bounds(), 16.0).expect("begin") {
            FetchCommand::Pages { generation, .. } => generation,
            other => panic!("expected Pages, got {other:?}"),
        };
        s.on_pages(generation, Ok(vec![summary(1)]));

        let step = s.on_views(generation, Err(FetchFailed));
        assert!(matches!(
            step,
            Step::Continue(FetchCommand::Thumbnails { .. })
        ));

        let step = s.on_thumbnails(generation, Err(FetchFailed));
        match step {
            Step::Commit(records) => {
                assert_eq!(records[0].views, 0);
                assert_eq!(records[0].thumbnail, None);
            }
            other => panic!("expected Commit, got {other:?}"),
        }
        assert_eq!(s.counters().fetch_failures, 2);
    }

    #[test]
    fn stale_generations_are_ignored() {
        let mut s = session();
        let old = match s.begin(bounds(), 16.0).expect("begin") {
            FetchCommand::Pages { generation, .. } => generation,
            other => panic!("expected Pages, got {other:?}"),
        };

        // The first search fails, then a second one starts.
        assert_eq!(s.on_pages(old, Err(FetchFailed)), Step::Failed);
        let current = match s.begin(bounds(), 16.0).expect("second begin") {
            FetchCommand::Pages { generation, .. } => generation,
            other => panic!("expected Pages, got {other:?}"),
        };
        assert_ne!(old, current);

        // A late response for the torn-down search changes nothing.
        assert_eq!(s.on_pages(old, Ok(vec![summary(9)])), Step::Stale);
        assert_eq!(s.on_views(old, Ok(BTreeMap::new())), Step::Stale);
        assert_eq!(s.counters().stale_responses, 2);

        // The current search is unaffected.
        let step = s.on_pages(current, Ok(vec![summary(1)]));
        assert!(matches!(step, Step::Continue(FetchCommand::Views { .. })));
    }
}
