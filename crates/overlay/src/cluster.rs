use std::collections::BTreeMap;

use foundation::geo::GeoPoint;
use foundation::viewport::Viewport;
use pages::records::PageId;

use crate::store::MarkerStore;

pub const DEFAULT_CELL_PX: f64 = 60.0;

/// One grid cell's worth of markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Member ids in ascending order.
    pub members: Vec<PageId>,
    /// Mean position of the members.
    pub center: GeoPoint,
}

impl Cluster {
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Deterministic screen-space grid clustering.
///
/// Markers are binned into `cell_px`-sized cells of the current viewport;
/// clusters come back in cell order (top-left to bottom-right rows of the
/// grid's key ordering) with members sorted by id.
pub fn cluster_markers(store: &MarkerStore, viewport: &Viewport, cell_px: f64) -> Vec<Cluster> {
    struct CellAccum {
        members: Vec<PageId>,
        lat_sum: f64,
        lon_sum: f64,
    }

    let mut cells: BTreeMap<(i64, i64), CellAccum> = BTreeMap::new();

    for record in store.iter() {
        let px = viewport.geo_to_screen(record.position);
        let cell = (
            (px[0] / cell_px).floor() as i64,
            (px[1] / cell_px).floor() as i64,
        );
        let accum = cells.entry(cell).or_insert_with(|| CellAccum {
            members: Vec::new(),
            lat_sum: 0.0,
            lon_sum: 0.0,
        });
        accum.members.push(record.id);
        accum.lat_sum += record.position.lat_deg;
        accum.lon_sum += record.position.lon_deg;
    }

    cells
        .into_values()
        .map(|mut accum| {
            accum.members.sort();
            let n = accum.members.len() as f64;
            Cluster {
                center: GeoPoint::new(accum.lat_sum / n, accum.lon_sum / n),
                members: accum.members,
            }
        })
        .collect()
}
