use foundation::precision::stable_total_cmp_f64;
use foundation::viewport::Viewport;
use pages::records::PageId;

use crate::store::MarkerStore;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub id: PageId,
    pub distance_px: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance_px: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        // Marker radius is 5px; leave a little slack for imprecise clicks.
        Self {
            max_distance_px: 8.0,
        }
    }
}

/// Deterministic screen-space picking over the marker store.
///
/// Ordering contract:
/// - The closest marker within `max_distance_px` wins.
/// - If two markers are equally close, the lower `PageId` wins.
pub fn pick_screen(
    store: &MarkerStore,
    viewport: &Viewport,
    x_px: f64,
    y_px: f64,
    opts: PickOptions,
) -> Option<PickHit> {
    let mut best: Option<(f64, PageId)> = None;

    for record in store.iter() {
        let px = viewport.geo_to_screen(record.position);
        let dx = px[0] - x_px;
        let dy = px[1] - y_px;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > opts.max_distance_px {
            continue;
        }

        best = match best {
            None => Some((distance, record.id)),
            Some((best_distance, best_id)) => {
                let ord = stable_total_cmp_f64(distance, best_distance)
                    .then_with(|| record.id.cmp(&best_id));
                if ord.is_lt() {
                    Some((distance, record.id))
                } else {
                    Some((best_distance, best_id))
                }
            }
        };
    }

    best.map(|(distance_px, id)| PickHit { id, distance_px })
}
