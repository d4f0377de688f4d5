use crate::geo::{GeoBounds, GeoPoint};
use crate::mercator;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Current view of the map: center, zoom, and screen size in pixels.
///
/// Screen coordinates have their origin at the top-left corner of the
/// view, matching browser canvas/pointer coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f64, width_px: f64, height_px: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width_px,
            height_px,
        }
    }

    pub fn set_center(&mut self, center: GeoPoint) {
        self.center = center;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_size(&mut self, width_px: f64, height_px: f64) {
        self.width_px = width_px;
        self.height_px = height_px;
    }

    /// Screen position of a geographic point.
    pub fn geo_to_screen(&self, p: GeoPoint) -> [f64; 2] {
        let center_px = mercator::project(self.center, self.zoom);
        let world_px = mercator::project(p, self.zoom);
        [
            world_px[0] - center_px[0] + self.width_px / 2.0,
            world_px[1] - center_px[1] + self.height_px / 2.0,
        ]
    }

    pub fn screen_to_geo(&self, screen_px: [f64; 2]) -> GeoPoint {
        let center_px = mercator::project(self.center, self.zoom);
        mercator::unproject(
            [
                center_px[0] + screen_px[0] - self.width_px / 2.0,
                center_px[1] + screen_px[1] - self.height_px / 2.0,
            ],
            self.zoom,
        )
    }

    /// The visible bounding box, taken from the screen rectangle's corners.
    pub fn bounds(&self) -> GeoBounds {
        let north_east = self.screen_to_geo([self.width_px, 0.0]);
        let south_west = self.screen_to_geo([0.0, self.height_px]);
        GeoBounds::from_corners(north_east, south_west)
    }
}

#[cfg(test)]
mod tests {
    use super::Viewport;
    use crate::geo::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn center_maps_to_screen_middle() {
        let v = Viewport::new(GeoPoint::new(45.75, 21.22), 16.0, 800.0, 600.0);
        let px = v.geo_to_screen(v.center);
        assert_close(px[0], 400.0, 1e-9);
        assert_close(px[1], 300.0, 1e-9);
    }

    #[test]
    fn screen_round_trip() {
        let v = Viewport::new(GeoPoint::new(45.75, 21.22), 16.0, 800.0, 600.0);
        let geo = v.screen_to_geo([123.0, 456.0]);
        let px = v.geo_to_screen(geo);
        assert_close(px[0], 123.0, 1e-6);
        assert_close(px[1], 456.0, 1e-6);
    }

    #[test]
    fn bounds_surround_the_center() {
        let v = Viewport::new(GeoPoint::new(45.75, 21.22), 16.0, 800.0, 600.0);
        let b = v.bounds();
        assert!(b.north_deg > v.center.lat_deg);
        assert!(b.south_deg < v.center.lat_deg);
        assert!(b.west_deg < v.center.lon_deg);
        assert!(b.east_deg > v.center.lon_deg);
        assert!(b.contains(v.center));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = Viewport::new(GeoPoint::new(0.0, 0.0), 25.0, 100.0, 100.0);
        assert_eq!(v.zoom, 19.0);
        v.set_zoom(-3.0);
        assert_eq!(v.zoom, 0.0);
    }
}
