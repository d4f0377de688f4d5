/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Viewport rectangle in degrees: north/west/south/east edges.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub north_deg: f64,
    pub west_deg: f64,
    pub south_deg: f64,
    pub east_deg: f64,
}

impl GeoBounds {
    pub fn new(north_deg: f64, west_deg: f64, south_deg: f64, east_deg: f64) -> Self {
        Self {
            north_deg,
            west_deg,
            south_deg,
            east_deg,
        }
    }

    /// Builds bounds from the screen rectangle's north-east and south-west corners.
    pub fn from_corners(north_east: GeoPoint, south_west: GeoPoint) -> Self {
        Self {
            north_deg: north_east.lat_deg,
            west_deg: south_west.lon_deg,
            south_deg: south_west.lat_deg,
            east_deg: north_east.lon_deg,
        }
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat_deg <= self.north_deg
            && p.lat_deg >= self.south_deg
            && p.lon_deg >= self.west_deg
            && p.lon_deg <= self.east_deg
    }

    /// Renders the `N|W|S|E` query value consumed by the pages endpoint.
    pub fn bbox_param(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.north_deg, self.west_deg, self.south_deg, self.east_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, GeoPoint};

    #[test]
    fn bbox_param_is_north_west_south_east() {
        let b = GeoBounds::new(45.8, 21.1, 45.7, 21.3);
        assert_eq!(b.bbox_param(), "45.8|21.1|45.7|21.3");
    }

    #[test]
    fn from_corners_maps_edges() {
        let b = GeoBounds::from_corners(GeoPoint::new(45.8, 21.3), GeoPoint::new(45.7, 21.1));
        assert_eq!(b.north_deg, 45.8);
        assert_eq!(b.west_deg, 21.1);
        assert_eq!(b.south_deg, 45.7);
        assert_eq!(b.east_deg, 21.3);
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let b = GeoBounds::new(1.0, -1.0, -1.0, 1.0);
        assert!(b.contains(GeoPoint::new(0.0, 0.0)));
        assert!(b.contains(GeoPoint::new(1.0, -1.0)));
        assert!(!b.contains(GeoPoint::new(1.1, 0.0)));
        assert!(!b.contains(GeoPoint::new(0.0, -1.1)));
    }
}
