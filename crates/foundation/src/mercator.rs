//! Spherical web-mercator projection in world pixels.
//!
//! World space at zoom `z` is a square of `256 * 2^z` pixels with the
//! origin at the top-left (north-west) corner.

use crate::geo::GeoPoint;

pub const TILE_SIZE_PX: f64 = 256.0;

/// Latitude limit of the square mercator world.
pub const MAX_LAT_DEG: f64 = 85.051_128_78;

pub fn world_size_px(zoom: f64) -> f64 {
    TILE_SIZE_PX * zoom.exp2()
}

/// Projects a geographic point to world-pixel coordinates at `zoom`.
///
/// Latitude is clamped to `MAX_LAT_DEG` so poles land on the world edge.
pub fn project(p: GeoPoint, zoom: f64) -> [f64; 2] {
    let size = world_size_px(zoom);
    let lat_rad = p.lat_deg.clamp(-MAX_LAT_DEG, MAX_LAT_DEG).to_radians();
    let x = (p.lon_deg + 180.0) / 360.0 * size;
    let y = (1.0 - ((lat_rad.tan() + 1.0 / lat_rad.cos()).ln()) / std::f64::consts::PI) / 2.0
        * size;
    [x, y]
}

pub fn unproject(world_px: [f64; 2], zoom: f64) -> GeoPoint {
    let size = world_size_px(zoom);
    let lon_deg = world_px[0] / size * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * world_px[1] / size);
    let lat_deg = n.sinh().atan().to_degrees();
    GeoPoint::new(lat_deg, lon_deg)
}
