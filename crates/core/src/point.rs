//! Point locations and distance calculations

/// Mean earth radius in metres.
pub const RADIUS_EARTH: f32 = 6.378137e6;

/// How the lat/lon coordinates of a location are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateType {
    /// Latitude/longitude in degrees on a sphere
    #[default]
    Geodetic,
    /// Planar coordinates in metres, stored in the lat/lon slots
    Cartesian,
}

/// A single location with auxiliary coordinates.
///
/// `elev` (metres) and `laf` (land-area fraction in [0, 1]) may be NaN when
/// unknown; structure functions skip the corresponding correlation factor.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub lat: f32,
    pub lon: f32,
    pub elev: f32,
    pub laf: f32,
    pub ctype: CoordinateType,
}

impl Point {
    /// Create a geodetic point with unknown elevation and land-area fraction.
    pub fn new(lat: f32, lon: f32) -> Self {
        Self {
            lat,
            lon,
            elev: f32::NAN,
            laf: f32::NAN,
            ctype: CoordinateType::Geodetic,
        }
    }

    /// Create a geodetic point with all coordinates set.
    pub fn with_coords(lat: f32, lon: f32, elev: f32, laf: f32) -> Self {
        Self {
            lat,
            lon,
            elev,
            laf,
            ctype: CoordinateType::Geodetic,
        }
    }
}

/// Great-circle distance between two points in metres (haversine formula).
///
/// For [`CoordinateType::Cartesian`] points this is the Euclidean distance.
pub fn calc_distance(p1: &Point, p2: &Point) -> f32 {
    if p1.ctype == CoordinateType::Cartesian || p2.ctype == CoordinateType::Cartesian {
        let dx = (p1.lon - p2.lon) as f64;
        let dy = (p1.lat - p2.lat) as f64;
        return (dx * dx + dy * dy).sqrt() as f32;
    }
    let lat1 = (p1.lat as f64).to_radians();
    let lat2 = (p2.lat as f64).to_radians();
    let dlat = lat2 - lat1;
    let dlon = ((p2.lon - p1.lon) as f64).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    (c * RADIUS_EARTH as f64) as f32
}

/// Fast approximate great-circle distance in metres.
///
/// Equirectangular approximation: accurate for the short distances used in
/// localisation (relative error below 1% inside a few hundred kilometres).
/// For [`CoordinateType::Cartesian`] points this is the Euclidean distance.
pub fn calc_distance_fast(p1: &Point, p2: &Point) -> f32 {
    if p1.ctype == CoordinateType::Cartesian || p2.ctype == CoordinateType::Cartesian {
        let dx = (p1.lon - p2.lon) as f64;
        let dy = (p1.lat - p2.lat) as f64;
        return (dx * dx + dy * dy).sqrt() as f32;
    }
    let mid_lat = (((p1.lat + p2.lat) / 2.0) as f64).to_radians();
    let dx = ((p2.lon - p1.lon) as f64).to_radians() * mid_lat.cos() * RADIUS_EARTH as f64;
    let dy = ((p2.lat - p1.lat) as f64).to_radians() * RADIUS_EARTH as f64;
    (dx * dx + dy * dy).sqrt() as f32
}
