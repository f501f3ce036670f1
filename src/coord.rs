//! Geographic coordinates and the geodesic destination adapter
//!
//! KML uses 3D geographic coordinates in `longitude,latitude[,altitude]`
//! order. Longitude and latitude are decimal degrees on the WGS-84 datum;
//! altitude is meters above the reference datum. This module owns the
//! coordinate value type and wraps the spherical-geometry capability used
//! by the procedural shape generators, so the rest of the crate never
//! touches `geo` types directly.

use geo::{HaversineDestination, Point as GeoPoint};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (decimal degrees, WGS-84 assumed, not verified)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The point reached after traveling `distance_meters` from this
    /// coordinate along `bearing_degrees` (0° = north, clockwise) on a
    /// spherical Earth model.
    pub fn destination(&self, bearing_degrees: f64, distance_meters: f64) -> Coordinate {
        let start = GeoPoint::new(self.longitude, self.latitude);
        let end = start.haversine_destination(bearing_degrees, distance_meters);
        Coordinate::new(end.y(), end.x())
    }
}

/// Supported altitude modes per KML 2.2
///
/// See <https://developers.google.com/kml/documentation/kmlreference#altitudemode>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AltitudeMode {
    Absolute,
    ClampToGround,
    RelativeToGround,
    ClampToSeaFloor,
    RelativeToSeaFloor,
}

impl AltitudeMode {
    /// The camelCase token emitted inside `<altitudeMode>`
    pub fn kml_name(self) -> &'static str {
        match self {
            AltitudeMode::Absolute => "absolute",
            AltitudeMode::ClampToGround => "clampToGround",
            AltitudeMode::RelativeToGround => "relativeToGround",
            AltitudeMode::ClampToSeaFloor => "clampToSeaFloor",
            AltitudeMode::RelativeToSeaFloor => "relativeToSeaFloor",
        }
    }
}
