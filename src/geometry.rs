//! Geometry elements: point, line string, linear ring, polygon
//!
//! Each element owns its coordinate sequence plus the optional altitude,
//! altitude-mode and tessellation settings, and knows how to render
//! itself as a KML fragment. Altitude mode is only emitted when an
//! altitude value is actually present on the element.

use crate::coord::{AltitudeMode, Coordinate};
use crate::writer::push_coordinate;

/// A geographic point displayed as a marker
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub coordinate: Coordinate,
    /// Optional altitude in meters above the reference datum
    pub altitude: Option<f64>,
    pub altitude_mode: Option<AltitudeMode>,
}

impl Point {
    pub fn new(
        coordinate: Coordinate,
        altitude: Option<f64>,
        altitude_mode: Option<AltitudeMode>,
    ) -> Self {
        Self {
            coordinate,
            altitude,
            altitude_mode,
        }
    }

    fn write_kml(&self, out: &mut String, precision: usize) {
        out.push_str("<Point>\n");
        // fixed render-order hint so markers draw above lines and polygons
        out.push_str("<gx:drawOrder>1</gx:drawOrder>\n");
        write_altitude_mode(out, self.altitude.is_some(), self.altitude_mode);
        out.push_str("<coordinates>");
        push_coordinate(out, self.coordinate, self.altitude, precision);
        out.push_str("</coordinates>\n");
        out.push_str("</Point>\n");
    }
}

/// A line connecting multiple coordinates in order
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    pub coordinates: Vec<Coordinate>,
    /// Optional uniform altitude applied to all coordinates (meters)
    pub altitude: Option<f64>,
    pub altitude_mode: Option<AltitudeMode>,
    /// Whether the line should follow ground contours when rendered.
    /// `None` omits the tag entirely.
    pub tessellate: Option<bool>,
}

impl LineString {
    pub fn new(
        coordinates: Vec<Coordinate>,
        altitude: Option<f64>,
        altitude_mode: Option<AltitudeMode>,
        tessellate: Option<bool>,
    ) -> Self {
        assert!(
            !coordinates.is_empty(),
            "LineString requires at least one coordinate"
        );
        Self {
            coordinates,
            altitude,
            altitude_mode,
            tessellate,
        }
    }

    fn write_kml(&self, out: &mut String, precision: usize) {
        out.push_str("<LineString>\n");
        write_tessellate(out, self.tessellate);
        write_altitude_mode(out, self.altitude.is_some(), self.altitude_mode);
        write_coordinate_block(out, &self.coordinates, self.altitude, precision);
        out.push_str("</LineString>\n");
    }
}

/// A closed ring of coordinates bounding a polygon face
///
/// The ring auto-closes on construction: if the first and last
/// coordinates differ, the first is appended again. Altitude mode is a
/// polygon-level concern and is never emitted by the ring itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    pub coordinates: Vec<Coordinate>,
    pub altitude: Option<f64>,
}

impl LinearRing {
    pub fn new(mut coordinates: Vec<Coordinate>, altitude: Option<f64>) -> Self {
        assert!(
            !coordinates.is_empty(),
            "LinearRing requires at least one coordinate"
        );
        if coordinates.first() != coordinates.last() {
            let first = coordinates[0];
            coordinates.push(first);
        }
        Self {
            coordinates,
            altitude,
        }
    }

    fn write_kml(&self, out: &mut String, precision: usize) {
        out.push_str("<LinearRing>\n");
        write_coordinate_block(out, &self.coordinates, self.altitude, precision);
        out.push_str("</LinearRing>\n");
    }
}

/// A polygon with an outer boundary and optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub outer: LinearRing,
    pub inner: Vec<LinearRing>,
    pub altitude_mode: Option<AltitudeMode>,
    pub tessellate: Option<bool>,
}

impl Polygon {
    pub fn new(
        outer: LinearRing,
        inner: Vec<LinearRing>,
        altitude_mode: Option<AltitudeMode>,
        tessellate: Option<bool>,
    ) -> Self {
        Self {
            outer,
            inner,
            altitude_mode,
            tessellate,
        }
    }

    fn write_kml(&self, out: &mut String, precision: usize) {
        out.push_str("<Polygon>\n");
        write_tessellate(out, self.tessellate);
        // altitude mode applies when any ring, outer or inner, carries an
        // altitude
        let has_altitude =
            self.outer.altitude.is_some() || self.inner.iter().any(|r| r.altitude.is_some());
        write_altitude_mode(out, has_altitude, self.altitude_mode);

        out.push_str("<outerBoundaryIs>\n");
        self.outer.write_kml(out, precision);
        out.push_str("</outerBoundaryIs>\n");
        for ring in &self.inner {
            out.push_str("<innerBoundaryIs>\n");
            ring.write_kml(out, precision);
            out.push_str("</innerBoundaryIs>\n");
        }
        out.push_str("</Polygon>\n");
    }
}

/// The closed set of geometry variants a placemark can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
}

impl Geometry {
    pub(crate) fn write_kml(&self, out: &mut String, precision: usize) {
        match self {
            Geometry::Point(point) => point.write_kml(out, precision),
            Geometry::LineString(line) => line.write_kml(out, precision),
            Geometry::LinearRing(ring) => ring.write_kml(out, precision),
            Geometry::Polygon(polygon) => polygon.write_kml(out, precision),
        }
    }
}

fn write_tessellate(out: &mut String, tessellate: Option<bool>) {
    if let Some(tessellate) = tessellate {
        out.push_str("<tessellate>");
        out.push(if tessellate { '1' } else { '0' });
        out.push_str("</tessellate>\n");
    }
}

fn write_altitude_mode(out: &mut String, has_altitude: bool, mode: Option<AltitudeMode>) {
    if has_altitude {
        if let Some(mode) = mode {
            out.push_str("<altitudeMode>");
            out.push_str(mode.kml_name());
            out.push_str("</altitudeMode>\n");
        }
    }
}

fn write_coordinate_block(
    out: &mut String,
    coordinates: &[Coordinate],
    altitude: Option<f64>,
    precision: usize,
) {
    out.push_str("<coordinates>\n");
    for &coord in coordinates {
        push_coordinate(out, coord, altitude, precision);
        out.push('\n');
    }
    out.push_str("</coordinates>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::DEFAULT_COORDINATE_PRECISION;

    fn render(geometry: &Geometry) -> String {
        let mut out = String::new();
        geometry.write_kml(&mut out, DEFAULT_COORDINATE_PRECISION);
        out
    }

    #[test]
    fn test_ring_auto_closes() {
        let ring = LinearRing::new(
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.0, 1.0),
                Coordinate::new(1.0, 1.0),
            ],
            None,
        );
        assert_eq!(ring.coordinates.len(), 4);
        assert_eq!(ring.coordinates.first(), ring.coordinates.last());
    }

    #[test]
    fn test_ring_closure_is_idempotent() {
        let closed = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ];
        let ring = LinearRing::new(closed.clone(), None);
        assert_eq!(ring.coordinates, closed);
    }

    #[test]
    fn test_point_emits_draw_order() {
        let kml = render(&Geometry::Point(Point::new(
            Coordinate::new(51.0, -1.0),
            None,
            None,
        )));
        assert!(kml.contains("<gx:drawOrder>1</gx:drawOrder>"));
        assert!(kml.contains("<coordinates>-1.0,51.0</coordinates>"));
    }

    #[test]
    fn test_point_altitude_mode_needs_altitude() {
        // mode without altitude: tag suppressed
        let without = render(&Geometry::Point(Point::new(
            Coordinate::new(51.0, -1.0),
            None,
            Some(AltitudeMode::Absolute),
        )));
        assert!(!without.contains("<altitudeMode>"));

        let with = render(&Geometry::Point(Point::new(
            Coordinate::new(51.0, -1.0),
            Some(300.0),
            Some(AltitudeMode::Absolute),
        )));
        assert!(with.contains("<altitudeMode>absolute</altitudeMode>"));
        assert!(with.contains("-1.0,51.0,300.0"));
    }

    #[test]
    fn test_line_string_tessellate_tag() {
        let coords = vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        let on = render(&Geometry::LineString(LineString::new(
            coords.clone(),
            None,
            None,
            Some(true),
        )));
        assert!(on.contains("<tessellate>1</tessellate>"));

        let off = render(&Geometry::LineString(LineString::new(
            coords.clone(),
            None,
            None,
            Some(false),
        )));
        assert!(off.contains("<tessellate>0</tessellate>"));

        let unset = render(&Geometry::LineString(LineString::new(
            coords, None, None, None,
        )));
        assert!(!unset.contains("<tessellate>"));
    }

    #[test]
    fn test_polygon_boundaries_independently_closed() {
        let polygon = Polygon::new(
            LinearRing::new(
                vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(0.0, 1.0),
                    Coordinate::new(1.0, 1.0),
                ],
                None,
            ),
            vec![LinearRing::new(
                vec![
                    Coordinate::new(0.2, 0.2),
                    Coordinate::new(0.2, 0.8),
                    Coordinate::new(0.8, 0.8),
                ],
                None,
            )],
            None,
            None,
        );
        assert_eq!(polygon.outer.coordinates.first(), polygon.outer.coordinates.last());
        assert_eq!(
            polygon.inner[0].coordinates.first(),
            polygon.inner[0].coordinates.last()
        );

        let kml = render(&Geometry::Polygon(polygon));
        assert_eq!(kml.matches("<outerBoundaryIs>").count(), 1);
        assert_eq!(kml.matches("<innerBoundaryIs>").count(), 1);
    }

    #[test]
    fn test_polygon_altitude_mode_considers_inner_rings() {
        // only the hole carries an altitude; the mode must still be emitted
        let polygon = Polygon::new(
            LinearRing::new(
                vec![
                    Coordinate::new(0.0, 0.0),
                    Coordinate::new(0.0, 1.0),
                    Coordinate::new(1.0, 1.0),
                ],
                None,
            ),
            vec![LinearRing::new(
                vec![
                    Coordinate::new(0.2, 0.2),
                    Coordinate::new(0.2, 0.8),
                    Coordinate::new(0.8, 0.8),
                ],
                Some(150.0),
            )],
            Some(AltitudeMode::RelativeToGround),
            None,
        );
        let kml = render(&Geometry::Polygon(polygon));
        assert!(kml.contains("<altitudeMode>relativeToGround</altitudeMode>"));
    }

    #[test]
    #[should_panic(expected = "at least one coordinate")]
    fn test_empty_line_string_rejected() {
        LineString::new(Vec::new(), None, None, None);
    }
}
