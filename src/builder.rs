//! Document builder: placemark accumulation and serialization
//!
//! [`KmlBuilder`] is the entry point of the crate. Callers add placemarks
//! through the convenience shape operations (which run the generators in
//! [`crate::shapes`] and register styles as a side effect), then call
//! [`KmlBuilder::build`] to serialize. Building is a read-only pass over
//! the accumulated state and may be repeated; the builder never locks.

use crate::color::KmlColor;
use crate::coord::Coordinate;
use crate::error::{BuildError, Result};
use crate::geometry::{Geometry, LineString, LinearRing, Point, Polygon};
use crate::shapes;
use crate::style::{Style, StyleRegistry};
use crate::writer::{escape_text, DEFAULT_COORDINATE_PRECISION};

/// Build output selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text document (`.kml`)
    Kml,
    /// Compressed archive with embedded assets (`.kmz`)
    Kmz,
}

/// The bytes plus download metadata produced by a build call
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub data: Vec<u8>,
    pub file_extension: &'static str,
    pub mime_type: &'static str,
}

/// A named, styled instance of a geometry in the output document
#[derive(Debug, Clone)]
pub struct Placemark {
    pub name: Option<String>,
    pub geometry: Geometry,
    /// Style identity referenced via `<styleUrl>`
    pub style_url: Option<String>,
    /// Inline style, registered when the placemark is added
    pub style: Option<Style>,
}

impl Placemark {
    /// A placemark with an optional inline style; the style's id becomes
    /// the placemark's style reference.
    pub fn new(name: Option<String>, geometry: Geometry, style: Option<Style>) -> Self {
        let style_url = style.as_ref().map(|s| s.id().to_owned());
        Self {
            name,
            geometry,
            style_url,
            style,
        }
    }

    /// A placemark referencing a style by id without embedding it. The
    /// style must be registered with the document separately.
    pub fn with_style_url(
        name: Option<String>,
        geometry: Geometry,
        style_url: impl Into<String>,
    ) -> Self {
        Self {
            name,
            geometry,
            style_url: Some(style_url.into()),
            style: None,
        }
    }

    fn write_kml(&self, out: &mut String, precision: usize) {
        out.push_str("<Placemark>\n");
        if let Some(name) = &self.name {
            out.push_str("<name>");
            out.push_str(&escape_text(name));
            out.push_str("</name>\n");
        }
        if let Some(style_url) = &self.style_url {
            out.push_str("<styleUrl>#");
            out.push_str(style_url);
            out.push_str("</styleUrl>\n");
        }
        self.geometry.write_kml(out, precision);
        out.push_str("</Placemark>\n");
    }
}

/// Builder for composing an overlay document (styles + placemarks)
///
/// Holds mutable state with no internal synchronization; all operations
/// are synchronous and in-memory. `&mut` receivers make the
/// single-writer rule a compile-time guarantee, and the builder can be
/// handed off between threads between build scopes.
#[derive(Debug)]
pub struct KmlBuilder {
    document_name: Option<String>,
    coordinate_precision: usize,
    placemarks: Vec<Placemark>,
    styles: StyleRegistry,
}

impl Default for KmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KmlBuilder {
    pub fn new() -> Self {
        Self {
            document_name: None,
            coordinate_precision: DEFAULT_COORDINATE_PRECISION,
            placemarks: Vec::new(),
            styles: StyleRegistry::new(),
        }
    }

    /// A builder with the document name already set
    pub fn named(document_name: impl Into<String>) -> Self {
        let mut builder = Self::new();
        builder.document_name = Some(document_name.into());
        builder
    }

    /// Set the name shown for the document in the viewer
    pub fn set_document_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.document_name = Some(name.into());
        self
    }

    /// Set the maximum decimal places for coordinate values, clamped to
    /// 1..=15. Trailing zeros are always trimmed on output.
    pub fn set_coordinate_precision(&mut self, precision: usize) -> &mut Self {
        self.coordinate_precision = precision.clamp(1, 15);
        self
    }

    pub fn coordinate_precision(&self) -> usize {
        self.coordinate_precision
    }

    /// Append a placemark. An inline style is registered with the
    /// document; a bare style reference is marked as used.
    pub fn add_placemark(&mut self, placemark: Placemark) -> &mut Self {
        if let Some(style) = &placemark.style {
            self.styles.register(style.clone());
        } else if let Some(style_url) = &placemark.style_url {
            self.styles.mark_referenced(style_url);
        }
        self.placemarks.push(placemark);
        self
    }

    /// Add a point placemark
    pub fn add_point(
        &mut self,
        name: Option<&str>,
        coordinate: Coordinate,
        altitude: Option<f64>,
        style: Option<Style>,
    ) -> &mut Self {
        let geometry = Geometry::Point(Point::new(coordinate, altitude, None));
        self.add_placemark(Placemark::new(name.map(str::to_owned), geometry, style))
    }

    /// Add a line placemark connecting the coordinates in order
    pub fn add_line(
        &mut self,
        name: Option<&str>,
        coordinates: Vec<Coordinate>,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        let geometry = Geometry::LineString(LineString::new(coordinates, altitude, None, tessellate));
        self.add_placemark(Placemark::new(name.map(str::to_owned), geometry, style))
    }

    /// Add a circular line approximated by `points` segments.
    ///
    /// Panics when `radius_meters <= 0` or `points < 3`; these are
    /// contract violations, not runtime failures.
    pub fn add_line_circle(
        &mut self,
        name: Option<&str>,
        center: Coordinate,
        radius_meters: f64,
        points: usize,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        assert!(radius_meters > 0.0, "radius must be positive");
        assert!(points >= 3, "need at least 3 segments for a circle");

        let coordinates = shapes::circle_points(center, radius_meters, points);
        self.add_line(name, coordinates, altitude, tessellate, style)
    }

    /// Add an arc-sector (pie slice) outline. Angles are degrees
    /// clockwise from north; the sweep always runs forward from start to
    /// end, wrapping through north when needed.
    pub fn add_line_sector(
        &mut self,
        name: Option<&str>,
        center: Coordinate,
        radius_meters: f64,
        start_angle: f64,
        end_angle: f64,
        points: usize,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        assert!(radius_meters > 0.0, "radius must be positive");
        assert!(points >= 3, "need at least 3 segments for an arc");

        let coordinates =
            shapes::sector_points(center, radius_meters, start_angle, end_angle, points);
        self.add_line(name, coordinates, altitude, tessellate, style)
    }

    /// Add a polygon with an outer boundary and optional holes. Each
    /// ring closes itself if its first and last coordinates differ.
    pub fn add_polygon(
        &mut self,
        name: Option<&str>,
        outer: Vec<Coordinate>,
        inner: Vec<Vec<Coordinate>>,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        assert!(outer.len() >= 3, "polygon outer ring needs at least 3 coordinates");

        let outer = LinearRing::new(outer, altitude);
        let inner = inner
            .into_iter()
            .map(|ring| LinearRing::new(ring, altitude))
            .collect();
        let geometry = Geometry::Polygon(Polygon::new(outer, inner, None, tessellate));
        self.add_placemark(Placemark::new(name.map(str::to_owned), geometry, style))
    }

    /// Add a filled circle polygon
    pub fn add_polygon_circle(
        &mut self,
        name: Option<&str>,
        center: Coordinate,
        radius_meters: f64,
        points: usize,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        assert!(radius_meters > 0.0, "radius must be positive");
        assert!(points >= 3, "need at least 3 segments for a circle");

        let ring = shapes::circle_points(center, radius_meters, points);
        let geometry = Geometry::Polygon(Polygon::new(
            LinearRing::new(ring, altitude),
            Vec::new(),
            None,
            tessellate,
        ));
        self.add_placemark(Placemark::new(name.map(str::to_owned), geometry, style))
    }

    /// Add a filled sector polygon (pie slice)
    pub fn add_polygon_sector(
        &mut self,
        name: Option<&str>,
        center: Coordinate,
        radius_meters: f64,
        start_angle: f64,
        end_angle: f64,
        points: usize,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        assert!(radius_meters > 0.0, "radius must be positive");
        assert!(points >= 3, "need at least 3 segments for a sector");

        let ring = shapes::sector_points(center, radius_meters, start_angle, end_angle, points);
        let geometry = Geometry::Polygon(Polygon::new(
            LinearRing::new(ring, altitude),
            Vec::new(),
            None,
            tessellate,
        ));
        self.add_placemark(Placemark::new(name.map(str::to_owned), geometry, style))
    }

    /// Add a filled annular-sector polygon: the area between two radii
    /// across an angular span, excluding the inner disc.
    pub fn add_polygon_annular_sector(
        &mut self,
        name: Option<&str>,
        center: Coordinate,
        inner_radius_meters: f64,
        outer_radius_meters: f64,
        start_angle: f64,
        end_angle: f64,
        points: usize,
        altitude: Option<f64>,
        tessellate: Option<bool>,
        style: Option<Style>,
    ) -> &mut Self {
        assert!(inner_radius_meters > 0.0, "inner radius must be positive");
        assert!(
            outer_radius_meters > inner_radius_meters,
            "outer radius must be greater than inner radius"
        );
        assert!(points >= 3, "need at least 3 segments for an annular sector");

        let ring = shapes::annular_sector_points(
            center,
            inner_radius_meters,
            outer_radius_meters,
            start_angle,
            end_angle,
            points,
        );
        let geometry = Geometry::Polygon(Polygon::new(
            LinearRing::new(ring, altitude),
            Vec::new(),
            None,
            tessellate,
        ));
        self.add_placemark(Placemark::new(name.map(str::to_owned), geometry, style))
    }

    /// Add a text-only label badge at a coordinate.
    ///
    /// Uses the bundled transparent 1×1 anchor icon tinted with `color`;
    /// the placemark name is what the viewer renders as the badge text.
    /// Because the anchor is a local asset, the document becomes
    /// packaging-required and can only be exported as KMZ.
    pub fn add_label(
        &mut self,
        text: &str,
        coordinate: Coordinate,
        altitude: Option<f64>,
        color: KmlColor,
    ) -> &mut Self {
        self.add_point(
            Some(text),
            coordinate,
            altitude,
            Some(Style::label_badge(color)),
        )
    }

    /// True if this document must be exported as KMZ to render correctly
    pub fn requires_kmz(&self) -> bool {
        self.styles.requires_packaging()
    }

    pub fn placemark_count(&self) -> usize {
        self.placemarks.len()
    }

    pub fn style_count(&self) -> usize {
        self.styles.style_count()
    }

    /// Remove all placemarks and styles. The document name and the
    /// coordinate precision survive.
    pub fn clear(&mut self) -> &mut Self {
        self.placemarks.clear();
        self.styles.clear();
        self
    }

    /// Serialize the accumulated document. Read-only: the builder can be
    /// mutated and serialized again afterwards.
    pub fn kml_string(&self) -> String {
        let mut out = String::with_capacity(self.placemarks.len() * 500 + 1024);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(concat!(
            "<kml xmlns=\"http://www.opengis.net/kml/2.2\"",
            " xmlns:gx=\"http://www.google.com/kml/ext/2.2\"",
            " xmlns:kml=\"http://www.opengis.net/kml/2.2\"",
            " xmlns:atom=\"http://www.w3.org/2005/Atom\">\n"
        ));
        out.push_str("<Document>\n");
        if let Some(name) = &self.document_name {
            out.push_str("<name>");
            out.push_str(&escape_text(name));
            out.push_str("</name>\n");
        }

        self.styles.write_kml(&mut out);

        for placemark in &self.placemarks {
            placemark.write_kml(&mut out, self.coordinate_precision);
        }

        out.push_str("</Document>\n</kml>");
        out
    }

    /// Serialize to plain KML bytes (UTF-8)
    pub fn build_kml(&self) -> Vec<u8> {
        self.kml_string().into_bytes()
    }

    /// Build the document in the requested format.
    ///
    /// Fails with [`BuildError::KmzRequired`] when the plain format is
    /// requested but the document references bundled assets, and with
    /// [`BuildError::EmptyArchive`] when packaging yields no bytes.
    pub fn build(&self, format: OutputFormat) -> Result<BuildResult> {
        if format == OutputFormat::Kml && self.requires_kmz() {
            return Err(BuildError::KmzRequired);
        }

        match format {
            OutputFormat::Kml => Ok(BuildResult {
                data: self.build_kml(),
                file_extension: "kml",
                mime_type: "application/vnd.google-earth.kml+xml",
            }),
            OutputFormat::Kmz => {
                let data = self.build_kmz()?;
                if data.is_empty() {
                    return Err(BuildError::EmptyArchive);
                }
                Ok(BuildResult {
                    data,
                    file_extension: "kmz",
                    mime_type: "application/vnd.google-earth.kmz",
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{IconStyle, PredefinedIcon, PredefinedIconColor};

    #[test]
    fn test_default_precision_is_8() {
        assert_eq!(KmlBuilder::new().coordinate_precision(), 8);
    }

    #[test]
    fn test_precision_clamps_to_range() {
        let mut builder = KmlBuilder::new();
        builder.set_coordinate_precision(0);
        assert_eq!(builder.coordinate_precision(), 1);
        builder.set_coordinate_precision(20);
        assert_eq!(builder.coordinate_precision(), 15);
    }

    #[test]
    fn test_document_name_escaped() {
        let mut builder = KmlBuilder::named("Sectors & <zones>");
        builder.add_point(Some("p"), Coordinate::new(0.0, 0.0), None, None);
        let kml = builder.kml_string();
        assert!(kml.contains("<name>Sectors &amp; &lt;zones&gt;</name>"));
    }

    #[test]
    fn test_namespaces_on_root_element() {
        let kml = KmlBuilder::new().kml_string();
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(kml.contains("xmlns=\"http://www.opengis.net/kml/2.2\""));
        assert!(kml.contains("xmlns:gx=\"http://www.google.com/kml/ext/2.2\""));
        assert!(kml.contains("xmlns:kml=\"http://www.opengis.net/kml/2.2\""));
        assert!(kml.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\""));
        assert!(kml.ends_with("</kml>"));
    }

    #[test]
    fn test_inline_style_registered_once() {
        let mut builder = KmlBuilder::new();
        let style = Style::for_point(
            IconStyle::predefined(PredefinedIcon::Circle, PredefinedIconColor::Red, 1.3),
            None,
        );
        builder.add_point(Some("a"), Coordinate::new(1.0, 1.0), None, Some(style.clone()));
        builder.add_point(Some("b"), Coordinate::new(2.0, 2.0), None, Some(style.clone()));

        assert_eq!(builder.placemark_count(), 2);
        assert_eq!(builder.style_count(), 1);

        let kml = builder.kml_string();
        let style_tag = format!("<Style id=\"{}\">", style.id());
        assert_eq!(kml.matches(style_tag.as_str()).count(), 1);
        let style_url = format!("<styleUrl>#{}</styleUrl>", style.id());
        assert_eq!(kml.matches(style_url.as_str()).count(), 2);
    }

    #[test]
    fn test_style_url_only_placemark_marks_reference() {
        let mut builder = KmlBuilder::new();
        let geometry = Geometry::Point(Point::new(Coordinate::new(0.0, 0.0), None, None));
        builder.add_placemark(Placemark::with_style_url(None, geometry, "shared-style"));

        let kml = builder.kml_string();
        assert!(kml.contains("<styleUrl>#shared-style</styleUrl>"));
        // referenced but never registered: nothing to emit in the style block
        assert!(!kml.contains("<Style id=\"shared-style\">"));
    }

    #[test]
    fn test_clear_keeps_name_and_precision() {
        let mut builder = KmlBuilder::named("Kept");
        builder.set_coordinate_precision(4);
        builder.add_label("Badge", Coordinate::new(1.0, 1.0), None, KmlColor::WARNING);
        assert!(builder.requires_kmz());

        builder.clear();

        assert_eq!(builder.placemark_count(), 0);
        assert_eq!(builder.style_count(), 0);
        assert!(!builder.requires_kmz());
        assert_eq!(builder.coordinate_precision(), 4);
        assert!(builder.kml_string().contains("<name>Kept</name>"));
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut builder = KmlBuilder::new();
        builder.add_point(Some("p"), Coordinate::new(0.0, 0.0), None, None);
        let first = builder.build(OutputFormat::Kml).unwrap();
        let second = builder.build(OutputFormat::Kml).unwrap();
        assert_eq!(first.data, second.data);
        // still mutable afterwards
        builder.add_point(Some("q"), Coordinate::new(1.0, 1.0), None, None);
        assert_eq!(builder.placemark_count(), 2);
    }

    #[test]
    #[should_panic(expected = "radius must be positive")]
    fn test_line_circle_rejects_zero_radius() {
        KmlBuilder::new().add_line_circle(
            None,
            Coordinate::new(0.0, 0.0),
            0.0,
            64,
            None,
            None,
            None,
        );
    }

    #[test]
    #[should_panic(expected = "at least 3 segments")]
    fn test_polygon_circle_rejects_two_points() {
        KmlBuilder::new().add_polygon_circle(
            None,
            Coordinate::new(0.0, 0.0),
            1_000.0,
            2,
            None,
            None,
            None,
        );
    }

    #[test]
    #[should_panic(expected = "outer ring needs at least 3")]
    fn test_polygon_rejects_short_ring() {
        KmlBuilder::new().add_polygon(
            None,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)],
            Vec::new(),
            None,
            None,
            None,
        );
    }
}
