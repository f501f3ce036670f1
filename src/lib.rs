//! # kml-overlay
//!
//! KML/KMZ overlay document generation for moving-map and
//! flight-planning viewers.
//!
//! This crate builds georeferenced vector-overlay documents: points,
//! lines, circles, arc sectors, annular sectors, rings and filled
//! polygons, with reusable styles, and exports them as a single
//! downloadable file. It is write-only: there is no parser and no
//! network or UI concern.
//!
//! ## Output Formats
//!
//! | Format | Extension | MIME type | Description |
//! |--------|-----------|-----------|-------------|
//! | KML | `.kml` | `application/vnd.google-earth.kml+xml` | Plain XML document |
//! | KMZ | `.kmz` | `application/vnd.google-earth.kmz` | ZIP archive: `doc.kml` + bundled assets |
//!
//! ## Quick Start
//!
//! ```
//! use kml_overlay::{Coordinate, KmlBuilder, KmlColor, OutputFormat, Style};
//!
//! let mut builder = KmlBuilder::named("Airfield overlay");
//! builder
//!     .add_line_circle(
//!         Some("5 NM ring"),
//!         Coordinate::new(51.2, -1.5),
//!         9_260.0,
//!         64,
//!         None,
//!         None,
//!         Some(Style::for_path(KmlColor::CAUTION, 2.0)),
//!     )
//!     .add_polygon_sector(
//!         Some("Approach sector"),
//!         Coordinate::new(51.2, -1.5),
//!         15_000.0,
//!         330.0,
//!         30.0,
//!         64,
//!         None,
//!         None,
//!         Some(Style::filled_polygon(
//!             KmlColor::WARNING,
//!             2.0,
//!             KmlColor::WARNING.with_alpha(64),
//!         )),
//!     );
//!
//! let result = builder.build(OutputFormat::Kml)?;
//! assert_eq!(result.file_extension, "kml");
//! # Ok::<(), kml_overlay::BuildError>(())
//! ```
//!
//! ## Label Badges
//!
//! Text-only label badges use a bundled transparent 1×1 image as an
//! invisible anchor, tinted with the badge color. Documents containing
//! badges are packaging-required and can only be exported as KMZ:
//!
//! ```
//! use kml_overlay::{BuildError, Coordinate, KmlBuilder, KmlColor, OutputFormat};
//!
//! let mut builder = KmlBuilder::new();
//! builder.add_label("DANGER AREA", Coordinate::new(51.2345, -1.2345), None, KmlColor::WARNING);
//!
//! assert!(builder.requires_kmz());
//! assert!(matches!(
//!     builder.build(OutputFormat::Kml),
//!     Err(BuildError::KmzRequired)
//! ));
//! let kmz = builder.build(OutputFormat::Kmz)?;
//! assert_eq!(kmz.mime_type, "application/vnd.google-earth.kmz");
//! # Ok::<(), BuildError>(())
//! ```
//!
//! ## Coordinate Precision
//!
//! Coordinates are written as `longitude,latitude[,altitude]` at a
//! configurable precision (default 8 decimal places, clamped to 1–15).
//! Trailing zeros are trimmed but one fractional digit always remains,
//! so `2.0` serializes as `"2.0"`, never `"2.00000000"`. Altitudes are
//! always written at one decimal place.
//!
//! ## Concurrency
//!
//! The builder is single-threaded, synchronous owned state. Mutating
//! calls take `&mut self`, so the compiler enforces that builds never
//! race with mutation; the builder itself may move between threads
//! between build scopes.

pub mod builder;
pub mod color;
pub mod coord;
pub mod error;
pub mod geometry;
pub mod kmz;
pub mod shapes;
pub mod style;

mod writer;

pub use builder::{BuildResult, KmlBuilder, OutputFormat, Placemark};
pub use color::KmlColor;
pub use coord::{AltitudeMode, Coordinate};
pub use error::{BuildError, Result};
pub use geometry::{Geometry, LineString, LinearRing, Point, Polygon};
pub use kmz::{CompressionPolicy, DOCUMENT_ENTRY_NAME};
pub use style::{
    CustomIcon, IconStyle, LabelStyle, LineStyle, PolyStyle, PredefinedIcon, PredefinedIconColor,
    Style, StyleRegistry, SubStyle, LOCAL_ANCHOR_ASSET,
};
pub use writer::DEFAULT_COORDINATE_PRECISION;
