//! Visual styles and the style registry
//!
//! A [`Style`] is a document-level, id-addressed bundle of sub-styles
//! (icon, line, fill, label). Placemarks reference styles by id; the
//! [`StyleRegistry`] deduplicates registrations and emits only the
//! referenced styles, sorted by id for deterministic, diff-friendly
//! output.
//!
//! The icon system mirrors what the target viewer actually supports:
//! predefined paddle/pushpin icons with fixed color choices, "shapes"
//! icons tintable with any color, and a bundled transparent 1×1 image
//! used as an invisible anchor for colored label badges. Only the last
//! of these forces KMZ packaging.

use std::collections::{btree_map::Entry, BTreeMap, HashSet};

use log::debug;
use uuid::Uuid;

use crate::color::KmlColor;
use crate::writer::format_scalar;

const ICON_BASE_URL: &str = "http://maps.google.com/mapfiles/kml/";

/// Entry name of the bundled 1×1 transparent anchor image
pub const LOCAL_ANCHOR_ASSET: &str = "1x1.png";

/// Icon shapes available in the predefined (fixed-color) icon set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedIcon {
    Pushpin,
    Circle,
    Square,
    Diamond,
}

impl PredefinedIcon {
    fn url_token(self) -> &'static str {
        match self {
            PredefinedIcon::Pushpin => "pushpin",
            PredefinedIcon::Circle => "circle",
            PredefinedIcon::Square => "square",
            PredefinedIcon::Diamond => "diamond",
        }
    }
}

/// Fixed colors available for the predefined icon set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedIconColor {
    Purple,
    White,
    Green,
    Yellow,
    Blue,
    LightBlue,
    Pink,
    Red,
}

impl PredefinedIconColor {
    fn url_token(self) -> &'static str {
        match self {
            PredefinedIconColor::Purple => "purple",
            PredefinedIconColor::White => "wht",
            PredefinedIconColor::Green => "grn",
            PredefinedIconColor::Yellow => "ylw",
            PredefinedIconColor::Blue => "blu",
            PredefinedIconColor::LightBlue => "ltblu",
            PredefinedIconColor::Pink => "pink",
            PredefinedIconColor::Red => "red",
        }
    }
}

/// Icon shapes that accept an arbitrary tint color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomIcon {
    OpenDiamond,
    Triangle,
    Forbidden,
    Target,
    Square,
    PlacemarkSquare,
    PlacemarkCircle,
}

impl CustomIcon {
    fn url_token(self) -> &'static str {
        match self {
            CustomIcon::OpenDiamond => "open-diamond",
            CustomIcon::Triangle => "triangle",
            CustomIcon::Forbidden => "forbidden",
            CustomIcon::Target => "target",
            CustomIcon::Square => "square",
            CustomIcon::PlacemarkSquare => "placemark_square",
            CustomIcon::PlacemarkCircle => "placemark_circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum IconHref {
    Remote(String),
    /// Bundled asset shipped inside the KMZ archive
    Local(&'static str),
}

/// Point-marker appearance: icon reference, tint color and scale
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    href: IconHref,
    color: Option<KmlColor>,
    scale: Option<f64>,
}

impl IconStyle {
    /// An icon from the predefined paddle/pushpin set.
    ///
    /// Pushpins live in their own URL folder, and the blue pushpin is
    /// spelled out as `blue` while the paddle color token is `blu`.
    pub fn predefined(shape: PredefinedIcon, color: PredefinedIconColor, scale: f64) -> Self {
        let folder = if shape == PredefinedIcon::Pushpin {
            "pushpin"
        } else {
            "paddle"
        };
        let color_token = if shape == PredefinedIcon::Pushpin && color == PredefinedIconColor::Blue
        {
            "blue"
        } else {
            color.url_token()
        };
        let href = format!(
            "{ICON_BASE_URL}{folder}/{color_token}-{}.png",
            shape.url_token()
        );
        Self {
            href: IconHref::Remote(href),
            color: None,
            scale: Some(scale),
        }
    }

    /// An icon from the shapes set, tintable with any color
    pub fn custom(shape: CustomIcon, color: Option<KmlColor>, scale: f64) -> Self {
        let href = format!("{ICON_BASE_URL}shapes/{}.png", shape.url_token());
        Self {
            href: IconHref::Remote(href),
            color,
            scale: Some(scale),
        }
    }

    /// The bundled transparent 1×1 image, used as an invisible anchor so
    /// the viewer renders the placemark name as a colored badge. Using
    /// this icon makes the owning document packaging-required.
    pub fn transparent_local(tint: KmlColor, scale: f64) -> Self {
        Self {
            href: IconHref::Local(LOCAL_ANCHOR_ASSET),
            color: Some(tint),
            scale: Some(scale),
        }
    }

    /// The href emitted inside `<Icon>`
    pub fn href(&self) -> &str {
        match &self.href {
            IconHref::Remote(url) => url,
            IconHref::Local(name) => name,
        }
    }

    /// True when this icon needs a bundled asset in the archive
    pub fn requires_packaging(&self) -> bool {
        matches!(self.href, IconHref::Local(_))
    }

    fn write_kml(&self, out: &mut String) {
        out.push_str("<IconStyle>\n");
        if let Some(color) = self.color {
            out.push_str("<color>");
            out.push_str(&color.kml_hex());
            out.push_str("</color>\n");
        }
        if let Some(scale) = self.scale {
            out.push_str("<scale>");
            out.push_str(&format_scalar(scale));
            out.push_str("</scale>\n");
        }
        out.push_str("<Icon>\n<href>");
        out.push_str(self.href());
        out.push_str("</href>\n</Icon>\n");
        out.push_str("</IconStyle>\n");
    }
}

/// Line appearance for lines, circles, arcs and polygon outlines
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: KmlColor,
    /// Line width in pixels; omitted from output when `None`
    pub width: Option<f64>,
}

impl LineStyle {
    pub fn new(color: KmlColor, width: Option<f64>) -> Self {
        Self { color, width }
    }

    fn write_kml(&self, out: &mut String) {
        out.push_str("<LineStyle>\n<color>");
        out.push_str(&self.color.kml_hex());
        out.push_str("</color>\n");
        if let Some(width) = self.width {
            out.push_str("<width>");
            out.push_str(&format_scalar(width));
            out.push_str("</width>\n");
        }
        out.push_str("</LineStyle>\n");
    }
}

/// Fill appearance for polygon interiors
#[derive(Debug, Clone, PartialEq)]
pub struct PolyStyle {
    pub color: KmlColor,
    /// Whether to fill at all; omitted when `None` (viewer default)
    pub fill: Option<bool>,
}

impl PolyStyle {
    pub fn new(color: KmlColor, fill: Option<bool>) -> Self {
        Self { color, fill }
    }

    fn write_kml(&self, out: &mut String) {
        out.push_str("<PolyStyle>\n<color>");
        out.push_str(&self.color.kml_hex());
        out.push_str("</color>\n");
        if let Some(fill) = self.fill {
            out.push_str("<fill>");
            out.push(if fill { '1' } else { '0' });
            out.push_str("</fill>\n");
        }
        out.push_str("</PolyStyle>\n");
    }
}

/// Text label appearance for placemark names
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub color: KmlColor,
}

impl LabelStyle {
    pub fn new(color: KmlColor) -> Self {
        Self { color }
    }

    fn write_kml(&self, out: &mut String) {
        out.push_str("<LabelStyle>\n<color>");
        out.push_str(&self.color.kml_hex());
        out.push_str("</color>\n</LabelStyle>\n");
    }
}

/// The closed set of style fragments composable into a [`Style`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubStyle {
    Icon(IconStyle),
    Line(LineStyle),
    Poly(PolyStyle),
    Label(LabelStyle),
}

impl SubStyle {
    fn write_kml(&self, out: &mut String) {
        match self {
            SubStyle::Icon(icon) => icon.write_kml(out),
            SubStyle::Line(line) => line.write_kml(out),
            SubStyle::Poly(poly) => poly.write_kml(out),
            SubStyle::Label(label) => label.write_kml(out),
        }
    }
}

/// A document-level style: a unique id plus composed sub-styles
///
/// Identity is the string id; two styles with the same id are treated as
/// the same style by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    id: String,
    sub_styles: Vec<SubStyle>,
}

impl Style {
    /// A style with a generated `s-` id
    pub fn new(sub_styles: Vec<SubStyle>) -> Self {
        Self::with_id(generated_id("s"), sub_styles)
    }

    /// A style under a caller-supplied id
    pub fn with_id(id: impl Into<String>, sub_styles: Vec<SubStyle>) -> Self {
        Self {
            id: id.into(),
            sub_styles,
        }
    }

    /// A point style: icon plus optional text label (`ps-` id)
    pub fn for_point(icon: IconStyle, label: Option<LabelStyle>) -> Self {
        let mut sub_styles = vec![SubStyle::Icon(icon)];
        if let Some(label) = label {
            sub_styles.push(SubStyle::Label(label));
        }
        Self::with_id(generated_id("ps"), sub_styles)
    }

    /// A path style for line-based geometries (`ls-` id)
    pub fn for_path(color: KmlColor, width: f64) -> Self {
        Self::with_id(
            generated_id("ls"),
            vec![SubStyle::Line(LineStyle::new(color, Some(width)))],
        )
    }

    /// A polygon style from explicit outline and fill fragments (`poly-` id)
    pub fn for_polygon(outline: LineStyle, fill: Option<PolyStyle>) -> Self {
        let mut sub_styles = vec![SubStyle::Line(outline)];
        if let Some(fill) = fill {
            sub_styles.push(SubStyle::Poly(fill));
        }
        Self::with_id(generated_id("poly"), sub_styles)
    }

    /// A filled polygon with a colored outline
    pub fn filled_polygon(outline_color: KmlColor, outline_width: f64, fill_color: KmlColor) -> Self {
        Self::for_polygon(
            LineStyle::new(outline_color, Some(outline_width)),
            Some(PolyStyle::new(fill_color, Some(true))),
        )
    }

    /// An outline-only polygon
    pub fn outlined_polygon(outline_color: KmlColor, outline_width: f64) -> Self {
        Self::for_polygon(LineStyle::new(outline_color, Some(outline_width)), None)
    }

    /// A label-only badge: the invisible anchor icon tinted with `color`.
    /// The viewer ignores `LabelStyle` for badges, so none is attached.
    pub fn label_badge(color: KmlColor) -> Self {
        Self::for_point(IconStyle::transparent_local(color, 1.0), None)
    }

    /// Replace the id, keeping the sub-styles (for pinning well-known ids)
    pub fn named(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sub_styles(&self) -> &[SubStyle] {
        &self.sub_styles
    }

    /// True when any sub-style references a bundled local asset
    pub fn requires_packaging(&self) -> bool {
        self.sub_styles
            .iter()
            .any(|sub| matches!(sub, SubStyle::Icon(icon) if icon.requires_packaging()))
    }

    pub(crate) fn write_kml(&self, out: &mut String) {
        out.push_str("<Style id=\"");
        out.push_str(&self.id);
        out.push_str("\">\n");
        for sub_style in &self.sub_styles {
            sub_style.write_kml(out);
        }
        out.push_str("</Style>\n");
    }
}

fn generated_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Id-keyed style store with reference tracking
///
/// Registration is idempotent by id (the first definition wins) and
/// only referenced styles are serialized. The BTreeMap keeps emission
/// sorted by id.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    styles: BTreeMap<String, Style>,
    referenced: HashSet<String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style and mark it referenced. If the id is already
    /// taken the existing definition is kept.
    pub fn register(&mut self, style: Style) -> String {
        let id = style.id().to_owned();
        match self.styles.entry(id.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(style);
            }
            Entry::Occupied(_) => {
                debug!("style id {id:?} already registered, keeping first definition");
            }
        }
        self.referenced.insert(id.clone());
        id
    }

    /// Mark an id as referenced by a placemark that does not embed the
    /// style itself.
    pub fn mark_referenced(&mut self, style_id: &str) {
        self.referenced.insert(style_id.to_owned());
    }

    /// Look up a registered style
    pub fn style(&self, style_id: &str) -> Option<&Style> {
        self.styles.get(style_id)
    }

    /// Number of registered styles (referenced or not)
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// True when any referenced style needs a bundled asset
    pub fn requires_packaging(&self) -> bool {
        self.referenced
            .iter()
            .any(|id| self.styles.get(id).is_some_and(Style::requires_packaging))
    }

    /// Drop all styles and references
    pub fn clear(&mut self) {
        self.styles.clear();
        self.referenced.clear();
    }

    /// Emit referenced styles sorted by id ascending
    pub(crate) fn write_kml(&self, out: &mut String) {
        for (id, style) in &self.styles {
            if self.referenced.contains(id) {
                style.write_kml(out);
            }
        }
    }
}
