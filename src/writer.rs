//! Shared serialization helpers: numeric formatting and text escaping
//!
//! The output format is write-only here, so emission is plain string
//! building with tight control over numeric precision rather than a
//! generic XML writer.

use std::borrow::Cow;

use crate::coord::Coordinate;

/// Default maximum decimal places for coordinate values
pub const DEFAULT_COORDINATE_PRECISION: usize = 8;

/// Altitudes are always written at one decimal place, independent of the
/// coordinate precision setting.
pub(crate) const ALTITUDE_PRECISION: usize = 1;

/// Format a value at `precision` decimal places, trimming trailing zeros
/// but always keeping at least one digit after the decimal point.
///
/// Examples (precision 8): `2.0` → `"2.0"`, `-1.581566` → `"-1.581566"`.
/// Examples (precision 4): `51.12345678` → `"51.1235"`.
pub(crate) fn format_coordinate(value: f64, precision: usize) -> String {
    let mut formatted = format!("{value:.precision$}");
    match formatted.find('.') {
        Some(dot) => {
            // keeps "X.Y" at minimum
            let minimum = dot + 2;
            let trimmed = formatted.trim_end_matches('0').len();
            formatted.truncate(trimmed.max(minimum));
        }
        None => formatted.push_str(".0"),
    }
    formatted
}

/// Format a style scalar (icon scale, line width) with minimal decimals
/// but at least one decimal place, so `1` reads as `1.0`.
pub(crate) fn format_scalar(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Escape the characters the target format requires in free-text name
/// fields. Only `&`, `<` and `>` are handled.
pub(crate) fn escape_text(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>']) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Append one `lon,lat[,alt]` coordinate tuple to the buffer.
pub(crate) fn push_coordinate(
    out: &mut String,
    coord: Coordinate,
    altitude: Option<f64>,
    precision: usize,
) {
    out.push_str(&format_coordinate(coord.longitude, precision));
    out.push(',');
    out.push_str(&format_coordinate(coord.latitude, precision));
    if let Some(alt) = altitude {
        out.push(',');
        out.push_str(&format_coordinate(alt, ALTITUDE_PRECISION));
    }
}
