//! Procedural shape generators
//!
//! Circles, arc sectors ("pie slices") and annular sectors (ring slices)
//! are approximated as ordered coordinate sequences by repeatedly
//! sampling the geodesic destination function. Bearings are degrees
//! clockwise from north.
//!
//! The angular span rule is shared by the sector generators: start and
//! end angles are reduced modulo 360 and the sweep is always clockwise
//! ("forward"), wrapping through north when `end < start`. 330°→30° is a
//! 60° arc across north, never the 300° arc the other way round.

use crate::coord::Coordinate;

/// Reduce start/end angles and compute the clockwise span between them.
fn angular_span(start_angle: f64, end_angle: f64) -> (f64, f64, f64) {
    let start = start_angle % 360.0;
    let end = end_angle % 360.0;
    let span = if end >= start {
        end - start
    } else {
        (360.0 - start) + end
    };
    (start, end, span)
}

/// Sample `points + 1` coordinates around a full circle, then force
/// closure by repeating the first coordinate if the final sample does not
/// land exactly on it.
///
/// Callers enforce `radius_meters > 0` and `points >= 3`.
pub fn circle_points(center: Coordinate, radius_meters: f64, points: usize) -> Vec<Coordinate> {
    let mut samples = Vec::with_capacity(points + 2);
    for i in 0..=points {
        let bearing = i as f64 * 360.0 / points as f64;
        samples.push(center.destination(bearing, radius_meters));
    }

    if samples.first() != samples.last() {
        let first = samples[0];
        samples.push(first);
    }

    samples
}

/// Generate a closed pie-slice outline: center, `points + 1` samples
/// along the arc from the start angle to the end angle, then center
/// again.
pub fn sector_points(
    center: Coordinate,
    radius_meters: f64,
    start_angle: f64,
    end_angle: f64,
    points: usize,
) -> Vec<Coordinate> {
    let (start, _, span) = angular_span(start_angle, end_angle);

    let mut samples = Vec::with_capacity(points + 3);
    samples.push(center);
    for i in 0..=points {
        let fraction = i as f64 / points as f64;
        samples.push(center.destination(start + fraction * span, radius_meters));
    }
    samples.push(center);
    samples
}

/// Generate a closed annular-sector (ring slice) boundary: `points + 1`
/// samples along the outer radius from start to end, `points + 1`
/// samples back along the inner radius from end to start, then the first
/// point repeated. Walking the inner arc in reverse keeps the boundary
/// non-self-intersecting.
pub fn annular_sector_points(
    center: Coordinate,
    inner_radius_meters: f64,
    outer_radius_meters: f64,
    start_angle: f64,
    end_angle: f64,
    points: usize,
) -> Vec<Coordinate> {
    assert!(inner_radius_meters > 0.0, "inner radius must be positive");
    assert!(
        outer_radius_meters > inner_radius_meters,
        "outer radius must be greater than inner radius"
    );

    let (start, end, span) = angular_span(start_angle, end_angle);

    let mut samples = Vec::with_capacity(2 * points + 3);
    for i in 0..=points {
        let fraction = i as f64 / points as f64;
        samples.push(center.destination(start + fraction * span, outer_radius_meters));
    }
    for i in 0..=points {
        let fraction = i as f64 / points as f64;
        samples.push(center.destination(end - fraction * span, inner_radius_meters));
    }

    if let Some(&first) = samples.first() {
        samples.push(first);
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Coordinate {
        Coordinate::new(51.5, -0.5)
    }

    #[test]
    fn test_circle_point_count_and_closure() {
        for n in [3, 16, 64] {
            let ring = circle_points(center(), 5_000.0, n);
            assert_eq!(ring.len(), n + 2, "n = {n}");
            assert_eq!(ring.first(), ring.last());
        }
    }

    #[test]
    fn test_circle_samples_lie_on_radius() {
        let ring = circle_points(center(), 5_000.0, 32);
        // every sample sits roughly 5 km from the center: compare against
        // the point due north at the same distance
        let north = center().destination(0.0, 5_000.0);
        let lat_delta = (north.latitude - center().latitude).abs();
        for coord in &ring {
            let dist = ((coord.latitude - center().latitude).powi(2)
                + (coord.longitude - center().longitude).powi(2))
            .sqrt();
            assert!(dist > lat_delta * 0.5 && dist < lat_delta * 2.5);
        }
    }

    #[test]
    fn test_sector_starts_and_ends_at_center() {
        let slice = sector_points(center(), 5_000.0, 0.0, 90.0, 25);
        assert_eq!(slice.len(), 25 + 3);
        assert_eq!(slice.first(), Some(&center()));
        assert_eq!(slice.last(), Some(&center()));
    }

    #[test]
    fn test_sector_wraps_forward_through_north() {
        // 330 -> 30 sweeps 60 degrees across north: the midpoint sample is
        // due north of the center, and every arc point is east or west of
        // it by less than the 30-degree extremes would allow.
        let slice = sector_points(center(), 5_000.0, 330.0, 30.0, 4);
        // layout: center, 5 arc samples, center
        let mid = slice[3];
        assert!(mid.latitude > center().latitude);
        assert!((mid.longitude - center().longitude).abs() < 1e-6);

        let first_arc = slice[1];
        let last_arc = slice[5];
        assert!(first_arc.longitude < center().longitude, "330° is west");
        assert!(last_arc.longitude > center().longitude, "30° is east");
    }

    #[test]
    fn test_sector_same_angle_has_zero_span() {
        let slice = sector_points(center(), 5_000.0, 45.0, 45.0, 8);
        // all arc samples collapse onto the 45° point
        assert_eq!(slice[1], slice[9]);
    }

    #[test]
    fn test_annular_sector_point_count() {
        for k in [3, 10, 64] {
            let ring = annular_sector_points(center(), 2_000.0, 5_000.0, 0.0, 90.0, k);
            assert_eq!(ring.len(), 2 * k + 3, "k = {k}");
            assert_eq!(ring.first(), ring.last());
        }
    }

    #[test]
    fn test_annular_sector_outer_then_inner() {
        let n = 10;
        let ring = annular_sector_points(center(), 2_000.0, 5_000.0, 0.0, 90.0, n);
        let reference = center().destination(0.0, 2_000.0);
        let inner_delta = (reference.latitude - center().latitude).abs();
        // first sample is on the outer arc, further out than the inner radius
        let first = ring[0];
        let first_dist = ((first.latitude - center().latitude).powi(2)
            + (first.longitude - center().longitude).powi(2))
        .sqrt();
        assert!(first_dist > inner_delta * 1.5);
        // sample n+1 starts the inner arc
        let inner = ring[n + 1];
        let inner_dist = ((inner.latitude - center().latitude).powi(2)
            + (inner.longitude - center().longitude).powi(2))
        .sqrt();
        assert!(inner_dist < first_dist);
    }

    #[test]
    #[should_panic(expected = "inner radius must be positive")]
    fn test_annular_sector_rejects_zero_inner() {
        annular_sector_points(center(), 0.0, 5_000.0, 0.0, 90.0, 8);
    }

    #[test]
    #[should_panic(expected = "outer radius must be greater")]
    fn test_annular_sector_rejects_inverted_radii() {
        annular_sector_points(center(), 5_000.0, 2_000.0, 0.0, 90.0, 8);
    }
}
