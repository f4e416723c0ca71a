//! Segment intersection for road truncation
//!
//! Proposed segments start on a node that existing edges share, so the test
//! must be strictly interior on both segments: touching at an endpoint does
//! not count as a crossing, or every step would "intersect" the road it just
//! grew from.

use glam::DVec2;

/// Tolerance for the parametric interior test; also rejects near-parallel
/// segments whose intersection point would be numerically meaningless
const EPS: f64 = 1e-9;

/// Intersection point of the open segments (a1, a2) and (b1, b2), if any
pub fn segment_intersection(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> Option<DVec2> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.perp_dot(s);
    if denom.abs() < EPS {
        return None;
    }
    let t = (b1 - a1).perp_dot(s) / denom;
    let u = (b1 - a1).perp_dot(r) / denom;
    if t > EPS && t < 1.0 - EPS && u > EPS && u < 1.0 - EPS {
        Some(a1 + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn test_crossing_segments_intersect() {
        let hit = segment_intersection(v(-1.0, 0.0), v(1.0, 0.0), v(0.0, -1.0), v(0.0, 1.0));
        assert_eq!(hit, Some(v(0.0, 0.0)));
    }

    #[test]
    fn test_vertical_segment_handled() {
        let hit = segment_intersection(v(2.0, -5.0), v(2.0, 5.0), v(0.0, 1.0), v(4.0, 1.0));
        let p = hit.expect("should intersect");
        assert!((p - v(2.0, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_parallel_segments_do_not_intersect() {
        assert_eq!(
            segment_intersection(v(0.0, 0.0), v(4.0, 0.0), v(0.0, 1.0), v(4.0, 1.0)),
            None
        );
    }

    #[test]
    fn test_collinear_segments_do_not_intersect() {
        assert_eq!(
            segment_intersection(v(0.0, 0.0), v(2.0, 0.0), v(1.0, 0.0), v(3.0, 0.0)),
            None
        );
    }

    #[test]
    fn test_shared_endpoint_is_not_a_crossing() {
        // A new segment grown out of a node touching the edge it came from
        assert_eq!(
            segment_intersection(v(0.0, 0.0), v(3.0, 0.0), v(0.0, 0.0), v(0.0, 3.0)),
            None
        );
    }

    #[test]
    fn test_non_overlapping_spans_do_not_intersect() {
        // Lines cross, but outside both segments
        assert_eq!(
            segment_intersection(v(0.0, 0.0), v(1.0, 1.0), v(5.0, 0.0), v(5.0, 10.0)),
            None
        );
    }
}
