//! # Point Classifier
//!
//! Even-odd ray casting: cast a ray from the point toward increasing
//! longitude and count polygon edges it crosses. An odd count means the
//! point is inside.
//!
//! O(n) in vertex count with no preprocessing. Zones have a handful of
//! vertices each, so a spatial index would cost more than it saves.
//!
//! ## Boundary Policy
//!
//! Points exactly on an edge or vertex have no guaranteed classification.
//! Zone boundaries are drawn with margin, so exact hits do not occur in
//! practice. Do not write tests that depend on either answer.

use dzone_core::{GeoPoint, Polygon};

/// Whether `point` lies inside `polygon`.
///
/// Total and pure. Degenerate polygons (fewer than three vertices) contain
/// nothing; a point with a NaN component is never inside.
pub fn is_inside(point: &GeoPoint, polygon: &Polygon) -> bool {
    if polygon.is_degenerate() {
        return false;
    }
    let vertices = polygon.vertices();
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for (i, vi) in vertices.iter().enumerate() {
        let vj = &vertices[j];
        // The straddle test guarantees vi.lat != vj.lat, so the division is safe.
        if (vi.lat > point.lat) != (vj.lat > point.lat) {
            let lng_at_lat = vi.lng + (point.lat - vi.lat) * (vj.lng - vi.lng) / (vj.lat - vi.lat);
            if lng_at_lat > point.lng {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Polygon {
        Polygon::from_pairs(&[(0.0, 0.0), (0.0, size), (size, size), (size, 0.0)])
    }

    #[test]
    fn test_point_inside_square() {
        assert!(is_inside(&GeoPoint::new(5.0, 5.0), &square(10.0)));
        assert!(is_inside(&GeoPoint::new(0.1, 9.9), &square(10.0)));
    }

    #[test]
    fn test_point_outside_square() {
        let sq = square(10.0);
        assert!(!is_inside(&GeoPoint::new(15.0, 5.0), &sq));
        assert!(!is_inside(&GeoPoint::new(5.0, -1.0), &sq));
        assert!(!is_inside(&GeoPoint::new(-0.5, -0.5), &sq));
        assert!(!is_inside(&GeoPoint::new(5.0, 10.5), &sq));
    }

    #[test]
    fn test_triangle() {
        let tri = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
        assert!(is_inside(&GeoPoint::new(5.0, 5.0), &tri));
        assert!(!is_inside(&GeoPoint::new(0.0, 10.0), &tri));
        assert!(!is_inside(&GeoPoint::new(20.0, 5.0), &tri));
    }

    #[test]
    fn test_concave_polygon_notch_is_outside() {
        // U shape opening toward high latitude: notch between lng 3 and 7.
        let u = Polygon::from_pairs(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (10.0, 7.0),
            (3.0, 7.0),
            (3.0, 3.0),
            (10.0, 3.0),
            (10.0, 0.0),
        ]);
        assert!(!is_inside(&GeoPoint::new(6.0, 5.0), &u));
        assert!(is_inside(&GeoPoint::new(6.0, 1.5), &u));
        assert!(is_inside(&GeoPoint::new(6.0, 8.5), &u));
        assert!(is_inside(&GeoPoint::new(1.5, 5.0), &u));
    }

    #[test]
    fn test_vertex_order_does_not_matter() {
        let cw = Polygon::from_pairs(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let ccw = Polygon::from_pairs(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let p = GeoPoint::new(3.0, 7.0);
        assert_eq!(is_inside(&p, &cw), is_inside(&p, &ccw));
    }

    #[test]
    fn test_degenerate_polygons_contain_nothing() {
        let p = GeoPoint::new(0.0, 0.0);
        assert!(!is_inside(&p, &Polygon::new(vec![])));
        assert!(!is_inside(&p, &Polygon::from_pairs(&[(0.0, 0.0)])));
        assert!(!is_inside(&p, &Polygon::from_pairs(&[(-1.0, -1.0), (1.0, 1.0)])));
    }

    #[test]
    fn test_nan_point_is_outside() {
        assert!(!is_inside(&GeoPoint::new(f64::NAN, 5.0), &square(10.0)));
        assert!(!is_inside(&GeoPoint::new(5.0, f64::NAN), &square(10.0)));
    }

    #[test]
    fn test_real_world_coordinates() {
        let poly = Polygon::from_pairs(&[
            (45.795, 15.940),
            (45.795, 16.020),
            (45.830, 16.020),
            (45.830, 15.940),
        ]);
        assert!(is_inside(&GeoPoint::new(45.8131, 15.9775), &poly));
        assert!(!is_inside(&GeoPoint::new(45.7700, 15.9775), &poly));
    }
}
