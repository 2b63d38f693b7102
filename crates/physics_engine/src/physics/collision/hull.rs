//! 2D convex hull and polygon area
//!
//! Used to measure the silhouette of a box projected onto the plane
//! perpendicular to its direction of travel.

use crate::foundation::math::Vec2;

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull of a point set, counter-clockwise, without collinear points
///
/// Andrew's monotone chain. Fewer than three distinct points are returned
/// as-is (sorted).
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let mut sorted: Vec<Vec2> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| (*a - *b).magnitude_squared() < 1.0e-12);

    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Vec2> = Vec::with_capacity(sorted.len() * 2);

    // Lower chain
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper chain
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Last point repeats the first
    hull.pop();
    hull
}

/// Area of a simple polygon (shoelace formula)
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice_area: f32 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice_area.abs() * 0.5
}
