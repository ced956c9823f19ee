//! Gift-wrapping convex hull, and the convex hull trick for DP optimization.
pub mod cht;

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HullError {
    #[error("cannot take the hull of no points")]
    EmptyInput,
    #[error("slopes must be added in non-increasing order")]
    SlopeOrder,
    #[error("query points must be non-decreasing")]
    QueryOrder,
    #[error("no lines have been added")]
    NoLines,
}

pub type Result<T> = std::result::Result<T, HullError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    fn dist2(self, other: Point) -> i128 {
        let dx = (other.x - self.x) as i128;
        let dy = (other.y - self.y) as i128;
        dx * dx + dy * dy
    }
}

/// Cross product of pq and pr: positive when r is counterclockwise of q seen from p.
pub fn orientation(p: Point, q: Point, r: Point) -> i128 {
    (q.x - p.x) as i128 * (r.y - p.y) as i128 - (r.x - p.x) as i128 * (q.y - p.y) as i128
}

/// Vertices of the convex hull in counterclockwise order, starting at the lowest
/// (then leftmost) point. Points in the interior of a hull edge are left out.
///
/// Gift wrapping: O(nh) for h hull vertices.
pub fn convex_hull(points: &[Point]) -> Result<Vec<Point>> {
    let mut points = points.to_vec();
    points.sort();
    points.dedup();
    let start = *points
        .iter()
        .min_by_key(|p| (p.y, p.x))
        .ok_or(HullError::EmptyInput)?;

    let mut hull = vec![];
    let mut p = start;
    loop {
        hull.push(p);
        // The next vertex q has every other point on its left, or on pq but closer.
        let mut q = if points[0] == p { points[points.len() - 1] } else { points[0] };
        for &r in &points {
            let o = orientation(p, q, r);
            if o < 0 || (o == 0 && p.dist2(r) > p.dist2(q)) {
                q = r;
            }
        }
        p = q;
        if p == start {
            break;
        }
        debug_assert!(hull.len() <= points.len());
    }
    debug!("hull: {} of {} points", hull.len(), points.len());
    Ok(hull)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use itertools::Itertools;
    use rand::Rng;

    #[test]
    fn square() {
        let pts = [(0, 0), (2, 0), (2, 2), (0, 2), (1, 1), (1, 0), (0, 1), (2, 2)]
            .map(|(x, y)| Point::new(x, y));
        let hull = convex_hull(&pts).unwrap();
        assert!(hull == [(0, 0), (2, 0), (2, 2), (0, 2)].map(|(x, y)| Point::new(x, y)));
    }

    #[test]
    fn degenerate() {
        let p = Point::new(3, -1);
        assert!(convex_hull(&[p]).unwrap() == vec![p]);
        assert!(convex_hull(&[p, p, p]).unwrap() == vec![p]);
        let line = (0..5).map(|i| Point::new(i, 2 * i)).collect_vec();
        assert!(convex_hull(&line).unwrap() == vec![line[0], line[4]]);
        assert!(convex_hull(&[]).unwrap_err() == HullError::EmptyInput);
    }

    #[test]
    fn random_properties() {
        let mut rng = rand::thread_rng();
        for n in (1..10).chain([50, 200]) {
            for _ in 0..20 {
                let pts = (0..n)
                    .map(|_| Point::new(rng.gen_range(-10..=10), rng.gen_range(-10..=10)))
                    .collect_vec();
                let hull = convex_hull(&pts).unwrap();
                let h = hull.len();
                assert!(hull.iter().all(|p| pts.contains(p)));
                assert!(hull.iter().all_unique());
                if h < 3 {
                    // All points lie on the segment between the hull points.
                    assert!(pts.iter().all(|&r| orientation(hull[0], hull[h - 1], r) == 0));
                    continue;
                }
                for i in 0..h {
                    let (a, b, c) = (hull[i], hull[(i + 1) % h], hull[(i + 2) % h]);
                    // Strict left turns only.
                    assert!(orientation(a, b, c) > 0, "n={n} pts={pts:?}");
                    // No point right of an edge.
                    assert!(pts.iter().all(|&r| orientation(a, b, r) >= 0));
                }
                // Every point that is not inside any triangle of others is a vertex.
                for &p in &pts {
                    let on_hull = hull.contains(&p);
                    let strictly_inside_edge = (0..h).any(|i| {
                        let (a, b) = (hull[i], hull[(i + 1) % h]);
                        orientation(a, b, p) == 0 && a != p && b != p
                    });
                    let inside = (0..h).all(|i| orientation(hull[i], hull[(i + 1) % h], p) > 0);
                    assert!(on_hull || strictly_inside_edge || inside);
                }
            }
        }
    }
}
