//! Planar helpers used by the polygon masker and the quad marker.

use crate::core::{Line, Point, Rect};
use crate::error::{SoftmaskError, SoftmaskResult};

/// Closed polygon; the last vertex connects back to the first.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices encloses nothing.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let init = Rect::from_points(*first, *first);
        Some(self.points[1..].iter().fold(init, |r, p| r.union_pt(*p)))
    }

    /// Edges as (start, end) pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn longest_edge(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).fold(0.0, f64::max)
    }

    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p.x, p.y, &self.points)
    }

    pub fn distance_to_edge(&self, p: Point) -> f64 {
        distance_to_polygon_edge(p.x, p.y, &self.points)
    }

    pub fn validate(&self) -> SoftmaskResult<()> {
        if let Some(p) = self.points.iter().find(|p| !p.is_finite()) {
            return Err(SoftmaskError::geometry(format!(
                "polygon vertex ({}, {}) is not finite",
                p.x, p.y
            )));
        }
        Ok(())
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Four-corner region marker, corners stored as `[x, y]` pairs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    pub top_left: [f64; 2],
    pub top_right: [f64; 2],
    pub bottom_right: [f64; 2],
    pub bottom_left: [f64; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Quad {
    /// Axis-aligned quad covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            top_left: [rect.x0, rect.y0],
            top_right: [rect.x1, rect.y0],
            bottom_right: [rect.x1, rect.y1],
            bottom_left: [rect.x0, rect.y1],
        }
    }

    /// Corners clockwise from top-left (in y-down buffer space).
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
        .map(|[x, y]| Point::new(x, y))
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }

    pub fn edges(&self) -> [(QuadEdge, Point, Point); 4] {
        let [tl, tr, br, bl] = self.corners();
        [
            (QuadEdge::Top, tl, tr),
            (QuadEdge::Right, tr, br),
            (QuadEdge::Bottom, br, bl),
            (QuadEdge::Left, bl, tl),
        ]
    }

    pub fn centroid(&self) -> Point {
        let c = self.corners();
        let sum = c.iter().fold((0.0, 0.0), |acc, p| (acc.0 + p.x, acc.1 + p.y));
        Point::new(sum.0 / 4.0, sum.1 / 4.0)
    }

    /// Only non-finite corners are rejected. Coincident corners collapse the
    /// quad to a triangle or a degenerate polygon, which erases as a lasso
    /// would.
    pub fn validate(&self) -> SoftmaskResult<()> {
        self.to_polygon().validate()
    }
}

/// Even-odd ray casting toward +x.
///
/// Crossings count only when the intersection lies strictly right of `x`, so
/// points on a left or top edge classify as inside and points on a right or
/// bottom edge as outside.
pub fn point_in_polygon(x: f64, y: f64, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > y) != (pj.y > y) {
            let cross_x = (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x;
            if x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Distance from `(px, py)` to the closest point of segment `(x1, y1)-(x2, y2)`.
pub fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = x1 + t * dx;
    let cy = y1 + t * dy;
    (px - cx).hypot(py - cy)
}

/// Minimum segment distance over all edges, closing edge included.
///
/// An empty slice yields `f64::INFINITY`.
pub fn distance_to_polygon_edge(x: f64, y: f64, polygon: &[Point]) -> f64 {
    let n = polygon.len();
    let mut best = f64::INFINITY;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        best = best.min(distance_to_segment(x, y, a.x, a.y, b.x, b.y));
    }
    best
}

/// Parameter range `[t0, t1]` of `line` that lies inside `rect` (edges
/// included), by Liang-Barsky clipping. `None` when the segment misses it.
pub fn clip_segment(line: Line, rect: Rect) -> Option<(f64, f64)> {
    let d = line.p1 - line.p0;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, line.p0.x - rect.x0),
        (d.x, rect.x1 - line.p0.x),
        (-d.y, line.p0.y - rect.y0),
        (d.y, rect.y1 - line.p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    #[test]
    fn square_membership() {
        let sq = square();
        assert!(point_in_polygon(5.0, 5.0, sq.points()));
        assert!(!point_in_polygon(-1.0, 5.0, sq.points()));
        assert!(!point_in_polygon(11.0, 5.0, sq.points()));
        assert!(!point_in_polygon(5.0, -0.5, sq.points()));
    }

    #[test]
    fn square_boundary_is_half_open() {
        let sq = square();
        assert!(!point_in_polygon(10.0, 5.0, sq.points()));
        assert!(point_in_polygon(0.0, 5.0, sq.points()));
        assert!(point_in_polygon(5.0, 0.0, sq.points()));
        assert!(!point_in_polygon(5.0, 10.0, sq.points()));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // U shape opening upward.
        let u = Polygon::from_xy(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 7.0),
            (7.0, 7.0),
            (7.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        assert!(!u.contains(Point::new(5.0, 3.0)));
        assert!(u.contains(Point::new(1.5, 3.0)));
        assert!(u.contains(Point::new(5.0, 8.5)));
    }

    #[test]
    fn fewer_than_three_points_contain_nothing() {
        let line = Polygon::from_xy(&[(0.0, 0.0), (10.0, 10.0)]);
        assert!(line.is_degenerate());
        assert!(!line.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn segment_distance_perpendicular_and_clamped() {
        assert_eq!(distance_to_segment(5.0, 5.0, 0.0, 0.0, 10.0, 0.0), 5.0);
        assert_eq!(distance_to_segment(-5.0, 0.0, 0.0, 0.0, 10.0, 0.0), 5.0);
        assert_eq!(distance_to_segment(13.0, 4.0, 0.0, 0.0, 10.0, 0.0), 5.0);
    }

    #[test]
    fn zero_length_segment_is_point_distance() {
        assert_eq!(distance_to_segment(3.0, 4.0, 0.0, 0.0, 0.0, 0.0), 5.0);
    }

    #[test]
    fn polygon_edge_distance_includes_closing_edge() {
        let sq = square();
        assert_eq!(sq.distance_to_edge(Point::new(5.0, 5.0)), 5.0);
        // Nearest edge is the closing edge (0,10)->(0,0).
        assert_eq!(sq.distance_to_edge(Point::new(1.0, 5.0)), 1.0);
        assert_eq!(distance_to_polygon_edge(1.0, 1.0, &[]), f64::INFINITY);
        assert_eq!(
            distance_to_polygon_edge(3.0, 4.0, &[Point::new(0.0, 0.0)]),
            5.0
        );
    }

    #[test]
    fn bounds_and_longest_edge() {
        let tri = Polygon::from_xy(&[(2.0, 1.0), (8.0, 1.0), (2.0, 9.0)]);
        assert_eq!(tri.bounds(), Some(Rect::new(2.0, 1.0, 8.0, 9.0)));
        assert_eq!(tri.longest_edge(), 10.0);
        assert_eq!(Polygon::default().bounds(), None);
    }

    #[test]
    fn non_finite_vertex_is_rejected() {
        let p = Polygon::from_xy(&[(0.0, 0.0), (f64::NAN, 1.0), (2.0, 2.0)]);
        assert!(p.validate().is_err());
        assert!(square().validate().is_ok());
    }

    #[test]
    fn quad_polygon_follows_corner_order() {
        let q = Quad::from_rect(Rect::new(1.0, 2.0, 5.0, 6.0));
        let pts = q.to_polygon();
        assert_eq!(
            pts.points(),
            &[
                Point::new(1.0, 2.0),
                Point::new(5.0, 2.0),
                Point::new(5.0, 6.0),
                Point::new(1.0, 6.0),
            ]
        );
        assert_eq!(q.centroid(), Point::new(3.0, 4.0));
        assert_eq!(q.edges()[2].0, QuadEdge::Bottom);
        q.validate().unwrap();
    }

    #[test]
    fn quad_with_coincident_corners_is_a_triangle() {
        let q = Quad {
            top_left: [0.0, 0.0],
            top_right: [0.0, 0.0],
            bottom_right: [4.0, 4.0],
            bottom_left: [0.0, 4.0],
        };
        q.validate().unwrap();
        assert!(q.to_polygon().contains(Point::new(1.0, 3.0)));
        assert!(!q.to_polygon().contains(Point::new(3.0, 1.0)));

        let nan = Quad {
            bottom_left: [f64::NAN, 4.0],
            ..q
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn clip_segment_ranges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let across = Line::new((-10.0, 5.0), (20.0, 5.0));
        let (t0, t1) = clip_segment(across, r).unwrap();
        assert!((t0 - 1.0 / 3.0).abs() < 1e-12);
        assert!((t1 - 2.0 / 3.0).abs() < 1e-12);

        let inside = Line::new((1.0, 1.0), (9.0, 2.0));
        assert_eq!(clip_segment(inside, r), Some((0.0, 1.0)));

        let above = Line::new((-10.0, -1.0), (20.0, -1.0));
        assert_eq!(clip_segment(above, r), None);
        let diagonal_miss = Line::new((-5.0, 8.0), (2.0, 20.0));
        assert_eq!(clip_segment(diagonal_miss, r), None);

        let point = Line::new((3.0, 3.0), (3.0, 3.0));
        assert_eq!(clip_segment(point, r), Some((0.0, 1.0)));
    }

    #[test]
    fn quad_deserializes_from_corner_pairs() {
        let q: Quad = serde_json::from_str(
            r#"{"top_left":[10,20],"top_right":[90,25],"bottom_right":[95,80],"bottom_left":[5,75]}"#,
        )
        .unwrap();
        assert_eq!(q.top_right, [90.0, 25.0]);
        assert!(q.to_polygon().contains(Point::new(50.0, 50.0)));
    }
}
