//! Geometric primitives for document boundary estimation.
//!
//! This module provides the point, box, and polygon types used throughout
//! the pipeline, together with the algorithms boundary detection relies on:
//! shoelace area, closed perimeter, Douglas-Peucker simplification of
//! closed contours, corner ordering, and the raster-to-page coordinate
//! flip used at composition time.

use crate::core::ScanError;
use imageproc::contours::Contour;
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates in raster pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned box in integer pixel coordinates.
///
/// Serializes as a `[x1, y1, x2, y2]` array, which is the shape the
/// rendering collaborator consumes across the system boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Rect {
    /// X-coordinate of the left edge.
    pub x1: i32,
    /// Y-coordinate of the top edge (raster space) or bottom edge (page space).
    pub y1: i32,
    /// X-coordinate of the right edge.
    pub x2: i32,
    /// Y-coordinate of the bottom edge (raster space) or top edge (page space).
    pub y2: i32,
}

impl Rect {
    /// Creates a new box from corner coordinates.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width of the box.
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height of the box.
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Converts this box from raster space (origin top-left, y grows
    /// downward) to page space (origin bottom-left, y grows upward).
    ///
    /// Self-inverse: flipping twice with the same `page_height` returns the
    /// original box.
    pub fn flip_to_page_space(&self, page_height: i32) -> Rect {
        Rect {
            x1: self.x1,
            y1: page_height - self.y2,
            x2: self.x2,
            y2: page_height - self.y1,
        }
    }
}

impl From<[i32; 4]> for Rect {
    fn from(v: [i32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [i32; 4] {
    fn from(r: Rect) -> Self {
        [r.x1, r.y1, r.x2, r.y2]
    }
}

/// A closed contour polygon with floating-point vertices.
///
/// The closing edge from the last vertex back to the first is implicit:
/// `area` and `perimeter` both account for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    /// The vertices of the polygon, in boundary order.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a polygon from an imageproc contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        Self { points }
    }

    /// Calculates the enclosed area using the shoelace formula.
    ///
    /// Returns 0.0 if the polygon has fewer than 3 vertices.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Calculates the closed perimeter of the polygon.
    pub fn perimeter(&self) -> f32 {
        let mut perimeter = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            perimeter += self.points[i].distance(&self.points[j]);
        }
        perimeter
    }

    /// Simplifies the closed contour using the Douglas-Peucker algorithm.
    ///
    /// Douglas-Peucker operates on open chains with pinned endpoints, so the
    /// ring is split at two anchor vertices that are guaranteed to survive
    /// simplification: the vertex farthest from the centroid and the vertex
    /// farthest from it. Each half is simplified independently and the
    /// halves are rejoined. A rectangle ring therefore simplifies to
    /// exactly its 4 corners.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum allowed distance between the original contour
    ///   and the simplified one.
    ///
    /// # Returns
    ///
    /// A new `Polygon` with the simplified vertices. Polygons with 3 or
    /// fewer vertices are returned unchanged.
    pub fn approx_poly_closed(&self, epsilon: f32) -> Polygon {
        let n = self.points.len();
        if n <= 3 {
            return self.clone();
        }

        let first = self.anchor_vertex();
        let ring: Vec<Point> = self.points[first..]
            .iter()
            .chain(self.points[..first].iter())
            .copied()
            .collect();

        // Second anchor: the vertex farthest from the first one.
        let mut second = 0;
        let mut best = -1.0f32;
        for (i, p) in ring.iter().enumerate() {
            let dx = p.x - ring[0].x;
            let dy = p.y - ring[0].y;
            let d = dx * dx + dy * dy;
            if d > best {
                best = d;
                second = i;
            }
        }
        if second == 0 {
            // Every vertex coincides with the anchor.
            return self.clone();
        }

        let mut leading = Vec::new();
        Self::douglas_peucker(&ring[..=second], epsilon, &mut leading);

        let mut closing_chain: Vec<Point> = ring[second..].to_vec();
        closing_chain.push(ring[0]);
        let mut trailing = Vec::new();
        Self::douglas_peucker(&closing_chain, epsilon, &mut trailing);

        // Drop the shared second anchor and the duplicated ring start.
        leading.pop();
        trailing.pop();
        leading.extend(trailing);
        Polygon::new(leading)
    }

    /// Index of the vertex farthest from the centroid. Such a vertex lies
    /// on the convex hull, so simplification never removes it.
    fn anchor_vertex(&self) -> usize {
        let n = self.points.len() as f32;
        let cx = self.points.iter().map(|p| p.x).sum::<f32>() / n;
        let cy = self.points.iter().map(|p| p.y).sum::<f32>() / n;

        let mut anchor = 0;
        let mut best = -1.0f32;
        for (i, p) in self.points.iter().enumerate() {
            let dx = p.x - cx;
            let dy = p.y - cy;
            let d = dx * dx + dy * dy;
            if d > best {
                best = d;
                anchor = i;
            }
        }
        anchor
    }

    /// Iterative Douglas-Peucker over an open chain with pinned endpoints.
    fn douglas_peucker(points: &[Point], epsilon: f32, result: &mut Vec<Point>) {
        if points.len() <= 2 {
            result.extend_from_slice(points);
            return;
        }

        let mut stack = Vec::new();
        stack.push((0, points.len() - 1));

        let mut keep = vec![false; points.len()];
        keep[0] = true;
        keep[points.len() - 1] = true;

        const MAX_ITERATIONS: usize = 10000;
        let mut iterations = 0;

        while let Some((start, end)) = stack.pop() {
            iterations += 1;
            if iterations > MAX_ITERATIONS {
                keep.iter_mut()
                    .take(end + 1)
                    .skip(start)
                    .for_each(|k| *k = true);
                break;
            }

            if end - start <= 1 {
                continue;
            }

            let mut max_dist = 0.0;
            let mut max_index = start;
            for i in (start + 1)..end {
                let dist = Self::point_to_line_distance(&points[i], &points[start], &points[end]);
                if dist > max_dist {
                    max_dist = dist;
                    max_index = i;
                }
            }

            if max_dist > epsilon {
                keep[max_index] = true;

                if max_index - start > 1 {
                    stack.push((start, max_index));
                }
                if end - max_index > 1 {
                    stack.push((max_index, end));
                }
            }
        }

        for (i, &should_keep) in keep.iter().enumerate() {
            if should_keep {
                result.push(points[i]);
            }
        }
    }

    /// Perpendicular distance from a point to the line through two points.
    fn point_to_line_distance(point: &Point, line_start: &Point, line_end: &Point) -> f32 {
        let a = line_end.y - line_start.y;
        let b = line_start.x - line_end.x;
        let c = line_end.x * line_start.y - line_start.x * line_end.y;

        let denominator = (a * a + b * b).sqrt();
        if denominator == 0.0 {
            return 0.0;
        }

        (a * point.x + b * point.y + c).abs() / denominator
    }
}

/// An ordered document quadrilateral.
///
/// Corner convention: top-left, top-right, bottom-right, bottom-left in
/// raster space. The boundary detector guarantees no two adjacent corners
/// coincide; the rectifier treats a violation as a contract error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    /// Corner minimizing x + y.
    pub top_left: Point,
    /// Corner maximizing x - y.
    pub top_right: Point,
    /// Corner maximizing x + y.
    pub bottom_right: Point,
    /// Corner minimizing x - y.
    pub bottom_left: Point,
}

impl Quad {
    /// Orders four unordered corner points into the TL/TR/BR/BL convention.
    ///
    /// The top-left corner minimizes x + y and the bottom-right maximizes
    /// it; the top-right corner maximizes x - y and the bottom-left
    /// minimizes it. Ties are broken by input order (first occurrence
    /// wins), so any permutation of the same 4 points produces the same
    /// quad.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidInput` unless exactly 4 points are given.
    /// Other cardinalities are a caller bug, not a degraded outcome.
    pub fn order(points: &[Point]) -> Result<Quad, ScanError> {
        if points.len() != 4 {
            return Err(ScanError::invalid_input(format!(
                "quad ordering requires exactly 4 points, got {}",
                points.len()
            )));
        }

        let mut tl = 0;
        let mut tr = 0;
        let mut br = 0;
        let mut bl = 0;
        for (i, p) in points.iter().enumerate() {
            let sum = p.x + p.y;
            let diff = p.x - p.y;
            if sum < points[tl].x + points[tl].y {
                tl = i;
            }
            if sum > points[br].x + points[br].y {
                br = i;
            }
            if diff > points[tr].x - points[tr].y {
                tr = i;
            }
            if diff < points[bl].x - points[bl].y {
                bl = i;
            }
        }

        Ok(Quad {
            top_left: points[tl],
            top_right: points[tr],
            bottom_right: points[br],
            bottom_left: points[bl],
        })
    }

    /// The quad covering a full `width` by `height` frame.
    ///
    /// Used as the identity fallback when no document boundary is found.
    pub fn full_frame(width: u32, height: u32) -> Quad {
        let (w, h) = (width as f32, height as f32);
        Quad {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(w, 0.0),
            bottom_right: Point::new(w, h),
            bottom_left: Point::new(0.0, h),
        }
    }

    /// The four corners in TL, TR, BR, BL order.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// True if any two adjacent corners coincide.
    pub(crate) fn is_degenerate(&self) -> bool {
        let corners = self.corners();
        (0..4).any(|i| {
            let j = (i + 1) % 4;
            corners[i].distance(&corners[j]) <= f32::EPSILON
        })
    }
}
