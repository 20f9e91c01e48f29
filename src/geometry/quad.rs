//! Quadrilateral measurements
//!
//! A constructed shape is four labeled vertices read in cyclic order
//! A → B → C → D → A. Side i joins vertex i to vertex i+1; angle i sits at vertex i.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Vertex labels in cyclic order
pub const LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// A point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Four vertices of a shape under construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub vertices: [DVec2; 4],
}

impl Quad {
    pub fn new(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> Self {
        Self {
            vertices: [a, b, c, d],
        }
    }

    /// Build from `(x, y)` tuples, mostly for tests and fixtures
    pub fn from_coords(coords: [(f64, f64); 4]) -> Self {
        Self {
            vertices: coords.map(|(x, y)| DVec2::new(x, y)),
        }
    }

    /// Build from a label → point map. Requires exactly the labels A, B, C, D.
    pub fn from_labeled(points: &BTreeMap<String, Point>) -> Option<Self> {
        if points.len() != LABELS.len() {
            return None;
        }
        let mut vertices = [DVec2::ZERO; 4];
        for (slot, label) in vertices.iter_mut().zip(LABELS) {
            *slot = (*points.get(label)?).into();
        }
        Some(Self { vertices })
    }

    /// Back to the labeled form the UI works with
    pub fn to_labeled(&self) -> BTreeMap<String, Point> {
        LABELS
            .iter()
            .zip(self.vertices)
            .map(|(label, v)| (label.to_string(), v.into()))
            .collect()
    }

    /// Side lengths AB, BC, CD, DA
    pub fn side_lengths(&self) -> [f64; 4] {
        let v = &self.vertices;
        std::array::from_fn(|i| v[i].distance(v[(i + 1) % 4]))
    }

    /// Interior angles at A, B, C, D in degrees
    pub fn interior_angles(&self) -> [f64; 4] {
        let v = &self.vertices;
        std::array::from_fn(|i| interior_angle(v[(i + 3) % 4], v[i], v[(i + 1) % 4]))
    }

    /// True when every side is longer than `min_side`
    pub fn is_valid(&self, min_side: f64) -> bool {
        self.side_lengths().iter().all(|&s| s > min_side)
    }
}

/// Angle at `vertex` between the rays to `prev` and `next`, in degrees.
///
/// Law of cosines. Always returns a value in [0, 180]; a zero-length arm yields 0.
pub fn interior_angle(prev: DVec2, vertex: DVec2, next: DVec2) -> f64 {
    let s1 = vertex.distance(prev);
    let s2 = vertex.distance(next);
    let opposite = prev.distance(next);

    if s1 == 0.0 || s2 == 0.0 {
        return 0.0;
    }

    let cos = (s1 * s1 + s2 * s2 - opposite * opposite) / (2.0 * s1 * s2);
    if !cos.is_finite() {
        return 0.0;
    }
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}
