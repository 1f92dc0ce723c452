use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Segments shorter than this (squared) are degenerate and never hit.
const DEGENERATE_LEN2: f64 = 1e-2;

/// A vector (or point) in the 2D plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar cross product: zero iff the vectors are collinear.
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        (*other - *self).length_squared()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// True iff `q` lies strictly inside the disc of radius `tol` around `p`.
pub fn hit_node(p: Vec2, tol: f64, q: Vec2) -> bool {
    p.distance_squared_to(&q) < tol * tol
}

/// True iff `q` is within `tol` of the segment `a`..`b`.
///
/// The projection of `q` onto the infinite line through `a`, `b` must land
/// within the closed segment extended by `tol` on either end, and the
/// perpendicular distance must be at most `tol`. All comparisons are against
/// squared quantities scaled by the segment length, so no square root is
/// taken. Degenerate segments never hit.
pub fn hit_segment(a: Vec2, b: Vec2, tol: f64, q: Vec2) -> bool {
    let d = b - a;
    let len2 = d.length_squared();
    if len2 < DEGENERATE_LEN2 {
        return false;
    }

    let w = q - a;
    let proj = w.dot(&d); // t * len2 where t is the line parameter
    let tol2_len2 = tol * tol * len2;

    // Axial window: t in [-tol/|d|, 1 + tol/|d|], i.e. proj in
    // [-tol*|d|, len2 + tol*|d|], compared squared.
    if proj < 0.0 && proj * proj > tol2_len2 {
        return false;
    }
    if proj > len2 && (proj - len2) * (proj - len2) > tol2_len2 {
        return false;
    }

    // Perpendicular distance: dist^2 = |w|^2 - proj^2/len2 <= tol^2.
    w.length_squared() * len2 - proj * proj <= tol2_len2
}
