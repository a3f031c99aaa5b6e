//! Small 3-D geometry helpers over frame-normalized coordinates
//!
//! Screen-space convention: `x` grows to the right, `y` grows downward,
//! `z` is the pose source's relative depth (negative = toward the camera).

use serde::{Deserialize, Serialize};

/// Numerical stability epsilon
pub const EPSILON: f32 = 1e-6;

/// A 3-D point in frame-normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// Horizontal position (0 = left edge, 1 = right edge)
    pub x: f32,
    /// Vertical position (0 = top edge, 1 = bottom edge)
    pub y: f32,
    /// Relative depth
    pub z: f32,
}

impl Point3 {
    /// Create a point
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise difference `self - other`
    pub fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Component-wise sum
    pub fn add(self, other: Point3) -> Point3 {
        Point3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Scale every component
    pub fn scale(self, factor: f32) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Point3) -> Point3 {
        self.add(other).scale(0.5)
    }

    /// Extend the vector `from -> self` beyond `self` by `factor` times its length
    pub fn extend_from(self, from: Point3, factor: f32) -> Point3 {
        self.add(self.sub(from).scale(factor))
    }

    /// Image-plane (x, y) distance
    pub fn distance_2d(self, other: Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether every component is finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Orientation of the line `a -> b` in the x–z (top-down) plane, in degrees
pub fn heading_xz_deg(a: Point3, b: Point3) -> f32 {
    let d = b.sub(a);
    d.z.atan2(d.x).to_degrees()
}

/// Smallest absolute difference between two headings, in [0, 180] degrees
pub fn heading_difference_deg(a: f32, b: f32) -> f32 {
    let mut diff = (a - b) % 360.0;
    if diff < 0.0 {
        diff += 360.0;
    }
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Tilt of the segment `from -> to` away from screen-vertical, in [0, 180] degrees
pub fn tilt_from_vertical_deg(from: Point3, to: Point3) -> f32 {
    let d = to.sub(from);
    // Screen "up" is negative y
    d.x.abs().atan2(-d.y).to_degrees()
}

/// Angle of the segment `from -> to` above or below horizontal, in [0, 90] degrees
pub fn inclination_deg(from: Point3, to: Point3) -> Option<f32> {
    let d = to.sub(from);
    if d.x.abs() < EPSILON && d.y.abs() < EPSILON {
        return None;
    }
    Some(d.y.abs().atan2(d.x.abs()).to_degrees())
}

/// Interior angle at `vertex` formed by `a` and `b` in the image plane, in degrees
pub fn joint_angle_deg(a: Point3, vertex: Point3, b: Point3) -> Option<f32> {
    let (ax, ay) = (a.x - vertex.x, a.y - vertex.y);
    let (bx, by) = (b.x - vertex.x, b.y - vertex.y);
    let na = (ax * ax + ay * ay).sqrt();
    let nb = (bx * bx + by * by).sqrt();
    if na < EPSILON || nb < EPSILON {
        return None;
    }
    let cos = ((ax * bx + ay * by) / (na * nb)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Interior angle at `vertex` formed by `a` and `b` using depth, in degrees
pub fn joint_angle_3d_deg(a: Point3, vertex: Point3, b: Point3) -> Option<f32> {
    let u = a.sub(vertex);
    let v = b.sub(vertex);
    let nu = (u.x * u.x + u.y * u.y + u.z * u.z).sqrt();
    let nv = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
    if nu < EPSILON || nv < EPSILON {
        return None;
    }
    let cos = ((u.x * v.x + u.y * v.y + u.z * v.z) / (nu * nv)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}
