//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`].
    ///
    /// * `pos`    – the position in model space
    /// * `normal` – (optionally non‑unit) normal; it is **copied verbatim**,
    ///   only non-finite components are zeroed.
    #[inline]
    pub fn new(mut pos: Point3<Real>, mut normal: Vector3<Real>) -> Self {
        // Sanitise position
        for c in pos.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        // Sanitise normal
        for c in normal.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        Vertex { pos, normal }
    }

    /// Flip vertex normal in place.
    ///
    /// # Example
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use csgshell::mesh::vertex::Vertex;
    /// let mut v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::x());
    /// v.flip();
    /// assert_eq!(v.pos, Point3::new(1.0, 2.0, 3.0), "position remains the same");
    /// assert_eq!(v.normal, -Vector3::x(), "the normal is negated");
    /// ```
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Return the linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Normals are linearly interpolated as well.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        // p(t) = p0 + t * (p1 - p0)
        let new_pos = self.pos + (other.pos - self.pos) * t;

        // n(t) = n0 + t * (n1 - n0)
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }

    /// Euclidean distance between vertex positions.
    pub fn distance_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm()
    }
}
