//! `Plane` struct and the splitting routines the BSP tree is built on.

use crate::float_types::{EPSILON, Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

// Plane classification bits
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane `normal · p = w`, with a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal
    pub w: Real,
}

impl Plane {
    /// Create a new plane from a (not necessarily unit) normal and offset.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len < EPSILON {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Create a plane from three points.
    /// The normal direction follows the right-hand rule: (p2-p1) × (p3-p1)
    pub fn from_points(p1: Point3<Real>, p2: Point3<Real>, p3: Point3<Real>) -> Self {
        let normal = (p2 - p1).cross(&(p3 - p1));

        if normal.norm_squared() < EPSILON * EPSILON {
            // Degenerate triangle, return default plane
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let normal = normal.normalize();
        let w = normal.dot(&p1.coords);
        Plane { normal, w }
    }

    /// Fit a plane to a polygon's vertices.
    ///
    /// The normal comes from Newell's method, so it agrees with the winding
    /// even when the first three vertices are nearly collinear.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }
        if n == 3 {
            return Self::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos);
        }

        let normal = vertices.iter().zip(vertices.iter().cycle().skip(1)).fold(
            Vector3::zeros(),
            |acc, (curr, next)| acc + curr.pos.coords.cross(&next.pos.coords),
        );
        if normal.norm_squared() < EPSILON * EPSILON {
            return Self::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos);
        }
        let normal = normal.normalize();

        // average offset, robust against small non-planarity
        let w = vertices.iter().map(|v| normal.dot(&v.pos.coords)).sum::<Real>() / n as Real;
        Plane { normal, w }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane, positive in front.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point relative to the plane, treating anything within the
    /// global tolerance as coplanar.
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.signed_distance(point);
        let eps = tolerance();
        if distance > eps {
            FRONT
        } else if distance < -eps {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of COPLANAR, FRONT, and BACK.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Orientation of a coplanar polygon's plane relative to this one:
    /// FRONT when both normals agree, BACK otherwise.
    pub fn orient_plane(&self, other_plane: &Plane) -> i8 {
        if self.normal.dot(&other_plane.normal) > 0.0 {
            FRONT
        } else {
            BACK
        }
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone + Send + Sync + Debug>(
        &self,
        polygon: &Polygon<S>,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.orient_plane(&polygon.plane) == FRONT {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut split_front = Vec::<Vertex>::with_capacity(polygon.vertices.len() + 1);
                let mut split_back = Vec::<Vertex>::with_capacity(polygon.vertices.len() + 1);
                let count = polygon.vertices.len();

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let (vertex_i, vertex_j) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if type_i != BACK {
                        split_front.push(*vertex_i);
                    }
                    if type_i != FRONT {
                        split_back.push(*vertex_i);
                    }

                    // the edge crosses the plane, both halves get the crossing point
                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t.clamp(0.0, 1.0));
                            split_front.push(crossing);
                            split_back.push(crossing);
                        }
                    }
                }

                // Keep the parent plane; recomputing it from the pieces drifts
                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(
                        split_front,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(
                        split_back,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
