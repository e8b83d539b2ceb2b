//! A trait for any shape which can be represented by triangles

use crate::mesh::{Mesh, vertex::Vertex};
use crate::solid::Solid;
use nalgebra::Vector3;
use std::fmt::Debug;

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can automatically use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[v0, v1, v2]` with positions+normals.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]);
}

impl<S: Clone + Debug + Send + Sync> Triangulated3D for Mesh<S> {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for poly in &self.polygons {
            for tri in poly.triangulate() {
                f(tri);
            }
        }
    }
}

impl Triangulated3D for Solid {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for [a, b, c] in self.triangle_positions() {
            let normal = (b - a).cross(&(c - a));
            let normal = if normal.norm_squared() > 0.0 {
                normal.normalize()
            } else {
                Vector3::zeros()
            };
            f([a, b, c].map(|p| Vertex::new(p, normal)));
        }
    }
}
