//! Convex planar polygons, the unit the BSP tree splits and classifies.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;
use std::sync::OnceLock;

/// A convex polygon in 3D with a cached supporting plane.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    /// Vertices in counter-clockwise order seen from the front
    pub vertices: Vec<Vertex>,

    /// The plane on which this polygon lies
    pub plane: Plane,

    /// Lazily-computed bounding box
    pub bounding_box: OnceLock<Aabb>,

    /// Generic metadata carried through CSG operations
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
            && self.plane == other.plane
            && self.metadata == other.metadata
    }
}

impl<S: Clone + Send + Sync> Polygon<S> {
    /// Create a polygon from vertices, fitting its plane.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Create a polygon on a known plane, used when splitting.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Axis aligned bounding box of this polygon.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Reverse winding order, flip vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Fan-triangulate this convex polygon.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let anchor = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor, pair[0], pair[1]])
            .collect()
    }

    /// Recompute this polygon's plane and assign its normal to every vertex.
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }
}
