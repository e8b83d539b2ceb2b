//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::float_types::{
    Real,
    parry3d::{
        bounding_volume::{Aabb, BoundingVolume},
        query::{Ray, RayCast},
        shape::Triangle,
    },
    tolerance,
};
use crate::mesh::{bsp::Node, plane::Plane, polygon::Polygon, vertex::Vertex};
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3, Vector3};
use std::{fmt::Debug, sync::OnceLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
pub mod convex_hull;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// Direction used for parity ray casts; deliberately not aligned with any
/// axis or diagonal so rays do not graze the edges of axis-aligned models.
pub(crate) const PARITY_RAY_DIRECTION: [Real; 3] = [0.5773, 0.6411, 0.5059];

/// A polygon soup, the working representation of the BSP boolean kernel.
///
/// Unlike [`Solid`](crate::solid::Solid) a `Mesh` carries no topological
/// guarantees; BSP results may contain T-junctions and slivers until they
/// are welded back into a `Solid`.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Helper to collect all vertices from the Mesh.
    #[cfg(not(feature = "parallel"))]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Parallel helper to collect all vertices from the Mesh.
    #[cfg(feature = "parallel")]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .par_iter()
            .flat_map_iter(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Signed enclosed volume (divergence theorem over the fan triangulation).
    /// Positive for an outward-oriented closed surface.
    pub fn signed_volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|poly| poly.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Casts a ray defined by `origin` + t * `direction` against all triangles
    /// of this Mesh and returns a list of (intersection_point, distance),
    /// sorted by ascending distance. Hits closer than the tolerance to each
    /// other are merged.
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);

        let mut hits: Vec<(Point3<Real>, Real)> = self
            .polygons
            .iter()
            .flat_map(|poly| poly.triangulate())
            .filter_map(|[a, b, c]| {
                let triangle = Triangle::new(a.pos, b.pos, c.pos);
                triangle
                    .cast_local_ray(&ray, Real::MAX, true)
                    .map(|toi| (ray.point_at(toi), toi))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        let eps = tolerance();
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < eps);

        hits
    }

    /// Parity test: is `point` inside the closed surface?
    ///
    /// ## Example
    /// ```
    /// # use csgshell::mesh::Mesh;
    /// # use nalgebra::Point3;
    /// let cube = Mesh::<()>::cube(6.0, None);
    ///
    /// assert!(cube.contains_point(&Point3::new(3.0, 3.0, 3.0)));
    /// assert!(cube.contains_point(&Point3::new(1.0, 2.0, 5.9)));
    ///
    /// assert!(!cube.contains_point(&Point3::new(3.0, 3.0, 6.5)));
    /// assert!(!cube.contains_point(&Point3::new(3.0, 3.0, -6.0)));
    /// ```
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        self.ray_intersections(point, &Vector3::from(PARITY_RAY_DIRECTION))
            .len()
            % 2
            == 1
    }

    /// True when the bounding boxes of both meshes overlap.
    fn may_touch(&self, other: &Mesh<S>) -> bool {
        self.bounding_box().intersects(&other.bounding_box())
    }

    fn with_polygons(&self, polygons: Vec<Polygon<S>>) -> Mesh<S> {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<S: Clone + Send + Sync + Debug> CSGOps for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```no_run
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        if other.polygons.is_empty() {
            return self.clone();
        }
        if self.polygons.is_empty() {
            return self.with_polygons(other.polygons.clone());
        }
        if !self.may_touch(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend(other.polygons.iter().cloned());
            return self.with_polygons(polygons);
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        self.with_polygons(a.all_polygons())
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```no_run
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() || other.polygons.is_empty() || !self.may_touch(other) {
            return self.clone();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        self.with_polygons(a.all_polygons())
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```no_run
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        if self.polygons.is_empty() || other.polygons.is_empty() || !self.may_touch(other) {
            return self.with_polygons(Vec::new());
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        self.with_polygons(a.all_polygons())
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// Transforms with a negative determinant mirror the geometry, so the
    /// winding is reversed to keep normals pointing outward.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let normal_matrix = mat.try_inverse().map(|inv| inv.transpose());
        let mirrored = mat.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        let mut mesh = self.clone();

        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                vert.pos = mat.transform_point(&vert.pos);
                if let Some(normal_matrix) = &normal_matrix {
                    vert.normal = normal_matrix.transform_vector(&vert.normal);
                    if vert.normal.norm_squared() > 0.0 {
                        vert.normal.normalize_mut();
                    }
                }
            }

            if mirrored {
                poly.vertices.reverse();
            }
            // keep the cached plane consistent with the new vertex positions
            poly.plane = Plane::from_vertices(&poly.vertices);
            poly.bounding_box = OnceLock::new();
            if normal_matrix.is_none() {
                poly.set_new_normal();
            }
        }

        mesh.bounding_box = OnceLock::new();
        mesh
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for poly in &self.polygons {
                for v in &poly.vertices {
                    mins = mins.inf(&v.pos);
                    maxs = maxs.sup(&v.pos);
                }
            }

            // no polygons => trivial AABB at origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }
}
