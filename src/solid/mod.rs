//! `Solid`, the validated closed triangle surface every pipeline stage
//! consumes and produces.

use crate::errors::ValidationError;
use crate::float_types::{
    Real,
    parry3d::{
        bounding_volume::Aabb,
        query::{Ray, RayCast},
        shape::Triangle,
    },
    tolerance,
};
use crate::mesh::{
    Mesh, PARITY_RAY_DIRECTION, convex_hull::hull_from_points, polygon::Polygon, vertex::Vertex,
};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

mod validate;
pub(crate) mod weld;

pub(crate) use validate::signed_volume;

/// A closed, manifold, outward oriented triangle surface.
///
/// Triangles wind counter-clockwise seen from outside. Every undirected edge
/// is used by exactly two triangles, once in each direction. A `Solid` is
/// never mutated after construction; stages build new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    vertices: Vec<Point3<Real>>,
    triangles: Vec<[usize; 3]>,
}

impl Solid {
    /// Build from shared vertices and index triples, validating the
    /// closed-manifold invariant.
    pub fn from_indexed(vertices: Vec<Point3<Real>>, triangles: Vec<[usize; 3]>) -> Result<Self, ValidationError> {
        validate::check_manifold(&vertices, &triangles)?;
        Ok(Solid {
            vertices,
            triangles,
        })
    }

    /// Build from a triangle soup, welding positions closer than the global
    /// tolerance into shared vertices.
    ///
    /// ```
    /// # use csgshell::solid::Solid;
    /// # use nalgebra::Point3;
    /// let o = Point3::new(0.0, 0.0, 0.0);
    /// let x = Point3::new(1.0, 0.0, 0.0);
    /// let y = Point3::new(0.0, 1.0, 0.0);
    /// let z = Point3::new(0.0, 0.0, 1.0);
    /// let tetra = Solid::from_triangles(&[[o, y, x], [o, x, z], [x, y, z], [o, z, y]]).unwrap();
    /// assert_eq!(tetra.vertices().len(), 4);
    /// assert!((tetra.volume() - 1.0 / 6.0).abs() < 1e-12);
    /// ```
    pub fn from_triangles(triangles: &[[Point3<Real>; 3]]) -> Result<Self, ValidationError> {
        let (vertices, indexed) = weld::weld_triangles(triangles, tolerance());
        Self::from_indexed(vertices, indexed)
    }

    /// Build from the polygon soup of the BSP kernel.
    ///
    /// Polygons are fan triangulated and welded, then slivers are dropped,
    /// coincident opposite faces cancelled and T-junctions split before the
    /// result is validated.
    pub fn from_polygons<S: Clone + Send + Sync>(polygons: &[Polygon<S>]) -> Result<Self, ValidationError> {
        Self::from_polygons_with(polygons, tolerance())
    }

    /// [`Solid::from_polygons`] with an explicit weld and sliver tolerance.
    pub fn from_polygons_with<S: Clone + Send + Sync>(
        polygons: &[Polygon<S>],
        eps: Real,
    ) -> Result<Self, ValidationError> {
        let soup: Vec<[Point3<Real>; 3]> = polygons
            .iter()
            .flat_map(|poly| poly.triangulate())
            .map(|[a, b, c]| [a.pos, b.pos, c.pos])
            .collect();

        let (vertices, triangles) = weld::weld_triangles(&soup, eps);
        let (vertices, triangles) = weld::heal(vertices, triangles, eps);
        if triangles.len() != soup.len() {
            tracing::debug!(
                before = soup.len(),
                after = triangles.len(),
                "healed polygon soup"
            );
        }
        Self::from_indexed(vertices, triangles)
    }

    /// Build from a [`Mesh`], see [`Solid::from_polygons`].
    pub fn from_mesh<S: Clone + Send + Sync + Debug>(mesh: &Mesh<S>) -> Result<Self, ValidationError> {
        Self::from_polygons(&mesh.polygons)
    }

    /// Wrap vertices and triangles without any checks.
    ///
    /// Stages that consume a `Solid` re-check it and report
    /// [`ShellError::MalformedInputSolid`](crate::errors::ShellError::MalformedInputSolid).
    pub const fn new_unchecked(vertices: Vec<Point3<Real>>, triangles: Vec<[usize; 3]>) -> Self {
        Solid {
            vertices,
            triangles,
        }
    }

    /// Re-run the closed-manifold validation.
    pub fn check_manifold(&self) -> Result<(), ValidationError> {
        validate::check_manifold(&self.vertices, &self.triangles)
    }

    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of every triangle.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [Point3<Real>; 3]> + '_ {
        self.triangles
            .iter()
            .map(|tri| tri.map(|idx| self.vertices[idx]))
    }

    /// Enclosed volume, positive for a valid solid.
    pub fn volume(&self) -> Real {
        signed_volume(&self.vertices, &self.triangles)
    }

    /// Axis aligned bounds; a degenerate box at the origin when empty.
    pub fn bounding_box(&self) -> Aabb {
        if self.vertices.is_empty() {
            return Aabb::new(Point3::origin(), Point3::origin());
        }
        Aabb::from_points(&self.vertices)
    }

    /// True when the solid equals its own convex hull, up to a relative
    /// volume tolerance.
    pub fn is_convex(&self) -> bool {
        let Some(hull) = hull_from_points::<()>(&self.vertices, None) else {
            return false;
        };
        let hull_volume = hull.signed_volume();
        hull_volume - self.volume() <= tolerance() * hull_volume.abs().max(1.0)
    }

    /// Parity test: does the surface enclose `point`?
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        let ray = Ray::new(*point, Vector3::from(PARITY_RAY_DIRECTION));
        let mut hits: Vec<Real> = self
            .triangle_positions()
            .filter_map(|[a, b, c]| Triangle::new(a, b, c).cast_local_ray(&ray, Real::MAX, true))
            .collect();
        hits.sort_by(|a, b| a.total_cmp(b));
        let eps = tolerance();
        hits.dedup_by(|a, b| (*a - *b).abs() < eps);
        hits.len() % 2 == 1
    }

    /// Same topology with every vertex moved by `f`. Only valid for maps
    /// that keep orientation (positive scales, translations).
    pub(crate) fn map_vertices(&self, f: impl Fn(&Point3<Real>) -> Point3<Real>) -> Solid {
        Solid {
            vertices: self.vertices.iter().map(f).collect(),
            triangles: self.triangles.clone(),
        }
    }

    /// Polygon soup for the BSP kernel, one flat-shaded triangle per face.
    pub fn to_mesh<S: Clone + Send + Sync + Debug>(&self, metadata: Option<S>) -> Mesh<S> {
        let polygons: Vec<Polygon<S>> = self
            .triangle_positions()
            .map(|[a, b, c]| {
                let normal = (b - a).cross(&(c - a));
                let normal = if normal.norm_squared() > 0.0 {
                    normal.normalize()
                } else {
                    Vector3::z()
                };
                Polygon::new(
                    vec![
                        Vertex::new(a, normal),
                        Vertex::new(b, normal),
                        Vertex::new(c, normal),
                    ],
                    metadata.clone(),
                )
            })
            .collect();
        Mesh::from_polygons(&polygons, metadata)
    }

    /// Compare two solids up to `epsilon`: both have the same vertex
    /// positions and the same triangles, in any order and any rotation of
    /// their corners.
    pub fn approx_eq(&self, other: &Solid, epsilon: Real) -> bool {
        if self.vertices.len() != other.vertices.len() || self.triangles.len() != other.triangles.len() {
            return false;
        }

        let mut welder = weld::Welder::new(epsilon);
        for p in &other.vertices {
            welder.insert(*p);
        }
        let mut other_index = HashMap::new();
        for (i, p) in other.vertices.iter().enumerate() {
            other_index.entry(welder.find(p)).or_insert(i);
        }

        let mut remap = Vec::with_capacity(self.vertices.len());
        for p in &self.vertices {
            match other_index.get(&welder.find(p)) {
                Some(&i) if (other.vertices[i] - p).norm() <= epsilon => remap.push(i),
                _ => return false,
            }
        }

        fn canonical([a, b, c]: [usize; 3]) -> [usize; 3] {
            let m = a.min(b).min(c);
            if m == a {
                [a, b, c]
            } else if m == b {
                [b, c, a]
            } else {
                [c, a, b]
            }
        }

        let mut remaining: HashMap<[usize; 3], usize> = HashMap::new();
        for tri in &other.triangles {
            *remaining.entry(canonical(*tri)).or_default() += 1;
        }
        self.triangles.iter().all(|tri| {
            let key = canonical(tri.map(|i| remap[i]));
            match remaining.get_mut(&key) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    true
                },
                _ => false,
            }
        })
    }
}
