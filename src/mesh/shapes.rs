//! 3D primitives as `Mesh`s, all wound counter-clockwise seen from outside.

use crate::float_types::{PI, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Axis-aligned box with one corner at the origin and the opposite
    /// corner at `(width, length, height)`.
    ///
    /// ```text
    ///     4-------5
    ///    /|      /|
    ///   0-------1 |
    ///   | |     | |
    ///   | 7-----|-6
    ///   |/      |/
    ///   3-------2
    /// ```
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, length, 0.0),
            Point3::new(0.0, length, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, length, height),
            Point3::new(0.0, length, height),
        ];

        let faces: [([usize; 4], Vector3<Real>); 6] = [
            ([0, 3, 2, 1], -Vector3::z()), // Bottom
            ([4, 5, 6, 7], Vector3::z()),  // Top
            ([0, 1, 5, 4], -Vector3::y()), // Front
            ([3, 7, 6, 2], Vector3::y()),  // Back
            ([0, 4, 7, 3], -Vector3::x()), // Left
            ([1, 2, 6, 5], Vector3::x()),  // Right
        ];

        let polygons: Vec<Polygon<S>> = faces
            .iter()
            .map(|(indices, normal)| {
                let vertices = indices
                    .iter()
                    .map(|&i| Vertex::new(corners[i], *normal))
                    .collect();
                Polygon::new(vertices, metadata.clone())
            })
            .collect();

        Mesh::from_polygons(&polygons, metadata)
    }

    /// Cube spanning `[0, width]` on every axis.
    pub fn cube(width: Real, metadata: Option<S>) -> Mesh<S> {
        Self::cuboid(width, width, width, metadata)
    }

    /// UV sphere centred at the origin with poles on the Y axis, made of
    /// triangles only. `segments` counts slices around the pole axis,
    /// `stacks` counts bands from pole to pole.
    pub fn sphere(radius: Real, segments: usize, stacks: usize, metadata: Option<S>) -> Mesh<S> {
        let segments = segments.max(3);
        let stacks = stacks.max(2);

        let point = |i: usize, j: usize| -> Point3<Real> {
            if j == 0 {
                return Point3::new(0.0, radius, 0.0);
            }
            if j >= stacks {
                return Point3::new(0.0, -radius, 0.0);
            }
            let theta = (i % segments) as Real / segments as Real * TAU;
            let phi = j as Real / stacks as Real * PI;
            Point3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            )
        };
        let vertex = |p: Point3<Real>| Vertex::new(p, p.coords / radius);

        let mut polygons = Vec::with_capacity(segments * stacks * 2);
        for j in 0..stacks {
            for i in 0..segments {
                let a = point(i, j);
                let b = point(i + 1, j);
                let c = point(i + 1, j + 1);
                let d = point(i, j + 1);

                // (a, b, c) follows +theta then +phi, which faces outward
                if j != 0 {
                    polygons.push(Polygon::new(
                        vec![vertex(a), vertex(b), vertex(c)],
                        metadata.clone(),
                    ));
                }
                if j + 1 != stacks {
                    polygons.push(Polygon::new(
                        vec![vertex(a), vertex(c), vertex(d)],
                        metadata.clone(),
                    ));
                }
            }
        }

        Mesh::from_polygons(&polygons, metadata)
    }
}
