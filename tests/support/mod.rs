//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use csgshell::{
    Solid,
    float_types::Real,
    mesh::Mesh,
    traits::CSGOps,
};
use nalgebra::{Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Axis aligned cube solid spanning `[min, min + size]` on every axis.
pub fn cube_at(min: Real, size: Real) -> Solid {
    let mesh: Mesh<()> = Mesh::cube(size, None).translate(min, min, min);
    Solid::from_mesh(&mesh).expect("cube is a closed solid")
}

/// Cube of edge `size` centred on the origin.
pub fn centered_cube(size: Real) -> Solid {
    cube_at(-size / 2.0, size)
}

/// Cuboid solid spanning `min..max`.
pub fn cuboid(min: [Real; 3], max: [Real; 3]) -> Solid {
    let mesh: Mesh<()> = Mesh::cuboid(max[0] - min[0], max[1] - min[1], max[2] - min[2], None)
        .translate(min[0], min[1], min[2]);
    Solid::from_mesh(&mesh).expect("cuboid is a closed solid")
}

/// UV sphere solid centred on the origin.
pub fn sphere(radius: Real, segments: usize, stacks: usize) -> Solid {
    let mesh: Mesh<()> = Mesh::sphere(radius, segments, stacks, None);
    Solid::from_mesh(&mesh).expect("sphere is a closed solid")
}

/// Wall thickness of `shell` seen from a point inside its cavity, along
/// `direction`: the distance between the first (inner wall) and second
/// (outer wall) surface crossings.
pub fn wall_thickness(shell: &Solid, from: Point3<Real>, direction: Vector3<Real>) -> Option<Real> {
    let mesh: Mesh<()> = shell.to_mesh(None);
    let hits = mesh.ray_intersections(&from, &direction.normalize());
    match hits.as_slice() {
        [inner, outer, ..] => Some(outer.1 - inner.1),
        _ => None,
    }
}
