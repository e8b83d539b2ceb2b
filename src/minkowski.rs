//! Minkowski dilation of a [`Solid`] by a tessellated sphere.

use crate::errors::{Operand, Operation, ShellError, ShellResult};
use crate::float_types::{Real, tolerance};
use crate::mesh::{Mesh, convex_hull::hull_from_points};
use crate::solid::{Solid, weld::Welder};
use crate::traits::CSGOps;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Dilates solids by a sphere approximated as a UV sphere.
///
/// The tessellation trades smoothness of the rounded edges against triangle
/// count; every kernel vertex lies on the true sphere, so the dilated
/// surface is pushed out by at most `radius` and at least
/// `radius * cos(π / sphere_segments)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinkowskiDilator {
    /// Slices around the sphere's pole axis
    pub sphere_segments: usize,
    /// Bands from pole to pole
    pub sphere_stacks: usize,
}

impl Default for MinkowskiDilator {
    fn default() -> Self {
        MinkowskiDilator {
            sphere_segments: 16,
            sphere_stacks: 8,
        }
    }
}

impl MinkowskiDilator {
    pub const fn new(sphere_segments: usize, sphere_stacks: usize) -> Self {
        MinkowskiDilator {
            sphere_segments,
            sphere_stacks,
        }
    }

    /// Distinct vertices of the sphere kernel.
    pub fn kernel_points(&self, radius: Real) -> Vec<Point3<Real>> {
        let sphere: Mesh<()> = Mesh::sphere(radius, self.sphere_segments, self.sphere_stacks, None);
        let mut welder = Welder::new(tolerance());
        for v in sphere.vertices() {
            welder.insert(v.pos);
        }
        welder.into_points()
    }

    /// `{ p + q : p ∈ solid, q ∈ ball(radius) }`, with the ball replaced by
    /// its tessellation.
    ///
    /// Convex solids are dilated exactly as the hull of every vertex plus
    /// every kernel point. Other solids are the union of the solid with the
    /// hull of each triangle swept over the kernel, which also rounds
    /// concave edges.
    pub fn dilate(&self, solid: &Solid, radius: Real) -> ShellResult<Solid> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(ShellError::InvalidParameter {
                operation: Operation::Dilate,
                parameter: "radius",
                reason: format!("radius must be finite and non-negative, got {radius}"),
            });
        }
        solid
            .check_manifold()
            .map_err(|source| ShellError::MalformedInputSolid {
                operation: Operation::Dilate,
                operand: Operand::Input,
                source,
            })?;

        if radius == 0.0 {
            return Ok(solid.clone());
        }

        let kernel = self.kernel_points(radius);
        let dilated = if solid.is_convex() {
            tracing::debug!(
                triangles = solid.num_triangles(),
                kernel = kernel.len(),
                "dilating convex solid"
            );
            let points: Vec<Point3<Real>> = solid
                .vertices()
                .iter()
                .flat_map(|v| kernel.iter().map(move |k| v + k.coords))
                .collect();
            hull_from_points::<()>(&points, None).ok_or_else(|| failed("hull of the dilated vertices is degenerate"))?
        } else {
            tracing::debug!(
                triangles = solid.num_triangles(),
                kernel = kernel.len(),
                "dilating non-convex solid by per-triangle hulls"
            );
            let mut pieces = self.triangle_sweeps(solid, &kernel)?;
            pieces.push(solid.to_mesh(None));
            union_all(pieces)
        };

        let result = Solid::from_mesh(&dilated).map_err(|err| failed(&err.to_string()))?;
        tracing::debug!(
            radius,
            before = solid.volume(),
            after = result.volume(),
            triangles = result.num_triangles(),
            "dilated"
        );
        Ok(result)
    }

    /// Hull of each triangle translated over every kernel point.
    fn triangle_sweeps(&self, solid: &Solid, kernel: &[Point3<Real>]) -> ShellResult<Vec<Mesh<()>>> {
        let sweep = |corners: [Point3<Real>; 3]| {
            let points: Vec<Point3<Real>> = corners
                .iter()
                .flat_map(|c| kernel.iter().map(move |k| c + k.coords))
                .collect();
            hull_from_points::<()>(&points, None).ok_or_else(|| failed("degenerate triangle sweep"))
        };

        #[cfg(not(feature = "parallel"))]
        let pieces = solid.triangle_positions().map(sweep).collect();

        #[cfg(feature = "parallel")]
        let pieces = solid
            .triangle_positions()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(sweep)
            .collect();

        pieces
    }
}

fn failed(reason: &str) -> ShellError {
    ShellError::BooleanOperationFailed {
        operation: Operation::Dilate,
        operand: Operand::Result,
        reason: reason.to_string(),
    }
}

fn union_pair(pair: &[Mesh<()>]) -> Mesh<()> {
    match pair {
        [a, b] => a.union(b),
        [a] => a.clone(),
        _ => Mesh::new(),
    }
}

/// Balanced pairwise union, keeping the BSP trees small at every level.
fn union_all(mut level: Vec<Mesh<()>>) -> Mesh<()> {
    while level.len() > 1 {
        #[cfg(not(feature = "parallel"))]
        let next = level.chunks(2).map(union_pair).collect();

        #[cfg(feature = "parallel")]
        let next = level.par_chunks(2).map(union_pair).collect();

        level = next;
    }
    level.pop().unwrap_or_else(Mesh::new)
}
