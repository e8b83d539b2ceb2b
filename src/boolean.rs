//! Boolean operations on [`Solid`]s, backed by the BSP kernel in [`crate::mesh`].

use crate::errors::{Operand, Operation, ShellError, ShellResult, ValidationError};
use crate::float_types::{EPSILON, Real, parry3d::bounding_volume::BoundingVolume, tolerance};
use crate::mesh::Mesh;
use crate::solid::Solid;
use crate::traits::CSGOps;

/// Computes union, difference and intersection of closed solids.
///
/// `tolerance` is the distance under which vertices of the BSP output are
/// welded and triangles count as slivers, and it scales the volume under
/// which a result counts as empty. Plane classification inside the BSP tree
/// uses the global [`tolerance`](crate::float_types::tolerance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BooleanEngine {
    pub tolerance: Real,
}

impl Default for BooleanEngine {
    fn default() -> Self {
        BooleanEngine {
            tolerance: tolerance(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BooleanKind {
    Union,
    Difference,
    Intersection,
}

impl BooleanKind {
    const fn operation(self) -> Operation {
        match self {
            BooleanKind::Union => Operation::Union,
            BooleanKind::Difference => Operation::Difference,
            BooleanKind::Intersection => Operation::Intersection,
        }
    }
}

impl BooleanEngine {
    pub const fn new(tolerance: Real) -> Self {
        BooleanEngine { tolerance }
    }

    /// Volume enclosed by either solid.
    pub fn union(&self, a: &Solid, b: &Solid) -> ShellResult<Solid> {
        self.run(BooleanKind::Union, a, b)
    }

    /// Volume of `a` with the volume of `b` removed.
    ///
    /// If `b` misses `a` entirely, even when it sits inside the bounds of a
    /// concave `a`, the result is `a` unchanged; if `b` swallows `a` the
    /// result is [`ShellError::EmptyResult`].
    pub fn difference(&self, a: &Solid, b: &Solid) -> ShellResult<Solid> {
        self.run(BooleanKind::Difference, a, b)
    }

    /// Volume enclosed by both solids.
    pub fn intersection(&self, a: &Solid, b: &Solid) -> ShellResult<Solid> {
        self.run(BooleanKind::Intersection, a, b)
    }

    fn run(&self, kind: BooleanKind, a: &Solid, b: &Solid) -> ShellResult<Solid> {
        let operation = kind.operation();
        for (solid, operand) in [(a, Operand::First), (b, Operand::Second)] {
            solid
                .check_manifold()
                .map_err(|source| ShellError::MalformedInputSolid {
                    operation,
                    operand,
                    source,
                })?;
        }

        let eps = self.tolerance.max(EPSILON);
        let a_box = a.bounding_box();
        let b_box = b.bounding_box();
        let extent = a_box.merged(&b_box).extents().max();
        // a slab one tolerance thick across the whole model
        let empty_volume = eps * extent * extent;

        if !a_box.intersects(&b_box) {
            tracing::debug!(%operation, "bounding boxes are disjoint");
            return match kind {
                BooleanKind::Difference => Ok(a.clone()),
                BooleanKind::Intersection => Err(ShellError::EmptyResult { operation }),
                BooleanKind::Union => {
                    let offset = a.vertices().len();
                    let vertices = a.vertices().iter().chain(b.vertices()).copied().collect();
                    let triangles = a
                        .triangles()
                        .iter()
                        .copied()
                        .chain(b.triangles().iter().map(|t| t.map(|i| i + offset)))
                        .collect();
                    Solid::from_indexed(vertices, triangles)
                        .map_err(|err| rejected(operation, &err.to_string()))
                },
            };
        }

        // polygons remember their operand so untouched inputs can be recognised
        let mesh_a: Mesh<Operand> = a.to_mesh(Some(Operand::First));
        let mesh_b: Mesh<Operand> = b.to_mesh(Some(Operand::Second));
        let output = match kind {
            BooleanKind::Union => mesh_a.union(&mesh_b),
            BooleanKind::Difference => mesh_a.difference(&mesh_b),
            BooleanKind::Intersection => mesh_a.intersection(&mesh_b),
        };
        tracing::debug!(
            %operation,
            first = a.num_triangles(),
            second = b.num_triangles(),
            polygons = output.polygons.len(),
            "bsp boolean"
        );

        let output_volume = output.signed_volume();
        if output.polygons.is_empty() || output_volume.abs() <= empty_volume {
            return Err(ShellError::EmptyResult { operation });
        }

        let untouched = |operand: Operand, kept: &Solid| {
            (output_volume - kept.volume()).abs() <= empty_volume
                && !output.polygons.iter().any(|p| p.metadata == Some(operand))
        };
        let unchanged = match kind {
            BooleanKind::Difference | BooleanKind::Union if untouched(Operand::Second, a) => Some(a),
            BooleanKind::Union if untouched(Operand::First, b) => Some(b),
            _ => None,
        };
        if let Some(kept) = unchanged {
            tracing::debug!(%operation, "one operand left no trace, returning the other as is");
            return Ok(kept.clone());
        }

        let solid = match Solid::from_polygons_with(&output.polygons, eps) {
            Ok(solid) => solid,
            Err(ValidationError::Empty) => return Err(ShellError::EmptyResult { operation }),
            Err(ValidationError::InvertedOrientation { volume }) if volume.abs() <= empty_volume => {
                return Err(ShellError::EmptyResult { operation });
            },
            Err(err) => {
                tracing::warn!(%operation, error = %err, "boolean result is not a closed manifold");
                return Err(rejected(operation, &err.to_string()));
            },
        };

        let volume = solid.volume();
        if volume <= empty_volume {
            return Err(ShellError::EmptyResult { operation });
        }

        // a boolean can never enclose more than its operands allow
        let bound = match kind {
            BooleanKind::Union => a.volume() + b.volume(),
            BooleanKind::Difference => a.volume(),
            BooleanKind::Intersection => a.volume().min(b.volume()),
        };
        if volume > bound + empty_volume {
            tracing::warn!(%operation, volume, bound, "boolean result encloses too much volume");
            return Err(rejected(
                operation,
                &format!("result volume {volume} exceeds the operands' bound {bound}"),
            ));
        }

        tracing::debug!(%operation, volume, triangles = solid.num_triangles(), "boolean done");
        Ok(solid)
    }
}

fn rejected(operation: Operation, reason: &str) -> ShellError {
    ShellError::BooleanOperationFailed {
        operation,
        operand: Operand::Result,
        reason: reason.to_string(),
    }
}
