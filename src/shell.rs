//! Hollowing: subtract a shrunk, dilated copy of a model from the model.

use crate::boolean::BooleanEngine;
use crate::errors::{Operand, Operation, ShellError, ShellResult};
use crate::float_types::Real;
use crate::minkowski::MinkowskiDilator;
use crate::solid::Solid;
use crate::transform::Transformer;
use nalgebra::Vector3;

/// Builds `model − dilate(scale(model, v), r)`.
///
/// The local wall thickness is roughly `(1 − v_axis) · distance_from_origin
/// − r`: scaling pulls the inner surface in, dilation pushes it back out by
/// `r`. Scaling is about the frame origin, so walls are thicker on the side
/// of the model farther from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShellBuilder {
    pub dilator: MinkowskiDilator,
    pub engine: BooleanEngine,
}

impl ShellBuilder {
    pub const fn new(dilator: MinkowskiDilator, engine: BooleanEngine) -> Self {
        ShellBuilder { dilator, engine }
    }

    /// The inward offset solid that gets subtracted from `model`.
    pub fn offset_solid(&self, model: &Solid, scale: Vector3<Real>, radius: Real) -> ShellResult<Solid> {
        let scaled = Transformer::scale(model, scale.x, scale.y, scale.z)?;
        self.dilator.dilate(&scaled, radius)
    }

    /// Hollow `model`; fails unless the offset solid lies strictly inside it.
    pub fn build_shell(&self, model: &Solid, scale: Vector3<Real>, radius: Real) -> ShellResult<Solid> {
        model
            .check_manifold()
            .map_err(|source| ShellError::MalformedInputSolid {
                operation: Operation::BuildShell,
                operand: Operand::Input,
                source,
            })?;

        let offset = self.offset_solid(model, scale, radius)?;
        tracing::debug!(
            model = model.num_triangles(),
            offset = offset.num_triangles(),
            "offset solid built"
        );

        if let Err(reason) = strictly_inside(&offset, model) {
            tracing::warn!(%reason, "offset solid does not fit inside the model");
            return Err(ShellError::BooleanOperationFailed {
                operation: Operation::BuildShell,
                operand: Operand::Second,
                reason,
            });
        }

        self.engine
            .difference(model, &offset)
            .map_err(|err| err.in_stage(Operation::BuildShell))
    }
}

/// `Ok` when every vertex of `inner` is enclosed by `outer` and the bounds of
/// `inner` stay clear of the bounds of `outer` on every side.
fn strictly_inside(inner: &Solid, outer: &Solid) -> Result<(), String> {
    let inner_box = inner.bounding_box();
    let outer_box = outer.bounding_box();
    for axis in 0..3 {
        if inner_box.mins[axis] <= outer_box.mins[axis] || inner_box.maxs[axis] >= outer_box.maxs[axis] {
            return Err(format!(
                "offset bounds [{}, {}] reach the model bounds [{}, {}] on axis {axis}",
                inner_box.mins[axis], inner_box.maxs[axis], outer_box.mins[axis], outer_box.maxs[axis],
            ));
        }
    }

    if let Some(p) = inner.vertices().iter().find(|p| !outer.contains_point(p)) {
        return Err(format!("offset vertex {p} lies outside the model"));
    }
    Ok(())
}
