//! Cutting an axis aligned box out of a shell to open it.

use crate::boolean::BooleanEngine;
use crate::errors::{Operation, ShellError, ShellResult};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::solid::Solid;
use crate::transform::{Transform, Transformer};
use crate::traits::CSGOps;
use nalgebra::Vector3;

/// A box of `size = (width, depth, height)` centred on the XY origin with
/// its floor at z = 0, moved into place by `placement`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSpec {
    pub size: Vector3<Real>,
    pub placement: Transform,
}

impl SlotSpec {
    pub fn new(size: Vector3<Real>, placement: Transform) -> Self {
        SlotSpec { size, placement }
    }

    /// A slot straddling the build plane: the box is lowered by `sink` so
    /// it cuts through the bottom face of a model resting on z = 0.
    ///
    /// ```
    /// # use csgshell::slot::SlotSpec;
    /// let slot = SlotSpec::bottom_opening(4.0, 4.0, 0.02, 0.01);
    /// let bb = slot.box_solid().unwrap().bounding_box();
    /// assert!((bb.mins.z + 0.01).abs() < 1e-12);
    /// assert!((bb.maxs.z - 0.01).abs() < 1e-12);
    /// ```
    pub fn bottom_opening(width: Real, depth: Real, height: Real, sink: Real) -> Self {
        SlotSpec {
            size: Vector3::new(width, depth, height),
            placement: Transform::translation(Vector3::new(0.0, 0.0, -sink)),
        }
    }

    /// The placed box as a closed solid.
    pub fn box_solid(&self) -> ShellResult<Solid> {
        if let Some(d) = self.size.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
            return Err(ShellError::InvalidParameter {
                operation: Operation::CutSlot,
                parameter: "slot size",
                reason: format!("box dimensions must be finite and positive, got {d}"),
            });
        }

        let (w, d, h) = (self.size.x, self.size.y, self.size.z);
        let local = Mesh::<()>::cuboid(w, d, h, None).translate(-w / 2.0, -d / 2.0, 0.0);
        let local = Solid::from_mesh(&local).map_err(|err| ShellError::InvalidParameter {
            operation: Operation::CutSlot,
            parameter: "slot size",
            reason: err.to_string(),
        })?;
        Transformer::apply(&local, &self.placement).map_err(|err| err.in_stage(Operation::CutSlot))
    }
}

/// Subtracts slot boxes from shells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlotCutter {
    pub engine: BooleanEngine,
}

impl SlotCutter {
    pub const fn new(engine: BooleanEngine) -> Self {
        SlotCutter { engine }
    }

    /// `shell − box(spec)`. A box that misses the shell leaves it unchanged;
    /// a box that swallows it is [`ShellError::EmptyResult`].
    pub fn cut_slot(&self, shell: &Solid, spec: &SlotSpec) -> ShellResult<Solid> {
        let slot = spec.box_solid()?;
        tracing::debug!(size = ?spec.size, placement = ?spec.placement, "cutting slot");
        self.engine
            .difference(shell, &slot)
            .map_err(|err| err.in_stage(Operation::CutSlot))
    }
}
