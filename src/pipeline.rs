//! The full hollowing chain: scale, dilate, subtract, cut the slot.

use crate::errors::ShellResult;
use crate::float_types::Real;
use crate::shell::ShellBuilder;
use crate::slot::{SlotCutter, SlotSpec};
use crate::solid::Solid;
use crate::transform::{Transform, Transformer};
use nalgebra::Vector3;

/// Parameters of one hollowing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HollowParams {
    /// Per-axis scale of the inner offset, each in (0, 1)
    pub scale: Vector3<Real>,
    /// Radius of the dilating sphere
    pub dilation_radius: Real,
    /// Bottom opening; `None` leaves the shell closed
    pub slot: Option<SlotSpec>,
}

/// Output of [`hollow`] with the volumes and sizes of each stage.
#[derive(Debug, Clone, PartialEq)]
pub struct HollowReport {
    pub solid: Solid,
    pub model_volume: Real,
    pub shell_volume: Real,
    pub final_volume: Real,
    pub model_triangles: usize,
    pub shell_triangles: usize,
    pub final_triangles: usize,
}

/// Hollow `model` with the default dilator and boolean engine.
pub fn hollow(model: &Solid, params: &HollowParams) -> ShellResult<HollowReport> {
    hollow_with(&ShellBuilder::default(), model, params)
}

/// Hollow `model` with an explicitly configured [`ShellBuilder`]; the slot
/// is cut with the builder's boolean engine.
pub fn hollow_with(builder: &ShellBuilder, model: &Solid, params: &HollowParams) -> ShellResult<HollowReport> {
    let shell = builder.build_shell(model, params.scale, params.dilation_radius)?;
    let shell_volume = shell.volume();
    let shell_triangles = shell.num_triangles();

    let solid = match &params.slot {
        Some(spec) => SlotCutter::new(builder.engine).cut_slot(&shell, spec)?,
        None => shell,
    };

    let report = HollowReport {
        model_volume: model.volume(),
        shell_volume,
        final_volume: solid.volume(),
        model_triangles: model.num_triangles(),
        shell_triangles,
        final_triangles: solid.num_triangles(),
        solid,
    };
    tracing::info!(
        model_volume = report.model_volume,
        shell_volume = report.shell_volume,
        final_volume = report.final_volume,
        triangles = report.final_triangles,
        "hollowed"
    );
    Ok(report)
}

/// Hollow `model` as if the centre of its bounding box sat on the scale
/// origin, then move the result back into the model's frame.
///
/// Models resting on the build plate touch the origin plane, so scaling
/// them in place leaves the floor of the offset on the model's floor and
/// the offset never fits inside. Centring first makes a scale from
/// [`scale_for_wall_thickness`](crate::params::scale_for_wall_thickness)
/// give the requested wall on every side. The slot placement is read in the
/// model's frame.
pub fn hollow_centered(builder: &ShellBuilder, model: &Solid, params: &HollowParams) -> ShellResult<HollowReport> {
    let center = model.bounding_box().center().coords;
    let to_origin = Transform::translation(-center);
    let centered = Transformer::apply(model, &to_origin)?;
    let slot = params
        .slot
        .map(|spec| SlotSpec::new(spec.size, spec.placement.then(&to_origin)));

    let mut report = hollow_with(builder, &centered, &HollowParams { slot, ..*params })?;
    report.solid = Transformer::apply(&report.solid, &Transform::translation(center))?;
    tracing::debug!(offset = ?center, "hollowed about the bounding-box centre");
    Ok(report)
}
