//! Deriving pipeline parameters from a desired wall thickness.
//!
//! The hollowing core never calls this; it is a convenience for callers
//! that think in millimetres of wall rather than scale factors.

use crate::errors::{Operation, ShellError, ShellResult};
use crate::float_types::Real;
use nalgebra::Vector3;

/// Per-axis scale `(d − 2t) / d` that shrinks a model with extents
/// `dimensions` by `thickness` on both sides of every axis, when the
/// model is centred on the scale origin.
///
/// ```
/// # use csgshell::params::scale_for_wall_thickness;
/// # use nalgebra::Vector3;
/// let scale = scale_for_wall_thickness(Vector3::new(30.0, 30.0, 20.0), 1.5).unwrap();
/// assert!((scale.x - 0.9).abs() < 1e-12);
/// assert!((scale.z - 0.85).abs() < 1e-12);
/// ```
pub fn scale_for_wall_thickness(dimensions: Vector3<Real>, thickness: Real) -> ShellResult<Vector3<Real>> {
    let invalid = |reason: String| ShellError::InvalidParameter {
        operation: Operation::Scale,
        parameter: "wall thickness",
        reason,
    };

    if let Some(d) = dimensions.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(invalid(format!("model dimensions must be positive, got {d}")));
    }
    if !(thickness.is_finite() && thickness > 0.0) {
        return Err(invalid(format!("thickness must be positive, got {thickness}")));
    }
    let min_dim = dimensions.min();
    if thickness >= min_dim / 2.0 {
        return Err(invalid(format!(
            "thickness {thickness} must be less than half the smallest dimension {min_dim}"
        )));
    }

    Ok(dimensions.map(|d| (d - 2.0 * thickness) / d))
}
