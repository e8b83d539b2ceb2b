//! Non-uniform scale and translation of a [`Solid`].
//!
//! Scaling is about the origin of the solid's frame, not its centroid, so a
//! model placed away from the origin scales unevenly relative to its own
//! bounds. The shell wall thickness inherits this asymmetry.

use crate::errors::{Operation, ShellError, ShellResult};
use crate::float_types::Real;
use crate::solid::Solid;
use nalgebra::{Point3, Vector3};

/// Scale then translate: `p' = scale ⊙ p + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<Real>,
    pub scale: Vector3<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            translation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn scaling(scale: Vector3<Real>) -> Self {
        Transform {
            translation: Vector3::zeros(),
            scale,
        }
    }

    pub fn translation(translation: Vector3<Real>) -> Self {
        Transform {
            translation,
            scale: Vector3::repeat(1.0),
        }
    }

    /// Map a single point.
    pub fn apply_point(&self, p: &Point3<Real>) -> Point3<Real> {
        Point3::from(p.coords.component_mul(&self.scale) + self.translation)
    }

    /// `other` applied after `self`, itself a scale-then-translate.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            scale: self.scale.component_mul(&other.scale),
            translation: self.translation.component_mul(&other.scale) + other.translation,
        }
    }

    fn check(&self) -> ShellResult<()> {
        if let Some(s) = self.scale.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(ShellError::InvalidParameter {
                operation: Operation::Scale,
                parameter: "scale",
                reason: format!("scale factors must be finite and positive, got {s}"),
            });
        }
        if let Some(t) = self.translation.iter().find(|t| !t.is_finite()) {
            return Err(ShellError::InvalidParameter {
                operation: Operation::Translate,
                parameter: "translation",
                reason: format!("translation must be finite, got {t}"),
            });
        }
        Ok(())
    }
}

/// Pure transformations of solids. Every call returns a new [`Solid`].
pub struct Transformer;

impl Transformer {
    /// Multiply every vertex component-wise by `(sx, sy, sz)`.
    ///
    /// ```
    /// # use csgshell::{mesh::Mesh, solid::Solid, transform::Transformer};
    /// let cube = Solid::from_mesh(&Mesh::<()>::cube(2.0, None)).unwrap();
    /// let scaled = Transformer::scale(&cube, 0.5, 1.0, 2.0).unwrap();
    /// assert!((scaled.volume() - 8.0).abs() < 1e-9);
    /// assert!(Transformer::scale(&cube, 0.0, 1.0, 1.0).is_err());
    /// ```
    pub fn scale(solid: &Solid, sx: Real, sy: Real, sz: Real) -> ShellResult<Solid> {
        Self::apply(solid, &Transform::scaling(Vector3::new(sx, sy, sz)))
    }

    /// Add `(tx, ty, tz)` to every vertex.
    pub fn translate(solid: &Solid, tx: Real, ty: Real, tz: Real) -> ShellResult<Solid> {
        Self::apply(solid, &Transform::translation(Vector3::new(tx, ty, tz)))
    }

    /// Apply a full scale-then-translate.
    pub fn apply(solid: &Solid, transform: &Transform) -> ShellResult<Solid> {
        transform.check()?;
        tracing::trace!(?transform, "transform");
        Ok(solid.map_vertices(|p| transform.apply_point(p)))
    }

    /// Move the bounding-box centre to the origin.
    pub fn center(solid: &Solid) -> Solid {
        let center = solid.bounding_box().center();
        solid.map_vertices(|p| p - center.coords)
    }

    /// Move the solid so its lowest point sits at z = 0.
    pub fn float(solid: &Solid) -> Solid {
        let floor = solid.bounding_box().mins.z;
        solid.map_vertices(|p| Point3::new(p.x, p.y, p.z - floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn cube() -> Solid {
        Solid::from_mesh(&Mesh::<()>::cube(2.0, None)).unwrap()
    }

    #[test]
    fn scale_is_about_the_origin() {
        let moved = Transformer::translate(&cube(), 10.0, 0.0, 0.0).unwrap();
        let scaled = Transformer::scale(&moved, 0.5, 0.5, 0.5).unwrap();
        let bb = scaled.bounding_box();
        assert_eq!(bb.mins, Point3::new(5.0, 0.0, 0.0));
        assert_eq!(bb.maxs, Point3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn invalid_factors_are_rejected() {
        for bad in [0.0, -1.0, Real::NAN, Real::INFINITY] {
            let err = Transformer::scale(&cube(), 1.0, bad, 1.0).unwrap_err();
            assert_eq!(err.operation(), Operation::Scale);
        }
        let err = Transformer::translate(&cube(), Real::NAN, 0.0, 0.0).unwrap_err();
        assert_eq!(err.operation(), Operation::Translate);
    }

    #[test]
    fn then_composes_scale_then_translate() {
        let a = Transform {
            translation: Vector3::new(1.0, 0.0, 0.0),
            scale: Vector3::repeat(2.0),
        };
        let b = Transform {
            translation: Vector3::new(0.0, 1.0, 0.0),
            scale: Vector3::new(3.0, 1.0, 1.0),
        };
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(a.then(&b).apply_point(&p), b.apply_point(&a.apply_point(&p)));
    }

    #[test]
    fn center_and_float() {
        let centered = Transformer::center(&cube());
        assert_eq!(centered.bounding_box().center(), Point3::origin());
        let floated = Transformer::float(&centered);
        assert_eq!(floated.bounding_box().mins.z, 0.0);
    }
}
