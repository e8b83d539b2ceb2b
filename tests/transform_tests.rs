mod support;

use csgshell::{Operation, Transform, Transformer, float_types::Real};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use support::{approx_eq, cube_at};

#[test]
fn scale_multiplies_every_coordinate() {
    let cube = cube_at(1.0, 2.0);
    let scaled = Transformer::scale(&cube, 2.0, 0.5, 1.0).unwrap();
    let bb = scaled.bounding_box();
    assert_eq!(bb.mins, Point3::new(2.0, 0.5, 1.0));
    assert_eq!(bb.maxs, Point3::new(6.0, 1.5, 3.0));
    assert!(approx_eq(scaled.volume(), cube.volume(), 1e-9));
    assert!(scaled.check_manifold().is_ok());
}

#[test]
fn transform_is_scale_then_translate() {
    let cube = cube_at(0.0, 1.0);
    let transform = Transform {
        translation: Vector3::new(1.0, 0.0, 0.0),
        scale: Vector3::new(3.0, 1.0, 1.0),
    };
    let moved = Transformer::apply(&cube, &transform).unwrap();
    assert_eq!(moved.bounding_box().mins.x, 1.0);
    assert_eq!(moved.bounding_box().maxs.x, 4.0);
}

#[test]
fn zero_scale_is_a_caller_error() {
    let err = Transformer::scale(&cube_at(0.0, 1.0), 1.0, 1.0, 0.0).unwrap_err();
    assert_eq!(err.operation(), Operation::Scale);
}

proptest! {
    #[test]
    fn identity_scale_keeps_the_solid(min in -50.0..50.0 as Real, size in 0.1..20.0 as Real) {
        let cube = cube_at(min, size);
        let same = Transformer::scale(&cube, 1.0, 1.0, 1.0).unwrap();
        prop_assert!(same.approx_eq(&cube, 1e-9));
    }

    #[test]
    fn scale_then_inverse_scale_round_trips(
        sx in 0.1..10.0 as Real,
        sy in 0.1..10.0 as Real,
        sz in 0.1..10.0 as Real,
    ) {
        let cube = cube_at(-1.0, 3.0);
        let scaled = Transformer::scale(&cube, sx, sy, sz).unwrap();
        prop_assert!(approx_eq(scaled.volume(), 27.0 * sx * sy * sz, 1e-6 * 27.0 * sx * sy * sz));
        let back = Transformer::scale(&scaled, 1.0 / sx, 1.0 / sy, 1.0 / sz).unwrap();
        prop_assert!(back.approx_eq(&cube, 1e-9));
    }

    #[test]
    fn translate_then_back_round_trips(
        tx in -100.0..100.0 as Real,
        ty in -100.0..100.0 as Real,
        tz in -100.0..100.0 as Real,
    ) {
        let cube = cube_at(0.0, 1.0);
        let moved = Transformer::translate(&cube, tx, ty, tz).unwrap();
        prop_assert!(approx_eq(moved.volume(), 1.0, 1e-6));
        let back = Transformer::translate(&moved, -tx, -ty, -tz).unwrap();
        prop_assert!(back.approx_eq(&cube, 1e-9));
    }
}
