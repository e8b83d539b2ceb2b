//! End-to-end hollowing scenarios.
//!
//! Walls are measured by casting rays from inside the cavity. The local
//! thickness is `(1 - s) * d - r` for a face at distance `d` from the scale
//! origin: scaling pulls the inner surface towards the origin, dilation
//! pushes it back out by the sphere radius.

mod support;

use csgshell::params::scale_for_wall_thickness;
use csgshell::{
    BooleanEngine, HollowParams, MinkowskiDilator, Operand, Operation, ShellBuilder, ShellError,
    SlotCutter, SlotSpec, Solid, Transform, float_types::Real, hollow, hollow_centered, hollow_with,
};
use nalgebra::{Point3, Vector3};
use support::{approx_eq, centered_cube, cube_at, cuboid, sphere, wall_thickness};

fn builder() -> ShellBuilder {
    ShellBuilder::new(MinkowskiDilator::new(8, 4), BooleanEngine::default())
}

#[test]
fn cube_centered_on_scale_origin_has_uniform_walls() {
    let model = centered_cube(20.0);
    let shell = builder()
        .build_shell(&model, Vector3::repeat(0.9), 0.0)
        .unwrap();
    assert!(shell.check_manifold().is_ok());
    assert!(approx_eq(shell.volume(), 8000.0 - 18.0 * 18.0 * 18.0, 1e-6));

    let inside = Point3::new(0.3, -0.7, 0.45);
    for direction in [
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ] {
        let t = wall_thickness(&shell, inside, direction).unwrap();
        assert!(approx_eq(t, 1.0, 1e-6), "{direction:?}: {t}");
    }
}

#[test]
fn scaling_about_the_origin_makes_walls_asymmetric() {
    // cube spans -5..15, faces at distance 5 and 15 from the origin
    let model = cube_at(-5.0, 20.0);
    let shell = builder()
        .build_shell(&model, Vector3::repeat(0.9), 0.0)
        .unwrap();

    let inside = Point3::new(4.3, 4.6, 4.9);
    let near = wall_thickness(&shell, inside, -Vector3::x()).unwrap();
    let far = wall_thickness(&shell, inside, Vector3::x()).unwrap();
    assert!(approx_eq(near, 0.5, 1e-6));
    assert!(approx_eq(far, 1.5, 1e-6));
}

#[test]
fn sphere_shell_is_uniform() {
    let model = sphere(10.0, 24, 12);
    let shell = builder()
        .build_shell(&model, Vector3::repeat(0.95), 0.1)
        .unwrap();
    assert!(shell.check_manifold().is_ok());
    assert!(!shell.contains_point(&Point3::new(0.1, 0.2, 0.3)));

    let expected = 0.05 * 10.0 - 0.1;
    for direction in [
        Vector3::new(1.0, 0.2, 0.1),
        Vector3::new(-0.3, 1.0, 0.4),
        Vector3::new(0.2, -0.5, -1.0),
        Vector3::new(-1.0, -1.0, 0.7),
    ] {
        let t = wall_thickness(&shell, Point3::new(0.01, 0.02, 0.03), direction).unwrap();
        assert!((t - expected).abs() < 0.08, "{direction:?}: {t}");
    }
}

#[test]
fn slot_outside_the_shell_leaves_it_unchanged() {
    let shell = builder()
        .build_shell(&centered_cube(10.0), Vector3::repeat(0.8), 0.0)
        .unwrap();
    let far_away = SlotSpec::new(
        Vector3::new(2.0, 2.0, 1.0),
        Transform::translation(Vector3::new(50.0, 0.0, 0.0)),
    );
    let cut = SlotCutter::default().cut_slot(&shell, &far_away).unwrap();
    assert_eq!(cut, shell);
}

#[test]
fn slot_swallowing_the_shell_is_empty() {
    let shell = builder()
        .build_shell(&centered_cube(10.0), Vector3::repeat(0.8), 0.0)
        .unwrap();
    let huge = SlotSpec::bottom_opening(40.0, 40.0, 40.0, 20.0);
    assert_eq!(
        SlotCutter::default().cut_slot(&shell, &huge),
        Err(ShellError::EmptyResult {
            operation: Operation::CutSlot
        })
    );
}

#[test]
fn pipeline_opens_the_floor() {
    let model = centered_cube(20.0);
    // box spans z -11..-8.5, through the 1.0 thick floor into the cavity
    let slot = SlotSpec::new(
        Vector3::new(4.0, 4.0, 2.5),
        Transform::translation(Vector3::new(0.0, 0.0, -11.0)),
    );
    let params = HollowParams {
        scale: Vector3::repeat(0.9),
        dilation_radius: 0.0,
        slot: Some(slot),
    };
    let report = hollow_with(&builder(), &model, &params).unwrap();

    let shell_volume = 8000.0 - 18.0 * 18.0 * 18.0;
    assert!(approx_eq(report.model_volume, 8000.0, 1e-6));
    assert!(approx_eq(report.shell_volume, shell_volume, 1e-6));
    assert!(approx_eq(report.final_volume, shell_volume - 16.0, 1e-6));
    assert!(report.solid.check_manifold().is_ok());
    assert!(!report.solid.contains_point(&Point3::new(0.1, 0.2, -9.5)));
    assert!(report.solid.contains_point(&Point3::new(5.1, 0.2, -9.5)));
}

#[test]
fn walls_thin_as_scale_approaches_one_or_radius_grows() {
    let model = centered_cube(20.0);
    let inside = Point3::new(0.3, -0.7, 0.45);
    let thickness = |scale: Real, radius: Real| {
        let shell = builder()
            .build_shell(&model, Vector3::repeat(scale), radius)
            .unwrap();
        wall_thickness(&shell, inside, Vector3::x()).unwrap()
    };

    let by_scale: Vec<Real> = [0.8, 0.85, 0.9].iter().map(|&s| thickness(s, 0.0)).collect();
    assert!(by_scale.windows(2).all(|w| w[1] < w[0]), "{by_scale:?}");

    let by_radius: Vec<Real> = [0.0, 0.2, 0.4].iter().map(|&r| thickness(0.8, r)).collect();
    assert!(by_radius.windows(2).all(|w| w[1] < w[0]), "{by_radius:?}");
}

#[test]
fn offsets_that_do_not_fit_are_rejected() {
    let model = centered_cube(20.0);

    let unit_axis = hollow(
        &model,
        &HollowParams {
            scale: Vector3::new(0.9, 1.0, 0.9),
            dilation_radius: 0.0,
            slot: None,
        },
    );
    assert!(matches!(
        unit_axis,
        Err(ShellError::BooleanOperationFailed {
            operation: Operation::BuildShell,
            operand: Operand::Second,
            ..
        })
    ));

    let too_round = builder().build_shell(&model, Vector3::repeat(0.9), 1.5);
    assert!(matches!(
        too_round,
        Err(ShellError::BooleanOperationFailed {
            operand: Operand::Second,
            ..
        })
    ));

    let bad_scale = builder().build_shell(&model, Vector3::new(0.9, -0.9, 0.9), 0.0);
    assert!(matches!(
        bad_scale,
        Err(ShellError::InvalidParameter {
            operation: Operation::Scale,
            ..
        })
    ));
}

#[test]
fn model_resting_on_the_plate_is_hollowed_about_its_centre() {
    // spans 0..20, so its floor lies on the scale origin plane
    let model = cube_at(0.0, 20.0);
    let scale = scale_for_wall_thickness(model.bounding_box().extents(), 1.0).unwrap();
    let slot = SlotSpec::new(
        Vector3::new(4.0, 4.0, 2.5),
        SlotSpec::bottom_opening(4.0, 4.0, 2.5, 1.0)
            .placement
            .then(&Transform::translation(Vector3::new(10.0, 10.0, 0.0))),
    );
    let params = HollowParams {
        scale,
        dilation_radius: 0.0,
        slot: Some(slot),
    };

    assert!(matches!(
        hollow_with(&builder(), &model, &params),
        Err(ShellError::BooleanOperationFailed {
            operation: Operation::BuildShell,
            ..
        })
    ));

    let report = hollow_centered(&builder(), &model, &params).unwrap();
    let bounds = report.solid.bounding_box();
    assert!(approx_eq(bounds.mins.z, 0.0, 1e-9));
    assert!(approx_eq(bounds.maxs.x, 20.0, 1e-9));

    let shell_volume = 8000.0 - 18.0 * 18.0 * 18.0;
    assert!(approx_eq(report.shell_volume, shell_volume, 1e-6));
    assert!(approx_eq(report.final_volume, shell_volume - 16.0, 1e-6));

    let centre = Point3::new(10.3, 9.3, 10.45);
    for direction in [Vector3::x(), -Vector3::y(), Vector3::z()] {
        let t = wall_thickness(&report.solid, centre, direction).unwrap();
        assert!(approx_eq(t, 1.0, 1e-6), "{direction:?}: {t}");
    }
    assert!(!report.solid.contains_point(&Point3::new(10.1, 10.2, 0.5)));
    assert!(report.solid.contains_point(&Point3::new(15.1, 10.2, 0.5)));
}

fn star_l_shape() -> Solid {
    let long_arm = cuboid([-2.0, -2.0, -2.0], [10.0, 2.0, 2.0]);
    let short_arm = cuboid([-2.0, -2.0, -2.0], [2.0, 10.0, 2.0]);
    BooleanEngine::default().union(&long_arm, &short_arm).unwrap()
}

#[test]
fn non_convex_shell_tessellation_is_reproducible() {
    // reference values from the serial build; the rayon build must match
    let shell = builder()
        .build_shell(&star_l_shape(), Vector3::repeat(0.8), 0.2)
        .unwrap();
    assert!(shell.check_manifold().is_ok());
    assert_eq!(shell.num_triangles(), 4030);
    assert!(approx_eq(shell.volume(), 108.584_134_683_57, 1e-8));

    let again = builder()
        .build_shell(&star_l_shape(), Vector3::repeat(0.8), 0.2)
        .unwrap();
    assert_eq!(again, shell);
}
