mod support;

use csgshell::{BooleanEngine, MinkowskiDilator, Solid, float_types::Real};
use nalgebra::Point3;
use support::{approx_eq, centered_cube, cuboid, sphere};

fn l_shape() -> Solid {
    let engine = BooleanEngine::default();
    let foot = cuboid([0.0, 0.0, 0.0], [3.0, 1.0, 1.0]);
    let leg = cuboid([0.0, 0.0, 0.0], [1.0, 3.0, 1.0]);
    engine.union(&foot, &leg).expect("L shape")
}

#[test]
fn dilation_grows_volume_monotonically() {
    let dilator = MinkowskiDilator::new(8, 4);
    let cube = centered_cube(2.0);
    let mut previous = cube.volume();
    for radius in [0.05, 0.1, 0.2, 0.4] {
        let dilated = dilator.dilate(&cube, radius).unwrap();
        assert!(dilated.check_manifold().is_ok());
        assert!(dilated.volume() > previous);
        previous = dilated.volume();
    }
}

#[test]
fn dilated_sphere_radius() {
    let dilator = MinkowskiDilator::default();
    let ball = sphere(2.0, 16, 8);
    let dilated = dilator.dilate(&ball, 0.5).unwrap();
    // every vertex of the dilated solid lies within the exact offset
    let r_max = dilated
        .vertices()
        .iter()
        .map(|p| p.coords.norm())
        .fold(0.0 as Real, Real::max);
    assert!(r_max <= 2.5 + 1e-9);
    assert!(r_max > 2.45);
    assert!(dilated.contains_point(&Point3::new(2.1, 0.1, 0.1)));
}

#[test]
fn non_convex_dilation_rounds_the_inner_corner() {
    let shape = l_shape();
    assert!(!shape.is_convex());

    let radius = 0.25;
    let dilated = MinkowskiDilator::new(6, 3).dilate(&shape, radius).unwrap();
    assert!(dilated.check_manifold().is_ok());
    assert!(dilated.volume() > shape.volume());

    // the concave corner at (1, 1) fills in, the convex region stays bounded
    assert!(dilated.contains_point(&Point3::new(1.05, 1.05, 0.5)));
    assert!(!dilated.contains_point(&Point3::new(1.5, 1.5, 0.5)));
    // the kernel poles sit on the Y axis, so only Y reaches the full radius
    let bb = dilated.bounding_box();
    assert!(approx_eq(bb.maxs.y, 3.0 + radius, 1e-6));
    assert!(bb.maxs.x > 3.0 && bb.maxs.x < 3.0 + radius);
    assert!(bb.mins.z < 0.0 && bb.mins.z >= -radius);
}

#[test]
fn zero_radius_returns_equivalent_solid() {
    let shape = l_shape();
    let same = MinkowskiDilator::default().dilate(&shape, 0.0).unwrap();
    assert!(same.approx_eq(&shape, 1e-12));
}
