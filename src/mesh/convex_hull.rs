//! Convex hulls of point clouds over the `chull` quickhull.

use crate::float_types::{EPSILON, Real};
use crate::mesh::{Mesh, polygon::Polygon, vertex::Vertex};
use chull::ConvexHullWrapper;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// Convex hull of a point cloud as outward-wound triangles.
///
/// Returns `None` when the cloud is empty or degenerate (coplanar, collinear)
/// and quickhull cannot build a 3D hull.
pub fn hull_from_points<S: Clone + Debug + Send + Sync>(
    points: &[Point3<Real>],
    metadata: Option<S>,
) -> Option<Mesh<S>> {
    if points.len() < 4 {
        return None;
    }

    let cloud: Vec<Vec<Real>> = points.iter().map(|p| vec![p.x, p.y, p.z]).collect();
    let hull = ConvexHullWrapper::try_new(&cloud, None).ok()?;
    let (verts, indices) = hull.vertices_indices();
    if verts.is_empty() {
        return None;
    }

    let corners: Vec<Point3<Real>> = verts.iter().map(|v| Point3::new(v[0], v[1], v[2])).collect();

    // vertex mean lies strictly inside a non-degenerate hull
    let interior = Point3::from(
        corners.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / corners.len() as Real,
    );

    let polygons: Vec<Polygon<S>> = indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let (p0, mut p1, mut p2) = (corners[tri[0]], corners[tri[1]], corners[tri[2]]);
            let mut normal = (p1 - p0).cross(&(p2 - p0));
            if normal.norm_squared() <= EPSILON * EPSILON {
                return None;
            }
            if normal.dot(&(p0 - interior)) < 0.0 {
                std::mem::swap(&mut p1, &mut p2);
                normal = -normal;
            }
            let normal = normal.normalize();
            Some(Polygon::new(
                vec![
                    Vertex::new(p0, normal),
                    Vertex::new(p1, normal),
                    Vertex::new(p2, normal),
                ],
                metadata.clone(),
            ))
        })
        .collect();

    if polygons.len() < 4 {
        return None;
    }
    Some(Mesh::from_polygons(&polygons, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSGOps;

    #[test]
    fn hull_of_cube_corners_is_the_cube() {
        let cube: Mesh<()> = Mesh::cube(2.0, None);
        let points: Vec<Point3<Real>> = cube.vertices().iter().map(|v| v.pos).collect();
        let hull = hull_from_points::<()>(&points, None).unwrap();
        assert!((hull.signed_volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn hull_of_pairwise_sums_bounds_both_clouds() {
        let corners = |half: Real| -> Vec<Point3<Real>> {
            Mesh::<()>::cube(2.0 * half, None)
                .translate(-half, -half, -half)
                .vertices()
                .iter()
                .map(|v| v.pos)
                .collect()
        };
        let (big, small) = (corners(1.0), corners(0.5));
        let sums: Vec<Point3<Real>> = big
            .iter()
            .flat_map(|a| small.iter().map(move |b| a + b.coords))
            .collect();
        let bb = hull_from_points::<()>(&sums, None).unwrap().bounding_box();
        assert!((bb.mins.x + 1.5).abs() < 1e-9);
        assert!((bb.maxs.z - 1.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_cloud_has_no_hull() {
        let flat = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(hull_from_points::<()>(&flat, None).is_none());
    }
}
