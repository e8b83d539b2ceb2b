//! Choosing splitting planes and cutting polygon lists against them.
//!
//! Polygons are split independently, in parallel under the `parallel`
//! feature, but the pieces are always collected in input order. Every tree
//! walk then distributes them sequentially, so serial and parallel builds
//! produce the same tree polygon for polygon.

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Candidate planes scored per node.
const PLANE_CANDIDATES: usize = 20;
/// Penalty per polygon the candidate would cut in two.
const SPAN_WEIGHT: Real = 8.0;
/// Penalty per polygon of front/back imbalance.
const BALANCE_WEIGHT: Real = 1.0;

/// The pieces of one polygon cut by a plane: coplanar front, coplanar
/// back, front, back.
pub(crate) struct Pieces<S: Clone> {
    pub coplanar_front: Vec<Polygon<S>>,
    pub coplanar_back: Vec<Polygon<S>>,
    pub front: Vec<Polygon<S>>,
    pub back: Vec<Polygon<S>>,
}

/// Plane of one of the first few polygons that cuts the fewest polygons and
/// leaves the two sides most even. Ties keep the earliest candidate.
pub(crate) fn choose_plane<S: Clone>(polygons: &[Polygon<S>]) -> Option<Plane> {
    let score = |plane: &Plane| {
        let (mut front, mut back, mut spanning) = (0i64, 0i64, 0i64);
        for poly in polygons {
            match plane.classify_polygon(poly) {
                COPLANAR => {},
                FRONT => front += 1,
                BACK => back += 1,
                _ => spanning += 1,
            }
        }
        SPAN_WEIGHT * spanning as Real + BALANCE_WEIGHT * ((front - back) as Real).abs()
    };

    polygons
        .iter()
        .take(PLANE_CANDIDATES)
        .map(|poly| (score(&poly.plane), &poly.plane))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, plane)| plane.clone())
}

fn cut<S: Clone + Send + Sync + Debug>(plane: &Plane, poly: &Polygon<S>) -> Pieces<S> {
    let (coplanar_front, coplanar_back, front, back) = plane.split_polygon(poly);
    Pieces {
        coplanar_front,
        coplanar_back,
        front,
        back,
    }
}

/// Cut every polygon by `plane`, one entry per input polygon in input order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn split_each<S: Clone + Send + Sync + Debug>(
    plane: &Plane,
    polygons: &[Polygon<S>],
) -> Vec<Pieces<S>> {
    polygons.iter().map(|poly| cut(plane, poly)).collect()
}

/// Cut every polygon by `plane`, one entry per input polygon in input order.
#[cfg(feature = "parallel")]
pub(crate) fn split_each<S: Clone + Send + Sync + Debug>(
    plane: &Plane,
    polygons: &[Polygon<S>],
) -> Vec<Pieces<S>> {
    polygons.par_iter().map(|poly| cut(plane, poly)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    #[test]
    fn cube_plane_splits_nothing() {
        let cube: Mesh<()> = Mesh::cube(2.0, None);
        let plane = choose_plane(&cube.polygons).unwrap();
        let pieces = split_each(&plane, &cube.polygons);
        assert_eq!(pieces.len(), cube.polygons.len());
        let front: usize = pieces.iter().map(|p| p.front.len()).sum();
        let back: usize = pieces.iter().map(|p| p.back.len()).sum();
        let coplanar: usize = pieces
            .iter()
            .map(|p| p.coplanar_front.len() + p.coplanar_back.len())
            .sum();
        // every face of a cube is either on the plane or behind it
        assert_eq!(front, 0);
        assert_eq!(coplanar + back, cube.polygons.len());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_split_keeps_input_order() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 12, 6, None);
        let plane = Plane::from_points(
            nalgebra::Point3::new(0.0, 0.1, 0.0),
            nalgebra::Point3::new(1.0, 0.3, 0.0),
            nalgebra::Point3::new(0.0, 0.1, 1.0),
        );
        let parallel = split_each(&plane, &sphere.polygons);
        let serial: Vec<Pieces<()>> = sphere.polygons.iter().map(|p| cut(&plane, p)).collect();
        assert_eq!(parallel.len(), serial.len());
        for (p, s) in parallel.iter().zip(&serial) {
            assert_eq!(p.coplanar_front, s.coplanar_front);
            assert_eq!(p.coplanar_back, s.coplanar_back);
            assert_eq!(p.front, s.front);
            assert_eq!(p.back, s.back);
        }
    }

    #[test]
    fn empty_list_has_no_plane() {
        assert!(choose_plane::<()>(&[]).is_none());
    }
}
