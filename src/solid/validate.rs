//! Closed-manifold checks over an indexed triangle set.

use crate::errors::ValidationError;
use crate::float_types::{EPSILON, Real};
use hashbrown::HashMap;
use nalgebra::Point3;

/// Signed volume of an indexed surface by the divergence theorem.
pub(crate) fn signed_volume(vertices: &[Point3<Real>], triangles: &[[usize; 3]]) -> Real {
    triangles
        .iter()
        .map(|&[a, b, c]| {
            vertices[a]
                .coords
                .dot(&vertices[b].coords.cross(&vertices[c].coords))
        })
        .sum::<Real>()
        / 6.0
}

/// Check that `triangles` over `vertices` bound a closed, consistently wound,
/// outward oriented surface. The first failing check is reported.
pub(crate) fn check_manifold(vertices: &[Point3<Real>], triangles: &[[usize; 3]]) -> Result<(), ValidationError> {
    if triangles.is_empty() {
        return Err(ValidationError::Empty);
    }

    if let Some(p) = vertices
        .iter()
        .find(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(ValidationError::InvalidCoordinate(*p));
    }

    if let Some(&index) = triangles.iter().flatten().find(|&&i| i >= vertices.len()) {
        return Err(ValidationError::IndexOutOfRange {
            index,
            len: vertices.len(),
        });
    }

    let degenerate: Vec<&[usize; 3]> = triangles
        .iter()
        .filter(|&&[a, b, c]| {
            a == b
                || b == c
                || c == a
                || (vertices[b] - vertices[a])
                    .cross(&(vertices[c] - vertices[a]))
                    .norm()
                    <= EPSILON
        })
        .collect();
    if let Some(first) = degenerate.first() {
        return Err(ValidationError::DegenerateTriangle {
            count: degenerate.len(),
            at: vertices[first[0]],
        });
    }

    // directed edge counts keyed by the undirected edge
    let mut edges: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for &[a, b, c] in triangles {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            let entry = edges.entry((from.min(to), from.max(to))).or_default();
            if from < to {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    let mut open = (0, None);
    let mut non_manifold = (0, None);
    let mut inconsistent = (0, None);
    for (&(lo, _), &(forward, backward)) in &edges {
        let slot = match (forward, backward) {
            (1, 1) => continue,
            (f, b) if f + b == 1 => &mut open,
            (f, b) if f + b > 2 => &mut non_manifold,
            _ => &mut inconsistent,
        };
        slot.0 += 1;
        slot.1.get_or_insert(vertices[lo]);
    }

    if let (count, Some(at)) = open {
        return Err(ValidationError::OpenEdges { count, at });
    }
    if let (count, Some(at)) = non_manifold {
        return Err(ValidationError::NonManifoldEdges { count, at });
    }
    if let (count, Some(at)) = inconsistent {
        return Err(ValidationError::InconsistentWinding { count, at });
    }

    let volume = signed_volume(vertices, triangles);
    if volume <= 0.0 {
        return Err(ValidationError::InvertedOrientation { volume });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
        (
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        )
    }

    #[test]
    fn tetrahedron_is_closed_manifold() {
        let (v, t) = tetrahedron();
        assert_eq!(check_manifold(&v, &t), Ok(()));
        assert!((signed_volume(&v, &t) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn missing_face_reports_open_edges() {
        let (v, mut t) = tetrahedron();
        t.pop();
        assert!(matches!(
            check_manifold(&v, &t),
            Err(ValidationError::OpenEdges { count: 3, .. })
        ));
    }

    #[test]
    fn flipped_face_reports_inconsistent_winding() {
        let (v, mut t) = tetrahedron();
        t[3] = [0, 2, 3];
        assert!(matches!(
            check_manifold(&v, &t),
            Err(ValidationError::InconsistentWinding { count: 3, .. })
        ));
    }

    #[test]
    fn inside_out_surface_is_rejected() {
        let (v, t) = tetrahedron();
        let flipped: Vec<[usize; 3]> = t.iter().map(|&[a, b, c]| [a, c, b]).collect();
        assert!(matches!(
            check_manifold(&v, &flipped),
            Err(ValidationError::InvertedOrientation { .. })
        ));
    }

    #[test]
    fn bad_indices_and_coordinates() {
        let (mut v, t) = tetrahedron();
        assert_eq!(
            check_manifold(&v[..3], &t),
            Err(ValidationError::IndexOutOfRange { index: 3, len: 3 })
        );
        v[1].x = Real::NAN;
        assert!(matches!(
            check_manifold(&v, &t),
            Err(ValidationError::InvalidCoordinate(_))
        ));
        assert_eq!(check_manifold(&v, &[]), Err(ValidationError::Empty));
    }
}
