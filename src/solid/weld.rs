//! Vertex welding and surface healing for triangle soups coming out of the
//! BSP kernel.
//!
//! BSP results are watertight only up to floating point noise: split
//! vertices land a few ulps apart, slivers appear where planes almost touch,
//! and an edge split on one side of a seam is often left whole on the other
//! (a T-junction). The passes here turn such a soup back into an indexed
//! surface whose directed edges pair up.

use crate::float_types::Real;
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;

/// Upper bound on heal passes; each pass is cheap once the surface is clean.
const MAX_HEAL_PASSES: usize = 8;

type CellKey = (i64, i64, i64);

/// Spatial hash that merges points closer than `epsilon`.
pub(crate) struct Welder {
    epsilon: Real,
    grid: HashMap<CellKey, Vec<usize>>,
    points: Vec<Point3<Real>>,
}

impl Welder {
    pub fn new(epsilon: Real) -> Self {
        Welder {
            epsilon,
            grid: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn cell(&self, p: &Point3<Real>) -> CellKey {
        (
            (p.x / self.epsilon).floor() as i64,
            (p.y / self.epsilon).floor() as i64,
            (p.z / self.epsilon).floor() as i64,
        )
    }

    /// Index of an already inserted point within `epsilon` of `p`.
    pub fn find(&self, p: &Point3<Real>) -> Option<usize> {
        let (cx, cy, cz) = self.cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if let Some(&idx) = bucket
                        .iter()
                        .find(|&&idx| (self.points[idx] - p).norm() <= self.epsilon)
                    {
                        return Some(idx);
                    }
                }
            }
        }
        None
    }

    /// Insert `p`, returning the index of the point it was welded to.
    pub fn insert(&mut self, p: Point3<Real>) -> usize {
        if let Some(idx) = self.find(&p) {
            return idx;
        }
        let idx = self.points.len();
        let key = self.cell(&p);
        self.grid.entry(key).or_default().push(idx);
        self.points.push(p);
        idx
    }

    pub fn into_points(self) -> Vec<Point3<Real>> {
        self.points
    }
}

/// Weld a triangle soup into shared vertices.
pub(crate) fn weld_triangles(
    triangles: &[[Point3<Real>; 3]],
    epsilon: Real,
) -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
    let mut welder = Welder::new(epsilon);
    let indexed = triangles
        .iter()
        .map(|[a, b, c]| [welder.insert(*a), welder.insert(*b), welder.insert(*c)])
        .collect();
    (welder.into_points(), indexed)
}

/// Run the healing passes until the surface stops changing, then drop
/// vertices no triangle references.
pub(crate) fn heal(
    vertices: Vec<Point3<Real>>,
    mut triangles: Vec<[usize; 3]>,
    epsilon: Real,
) -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
    for pass in 0..MAX_HEAL_PASSES {
        let before = triangles.len();
        let dropped = drop_degenerate(&vertices, &mut triangles, epsilon);
        let cancelled = cancel_opposite_pairs(&mut triangles);
        let split = split_t_junctions(&vertices, &mut triangles, epsilon);
        if dropped + cancelled + split == 0 {
            break;
        }
        tracing::trace!(
            pass,
            before,
            after = triangles.len(),
            dropped,
            cancelled,
            split,
            "heal pass"
        );
    }
    compact(vertices, triangles)
}

/// Distance from the apex to the longest edge; zero for collapsed triangles.
pub(crate) fn triangle_height(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Real {
    let longest = (b - a)
        .norm_squared()
        .max((c - b).norm_squared())
        .max((a - c).norm_squared())
        .sqrt();
    if longest == 0.0 {
        return 0.0;
    }
    (b - a).cross(&(c - a)).norm() / longest
}

/// Remove triangles with a repeated vertex or thinner than `epsilon`.
fn drop_degenerate(vertices: &[Point3<Real>], triangles: &mut Vec<[usize; 3]>, epsilon: Real) -> usize {
    let before = triangles.len();
    triangles.retain(|&[a, b, c]| {
        a != b
            && b != c
            && c != a
            && triangle_height(&vertices[a], &vertices[b], &vertices[c]) > epsilon
    });
    before - triangles.len()
}

/// Remove pairs of triangles over the same three vertices with opposite
/// winding. Such pairs enclose no volume; the BSP leaves them behind where
/// coplanar faces of both operands meet.
fn cancel_opposite_pairs(triangles: &mut Vec<[usize; 3]>) -> usize {
    // rotate so the smallest index comes first, keeping orientation
    fn canonical([a, b, c]: [usize; 3]) -> [usize; 3] {
        if a <= b && a <= c {
            [a, b, c]
        } else if b <= a && b <= c {
            [b, c, a]
        } else {
            [c, a, b]
        }
    }

    let mut live: HashMap<[usize; 3], Vec<usize>> = HashMap::new();
    let mut removed = vec![false; triangles.len()];
    for (i, tri) in triangles.iter().enumerate() {
        let key = canonical(*tri);
        let reversed = canonical([tri[0], tri[2], tri[1]]);
        if let Some(partner) = live.get_mut(&reversed).and_then(|list| list.pop()) {
            removed[partner] = true;
            removed[i] = true;
        } else {
            live.entry(key).or_default().push(i);
        }
    }

    let count = removed.iter().filter(|&&r| r).count();
    if count > 0 {
        let mut index = 0;
        triangles.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
    }
    count
}

/// Parameter of `p` along segment `u -> v` when `p` lies strictly inside it.
fn interior_parameter(u: &Point3<Real>, v: &Point3<Real>, p: &Point3<Real>, epsilon: Real) -> Option<Real> {
    let d = v - u;
    let length_squared = d.norm_squared();
    if length_squared <= epsilon * epsilon {
        return None;
    }
    let length = length_squared.sqrt();
    let t = (p - u).dot(&d) / length_squared;
    if t * length <= epsilon || (1.0 - t) * length <= epsilon {
        return None;
    }
    let closest = u + d * t;
    ((p - closest).norm() <= epsilon).then_some(t)
}

/// Split every triangle edge that has an unmatched direction and a vertex
/// lying on it, until no such vertex remains. Returns the number of splits.
fn split_t_junctions(vertices: &[Point3<Real>], triangles: &mut Vec<[usize; 3]>, epsilon: Real) -> usize {
    let directed: HashSet<(usize, usize)> = triangles
        .iter()
        .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
        .collect();
    let is_open = |a: usize, b: usize| !directed.contains(&(b, a));

    let mut candidates: Vec<usize> = directed
        .iter()
        .filter(|&&(a, b)| is_open(a, b))
        .flat_map(|&(a, b)| [a, b])
        .collect();
    if candidates.is_empty() {
        return 0;
    }
    candidates.sort_unstable();
    candidates.dedup();

    // splits only ever shorten edges, the budget guards against pathological input
    let mut budget = 16 * triangles.len() + 1024;
    let mut splits = 0;
    let mut stack: Vec<[usize; 3]> = std::mem::take(triangles);

    while let Some(tri) = stack.pop() {
        let split_point = (0..3).find_map(|k| {
            let (u, v, w) = (tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]);
            if !is_open(u, v) {
                return None;
            }
            candidates
                .iter()
                .copied()
                .filter(|&p| p != u && p != v && p != w)
                .filter_map(|p| {
                    interior_parameter(&vertices[u], &vertices[v], &vertices[p], epsilon)
                        .map(|t| (p, t))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(p, _)| (u, v, w, p))
        });

        match split_point {
            Some((u, v, w, p)) if budget > 0 => {
                budget -= 1;
                splits += 1;
                stack.push([u, p, w]);
                stack.push([p, v, w]);
            },
            _ => triangles.push(tri),
        }
    }

    splits
}

/// Drop unreferenced vertices and renumber the triangles.
fn compact(vertices: Vec<Point3<Real>>, triangles: Vec<[usize; 3]>) -> (Vec<Point3<Real>>, Vec<[usize; 3]>) {
    let mut remap = vec![usize::MAX; vertices.len()];
    let mut kept = Vec::new();
    let triangles = triangles
        .into_iter()
        .map(|tri| {
            tri.map(|idx| {
                if remap[idx] == usize::MAX {
                    remap[idx] = kept.len();
                    kept.push(vertices[idx]);
                }
                remap[idx]
            })
        })
        .collect();
    (kept, triangles)
}
