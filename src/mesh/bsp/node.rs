//! BSP tree nodes and the csg.js tree walks used by the mesh booleans.

use crate::mesh::bsp::split::{choose_plane, split_each};
use crate::mesh::plane::{FRONT, Plane};
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane, `None` until the node is built
    pub plane: Option<Plane>,

    pub front: Option<Box<Node<S>>>,
    pub back: Option<Box<Node<S>>>,

    /// Polygons lying on `plane`, facing either way
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Send + Sync + Debug> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + Debug> Node<S> {
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Tree partitioning `polygons`.
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        node.build(polygons);
        node
    }

    /// Swap inside and outside: flip every polygon and plane, and swap the
    /// front and back subtrees.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = current.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut current.front, &mut current.back);
            stack.extend(current.front.as_deref_mut());
            stack.extend(current.back.as_deref_mut());
        }
    }

    /// The parts of `polygons` outside the solid this tree bounds.
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        let Some(plane) = self.plane.as_ref() else {
            return polygons.to_vec();
        };

        let mut front = Vec::with_capacity(polygons.len());
        let mut back = Vec::with_capacity(polygons.len());
        for pieces in split_each(plane, polygons) {
            for poly in pieces.coplanar_front.into_iter().chain(pieces.coplanar_back) {
                if plane.orient_plane(&poly.plane) == FRONT {
                    front.push(poly);
                } else {
                    back.push(poly);
                }
            }
            front.extend(pieces.front);
            back.extend(pieces.back);
        }

        let mut result = match &self.front {
            Some(node) => node.clip_polygons(&front),
            None => front,
        };
        // without a back subtree the back pieces are inside and dropped
        if let Some(node) = &self.back {
            result.extend(node.clip_polygons(&back));
        }
        result
    }

    /// Remove every polygon of this tree that lies inside `other`.
    pub fn clip_to(&mut self, other: &Node<S>) {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            current.polygons = other.clip_polygons(&current.polygons);
            stack.extend(current.front.as_deref_mut());
            stack.extend(current.back.as_deref_mut());
        }
    }

    /// Every polygon in the tree, back subtrees visited first.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);
            stack.extend(current.front.as_deref());
            stack.extend(current.back.as_deref());
        }
        result
    }

    /// Insert `polygons` into the tree, picking a plane for any node that
    /// has none yet.
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        if self.plane.is_none() {
            self.plane = choose_plane(polygons);
        }
        let Some(plane) = self.plane.clone() else {
            return;
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for pieces in split_each(&plane, polygons) {
            self.polygons.extend(pieces.coplanar_front);
            self.polygons.extend(pieces.coplanar_back);
            front.extend(pieces.front);
            back.extend(pieces.back);
        }

        if !front.is_empty() {
            self.front.get_or_insert_with(Box::default).build(&front);
        }
        if !back.is_empty() {
            self.back.get_or_insert_with(Box::default).build(&back);
        }
    }
}
