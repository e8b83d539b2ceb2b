//! Binary space partitioning trees over convex polygons, the engine behind
//! the [`Mesh`](crate::mesh::Mesh) booleans.

pub mod node;
pub(crate) mod split;

pub use node::Node;
