//! Hollow closed triangle meshes into thin-walled, printable shells.
//!
//! A model is shrunk by a non-uniform scale about its frame origin, dilated
//! by a small sphere (Minkowski sum), and subtracted from itself; a box is
//! then subtracted across the base to open a drain slot. Booleans run on
//! [BSP](mesh::bsp) trees of polygons and are welded back into validated
//! [`Solid`]s after every stage.
//!
//! ```
//! use csgshell::{HollowParams, Solid, hollow, mesh::Mesh, traits::CSGOps};
//! use nalgebra::Vector3;
//!
//! let model = Solid::from_mesh(&Mesh::<()>::cube(10.0, None).center()).unwrap();
//! let params = HollowParams {
//!     scale: Vector3::new(0.8, 0.8, 0.8),
//!     dilation_radius: 0.0,
//!     slot: None,
//! };
//! let report = hollow(&model, &params).unwrap();
//! assert!((report.final_volume - (1000.0 - 512.0)).abs() < 1e-6);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//! - **cli**: the `csgshell` command line tool
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![warn(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod boolean;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod minkowski;
pub mod params;
pub mod pipeline;
pub mod shell;
pub mod slot;
pub mod solid;
pub mod traits;
pub mod transform;
pub mod triangulated;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use boolean::BooleanEngine;
pub use errors::{Operand, Operation, ShellError, ShellResult, ValidationError};
pub use minkowski::MinkowskiDilator;
pub use pipeline::{HollowParams, HollowReport, hollow, hollow_centered, hollow_with};
pub use shell::ShellBuilder;
pub use slot::{SlotCutter, SlotSpec};
pub use solid::Solid;
pub use transform::{Transform, Transformer};
