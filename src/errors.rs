//! Validation and pipeline errors

use crate::float_types::Real;
use nalgebra::Point3;
use std::fmt::Display;

/// Everything that can make a triangle set fail the closed-manifold invariant.
///
/// Each variant carries a count and one sample location so the caller can
/// find the defect in a viewer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (Empty) The surface has no triangles at all
    #[error("(Empty) The surface has no triangles")]
    Empty,
    /// (InvalidCoordinate) A vertex has a NaN or infinite component
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite component")]
    InvalidCoordinate(Point3<Real>),
    /// (IndexOutOfRange) A triangle references a vertex that does not exist
    #[error("(IndexOutOfRange) Triangle index {index} is out of range (vertices.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// (DegenerateTriangle) A triangle repeats a vertex or has zero area
    #[error("(DegenerateTriangle) {count} zero-area triangle(s), first at: {at}")]
    DegenerateTriangle { count: usize, at: Point3<Real> },
    /// (OpenEdges) Edges used by a single triangle, the surface has holes
    #[error("(OpenEdges) {count} boundary edge(s), first at: {at}")]
    OpenEdges { count: usize, at: Point3<Real> },
    /// (NonManifoldEdges) Edges shared by more than two triangles
    #[error("(NonManifoldEdges) {count} edge(s) shared by more than two triangles, first at: {at}")]
    NonManifoldEdges { count: usize, at: Point3<Real> },
    /// (InconsistentWinding) Neighbouring triangles traverse a shared edge in the same direction
    #[error("(InconsistentWinding) {count} edge(s) with inconsistent winding, first at: {at}")]
    InconsistentWinding { count: usize, at: Point3<Real> },
    /// (InvertedOrientation) The enclosed volume is negative, normals point inward
    #[error("(InvertedOrientation) The enclosed volume {volume} is negative")]
    InvertedOrientation { volume: Real },
}

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scale,
    Translate,
    Dilate,
    Union,
    Difference,
    Intersection,
    BuildShell,
    CutSlot,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Scale => "scale",
            Operation::Translate => "translate",
            Operation::Dilate => "dilate",
            Operation::Union => "union",
            Operation::Difference => "difference",
            Operation::Intersection => "intersection",
            Operation::BuildShell => "build_shell",
            Operation::CutSlot => "cut_slot",
        };
        f.write_str(name)
    }
}

/// Which solid an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The only input of a unary stage
    Input,
    /// Left-hand operand of a boolean operation
    First,
    /// Right-hand operand of a boolean operation
    Second,
    /// The solid the operation produced
    Result,
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operand::Input => "input",
            Operand::First => "first operand",
            Operand::Second => "second operand",
            Operand::Result => "result",
        };
        f.write_str(name)
    }
}

/// Errors raised by the hollowing pipeline. Every stage fails fast with the
/// first of these it encounters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShellError {
    /// The input of a dilation or boolean stage is not a closed manifold
    #[error("{operation}: {operand} is not a closed manifold solid: {source}")]
    MalformedInputSolid {
        operation: Operation,
        operand: Operand,
        #[source]
        source: ValidationError,
    },
    /// The boolean computation could not produce a valid closed manifold
    #[error("{operation} failed on {operand}: {reason}")]
    BooleanOperationFailed {
        operation: Operation,
        operand: Operand,
        reason: String,
    },
    /// The operation removed all volume
    #[error("{operation} produced an empty solid")]
    EmptyResult { operation: Operation },
    /// A numeric parameter is outside its domain
    #[error("{operation}: invalid {parameter}: {reason}")]
    InvalidParameter {
        operation: Operation,
        parameter: &'static str,
        reason: String,
    },
}

impl ShellError {
    /// The stage that failed.
    pub const fn operation(&self) -> Operation {
        match self {
            ShellError::MalformedInputSolid { operation, .. }
            | ShellError::BooleanOperationFailed { operation, .. }
            | ShellError::EmptyResult { operation }
            | ShellError::InvalidParameter { operation, .. } => *operation,
        }
    }

    /// Re-attribute a failure to the enclosing stage, keeping the details.
    pub(crate) fn in_stage(mut self, stage: Operation) -> Self {
        match &mut self {
            ShellError::MalformedInputSolid { operation, .. }
            | ShellError::BooleanOperationFailed { operation, .. }
            | ShellError::EmptyResult { operation }
            | ShellError::InvalidParameter { operation, .. } => *operation = stage,
        }
        self
    }
}

/// Result type used by every pipeline stage.
pub type ShellResult<T> = Result<T, ShellError>;
