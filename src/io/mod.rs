#[cfg(feature = "stl-io")]
pub mod stl;

use crate::errors::ValidationError;

/// Mesh import/export errors.
///
/// Loading checks the closed-manifold invariant up front, so a malformed
/// model is reported here rather than deep inside a boolean.
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    MalformedInput(String),

    /// The file parsed but does not describe a closed manifold solid
    MalformedSolid(ValidationError),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),

            MalformedInput(msg) => write!(f, "Input is malformed: {msg}"),
            MalformedSolid(error) => write!(f, "Input is not a closed manifold solid: {error}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            IoError::MalformedSolid(error) => Some(error),
            IoError::MalformedInput(_) => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}

impl From<ValidationError> for IoError {
    fn from(value: ValidationError) -> Self {
        Self::MalformedSolid(value)
    }
}
