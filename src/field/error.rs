//! Error types for field operations.
//!
//! Every check in the field engines fails fast with one of these variants;
//! no engine returns a partial result.

use crate::model::molecule::SelectError;
use thiserror::Error;

/// Errors raised by [`Cube`](super::Cube) operations and the engines built on it.
#[derive(Debug, Error)]
pub enum Error {
    /// Two cubes, or a cube and its replacement values, disagree on shape.
    #[error("Cube files must have the same coordinates to be summed. (expected {expected:?}, found {found:?})")]
    ShapeMismatch {
        /// Shape of the left-hand (or original) cube.
        expected: [usize; 3],
        /// Shape that was supplied.
        found: [usize; 3],
    },

    /// A boolean mask handed to `filter_values` does not cover the grid.
    #[error("filter condition must be a predicate or a boolean mask of shape {expected:?}, got a mask of shape {found:?}")]
    InvalidCondition {
        expected: [usize; 3],
        found: [usize; 3],
    },

    /// A raw array operand whose shape does not match the cube.
    #[error("unsupported operand: raw array of shape {found:?} cannot be combined with a cube of shape {expected:?}")]
    UnsupportedOperand {
        expected: [usize; 3],
        found: [usize; 3],
    },

    /// An atom needed by a distance or potential computation has no position.
    #[error("atom {label} has no resolved position")]
    MissingGeometry {
        /// Label of the offending atom.
        label: usize,
    },

    /// Atom selection failed.
    #[error(transparent)]
    Selection(#[from] SelectError),

    /// The engine configuration could not be parsed.
    #[error("failed to parse field configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The engine configuration parsed but holds an unusable value.
    #[error("invalid field configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn shape_mismatch(expected: [usize; 3], found: [usize; 3]) -> Self {
        Self::ShapeMismatch { expected, found }
    }
}
