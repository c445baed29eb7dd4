//! Scalar fields on regular 3-D grids and the engines that operate on them.
//!
//! - [`axis`] – Grid metadata: origin, steps, voxel counts and coordinate axes.
//! - [`cube`] – The [`Cube`] entity, coordinate generation and value filtering.
//! - [`arith`] – Elementwise arithmetic against scalars, raw arrays and cubes.
//! - [`distance`] – Nearest-atom labeling and distance transforms.
//! - [`potential`] – Point-charge potential reconstruction and error fields.
//! - [`config`] – Block size and division behaviour of the engines.
//!
//! Every operation here returns a fresh value array; grid metadata and the
//! molecule are shared by reference count between a cube and everything
//! derived from it.

pub mod arith;
pub mod axis;
pub mod config;
pub mod cube;
pub mod distance;
pub mod potential;

mod error;

pub use arith::{BinaryOp, Operand, ParseBinaryOpError};
pub use axis::{AxisError, GridMetadata};
pub use config::{DivisionMode, FieldConfig};
pub use cube::{Condition, Cube, FieldSummary};
pub use error::Error;
pub use potential::{error_field, error_field_with, reproduce_field, reproduce_field_with};
