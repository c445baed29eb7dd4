//! A pure Rust toolkit for volumetric Gaussian cube fields.
//! It reads and writes cube grids together with the molecules they were computed for,
//! combines fields arithmetically, labels voxels by their nearest atom, and rebuilds
//! electrostatic potentials from point charges for comparison against a reference grid.
//!
//! # Features
//!
//! - **Cube I/O** — Full and header-only parsing of Gaussian cube text grids, and a
//!   writer that reproduces the conventional layout
//! - **Field arithmetic** — Elementwise `+ − × ÷ ^` and `abs` against scalars, raw
//!   arrays or other cubes, with shape checks instead of silent broadcasting
//! - **Nearest-atom analysis** — Closest-atom labels, distance transforms and
//!   per-atom value masks over every voxel, computed in bounded memory
//! - **Potential reconstruction** — Coulomb point-charge potentials and signed error
//!   fields against a reference cube
//! - **Charge sources** — AnteChamber `.ac` molecules, plain charge lists and
//!   Gaussian log ESP blocks
//!
//! # Quick Start
//!
//! Rebuild the potential of a single unit charge on a small grid and compare it
//! with a reference field:
//!
//! ```
//! use std::sync::Arc;
//! use ndarray::Array3;
//! use cube_forge::{Atom, Cube, Element, GridMetadata, Molecule};
//! use cube_forge::{error_field, reproduce_field};
//!
//! let grid = Arc::new(GridMetadata::new([1.0, 0.0, 0.0], [1.0; 3], [2, 1, 1])?);
//! let molecule = Arc::new(Molecule::from_atoms(vec![Atom::new(
//!     1,
//!     Element::NA,
//!     1.0,
//!     [0.0, 0.0, 0.0],
//! )]));
//!
//! // Reference potential sampled at x = 1 and x = 2
//! let reference = Cube::new(
//!     grid,
//!     Arc::clone(&molecule),
//!     Array3::from_shape_vec((2, 1, 1), vec![0.9, 0.5])?,
//! )?;
//!
//! let reproduced = reproduce_field(&reference, &molecule)?;
//! assert_eq!(reproduced.values()[[0, 0, 0]], 1.0);
//! assert_eq!(reproduced.values()[[1, 0, 0]], 0.5);
//!
//! let error = error_field(&reference, &molecule)?;
//! assert!((error.values()[[0, 0, 0]] - 0.1).abs() < 1e-12);
//! assert_eq!(error.values()[[1, 0, 0]], 0.0);
//!
//! // Arithmetic returns new cubes that share the grid and molecule
//! let scaled = error.try_mul(2.0)?.abs();
//! assert_eq!(scaled.shape(), [2, 1, 1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`field`] — Grid metadata, the [`Cube`] entity and the arithmetic, distance and
//!   potential engines
//! - [`io`] — Cube, `.ac`, charge-list and Gaussian log readers and the cube writer
//!
//! # Data Types
//!
//! ## Fields
//!
//! - [`Cube`] — Scalar values on a regular grid plus the molecule they belong to
//! - [`GridMetadata`] — Origin, steps, voxel counts and coordinate axes
//! - [`Operand`] — Right-hand side of an arithmetic operation
//! - [`FieldSummary`] — Min, max, mean and RMS of the finite values of a field
//!
//! ## Molecules
//!
//! - [`Molecule`] — Ordered atoms, bonds and net charge
//! - [`Atom`] — Labelled atom with a net charge and optional position
//! - [`Bond`] — Bond between two atoms with bond order
//! - [`Element`] — Chemical element (H through Og)
//! - [`AtomSelector`] — Picks atoms by label or by element
//!
//! ## Configuration
//!
//! - [`FieldConfig`] — Engine block size and division behaviour
//! - [`DivisionMode`] — True division or the legacy multiplying operator
//! - [`CubeReadOptions`] — Header-only parsing, field type and base molecule

mod model;

pub mod field;
pub mod io;

pub use model::atom::Atom;
pub use model::molecule::{AtomSelector, Bond, Molecule, SelectError};
pub use model::types::{BondOrder, Element, ParseElementError};

pub use field::{
    AxisError, BinaryOp, Condition, Cube, DivisionMode, FieldConfig, FieldSummary, GridMetadata,
    Operand, ParseBinaryOpError, error_field, error_field_with, reproduce_field,
    reproduce_field_with,
};

pub use field::Error as FieldError;
pub use io::CubeReadOptions;
pub use io::error::Error as IoError;
