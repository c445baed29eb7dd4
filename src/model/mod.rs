//! Molecular geometry consumed by the field engines.
//!
//! - [`types`] – Element table and bond order classifications.
//! - [`atom`] – Labelled atom with net charge and optional position.
//! - [`molecule`] – Ordered atoms, bonds, atom selection and charge substitution.
//!
//! A [`Molecule`](molecule::Molecule) is read-only once it is attached to a
//! [`Cube`](crate::Cube); derived cubes share it through an `Arc`.

pub mod atom;
pub mod molecule;
pub mod types;
