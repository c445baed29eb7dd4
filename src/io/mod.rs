//! Readers and writers for the files a cube workflow touches.
//!
//! - [`cube`] – Gaussian cube text grids, full or header-only.
//! - [`ac`] – AnteChamber `.ac` molecules with charges and bonds.
//! - [`charges`] – Per-atom charge lists and Gaussian log ESP blocks, plus
//!   charge-method inference from file names.
//!
//! Every reader takes a [`BufRead`](std::io::BufRead) and every writer a
//! [`Write`](std::io::Write); [`Cube::load`](crate::Cube::load) and
//! [`Cube::save`](crate::Cube::save) wrap them for files on disk.

use std::fmt;

pub mod error;
pub mod util;

pub mod ac;
pub mod charges;
pub mod cube;

pub use cube::CubeReadOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Cube,
    Ac,
    ChargeList,
    GaussianLog,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Cube => write!(f, "Cube"),
            Format::Ac => write!(f, "AC"),
            Format::ChargeList => write!(f, "charge list"),
            Format::GaussianLog => write!(f, "Gaussian log"),
        }
    }
}
