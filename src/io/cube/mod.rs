//! Gaussian cube text grids.
//!
//! Layout: two comment lines; the atom count and origin; one line per axis
//! with its voxel count and step row; one line per atom with the atomic
//! number, `Z + charge`, and position; then every voxel value in row-major
//! order, six per line and broken after each run along the last axis.

pub mod reader;
pub mod writer;

pub use reader::{CubeReadOptions, read};
pub use writer::write;

use super::error::Error;
use crate::field::Cube;
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

impl Cube {
    /// Reads a cube file from disk and records its path as the source.
    pub fn load(path: impl AsRef<Path>, options: &CubeReadOptions) -> Result<Cube, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let cube = read(BufReader::new(file), options)?;
        Ok(cube.with_source(path))
    }

    /// Writes this cube to a new file, failing with
    /// [`Error::AlreadyExists`] rather than replacing an existing one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => Error::AlreadyExists(path.to_path_buf()),
                _ => Error::from(e),
            })?;

        let mut writer = BufWriter::new(file);
        write(&mut writer, self)?;
        writer.flush()?;
        info!("Wrote {} field to {}", self.field_type(), path.display());
        Ok(())
    }
}
