use crate::field::{Cube, Error as FieldError};
use crate::io::{error::Error, util};
use log::debug;
use std::io::Write;

pub(crate) const GENERATOR_LINE: &str = " Cube file generated by cube-forge.";
pub(crate) const FIELD_TYPE_PREFIX: &str = " Cube file for field of type ";

const VALUES_PER_LINE: usize = 6;

/// Serializes `cube` in cube text layout.
///
/// Every atom of the cube's molecule must have a position.
pub fn write<W: Write>(mut writer: W, cube: &Cube) -> Result<(), Error> {
    let grid = cube.grid();
    let molecule = cube.molecule();

    writeln!(writer, "{GENERATOR_LINE}")?;
    writeln!(writer, "{FIELD_TYPE_PREFIX}{}.", cube.field_type())?;

    let [ox, oy, oz] = grid.origin();
    writeln!(
        writer,
        " {:4}   {}   {}   {}    1",
        molecule.atom_count(),
        util::fmt_fixed6(ox),
        util::fmt_fixed6(oy),
        util::fmt_fixed6(oz)
    )?;

    for (count, row) in grid.n_voxels().iter().zip(grid.unit_vectors()) {
        let row: Vec<String> = row.iter().map(|&v| util::fmt_fixed6(v)).collect();
        writeln!(writer, " {:4}   {}", count, row.join("   "))?;
    }

    for atom in &molecule.atoms {
        let [x, y, z] = atom
            .position
            .ok_or(FieldError::MissingGeometry { label: atom.label })?;
        let number = atom.atomic_number();
        writeln!(
            writer,
            " {:4}   {}   {}   {}   {}",
            number,
            util::fmt_fixed6(number as f64 + atom.charge),
            util::fmt_fixed6(x),
            util::fmt_fixed6(y),
            util::fmt_fixed6(z)
        )?;
    }

    let nz = grid.n_voxels()[2];
    for (idx, &value) in cube.values().iter().enumerate() {
        let counter = idx + 1;
        write!(writer, " {}", util::fmt_sci5(value))?;
        if counter % VALUES_PER_LINE == 0 || counter % nz == 0 {
            writeln!(writer)?;
        }
    }

    debug!(
        "Serialized {} values for {} atoms",
        cube.values().len(),
        molecule.atom_count()
    );
    Ok(())
}
