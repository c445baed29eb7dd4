mod infer;

pub use infer::{charge_input as infer_charge_input_format, cube_input as infer_cube_format};

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result, bail};
use cube_forge::io::charges::{self, ChargeProvenance, ChargeSet};
use cube_forge::io::{Format, ac};
use cube_forge::{Cube, CubeReadOptions, Molecule};
use log::warn;

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn load_cube(path: &Path, options: &CubeReadOptions) -> Result<Cube> {
    if infer_cube_format(path).is_none() {
        warn!(
            "'{}' does not have a .cub/.cube extension; reading it as a cube file anyway",
            path.display()
        );
    }
    Cube::load(path, options)
        .with_context(|| format!("Failed to read cube file: {}", path.display()))
}

fn load_ac(path: &Path) -> Result<Molecule> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open AnteChamber file: {}", path.display()))?;
    ac::read(BufReader::new(file))
        .with_context(|| format!("Failed to read AnteChamber file: {}", path.display()))
}

/// Reads charges for `base` from `path`, choosing the reader by extension.
/// The returned molecule always keeps the positions of `base`.
pub fn load_charges(path: &Path, base: &Molecule) -> Result<ChargeSet> {
    match infer_charge_input_format(path) {
        Some(Format::Ac) => load_ac_charges(path, base),
        Some(Format::ChargeList | Format::GaussianLog) => charges::load(path, base)
            .with_context(|| format!("Failed to read charges from {}", path.display())),
        _ => bail!(
            "Cannot infer the charge format of {} (expected .txt, .log or .ac)",
            path.display()
        ),
    }
}

/// Copies the per-atom charges of an AnteChamber file onto `base`.
///
/// Only the charges and the `CHARGE` record are taken: `.ac` coordinates are
/// in Ångström while cube headers are in Bohr.
pub fn load_ac_charges(path: &Path, base: &Molecule) -> Result<ChargeSet> {
    let source = load_ac(path)?;
    let values: Vec<f64> = source.atoms.iter().map(|atom| atom.charge).collect();
    let Some(mut molecule) = base.with_charges(&values) else {
        bail!(
            "AnteChamber file {} has {} atoms but the molecule has {}",
            path.display(),
            source.atom_count(),
            base.atom_count()
        );
    };

    molecule.charge = source.charge;

    if let Some((ours, theirs)) = molecule
        .atoms
        .iter()
        .zip(&source.atoms)
        .find(|(ours, theirs)| ours.element != theirs.element)
    {
        warn!(
            "Atom {} is {} in the cube header but {} in {}",
            ours.label,
            ours.element,
            theirs.element,
            path.display()
        );
    }

    Ok(ChargeSet {
        molecule,
        provenance: ChargeProvenance::guess(path),
    })
}

pub fn save_cube(cube: &Cube, path: &Path) -> Result<()> {
    cube.save(path)
        .with_context(|| format!("Failed to write cube file: {}", path.display()))
}
