//! Nearest-atom labeling and distance transforms over a cube's voxels.
//!
//! Voxels are streamed in blocks of [`FieldConfig::chunk_size`]; each block
//! fills a reused `block × atoms` distance buffer that is reduced row by row.
//! The reduction of a voxel only ever sees that voxel's row, so the block size
//! cannot change any result.

use super::config::FieldConfig;
use super::cube::{Condition, Cube};
use super::error::Error;
use crate::model::atom::Atom;
use crate::model::molecule::{AtomSelector, SelectError};
use log::debug;
use ndarray::Array3;
use std::collections::HashSet;

/// Positioned atoms taking part in a distance or potential evaluation.
pub(crate) struct Sites {
    pub labels: Vec<usize>,
    pub positions: Vec<[f64; 3]>,
    pub charges: Vec<f64>,
}

impl Sites {
    pub fn from_atoms<'a>(atoms: impl IntoIterator<Item = &'a Atom>) -> Result<Self, Error> {
        let mut sites = Sites {
            labels: Vec::new(),
            positions: Vec::new(),
            charges: Vec::new(),
        };
        for atom in atoms {
            let position = atom
                .position
                .ok_or(Error::MissingGeometry { label: atom.label })?;
            sites.labels.push(atom.label);
            sites.positions.push(position);
            sites.charges.push(atom.charge);
        }
        Ok(sites)
    }

    fn select(cube: &Cube, selectors: &[AtomSelector]) -> Result<Self, Error> {
        let atoms = cube.molecule().select(selectors)?;
        if atoms.is_empty() {
            return Err(SelectError::Empty.into());
        }
        Self::from_atoms(atoms)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

#[inline]
fn euclidean(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Evaluates `reduce` on every voxel's row of distances to `sites`, writing
/// the results into an array of the cube's shape.
pub(crate) fn reduce_distances<T, F>(
    cube: &Cube,
    sites: &Sites,
    config: &FieldConfig,
    fill: T,
    mut reduce: F,
) -> Array3<T>
where
    T: Clone,
    F: FnMut(&[f64]) -> T,
{
    let n_sites = sites.len();
    let chunk = config.chunk_size.max(1);
    let mut out = Array3::from_elem(cube.grid().shape(), fill);
    let mut slots = out.iter_mut();
    let mut coords = cube.iter_coordinates();
    let mut batch: Vec<[f64; 3]> = Vec::with_capacity(chunk);
    let mut block: Vec<f64> = Vec::with_capacity(chunk * n_sites);
    let mut blocks = 0usize;

    loop {
        batch.clear();
        batch.extend(coords.by_ref().take(chunk));
        if batch.is_empty() {
            break;
        }

        block.clear();
        for &point in &batch {
            block.extend(sites.positions.iter().map(|&p| euclidean(point, p)));
        }

        for (r, slot) in slots.by_ref().take(batch.len()).enumerate() {
            *slot = reduce(&block[r * n_sites..(r + 1) * n_sites]);
        }
        blocks += 1;
    }

    debug!(
        "Evaluated {} voxels against {} atoms in {} block(s)",
        cube.grid().voxel_count(),
        n_sites,
        blocks
    );
    out
}

/// Index of the smallest entry; the first one wins on ties.
fn argmin(row: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &d) in row.iter().enumerate().skip(1) {
        if d < row[best] {
            best = idx;
        }
    }
    best
}

fn row_min(row: &[f64]) -> f64 {
    row.iter().copied().fold(f64::INFINITY, f64::min)
}

impl Cube {
    /// Labels every voxel with the label of its nearest selected atom.
    ///
    /// An empty selector list selects all atoms. When several atoms are
    /// equally close, the one that comes first in the molecule wins.
    pub fn closest_atom(&self, selectors: &[AtomSelector]) -> Result<Array3<usize>, Error> {
        self.closest_atom_with(selectors, &FieldConfig::default())
    }

    pub fn closest_atom_with(
        &self,
        selectors: &[AtomSelector],
        config: &FieldConfig,
    ) -> Result<Array3<usize>, Error> {
        config.validate()?;
        let sites = Sites::select(self, selectors)?;
        Ok(reduce_distances(self, &sites, config, 0, |row| {
            sites.labels[argmin(row)]
        }))
    }

    /// Euclidean distance from every voxel to its nearest selected atom.
    pub fn distance_to_closest_atom(&self, selectors: &[AtomSelector]) -> Result<Array3<f64>, Error> {
        self.distance_to_closest_atom_with(selectors, &FieldConfig::default())
    }

    pub fn distance_to_closest_atom_with(
        &self,
        selectors: &[AtomSelector],
        config: &FieldConfig,
    ) -> Result<Array3<f64>, Error> {
        config.validate()?;
        let sites = Sites::select(self, selectors)?;
        Ok(reduce_distances(self, &sites, config, f64::NAN, row_min))
    }

    /// Keeps the values of voxels whose nearest atom among `among` is one of
    /// `selected`; every other voxel becomes NaN.
    ///
    /// Selected atoms that are not part of `among` can never be nearest, so
    /// they contribute no voxels.
    pub fn value_by_atom(
        &self,
        selected: &[AtomSelector],
        among: &[AtomSelector],
    ) -> Result<Array3<f64>, Error> {
        self.value_by_atom_with(selected, among, &FieldConfig::default())
    }

    pub fn value_by_atom_with(
        &self,
        selected: &[AtomSelector],
        among: &[AtomSelector],
        config: &FieldConfig,
    ) -> Result<Array3<f64>, Error> {
        let keep: HashSet<usize> = self
            .molecule()
            .select(selected)?
            .into_iter()
            .map(|atom| atom.label)
            .collect();
        let labels = self.closest_atom_with(among, config)?;
        let mask = labels.mapv(|label| keep.contains(&label));
        self.filter_values(Condition::Mask(mask.view()), f64::NAN)
    }
}
