use super::axis::GridMetadata;
use super::error::Error;
use crate::model::molecule::Molecule;
use ndarray::{Array3, ArrayView3, Zip};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_FIELD_TYPE: &str = "potential";

/// A scalar field sampled on a regular, axis-aligned 3-D grid, together with
/// the molecule it was computed for.
///
/// The value array always has the grid's voxel-count shape `(nx, ny, nz)`,
/// stored row-major so the last axis varies fastest. Grid metadata and the
/// molecule are shared by every cube derived from this one; only the values
/// are owned.
#[derive(Debug, Clone)]
pub struct Cube {
    source: Option<PathBuf>,
    field_type: String,
    values: Array3<f64>,
    grid: Arc<GridMetadata>,
    molecule: Arc<Molecule>,
}

/// Which voxels [`Cube::filter_values`] keeps.
pub enum Condition<'a> {
    /// Keep voxels whose value satisfies the predicate.
    Predicate(&'a dyn Fn(f64) -> bool),
    /// Keep voxels where the mask is `true`. Must match the grid shape.
    Mask(ArrayView3<'a, bool>),
}

impl Cube {
    /// Wraps `values` on `grid`, failing if the array shape differs from the
    /// grid's voxel counts.
    pub fn new(
        grid: Arc<GridMetadata>,
        molecule: Arc<Molecule>,
        values: Array3<f64>,
    ) -> Result<Self, Error> {
        let found = dims(&values.view());
        if found != grid.n_voxels() {
            return Err(Error::shape_mismatch(grid.n_voxels(), found));
        }
        Ok(Self {
            source: None,
            field_type: DEFAULT_FIELD_TYPE.to_string(),
            values,
            grid,
            molecule,
        })
    }

    /// A zero-filled cube of the grid's shape, for use as a geometry template.
    pub fn placeholder(grid: Arc<GridMetadata>, molecule: Arc<Molecule>) -> Self {
        let values = Array3::zeros(grid.shape());
        Self {
            source: None,
            field_type: DEFAULT_FIELD_TYPE.to_string(),
            values,
            grid,
            molecule,
        }
    }

    /// Builds a cube that shares `original`'s grid, molecule, source path and
    /// field type but owns `new_values`.
    pub fn assign_new_values_to(original: &Cube, new_values: Array3<f64>) -> Result<Self, Error> {
        let found = dims(&new_values.view());
        if found != original.shape() {
            return Err(Error::shape_mismatch(original.shape(), found));
        }
        Ok(original.derive(new_values))
    }

    /// Same as [`assign_new_values_to`](Self::assign_new_values_to) for values
    /// that are shape-correct by construction.
    pub(crate) fn derive(&self, values: Array3<f64>) -> Self {
        debug_assert_eq!(dims(&values.view()), self.shape());
        Self {
            source: self.source.clone(),
            field_type: self.field_type.clone(),
            values,
            grid: Arc::clone(&self.grid),
            molecule: Arc::clone(&self.molecule),
        }
    }

    pub fn with_field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    #[inline]
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array3<f64> {
        self.values
    }

    #[inline]
    pub fn grid(&self) -> &GridMetadata {
        &self.grid
    }

    #[inline]
    pub fn shared_grid(&self) -> &Arc<GridMetadata> {
        &self.grid
    }

    #[inline]
    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    #[inline]
    pub fn shared_molecule(&self) -> &Arc<Molecule> {
        &self.molecule
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.grid.n_voxels()
    }

    #[inline]
    pub fn axes(&self) -> &[Vec<f64>; 3] {
        self.grid.axes()
    }

    /// Coordinate matrices of the grid in matrix (`ij`) indexing: element
    /// `(i, j, k)` of the `d`-th array is the `d`-th coordinate of that voxel.
    pub fn meshgrid(&self) -> [Array3<f64>; 3] {
        let axes = self.grid.axes();
        let shape = self.grid.shape();
        [
            Array3::from_shape_fn(shape, |(i, _, _)| axes[0][i]),
            Array3::from_shape_fn(shape, |(_, j, _)| axes[1][j]),
            Array3::from_shape_fn(shape, |(_, _, k)| axes[2][k]),
        ]
    }

    /// Voxel coordinates in row-major order; entry `m` belongs to the `m`-th
    /// element of `values().iter()`.
    pub fn flat_coordinates(&self) -> Vec<[f64; 3]> {
        self.iter_coordinates().collect()
    }

    /// Streams the same sequence as [`flat_coordinates`](Self::flat_coordinates).
    pub fn iter_coordinates(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        let [nx, ny, nz] = self.shape();
        (0..nx).flat_map(move |i| {
            (0..ny).flat_map(move |j| (0..nz).map(move |k| self.grid.coordinate(i, j, k)))
        })
    }

    /// Copies the values, replacing every voxel the condition rejects with
    /// `replace_with` (typically `f64::NAN`).
    pub fn filter_values(&self, condition: Condition<'_>, replace_with: f64) -> Result<Array3<f64>, Error> {
        match condition {
            Condition::Predicate(keep) => Ok(self
                .values
                .mapv(|v| if keep(v) { v } else { replace_with })),
            Condition::Mask(mask) => {
                let found = dims(&mask);
                if found != self.shape() {
                    return Err(Error::InvalidCondition {
                        expected: self.shape(),
                        found,
                    });
                }
                Ok(Zip::from(&self.values)
                    .and(&mask)
                    .map_collect(|&v, &keep| if keep { v } else { replace_with }))
            }
        }
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary::of(self.values.view())
    }
}

/// Basic statistics over the finite values of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub rms: f64,
    pub finite: usize,
    pub total: usize,
}

impl FieldSummary {
    pub fn of(values: ArrayView3<'_, f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut finite = 0usize;

        for &v in values.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            sum_sq += v * v;
            finite += 1;
        }

        let (mean, rms) = if finite > 0 {
            (sum / finite as f64, (sum_sq / finite as f64).sqrt())
        } else {
            (f64::NAN, f64::NAN)
        };

        Self {
            min,
            max,
            mean,
            rms,
            finite,
            total: values.len(),
        }
    }
}

pub(crate) fn dims<T>(array: &ArrayView3<'_, T>) -> [usize; 3] {
    let (a, b, c) = array.dim();
    [a, b, c]
}
