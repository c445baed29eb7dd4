//! Coordinate axes and grid metadata for axis-aligned cube grids.

use thiserror::Error;

/// Unit-vector components smaller than this in magnitude count as zero.
pub const AXIS_TOLERANCE: f64 = 0.01;

pub const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

/// Largest grid accepted, in voxels (8 GiB of `f64` values).
pub const MAX_VOXELS: usize = 1 << 30;

/// Reasons a cube header cannot be turned into an axis-aligned grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    #[error("{axis} axis row must have exactly one non-zero component, found {found}")]
    NotAxisAligned { axis: char, found: usize },

    #[error("{axis} axis step lies along {column}; only diagonal unit vectors are supported")]
    OffDiagonal { axis: char, column: char },

    #[error("{axis} axis must have a positive voxel count, found {count}")]
    NonPositiveCount { axis: char, count: i64 },

    #[error("{axis} axis step must be finite and non-zero, found {step}")]
    InvalidStep { axis: char, step: f64 },

    #[error("grid of {} × {} × {} voxels exceeds the limit of {MAX_VOXELS}", n_voxels[0], n_voxels[1], n_voxels[2])]
    TooManyVoxels { n_voxels: [usize; 3] },
}

/// Origin, per-axis step and voxel count of a regular grid, plus the three
/// coordinate axes derived from them.
///
/// Immutable once built. Cubes derived from one another share a single
/// instance behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMetadata {
    origin: [f64; 3],
    steps: [f64; 3],
    n_voxels: [usize; 3],
    axes: [Vec<f64>; 3],
}

impl GridMetadata {
    pub fn new(origin: [f64; 3], steps: [f64; 3], n_voxels: [usize; 3]) -> Result<Self, AxisError> {
        for d in 0..3 {
            if n_voxels[d] == 0 {
                return Err(AxisError::NonPositiveCount {
                    axis: AXIS_NAMES[d],
                    count: 0,
                });
            }
            if !steps[d].is_finite() || steps[d] == 0.0 {
                return Err(AxisError::InvalidStep {
                    axis: AXIS_NAMES[d],
                    step: steps[d],
                });
            }
        }

        n_voxels
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .filter(|&total| total <= MAX_VOXELS)
            .ok_or(AxisError::TooManyVoxels { n_voxels })?;

        let axes = [0, 1, 2].map(|d| build_axis(origin[d], steps[d], n_voxels[d]));
        Ok(Self {
            origin,
            steps,
            n_voxels,
            axes,
        })
    }

    /// Builds the grid from the raw cube header values: the origin, one
    /// unit-vector row per axis and the signed voxel counts.
    ///
    /// Each row must contain exactly one component at or above
    /// [`AXIS_TOLERANCE`], and it must sit on the diagonal.
    pub fn from_header(
        origin: [f64; 3],
        rows: [[f64; 3]; 3],
        counts: [i64; 3],
    ) -> Result<Self, AxisError> {
        let mut steps = [0.0; 3];
        let mut n_voxels = [0usize; 3];

        for axis in 0..3 {
            let name = AXIS_NAMES[axis];
            let count = counts[axis];
            if count <= 0 {
                return Err(AxisError::NonPositiveCount { axis: name, count });
            }
            n_voxels[axis] = count as usize;

            let nonzero: Vec<usize> = (0..3)
                .filter(|&c| rows[axis][c].abs() >= AXIS_TOLERANCE)
                .collect();
            match nonzero.as_slice() {
                [column] if *column == axis => steps[axis] = rows[axis][axis],
                [column] => {
                    return Err(AxisError::OffDiagonal {
                        axis: name,
                        column: AXIS_NAMES[*column],
                    });
                }
                _ => {
                    return Err(AxisError::NotAxisAligned {
                        axis: name,
                        found: nonzero.len(),
                    });
                }
            }
        }

        Self::new(origin, steps, n_voxels)
    }

    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    #[inline]
    pub fn steps(&self) -> [f64; 3] {
        self.steps
    }

    #[inline]
    pub fn n_voxels(&self) -> [usize; 3] {
        self.n_voxels
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_voxels[0], self.n_voxels[1], self.n_voxels[2])
    }

    /// Total voxel count; never above [`MAX_VOXELS`].
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.n_voxels.iter().product()
    }

    #[inline]
    pub fn axes(&self) -> &[Vec<f64>; 3] {
        &self.axes
    }

    #[inline]
    pub fn axis(&self, d: usize) -> &[f64] {
        &self.axes[d]
    }

    /// The diagonal unit-vector matrix written back into cube headers.
    pub fn unit_vectors(&self) -> [[f64; 3]; 3] {
        let mut rows = [[0.0; 3]; 3];
        for d in 0..3 {
            rows[d][d] = self.steps[d];
        }
        rows
    }

    #[inline]
    pub fn coordinate(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        [self.axes[0][i], self.axes[1][j], self.axes[2][k]]
    }

    /// Coordinate of the voxel at row-major flat index `m`.
    pub fn coordinate_at(&self, m: usize) -> [f64; 3] {
        let [_, ny, nz] = self.n_voxels;
        let k = m % nz;
        let j = (m / nz) % ny;
        let i = m / (ny * nz);
        self.coordinate(i, j, k)
    }
}

fn build_axis(origin: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| origin + i as f64 * step).collect()
}
