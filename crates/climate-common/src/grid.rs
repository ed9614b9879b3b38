//! Grid types for land-point model output.
//!
//! Land-surface models store their output on a reduced "land point" axis that
//! skips ocean cells. A [`LandIndexGrid`] maps every cell of the regular
//! lat/lon grid back to its offset on that axis. All 2D arrays here are flat
//! row-major vectors: `values[row * width + col]`, row 0 being the first
//! latitude row as stored in the file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ClimateError, ClimateResult};

/// Dimensions of a regular lat/lon grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of latitude rows
    pub height: usize,
    /// Number of longitude columns
    pub width: usize,
}

impl GridShape {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat offset of a cell, or None if outside the grid.
    pub fn offset(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    fn check_len(&self, what: &str, len: usize) -> ClimateResult<()> {
        if len != self.len() {
            return Err(ClimateError::validation(format!(
                "{} has {} cells, expected {}x{} = {}",
                what,
                len,
                self.height,
                self.width,
                self.len()
            )));
        }
        Ok(())
    }
}

/// Land-point index for every grid cell, with a validity mask.
///
/// `mask[i] == true` marks cell `i` as invalid (ocean or fill); the index value
/// stored for such a cell is meaningless.
#[derive(Debug, Clone, PartialEq)]
pub struct LandIndexGrid {
    shape: GridShape,
    indices: Vec<i64>,
    mask: Vec<bool>,
}

impl LandIndexGrid {
    /// Create an index grid from raw indices and an explicit mask.
    pub fn new(shape: GridShape, indices: Vec<i64>, mask: Vec<bool>) -> ClimateResult<Self> {
        shape.check_len("land index", indices.len())?;
        shape.check_len("land index mask", mask.len())?;
        Ok(Self {
            shape,
            indices,
            mask,
        })
    }

    /// Create an index grid masking every cell equal to `fill`.
    pub fn from_fill(shape: GridShape, indices: Vec<i64>, fill: i64) -> ClimateResult<Self> {
        let mask = indices.iter().map(|&v| v == fill).collect();
        Self::new(shape, indices, mask)
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn indices(&self) -> &[i64] {
        &self.indices
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Land-point index of a cell, None if masked or outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        let i = self.shape.offset(row, col)?;
        if self.mask[i] {
            None
        } else {
            Some(self.indices[i])
        }
    }

    /// Number of unmasked cells.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&m| !m).count()
    }
}

/// Grid metadata for one model configuration: land index plus coordinates.
#[derive(Debug, Clone)]
pub struct GridInfo {
    pub index: LandIndexGrid,
    /// Latitude of every cell (degrees north)
    pub latitudes: Vec<f32>,
    /// Longitude of every cell (degrees east)
    pub longitudes: Vec<f32>,
}

impl GridInfo {
    /// Bundle grid metadata, checking that all three arrays share one shape.
    pub fn new(index: LandIndexGrid, latitudes: Vec<f32>, longitudes: Vec<f32>) -> ClimateResult<Self> {
        let shape = index.shape();
        shape.check_len("latitude", latitudes.len())?;
        shape.check_len("longitude", longitudes.len())?;
        Ok(Self {
            index,
            latitudes,
            longitudes,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.index.shape()
    }

    /// Check that valid index values are non-negative and unique.
    pub fn validate(&self) -> ClimateResult<()> {
        let mut seen = HashSet::with_capacity(self.index.valid_count());
        for (cell, (&idx, &masked)) in self
            .index
            .indices
            .iter()
            .zip(self.index.mask.iter())
            .enumerate()
        {
            if masked {
                continue;
            }
            if idx < 0 {
                return Err(ClimateError::validation(format!(
                    "cell {} has negative land index {}",
                    cell, idx
                )));
            }
            if !seen.insert(idx) {
                return Err(ClimateError::validation(format!(
                    "land index {} appears more than once (cell {})",
                    idx, cell
                )));
            }
        }
        Ok(())
    }
}

/// A 2D float grid with masked (undefined) cells.
///
/// Masked cells hold `f32::NAN` in `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    shape: GridShape,
    values: Vec<f32>,
    mask: Vec<bool>,
}

impl MaskedGrid {
    pub fn new(shape: GridShape, mut values: Vec<f32>, mask: Vec<bool>) -> ClimateResult<Self> {
        shape.check_len("grid values", values.len())?;
        shape.check_len("grid mask", mask.len())?;
        for (v, &m) in values.iter_mut().zip(mask.iter()) {
            if m {
                *v = f32::NAN;
            }
        }
        Ok(Self {
            shape,
            values,
            mask,
        })
    }

    /// A grid with every cell masked.
    pub fn fully_masked(shape: GridShape) -> Self {
        Self {
            shape,
            values: vec![f32::NAN; shape.len()],
            mask: vec![true; shape.len()],
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Value of a cell, None if masked or outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        let i = self.shape.offset(row, col)?;
        if self.mask[i] {
            None
        } else {
            Some(self.values[i])
        }
    }

    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    /// Number of unmasked cells.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&m| !m).count()
    }

    /// Min and max over unmasked, finite cells.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .zip(self.mask.iter())
            .filter(|&(v, &m)| !m && v.is_finite())
            .fold(None, |acc, (&v, _)| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_offset() {
        let shape = GridShape::new(2, 3);
        assert_eq!(shape.len(), 6);
        assert_eq!(shape.offset(1, 2), Some(5));
        assert_eq!(shape.offset(2, 0), None);
        assert_eq!(shape.offset(0, 3), None);
    }

    #[test]
    fn test_index_from_fill() {
        let grid = LandIndexGrid::from_fill(GridShape::new(2, 2), vec![0, 1, -999, 2], -999).unwrap();
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(1, 0), None);
        assert_eq!(grid.get(1, 1), Some(2));
        assert_eq!(grid.valid_count(), 3);
    }

    #[test]
    fn test_negative_index_other_than_fill_stays_valid_and_fails_validation() {
        let index = LandIndexGrid::from_fill(GridShape::new(1, 4), vec![0, -5, 1, -1], -1).unwrap();
        assert_eq!(index.get(0, 1), Some(-5));
        assert_eq!(index.get(0, 3), None);

        let info = GridInfo::new(index, vec![0.0; 4], vec![0.0; 4]).unwrap();
        assert!(matches!(info.validate(), Err(ClimateError::Validation(_))));
    }

    #[test]
    fn test_index_shape_mismatch() {
        let err = LandIndexGrid::new(GridShape::new(2, 2), vec![0, 1, 2], vec![false; 4]).unwrap_err();
        assert!(matches!(err, ClimateError::Validation(_)));
    }

    #[test]
    fn test_grid_info_shape_mismatch() {
        let index = LandIndexGrid::from_fill(GridShape::new(1, 2), vec![0, 1], -1).unwrap();
        let err = GridInfo::new(index, vec![0.0, 0.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, ClimateError::Validation(_)));
    }

    #[test]
    fn test_grid_info_validate_duplicates() {
        let index = LandIndexGrid::from_fill(GridShape::new(1, 3), vec![0, 1, 1], -1).unwrap();
        let info = GridInfo::new(index, vec![0.0; 3], vec![0.0; 3]).unwrap();
        assert!(matches!(info.validate(), Err(ClimateError::Validation(_))));
    }

    #[test]
    fn test_grid_info_validate_ignores_masked_cells() {
        let index = LandIndexGrid::new(
            GridShape::new(1, 3),
            vec![0, 0, 1],
            vec![false, true, false],
        )
        .unwrap();
        let info = GridInfo::new(index, vec![0.0; 3], vec![0.0; 3]).unwrap();
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_masked_grid_range_skips_masked() {
        let grid = MaskedGrid::new(
            GridShape::new(1, 4),
            vec![1.0, 100.0, -3.0, 2.0],
            vec![false, true, false, false],
        )
        .unwrap();
        assert_eq!(grid.value_range(), Some((-3.0, 2.0)));
        assert!(grid.values()[1].is_nan());
        assert!(grid.is_masked(0, 1));
    }

    #[test]
    fn test_fully_masked_has_no_range() {
        let grid = MaskedGrid::fully_masked(GridShape::new(3, 3));
        assert_eq!(grid.value_range(), None);
        assert_eq!(grid.valid_count(), 0);
    }
}
