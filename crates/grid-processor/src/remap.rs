//! Scatter land-point arrays onto the regular lat/lon grid.

use climate_common::{GridShape, LandIndexGrid, MaskedGrid};

use crate::error::{GridError, Result};

/// Place `land_values[index[r, c]]` into every valid cell of the grid.
///
/// Cells masked in the index come out masked. A valid cell whose index is
/// negative or past the end of `land_values` is an error; indices are never
/// clamped or wrapped.
///
/// # Example
///
/// ```
/// use climate_common::{GridShape, LandIndexGrid};
/// use grid_processor::remap;
///
/// let index = LandIndexGrid::new(
///     GridShape::new(2, 2),
///     vec![0, 1, 2, -1],
///     vec![false, false, false, true],
/// )
/// .unwrap();
/// let grid = remap(&[10.0, 20.0, 30.0], &index).unwrap();
///
/// assert_eq!(grid.get(0, 0), Some(10.0));
/// assert_eq!(grid.get(1, 0), Some(30.0));
/// assert!(grid.is_masked(1, 1));
/// ```
pub fn remap(land_values: &[f32], index: &LandIndexGrid) -> Result<MaskedGrid> {
    let shape = index.shape();
    let mut values = vec![f32::NAN; shape.len()];

    for (cell, (&idx, &masked)) in index.indices().iter().zip(index.mask()).enumerate() {
        if masked {
            continue;
        }
        let value = usize::try_from(idx)
            .ok()
            .and_then(|i| land_values.get(i))
            .ok_or(GridError::IndexOutOfRange {
                row: cell / shape.width.max(1),
                col: cell % shape.width.max(1),
                index: idx,
                len: land_values.len(),
            })?;
        values[cell] = *value;
    }

    Ok(MaskedGrid::new(shape, values, index.mask().to_vec())?)
}

/// [`remap`] from a raw row-major index array and mask.
///
/// `indices` and `mask` must both hold `shape.height * shape.width` cells.
pub fn remap_with_mask(
    land_values: &[f32],
    shape: GridShape,
    indices: &[i64],
    mask: &[bool],
) -> Result<MaskedGrid> {
    let index = LandIndexGrid::new(shape, indices.to_vec(), mask.to_vec())?;
    remap(land_values, &index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_scatters_and_masks() {
        let grid = remap_with_mask(
            &[10.0, 20.0, 30.0],
            GridShape::new(2, 2),
            &[0, 1, 2, -1],
            &[false, false, false, true],
        )
        .unwrap();

        assert_eq!(grid.get(0, 0), Some(10.0));
        assert_eq!(grid.get(0, 1), Some(20.0));
        assert_eq!(grid.get(1, 0), Some(30.0));
        assert!(grid.is_masked(1, 1));
        assert_eq!(grid.valid_count(), 3);
    }

    #[test]
    fn test_remap_all_masked() {
        let grid = remap_with_mask(
            &[1.0],
            GridShape::new(2, 3),
            &[0; 6],
            &[true; 6],
        )
        .unwrap();
        assert_eq!(grid.valid_count(), 0);
        assert!(grid.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_remap_index_out_of_range() {
        let err = remap_with_mask(
            &[1.0, 2.0],
            GridShape::new(1, 3),
            &[0, 1, 2],
            &[false; 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GridError::IndexOutOfRange {
                row: 0,
                col: 2,
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn test_remap_negative_index_on_valid_cell() {
        let err = remap_with_mask(&[1.0], GridShape::new(1, 1), &[-5], &[false]).unwrap_err();
        assert!(matches!(err, GridError::IndexOutOfRange { index: -5, .. }));
    }

    #[test]
    fn test_remap_shape_mismatch() {
        let err = remap_with_mask(&[1.0], GridShape::new(2, 2), &[0, 0, 0, 0], &[false; 3])
            .unwrap_err();
        assert!(matches!(err, GridError::InvalidGrid(_)));
    }

    #[test]
    fn test_remap_ignores_index_under_mask() {
        // Masked cells may hold garbage indices
        let grid = remap_with_mask(
            &[7.0],
            GridShape::new(1, 2),
            &[0, 999],
            &[false, true],
        )
        .unwrap();
        assert_eq!(grid.get(0, 0), Some(7.0));
        assert!(grid.is_masked(0, 1));
    }
}
