//! Synthetic data generators for land-point tests.
//!
//! These generators create predictable, verifiable patterns so expected
//! means and growth rates can be written down by hand.

/// Regular 2D coordinates for a `height x width` grid.
///
/// Row `r` sits at latitude `-90 + (r + 0.5) * 180 / height`, column `c` at
/// longitude `-180 + (c + 0.5) * 360 / width`. Returned row-major.
pub fn regular_coordinates(height: usize, width: usize) -> (Vec<f32>, Vec<f32>) {
    let dlat = 180.0 / height.max(1) as f32;
    let dlon = 360.0 / width.max(1) as f32;
    let mut lats = Vec::with_capacity(height * width);
    let mut lons = Vec::with_capacity(height * width);
    for row in 0..height {
        for col in 0..width {
            lats.push(-90.0 + (row as f32 + 0.5) * dlat);
            lons.push(-180.0 + (col as f32 + 0.5) * dlon);
        }
    }
    (lats, lons)
}

/// Land index for a grid where every cell in `ocean` is masked and the
/// remaining cells are numbered 0.. in row-major order.
///
/// # Example
///
/// ```
/// use test_utils::sequential_land_index;
///
/// let index = sequential_land_index(2, 2, &[3]);
/// assert_eq!(index, vec![0, 1, 2, -1]);
/// ```
pub fn sequential_land_index(height: usize, width: usize, ocean: &[usize]) -> Vec<i32> {
    let mut next = 0;
    (0..height * width)
        .map(|cell| {
            if ocean.contains(&cell) {
                crate::fixtures::LAND_INDEX_FILL
            } else {
                next += 1;
                next - 1
            }
        })
        .collect()
}

/// Soil temperature in Kelvin that warms linearly by `rate` per year and
/// cools by 0.5 K per layer, with a per-point offset.
///
/// The depth mean over layers `0..n` is `base(year, land) - 0.25 * (n - 1)`.
pub fn warming_soil(year: i32, layer: usize, land: usize, start_year: i32, rate: f32) -> f32 {
    270.0 + land as f32 + rate * (year - start_year) as f32 - 0.5 * layer as f32
}

/// Years x land-point series where year `i`, point `j` holds `i * 10 + j`.
pub fn stepped_series(years: usize, n_land: usize) -> Vec<Vec<f32>> {
    (0..years)
        .map(|i| (0..n_land).map(|j| (i * 10 + j) as f32).collect())
        .collect()
}
