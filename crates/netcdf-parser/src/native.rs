//! Native NetCDF access using the netcdf library.
//!
//! Thin helpers over the `netcdf` crate shared by the grid-metadata and
//! yearly-dump readers: opening files, looking up variables, reading values
//! regardless of their stored numeric type, and fill-value handling.

use std::path::Path;
use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// NetCDF default fill value for `NC_INT` variables.
pub const NC_FILL_INT: i64 = -2147483647;

/// NetCDF default fill value for `NC_FLOAT` variables.
pub const NC_FILL_FLOAT: f32 = 9.969_209_968_386_869e36;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This disables that output by calling
/// H5Eset_auto2 with null handlers. Safe to call multiple times.
///
/// Call this early in `main()`, before any HDF5/NetCDF operations occur.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file for reading.
pub(crate) fn open(path: &Path) -> NetCdfResult<netcdf::File> {
    silence_hdf5_errors();
    netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open NetCDF {}: {}", path.display(), e))
    })
}

/// Look up a variable, failing with `MissingData` if absent.
pub(crate) fn require_variable<'f>(
    file: &'f netcdf::File,
    name: &str,
) -> NetCdfResult<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))
}

/// Dimension lengths of a variable, outermost first.
pub(crate) fn dimension_lengths(var: &netcdf::Variable) -> Vec<usize> {
    var.dimensions().iter().map(|d| d.len()).collect()
}

/// Read every value of a variable as f64, whatever its stored numeric type.
pub(crate) fn read_values_f64(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    read_slab_f64(var, netcdf::Extents::from(..))
}

/// Read a hyperslab of a variable as f64, whatever its stored numeric type.
///
/// Model output mixes float and integer storage for the same logical field
/// depending on the post-processing tool, so each common type is tried in turn.
pub(crate) fn read_slab_f64(var: &netcdf::Variable, extents: netcdf::Extents) -> NetCdfResult<Vec<f64>> {
    if let Ok(values) = var.get_values::<f64, _>(extents.clone()) {
        return Ok(values);
    }
    if let Ok(values) = var.get_values::<f32, _>(extents.clone()) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i32, _>(extents.clone()) {
        return Ok(values.into_iter().map(f64::from).collect());
    }
    if let Ok(values) = var.get_values::<i64, _>(extents.clone()) {
        return Ok(values.into_iter().map(|v| v as f64).collect());
    }
    var.get_values::<i16, _>(extents)
        .map(|values| values.into_iter().map(f64::from).collect())
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", var.name(), e)))
}

/// Extents selecting `layers` on the outermost dimension and everything on
/// the remaining `trailing` dimensions.
pub(crate) fn leading_slab(layers: std::ops::Range<usize>, trailing: usize) -> netcdf::Extents {
    let mut extents = Vec::with_capacity(trailing + 1);
    extents.push(netcdf::Extent::from(layers));
    extents.extend(std::iter::repeat(netcdf::Extent::from(..)).take(trailing));
    netcdf::Extents::from(extents)
}

/// Declared fill value of a variable (`_FillValue`, then `missing_value`).
pub(crate) fn fill_value(var: &netcdf::Variable) -> Option<f64> {
    get_f64_attr(var, "_FillValue").or_else(|| get_f64_attr(var, "missing_value"))
}

/// Convert raw values to f32, turning fill values into NaN.
///
/// Without a declared fill value the NetCDF default float fill is used.
pub(crate) fn fill_to_nan(values: &[f64], fill: Option<f64>) -> Vec<f32> {
    values
        .iter()
        .map(|&v| {
            let is_fill = match fill {
                Some(f) => v == f,
                None => v as f32 == NC_FILL_FLOAT,
            };
            if is_fill {
                f32::NAN
            } else {
                v as f32
            }
        })
        .collect()
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_to_nan_with_declared_fill() {
        let out = fill_to_nan(&[1.0, -999.0, 3.5], Some(-999.0));
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 3.5);
    }

    #[test]
    fn test_fill_to_nan_default_float_fill() {
        let out = fill_to_nan(&[f64::from(NC_FILL_FLOAT), 280.0], None);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 280.0);
    }

    #[test]
    fn test_silence_is_idempotent() {
        silence_hdf5_errors();
        silence_hdf5_errors();
    }
}
