//! Catalog of GCM run identifiers.
//!
//! The catalog is an ordered, duplicate-free list of model tags. Runs select
//! a model by a 1-based index, matching how batch job arrays number their
//! tasks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::error::ClimateError;

/// CMIP5 models with JULES soil-temperature output, in job-array order.
pub const DEFAULT_GCMS: &[&str] = &[
    "CEN_BCC_MOD_bcc-csm1-1",
    "CEN_BCC_MOD_bcc-csm1-1-m",
    "CEN_BNU_MOD_BNU-ESM",
    "CEN_CCCma_MOD_CanESM2",
    "CEN_CMCC_MOD_CMCC-CMS",
    "CEN_CNRM-CERFACS_MOD_CNRM-CM5",
    "CEN_CSIRO-BOM_MOD_ACCESS1-0",
    "CEN_CSIRO-BOM_MOD_ACCESS1-3",
    "CEN_CSIRO-QCCCE_MOD_CSIRO-Mk3-6-0",
    "CEN_INM_MOD_inmcm4",
    "CEN_IPSL_MOD_IPSL-CM5A-LR",
    "CEN_IPSL_MOD_IPSL-CM5A-MR",
    "CEN_IPSL_MOD_IPSL-CM5B-LR",
    "CEN_MIROC_MOD_MIROC5",
    "CEN_MIROC_MOD_MIROC-ESM",
    "CEN_MIROC_MOD_MIROC-ESM-CHEM",
    "CEN_MOHC_MOD_HadGEM2-CC",
    "CEN_MOHC_MOD_HadGEM2-ES",
    "CEN_MPI-M_MOD_MPI-ESM-LR",
    "CEN_MPI-M_MOD_MPI-ESM-MR",
    "CEN_MRI_MOD_MRI-CGCM3",
    "CEN_NASA-GISS_MOD_GISS-E2-H",
    "CEN_NASA-GISS_MOD_GISS-E2-H-CC",
    "CEN_NASA-GISS_MOD_GISS-E2-R",
    "CEN_NASA-GISS_MOD_GISS-E2-R-CC",
    "CEN_NCAR_MOD_CCSM4",
    "CEN_NCC_MOD_NorESM1-M",
    "CEN_NCC_MOD_NorESM1-ME",
    "CEN_NOAA-GFDL_MOD_GFDL-CM3",
    "CEN_NOAA-GFDL_MOD_GFDL-ESM2G",
    "CEN_NOAA-GFDL_MOD_GFDL-ESM2M",
    "CEN_NSF-DOE-NCAR_MOD_CESM1-BGC",
    "CEN_NSF-DOE-NCAR_MOD_CESM1-CAM5",
    "CEN_NSF-DOE-NCAR_MOD_CESM1-WACCM",
];

/// Errors raised while building or querying a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog is empty")]
    Empty,

    #[error("Catalog entry {0} is blank")]
    BlankEntry(usize),

    #[error("Duplicate model identifier: {0}")]
    Duplicate(String),

    #[error("Model index {index} out of range (expected 1..={len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<CatalogError> for ClimateError {
    fn from(err: CatalogError) -> Self {
        ClimateError::Usage(err.to_string())
    }
}

/// Ordered, duplicate-free list of model identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Catalog {
    models: Vec<String>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists, blank tags and duplicates.
    pub fn new<I, S>(models: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models: Vec<String> = models.into_iter().map(Into::into).collect();
        if models.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(models.len());
        for (i, model) in models.iter().enumerate() {
            if model.trim().is_empty() {
                return Err(CatalogError::BlankEntry(i));
            }
            if !seen.insert(model.as_str()) {
                return Err(CatalogError::Duplicate(model.clone()));
            }
        }

        Ok(Self { models })
    }

    /// All model identifiers in catalog order.
    pub fn list_models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Select a model by 1-based index.
    pub fn select(&self, index: usize) -> Result<&str, CatalogError> {
        if index == 0 || index > self.models.len() {
            return Err(CatalogError::IndexOutOfRange {
                index,
                len: self.models.len(),
            });
        }
        Ok(&self.models[index - 1])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            models: DEFAULT_GCMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Catalog {
    type Error = CatalogError;

    fn try_from(models: Vec<String>) -> Result<Self, Self::Error> {
        Catalog::new(models)
    }
}

impl From<Catalog> for Vec<String> {
    fn from(catalog: Catalog) -> Self {
        catalog.models
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Catalog {
        Catalog::new(["gcm-a", "gcm-b", "gcm-c"]).unwrap()
    }

    #[test]
    fn test_select_is_one_based() {
        let catalog = three();
        assert_eq!(catalog.select(1).unwrap(), "gcm-a");
        assert_eq!(catalog.select(3).unwrap(), "gcm-c");
    }

    #[test]
    fn test_select_out_of_range() {
        let catalog = three();
        assert_eq!(
            catalog.select(0),
            Err(CatalogError::IndexOutOfRange { index: 0, len: 3 })
        );
        assert_eq!(
            catalog.select(4),
            Err(CatalogError::IndexOutOfRange { index: 4, len: 3 })
        );
    }

    #[test]
    fn test_out_of_range_maps_to_usage() {
        let err: ClimateError = three().select(4).unwrap_err().into();
        assert!(matches!(err, ClimateError::Usage(_)));
    }

    #[test]
    fn test_default_catalog_is_duplicate_free() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 34);
        assert!(Catalog::new(catalog.list_models().to_vec()).is_ok());
        assert_eq!(catalog.select(1).unwrap(), "CEN_BCC_MOD_bcc-csm1-1");
        assert_eq!(catalog.select(34).unwrap(), "CEN_NSF-DOE-NCAR_MOD_CESM1-WACCM");
    }

    #[test]
    fn test_rejects_duplicates_and_blanks() {
        assert_eq!(
            Catalog::new(["a", "b", "a"]),
            Err(CatalogError::Duplicate("a".to_string()))
        );
        assert_eq!(Catalog::new(["a", "  "]), Err(CatalogError::BlankEntry(1)));
        assert_eq!(Catalog::new(Vec::<String>::new()), Err(CatalogError::Empty));
    }
}
