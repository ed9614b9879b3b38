//! Plotter configuration.
//!
//! Defaults reproduce the standard run: `t_soil` averaged over the top five
//! layers for 1850-2100. A YAML file may override any subset of keys, then
//! `SOIL_PLOTTER_*` environment variables override the file.

use std::env;
use std::path::{Path, PathBuf};

use climate_common::{Catalog, ClimateError};
use netcdf_parser::{FileTemplate, GridFieldNames, YEAR_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_DATA_DIR: &str = "SOIL_PLOTTER_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "SOIL_PLOTTER_OUTPUT_DIR";
pub const ENV_START_YEAR: &str = "SOIL_PLOTTER_START_YEAR";
pub const ENV_END_YEAR: &str = "SOIL_PLOTTER_END_YEAR";
pub const ENV_VARIABLE: &str = "SOIL_PLOTTER_VARIABLE";
pub const ENV_FONT: &str = "SOIL_PLOTTER_FONT";

/// Configuration errors. All of them are usage errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ClimateError {
    fn from(err: ConfigError) -> Self {
        ClimateError::usage(err.to_string())
    }
}

/// Names of the fields in the grid metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFields {
    pub land_index: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for GridFields {
    fn default() -> Self {
        let names = GridFieldNames::default();
        Self {
            land_index: names.land_index,
            latitude: names.latitude,
            longitude: names.longitude,
        }
    }
}

impl From<&GridFields> for GridFieldNames {
    fn from(fields: &GridFields) -> Self {
        Self {
            land_index: fields.land_index.clone(),
            latitude: fields.latitude.clone(),
            longitude: fields.longitude.clone(),
        }
    }
}

/// Plot appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    /// Pixels per grid cell edge on maps
    pub cell_size: u32,
    /// TrueType font for titles and labels; text is omitted without one
    pub font: Option<PathBuf>,
    /// Style JSON file with color ramps
    pub style_file: Option<PathBuf>,
    /// Style to use from `style_file`
    pub style_name: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            cell_size: 4,
            font: None,
            style_file: None,
            style_name: "soil_temperature".to_string(),
        }
    }
}

/// Top-level plotter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterConfig {
    /// Root of the model archive
    pub data_dir: PathBuf,
    /// Grid metadata file, relative to `data_dir` unless absolute
    pub grid_file: PathBuf,
    /// Yearly dump path template, relative to `data_dir`
    pub file_template: String,
    /// Existing directory the plots are written to
    pub output_dir: PathBuf,
    pub variable: String,
    pub start_year: i32,
    pub end_year: i32,
    /// First depth layer to average
    pub layer_start: usize,
    /// Number of depth layers to average
    pub layer_count: usize,
    pub grid_fields: GridFields,
    pub plot: PlotSettings,
    /// Replaces the built-in model list when set
    pub models: Option<Catalog>,
}

impl Default for PlotterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            grid_file: PathBuf::from("ancillary/grid_info.nc"),
            file_template: "{gcm}/BL_{gcm}.dump.{year}0101.0.nc".to_string(),
            output_dir: PathBuf::from("output"),
            variable: "t_soil".to_string(),
            start_year: 1850,
            end_year: 2100,
            layer_start: 0,
            layer_count: 5,
            grid_fields: GridFields::default(),
            plot: PlotSettings::default(),
            models: None,
        }
    }
}

impl PlotterConfig {
    /// Load from an optional YAML file, apply environment overrides and
    /// validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Apply `SOIL_PLOTTER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_START_YEAR) {
            self.start_year = parse_year(ENV_START_YEAR, v)?;
        }
        if let Some(v) = lookup(ENV_END_YEAR) {
            self.end_year = parse_year(ENV_END_YEAR, v)?;
        }
        if let Some(v) = lookup(ENV_VARIABLE) {
            self.variable = v;
        }
        if let Some(v) = lookup(ENV_FONT) {
            self.plot.font = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_year > self.end_year {
            return Err(ConfigError::Invalid(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }
        if self.layer_count == 0 {
            return Err(ConfigError::Invalid("layer_count must be at least 1".to_string()));
        }
        if !self.template().has_year() {
            return Err(ConfigError::Invalid(format!(
                "file_template '{}' has no {} placeholder",
                self.file_template, YEAR_PLACEHOLDER
            )));
        }
        if self.variable.trim().is_empty() {
            return Err(ConfigError::Invalid("variable must not be empty".to_string()));
        }
        if self.plot.cell_size == 0 {
            return Err(ConfigError::Invalid("plot.cell_size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn template(&self) -> FileTemplate {
        FileTemplate::new(self.file_template.clone())
    }

    /// Absolute-or-data-relative grid metadata path.
    pub fn grid_path(&self) -> PathBuf {
        self.data_dir.join(&self.grid_file)
    }

    /// The configured model list, or the built-in one.
    pub fn catalog(&self) -> Catalog {
        self.models.clone().unwrap_or_default()
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    pub fn year_count(&self) -> usize {
        let count = i64::from(self.end_year) - i64::from(self.start_year) + 1;
        usize::try_from(count).unwrap_or(0)
    }
}

fn parse_year(key: &'static str, value: String) -> Result<i32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}
