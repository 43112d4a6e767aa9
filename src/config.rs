//! Configuration of a basis directory run (`toml`)
//!
//! ```toml
//! basis_dir = "mesh/basis"
//! reference_dir = "test"
//! default_value = 0.012
//! tolerance = 1e-7
//! output = "data/compare.h5"
//! ```
use crate::condense::CONDENSE_TOL;
use crate::error::Result;
use crate::io::MANNINGS_N;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Manning's n of the reference run
pub const DEFAULT_MANNINGS_N: f64 = 0.012;

/// Paths and parameters of a basis directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasisConfig {
    /// Directory containing the `landuse_*` folders
    pub basis_dir: PathBuf,
    /// Folder of the reference run, relative to `basis_dir`
    pub reference_dir: PathBuf,
    /// Attribute name in the attribute files
    pub attribute_name: String,
    /// Attribute file name inside each folder
    pub attribute_file: String,
    /// Default value of nodes absent from every basis vector
    pub default_value: f64,
    /// Condensation tolerance
    pub tolerance: f64,
    /// Output file of diagnostics (hdf5)
    pub output: PathBuf,
}

impl Default for BasisConfig {
    fn default() -> Self {
        Self {
            basis_dir: PathBuf::from("."),
            reference_dir: PathBuf::from("test"),
            attribute_name: MANNINGS_N.to_owned(),
            attribute_file: "fort.13".to_owned(),
            default_value: DEFAULT_MANNINGS_N,
            tolerance: CONDENSE_TOL,
            output: PathBuf::from("data/compare.h5"),
        }
    }
}

impl BasisConfig {
    /// Config with default values for `basis_dir`
    pub fn new<P: AsRef<Path>>(basis_dir: P) -> Self {
        Self {
            basis_dir: basis_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Read config from a `toml` file, missing keys take default values
    ///
    /// # Errors
    /// File can't be read or is not valid toml
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from a `toml` string
    ///
    /// # Errors
    /// Not valid toml
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Folder of the reference run
    pub fn reference_path(&self) -> PathBuf {
        self.basis_dir.join(&self.reference_dir)
    }

    /// Attribute file of the reference run
    pub fn reference_file(&self) -> PathBuf {
        self.reference_path().join(&self.attribute_file)
    }
}
