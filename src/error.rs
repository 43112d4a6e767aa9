//! Error type of this crate
use std::path::PathBuf;
use thiserror::Error;

/// Result alias with [`BasisError`]
pub type Result<T> = std::result::Result<T, BasisError>;

/// Errors while combining, reading or writing nodal attributes
#[derive(Debug, Error)]
pub enum BasisError {
    /// Number of weights differs from number of basis vectors
    #[error("Dimension mismatch: {weights} weights for {basis} basis vectors")]
    DimensionMismatch {
        /// Length of the weight vector
        weights: usize,
        /// Number of basis vectors
        basis: usize,
    },

    /// Basis vector lists a node outside of the mesh
    #[error("Basis vector {basis} lists node {node}, mesh has {node_num} nodes")]
    NodeOutOfRange {
        /// Basis index
        basis: usize,
        /// Offending node id
        node: usize,
        /// Number of mesh nodes
        node_num: usize,
    },

    /// Dense input has the wrong number of entries
    #[error("Length mismatch of {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Name of the input
        what: String,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Malformed input file
    #[error("Parse error in {path:?} line {line}: {msg}")]
    Parse {
        /// File being read
        path: PathBuf,
        /// Line number (1-based)
        line: usize,
        /// What went wrong
        msg: String,
    },

    /// Attribute block not found in file
    #[error("Attribute {name:?} not found in {path:?}")]
    MissingAttribute {
        /// File being read
        path: PathBuf,
        /// Attribute name
        name: String,
    },

    /// No basis folders in directory
    #[error("No landuse_* folders in {0:?}")]
    NoBasisFolders(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hdf5 error
    #[error("Hdf5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// Invalid configuration file
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl BasisError {
    /// Create a parse error
    pub fn parse(path: impl Into<PathBuf>, line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            msg: msg.into(),
        }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}
